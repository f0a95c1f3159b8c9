#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod adapters;
mod app;
mod core;
mod global_constants;
mod presentation;
mod utils;


use iced::application;

fn main() -> iced::Result {
    env_logger::init();

    log::info!("[MAIN] Starting {}", global_constants::APPLICATION_TITLE);

    if std::env::var_os(global_constants::ENV_TESSDATA_PREFIX).is_none() {
        if let Some(bundled_tessdata) = option_env!("BUNDLED_TESSDATA_DIR") {
            log::info!("[MAIN] Using bundled tessdata at {}", bundled_tessdata);
            std::env::set_var(global_constants::ENV_TESSDATA_PREFIX, bundled_tessdata);
        }
    }

    application(
        app::ExtractorApp::build,
        app::ExtractorApp::handle_update,
        app::ExtractorApp::render_view,
    )
    .title(app::ExtractorApp::window_title)
    .subscription(app::ExtractorApp::handle_subscription)
    .window_size((1000.0, 860.0))
    .run()
}
