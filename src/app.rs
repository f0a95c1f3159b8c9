use std::sync::Arc;

use iced::{Element, Task};

use crate::adapters::{self, XlsxExporter};
use crate::core::models::UserSettings;
use crate::core::orchestrators::app_orchestrator::{AppOrchestrator, OrchestratorMessage};

pub struct ExtractorApp {
    orchestrator: AppOrchestrator,
}

impl ExtractorApp {
    pub fn build() -> (Self, Task<OrchestratorMessage>) {
        log::info!("[APP] Initializing application");

        let settings = UserSettings::load();

        let recognizer_settings = settings.clone();
        let orchestrator = AppOrchestrator::build(settings, Arc::new(XlsxExporter::new()));

        let initialize_recognizer = Task::future(async move {
            match adapters::build_text_recognizer(&recognizer_settings).await {
                Ok(recognizer) => {
                    log::info!(
                        "[APP] {} recognizer initialized successfully",
                        recognizer.backend_name()
                    );
                    OrchestratorMessage::RecognizerReady(recognizer)
                }
                Err(e) => {
                    log::error!("[APP] Failed to initialize recognizer: {}", e);
                    OrchestratorMessage::RecognizerFailed(e.to_string())
                }
            }
        });

        (Self { orchestrator }, initialize_recognizer)
    }

    pub fn handle_update(&mut self, message: OrchestratorMessage) -> Task<OrchestratorMessage> {
        let changes_settings = matches!(message, OrchestratorMessage::ToggleDateColumn(_));
        let task = self.orchestrator.update(message);

        if changes_settings {
            if let Err(e) = self.orchestrator.settings().save() {
                log::warn!("[APP] Failed to save settings: {:#}", e);
            }
        }

        task
    }

    pub fn render_view(&self) -> Element<'_, OrchestratorMessage> {
        self.orchestrator.render_view()
    }

    pub fn window_title(&self) -> String {
        self.orchestrator.get_window_title()
    }

    pub fn handle_subscription(&self) -> iced::Subscription<OrchestratorMessage> {
        use iced::window;

        iced::event::listen_with(|event, _status, _id| {
            if let iced::Event::Window(window::Event::FileDropped(path)) = event {
                return Some(OrchestratorMessage::FilesDropped(vec![path]));
            }
            None
        })
    }
}
