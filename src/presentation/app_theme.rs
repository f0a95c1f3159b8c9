use iced::widget::{button, text};
use iced::{Background, Border, Color, Shadow, Theme};

use crate::core::models::{SessionState, ThemeMode};

pub fn get_theme(mode: &ThemeMode) -> Theme {
    match mode {
        ThemeMode::Dark => Theme::custom(
            "Dark".to_string(),
            iced::theme::Palette {
                background: Color::from_rgb(0.08, 0.08, 0.09),
                text: Color::from_rgb(0.95, 0.95, 0.95),
                primary: Color::from_rgb(0.4, 0.6, 1.0),
                success: Color::from_rgb(0.2, 0.9, 0.4),
                danger: Color::from_rgb(1.0, 0.3, 0.3),
                warning: Color::from_rgb(1.0, 0.7, 0.0),
            },
        ),
        ThemeMode::Light => Theme::custom(
            "Light".to_string(),
            iced::theme::Palette {
                background: Color::from_rgb(0.95, 0.95, 0.97),
                text: Color::from_rgb(0.1, 0.1, 0.1),
                primary: Color::from_rgb(0.2, 0.4, 0.9),
                success: Color::from_rgb(0.1, 0.7, 0.3),
                danger: Color::from_rgb(0.9, 0.2, 0.2),
                warning: Color::from_rgb(0.9, 0.6, 0.0),
            },
        ),
    }
}

fn flat_button(background: Color, text_color: Color, border_color: Color, snap: bool) -> button::Style {
    button::Style {
        background: Some(Background::Color(background)),
        text_color,
        border: Border {
            color: border_color,
            width: 1.0,
            radius: 6.0.into(),
        },
        shadow: Shadow::default(),
        snap,
    }
}

fn disabled_button() -> button::Style {
    flat_button(
        Color::from_rgb(0.3, 0.3, 0.3),
        Color::from_rgb(0.5, 0.5, 0.5),
        Color::from_rgb(0.4, 0.4, 0.4),
        false,
    )
}

pub fn primary_button_style(_theme: &Theme, status: button::Status) -> button::Style {
    let (background, snap) = match status {
        button::Status::Active => (Color::from_rgb(0.098, 0.529, 0.329), false),
        button::Status::Hovered => (Color::from_rgb(0.122, 0.655, 0.408), false),
        button::Status::Pressed => (Color::from_rgb(0.078, 0.420, 0.263), true),
        button::Status::Disabled => return disabled_button(),
    };

    flat_button(background, Color::WHITE, background, snap)
}

pub fn secondary_button_style(_theme: &Theme, status: button::Status) -> button::Style {
    match status {
        button::Status::Active => flat_button(
            Color::from_rgb(0.25, 0.25, 0.25),
            Color::from_rgb(0.7, 0.7, 0.7),
            Color::from_rgb(0.4, 0.4, 0.4),
            false,
        ),
        button::Status::Hovered => flat_button(
            Color::from_rgb(0.35, 0.35, 0.35),
            Color::from_rgb(0.9, 0.9, 0.9),
            Color::from_rgb(0.5, 0.5, 0.5),
            false,
        ),
        button::Status::Pressed => flat_button(
            Color::from_rgb(0.2, 0.2, 0.2),
            Color::from_rgb(0.8, 0.8, 0.8),
            Color::from_rgb(0.35, 0.35, 0.35),
            true,
        ),
        button::Status::Disabled => disabled_button(),
    }
}

/// Segmented-control button; the selected option is highlighted in blue.
pub fn selector_button_style(
    theme: &Theme,
    status: button::Status,
    is_selected: bool,
) -> button::Style {
    if !is_selected {
        return secondary_button_style(theme, status);
    }

    match status {
        button::Status::Pressed => flat_button(
            Color::from_rgb(0.2, 0.5, 0.9),
            Color::WHITE,
            Color::from_rgb(0.3, 0.6, 0.9),
            true,
        ),
        button::Status::Disabled => disabled_button(),
        _ => flat_button(
            Color::from_rgb(0.3, 0.6, 1.0),
            Color::WHITE,
            Color::from_rgb(0.4, 0.7, 1.0),
            false,
        ),
    }
}

pub fn muted_text_style(_theme: &Theme) -> text::Style {
    text::Style {
        color: Some(Color::from_rgba(0.6, 0.6, 0.6, 1.0)),
    }
}

pub fn warning_text_style(_theme: &Theme) -> text::Style {
    text::Style {
        color: Some(Color::from_rgb(1.0, 0.7, 0.0)),
    }
}

pub fn session_status_color(state: &SessionState) -> Color {
    match state {
        SessionState::Done | SessionState::RegionsReady => Color::from_rgb(0.2, 0.8, 0.4),
        SessionState::Processing => Color::from_rgb(1.0, 0.8, 0.2),
        SessionState::Failed(_) => Color::from_rgb(1.0, 0.3, 0.3),
        SessionState::AwaitingUpload | SessionState::RegionsPending => {
            Color::from_rgba(0.5, 0.5, 0.5, 1.0)
        }
    }
}
