mod messages;
mod state;
mod update;
mod view;

pub use state::App;
pub(crate) use state::CONFIG_PATH;

use crate::theme::Theme;
use iced::{Size, window};
use podium_core::config::AppConfig;
use std::path::PathBuf;

/// Launch the viewer, optionally opening `document` and a speaker `script`.
pub fn run_app(
    config: AppConfig,
    document: Option<PathBuf>,
    script: Option<PathBuf>,
) -> iced::Result {
    let window_settings = window::Settings {
        size: Size::new(config.window_width, config.window_height),
        exit_on_close_request: false,
        ..window::Settings::default()
    };

    iced::application("Podium", App::update, App::view)
        .window(window_settings)
        .subscription(App::subscription)
        .theme(|app: &App| iced::Theme::from(Theme::from(app.config.theme)))
        .run_with(move || App::bootstrap(config, document, script))
}
