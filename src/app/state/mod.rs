mod constants;
mod ui;

use crate::theme::Theme;
use iced::Task;
use iced::widget::image::Handle;
use podium_core::compose::Compositor;
use podium_core::config::{AppConfig, clamp_config};
use podium_core::geometry::{Point, Size};
use podium_core::input::InputEvent;
use podium_core::presenter::{Presenter, PresenterSettings};
use podium_core::recording::{CaptureRegion, RecordingSession, RecordingSettings};
use podium_core::script::ScriptState;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use super::messages::Message;

pub(crate) use constants::*;
pub(in crate::app) use ui::{PointerState, WindowState};

/// Core application state composed of sub-models.
pub struct App {
    pub(super) config: AppConfig,
    pub(super) presenter: Presenter,
    pub(super) compositor: Compositor,
    pub(super) frame: Option<Handle>,
    pub(super) document: Option<PathBuf>,
    pub(super) deck_loading: bool,
    pub(super) script: ScriptState,
    pub(super) recording: RecordingSession,
    pub(super) window: WindowState,
    pub(super) pointer: PointerState,
    pub(super) status: Option<String>,
    pub(super) open_path_input: String,
    pub(super) script_path_input: String,
}

impl App {
    pub(super) fn bootstrap(
        mut config: AppConfig,
        document: Option<PathBuf>,
        script: Option<PathBuf>,
    ) -> (App, Task<Message>) {
        clamp_config(&mut config);
        let window = WindowState {
            width: config.window_width,
            height: config.window_height,
            position: None,
            fullscreen: false,
        };
        let mut app = App {
            presenter: Presenter::new(
                PresenterSettings::from_config(&config, Self::chrome_offset()),
                Size::new(1, 1),
            ),
            compositor: Compositor::default(),
            frame: None,
            document: None,
            deck_loading: false,
            script: ScriptState::new(config.script_auto_scroll, config.script_scroll_speed),
            recording: RecordingSession::new(RecordingSettings::from_config(&config)),
            window,
            pointer: PointerState::new(),
            status: None,
            open_path_input: document
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_default(),
            script_path_input: script
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_default(),
            config,
        };
        app.compositor
            .set_background(Theme::from(app.config.theme).viewport_background());
        app.sync_viewport();

        if let Some(path) = script {
            app.load_script(path);
        }
        app.redraw();

        let task = if document.is_some() {
            Task::done(Message::OpenPathRequested)
        } else {
            Task::none()
        };
        (app, task)
    }

    /// Window-space position of the viewport's top-left corner.
    pub(super) fn chrome_offset() -> Point {
        Point::new(0.0, TOOLBAR_HEIGHT)
    }

    pub(super) fn viewport_size(&self) -> Size {
        let mut width = self.window.width;
        if self.config.show_script {
            width -= SCRIPT_PANEL_WIDTH;
        }
        let height = self.window.height - TOOLBAR_HEIGHT - STATUS_BAR_HEIGHT;
        Size::new(width.max(1.0).floor() as u32, height.max(1.0).floor() as u32)
    }

    /// True when a window-space point lies on the presentation viewport.
    pub(super) fn in_viewport(&self, x: f32, y: f32) -> bool {
        let viewport = self.presenter.viewport();
        let top = TOOLBAR_HEIGHT;
        x >= 0.0 && x < viewport.width as f32 && y >= top && y < top + viewport.height as f32
    }

    /// Screen rectangle covered by the viewport, for the capture process.
    /// `None` until the window's inner position is known.
    pub(super) fn capture_region(&self) -> Option<CaptureRegion> {
        let (x, y) = self.window.position?;
        let viewport = self.presenter.viewport();
        let region = CaptureRegion::new(
            x.round() as i32,
            (y + TOOLBAR_HEIGHT).round() as i32,
            viewport.width,
            viewport.height,
        );
        Some(region.even())
    }

    /// Push the current layout size into the presenter. Returns `true` when it
    /// changed.
    pub(super) fn sync_viewport(&mut self) -> bool {
        let size = self.viewport_size();
        if size == self.presenter.viewport() {
            return false;
        }
        debug!(width = size.width, height = size.height, "Viewport resized");
        self.presenter.apply(InputEvent::Resize(size));
        true
    }

    pub(super) fn redraw(&mut self) {
        let frame = self.presenter.compose(&mut self.compositor);
        let (width, height) = frame.dimensions();
        self.frame = Some(Handle::from_rgba(width, height, frame.into_raw()));
    }

    pub(super) fn load_script(&mut self, path: PathBuf) {
        match self.script.load(&path) {
            Ok(()) => {
                info!(path = %path.display(), "Loaded speaker script");
                self.set_status(format!("Script loaded: {}", path.display()));
            }
            Err(err) => {
                warn!(path = %path.display(), "Failed to load script: {err}");
                self.set_status(err.to_string());
            }
        }
    }

    pub(super) fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub(super) fn slide_label(&self) -> String {
        let deck = self.presenter.deck();
        if deck.is_empty() {
            "No slides".to_string()
        } else {
            format!("Slide {} / {}", deck.current_index() + 1, deck.len())
        }
    }
}
