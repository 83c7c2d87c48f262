use super::super::super::messages::Message;
use super::super::super::state::App;
use super::super::Effect;
use super::shortcuts::{key_press_from_iced, modifiers_from_iced};
use crate::theme::Theme;
use iced::mouse;
use podium_core::deck::Deck;
use podium_core::geometry::Point;
use podium_core::input::{Action, InputEvent, PointerButton};
use podium_core::presenter::Outcome;
use std::path::PathBuf;
use tracing::{debug, info, warn};

impl App {
    pub(super) fn reduce(&mut self, message: Message) -> Vec<Effect> {
        let mut effects = Vec::new();

        match message {
            Message::NextSlide => self.handle_action(Action::NextSlide, &mut effects),
            Message::PreviousSlide => self.handle_action(Action::PrevSlide, &mut effects),
            Message::ZoomIn => self.handle_action(Action::ZoomIn, &mut effects),
            Message::ZoomOut => self.handle_action(Action::ZoomOut, &mut effects),
            Message::ResetView => {
                self.handle_action(Action::ResetZoom, &mut effects);
                self.handle_action(Action::ResetPan, &mut effects);
            }
            Message::ToggleTheme => self.handle_toggle_theme(&mut effects),
            Message::ToggleFullscreen => self.handle_action(Action::ToggleFullscreen, &mut effects),
            Message::ToggleDrawing => self.handle_action(Action::ToggleDrawing, &mut effects),
            Message::ClearStrokes => self.handle_action(Action::ClearStrokes, &mut effects),
            Message::UndoStroke => self.handle_action(Action::UndoStroke, &mut effects),
            Message::CycleColor => self.handle_action(Action::CycleColor, &mut effects),
            Message::PenWidthChanged(width) => {
                self.presenter.set_pen_width(width);
                self.config.pen_width = self.presenter.overlay().pen_width();
            }
            Message::ExportAnnotations => effects.push(Effect::ExportAnnotations),
            Message::ToggleRecording => self.handle_action(Action::ToggleRecording, &mut effects),
            Message::ToggleScript => self.handle_action(Action::ToggleScript, &mut effects),
            Message::OpenPathInputChanged(path) => self.open_path_input = path,
            Message::OpenPathRequested => self.handle_open_path_requested(&mut effects),
            Message::DeckLoaded {
                path,
                deck,
                resume_at,
            } => self.handle_deck_loaded(path, deck, resume_at, &mut effects),
            Message::DeckLoadFailed { path, error } => {
                self.deck_loading = false;
                warn!(path = %path.display(), "Failed to load document: {error}");
                self.set_status(error);
            }
            Message::ScriptPathInputChanged(path) => self.script_path_input = path,
            Message::LoadScriptRequested => self.handle_load_script_requested(&mut effects),
            Message::SaveScriptRequested => self.handle_save_script_requested(&mut effects),
            Message::ScriptSpeedChanged(speed) => self.script.set_speed(speed),
            Message::ToggleScriptAutoScroll => {
                self.script.toggle_auto_scroll();
            }
            Message::ScriptScrollUp => {
                let changed = self.script.scroll_up();
                self.push_script_scroll(changed, &mut effects);
            }
            Message::ScriptScrollDown => {
                let changed = self.script.scroll_down();
                self.push_script_scroll(changed, &mut effects);
            }
            Message::ScriptTop => {
                let changed = self.script.reset_to_top();
                self.push_script_scroll(changed, &mut effects);
            }
            Message::ScriptBottom => {
                let changed = self.script.scroll_to_bottom();
                self.push_script_scroll(changed, &mut effects);
            }
            Message::ScriptScrolled { offset, max_offset } => {
                self.script.set_max_offset(max_offset);
                self.script.sync_offset(offset);
            }
            Message::WindowResized { width, height } => {
                self.window.width = width;
                self.window.height = height;
                if self.sync_viewport() {
                    effects.push(Effect::Redraw);
                }
            }
            Message::RecordingOriginFetched(origin) => {
                self.window.position = origin.map(|point| (point.x, point.y));
                self.start_recording();
            }
            Message::CloseRequested => effects.push(Effect::QuitSafely),
            Message::KeyPressed { key, modifiers } => {
                if let Some(press) = key_press_from_iced(&key, modifiers) {
                    let outcomes = self.presenter.apply(InputEvent::KeyPress(press));
                    self.apply_outcomes(outcomes, &mut effects);
                }
            }
            Message::ModifiersChanged(modifiers) => self.pointer.modifiers = modifiers,
            Message::CursorMoved { x, y } => {
                self.pointer.x = x;
                self.pointer.y = y;
                let outcomes = self.presenter.apply(InputEvent::PointerMove(Point::new(x, y)));
                self.apply_outcomes(outcomes, &mut effects);
            }
            Message::MousePressed(button) => self.handle_mouse_pressed(button, &mut effects),
            Message::MouseReleased(button) => {
                if let Some(button) = pointer_button(button) {
                    let outcomes = self.presenter.apply(InputEvent::PointerUp { button });
                    self.apply_outcomes(outcomes, &mut effects);
                }
            }
            Message::WheelScrolled { delta_y } => {
                if self.in_viewport(self.pointer.x, self.pointer.y) {
                    let modifiers = modifiers_from_iced(self.pointer.modifiers);
                    let outcomes = self
                        .presenter
                        .apply(InputEvent::Wheel { delta_y, modifiers });
                    self.apply_outcomes(outcomes, &mut effects);
                }
            }
            Message::Tick(_) => self.handle_tick(&mut effects),
        }

        effects
    }

    fn handle_action(&mut self, action: Action, effects: &mut Vec<Effect>) {
        let outcomes = self.presenter.perform(action);
        self.apply_outcomes(outcomes, effects);
    }

    /// Turn presenter outcomes into effects. Redraws are coalesced.
    fn apply_outcomes(&mut self, outcomes: Vec<Outcome>, effects: &mut Vec<Effect>) {
        let mut redraw = false;
        for outcome in outcomes {
            match outcome {
                Outcome::Redraw => redraw = true,
                Outcome::SlideChanged(slide) => {
                    info!(slide = slide + 1, "Navigated to slide");
                    effects.push(Effect::SaveBookmark(slide));
                }
                Outcome::ToggleFullscreen => effects.push(Effect::ToggleFullscreen),
                Outcome::ToggleRecording => effects.push(Effect::ToggleRecording),
                Outcome::ToggleScript => {
                    self.config.show_script = !self.config.show_script;
                    debug!(visible = self.config.show_script, "Script panel toggled");
                    redraw |= self.sync_viewport();
                }
                Outcome::Quit => effects.push(Effect::QuitSafely),
            }
        }
        if redraw {
            effects.push(Effect::Redraw);
        }
    }

    fn handle_toggle_theme(&mut self, effects: &mut Vec<Effect>) {
        self.config.theme = self.config.theme.toggled();
        self.compositor
            .set_background(Theme::from(self.config.theme).viewport_background());
        info!(theme = %self.config.theme, "Theme toggled");
        effects.push(Effect::Redraw);
    }

    fn handle_open_path_requested(&mut self, effects: &mut Vec<Effect>) {
        if self.deck_loading {
            debug!("Ignoring open request while a document is loading");
            return;
        }
        let raw = self.open_path_input.trim();
        if raw.is_empty() {
            self.set_status("Enter a .pdf, .ppt or .pptx path to open");
            return;
        }
        effects.push(Effect::LoadDeck(PathBuf::from(raw)));
    }

    fn handle_deck_loaded(
        &mut self,
        path: PathBuf,
        deck: Deck,
        resume_at: Option<usize>,
        effects: &mut Vec<Effect>,
    ) {
        self.deck_loading = false;
        let slides = deck.len();
        info!(path = %path.display(), slides, "Document loaded");
        self.set_status(format!("Loaded {slides} slides from {}", path.display()));
        self.document = Some(path);

        let mut outcomes = self.presenter.replace_deck(deck);
        if let Some(slide) = resume_at.filter(|slide| *slide > 0 && *slide < slides) {
            info!(slide = slide + 1, "Resuming from bookmarked slide");
            outcomes.extend(self.presenter.goto(slide));
        }
        self.apply_outcomes(outcomes, effects);
    }

    fn handle_mouse_pressed(&mut self, button: mouse::Button, effects: &mut Vec<Effect>) {
        let Some(button) = pointer_button(button) else {
            return;
        };
        if !self.in_viewport(self.pointer.x, self.pointer.y) {
            return;
        }
        let pos = Point::new(self.pointer.x, self.pointer.y);
        let outcomes = self.presenter.apply(InputEvent::PointerDown { pos, button });
        self.apply_outcomes(outcomes, effects);
    }

    fn handle_tick(&mut self, effects: &mut Vec<Effect>) {
        if crate::take_sigint_requested() {
            info!("Received Ctrl+C; shutting down");
            effects.push(Effect::QuitSafely);
            return;
        }
        let notices = self.recording.poll();
        self.handle_recording_notices(notices);
        if self.config.show_script && self.script.tick() {
            effects.push(Effect::ScrollScript(self.script.offset()));
        }
    }
}

fn pointer_button(button: mouse::Button) -> Option<PointerButton> {
    match button {
        mouse::Button::Left => Some(PointerButton::Primary),
        mouse::Button::Right => Some(PointerButton::Secondary),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iced::keyboard::{Key, Modifiers, key};
    use podium_core::config::AppConfig;
    use podium_core::deck::Slide;
    use podium_core::geometry::Size;
    use super::super::super::super::state::TOOLBAR_HEIGHT;

    fn build_test_app(slides: usize) -> (App, tempfile::TempDir) {
        let cache = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.cache_dir = cache.path().display().to_string();
        config.show_script = false;
        config.window_width = 800.0;
        config.window_height = 600.0;
        let (mut app, _task) = App::bootstrap(config, None, None);
        let deck = Deck::new(
            (0..slides)
                .map(|_| Slide::blank(Size::new(160, 90)))
                .collect(),
        );
        app.reduce(Message::DeckLoaded {
            path: cache.path().join("talk.pdf"),
            deck,
            resume_at: None,
        });
        (app, cache)
    }

    fn has_redraw(effects: &[Effect]) -> bool {
        effects.iter().any(|effect| matches!(effect, Effect::Redraw))
    }

    #[test]
    fn loaded_deck_starts_at_first_slide() {
        let (app, _cache) = build_test_app(3);
        assert_eq!(app.presenter.deck().len(), 3);
        assert_eq!(app.presenter.deck().current_index(), 0);
        assert!(!app.deck_loading);
        assert_eq!(app.slide_label(), "Slide 1 / 3");
    }

    #[test]
    fn bookmarked_slide_is_restored() {
        let (mut app, cache) = build_test_app(1);
        let deck = Deck::new((0..4).map(|_| Slide::blank(Size::new(16, 9))).collect());
        app.reduce(Message::DeckLoaded {
            path: cache.path().join("other.pdf"),
            deck,
            resume_at: Some(2),
        });
        assert_eq!(app.presenter.deck().current_index(), 2);
    }

    #[test]
    fn arrow_key_advances_and_saves_bookmark() {
        let (mut app, _cache) = build_test_app(3);
        let effects = app.reduce(Message::KeyPressed {
            key: Key::Named(key::Named::ArrowRight),
            modifiers: Modifiers::empty(),
        });
        assert_eq!(app.presenter.deck().current_index(), 1);
        assert!(
            effects
                .iter()
                .any(|effect| matches!(effect, Effect::SaveBookmark(1)))
        );
        assert!(has_redraw(&effects));
    }

    #[test]
    fn navigation_clamps_at_last_slide() {
        let (mut app, _cache) = build_test_app(2);
        app.reduce(Message::KeyPressed {
            key: Key::Named(key::Named::End),
            modifiers: Modifiers::empty(),
        });
        let effects = app.reduce(Message::NextSlide);
        assert_eq!(app.presenter.deck().current_index(), 1);
        assert!(effects.is_empty());
    }

    #[test]
    fn left_drag_draws_only_inside_viewport_with_overlay_on() {
        let (mut app, _cache) = build_test_app(1);
        app.reduce(Message::CursorMoved { x: 100.0, y: 150.0 });
        app.reduce(Message::MousePressed(mouse::Button::Left));
        app.reduce(Message::CursorMoved { x: 140.0, y: 150.0 });
        app.reduce(Message::MouseReleased(mouse::Button::Left));
        assert!(app.presenter.overlay().log().is_empty());

        app.reduce(Message::ToggleDrawing);
        app.reduce(Message::CursorMoved { x: 100.0, y: 150.0 });
        app.reduce(Message::MousePressed(mouse::Button::Left));
        app.reduce(Message::CursorMoved { x: 140.0, y: 150.0 });
        let effects = app.reduce(Message::MouseReleased(mouse::Button::Left));
        assert_eq!(app.presenter.overlay().log().len(), 1);
        assert!(has_redraw(&effects));

        // Presses on the toolbar never start a stroke.
        app.reduce(Message::CursorMoved { x: 100.0, y: 10.0 });
        app.reduce(Message::MousePressed(mouse::Button::Left));
        assert!(!app.presenter.overlay().is_drawing());
    }

    #[test]
    fn ctrl_wheel_zooms_and_plain_wheel_navigates() {
        let (mut app, _cache) = build_test_app(3);
        app.reduce(Message::CursorMoved { x: 200.0, y: 200.0 });
        app.reduce(Message::WheelScrolled { delta_y: -1.0 });
        assert_eq!(app.presenter.deck().current_index(), 1);

        app.reduce(Message::ModifiersChanged(Modifiers::CTRL));
        app.reduce(Message::WheelScrolled { delta_y: 1.0 });
        assert!(app.presenter.view().zoom_factor() > 1.0);
        assert_eq!(app.presenter.deck().current_index(), 1);
    }

    #[test]
    fn toggling_script_panel_shrinks_viewport() {
        let (mut app, _cache) = build_test_app(1);
        let before = app.presenter.viewport();
        let effects = app.reduce(Message::ToggleScript);
        assert!(app.config.show_script);
        assert!(app.presenter.viewport().width < before.width);
        assert!(has_redraw(&effects));
    }

    #[test]
    fn window_resize_updates_viewport() {
        let (mut app, _cache) = build_test_app(1);
        app.reduce(Message::WindowResized {
            width: 1000.0,
            height: 700.0,
        });
        assert_eq!(app.presenter.viewport(), app.viewport_size());
        assert_eq!(app.presenter.viewport().width, 1000);
    }

    #[test]
    fn capture_region_follows_inner_window_origin() {
        let (mut app, _cache) = build_test_app(1);
        assert_eq!(app.capture_region(), None);

        app.window.position = Some((120.4, 80.0));
        let viewport = app.presenter.viewport();
        let region = app.capture_region().expect("origin known");
        assert_eq!((region.x, region.y), (120, 80 + TOOLBAR_HEIGHT as i32));
        assert_eq!(region.width, viewport.width & !1);
        assert_eq!(region.height, viewport.height & !1);
    }

    #[test]
    fn unknown_window_origin_refuses_to_record() {
        let (mut app, _cache) = build_test_app(1);
        app.reduce(Message::RecordingOriginFetched(None));
        assert!(!app.recording.is_recording());
        assert!(
            app.status
                .as_deref()
                .is_some_and(|status| status.contains("window position is unknown"))
        );
    }

    #[test]
    fn empty_open_path_sets_status_instead_of_loading() {
        let (mut app, _cache) = build_test_app(1);
        app.reduce(Message::OpenPathInputChanged("   ".to_string()));
        let effects = app.reduce(Message::OpenPathRequested);
        assert!(effects.is_empty());
        assert!(app.status.is_some());
    }

    #[test]
    fn quit_shortcut_requests_safe_shutdown() {
        let (mut app, _cache) = build_test_app(1);
        let effects = app.reduce(Message::KeyPressed {
            key: Key::Character("q".into()),
            modifiers: Modifiers::CTRL,
        });
        assert!(
            effects
                .iter()
                .any(|effect| matches!(effect, Effect::QuitSafely))
        );
    }

    #[test]
    fn script_buttons_request_widget_scroll() {
        let (mut app, _cache) = build_test_app(1);
        app.script.set_text("line\n".repeat(200));
        app.reduce(Message::ScriptScrolled {
            offset: 0.0,
            max_offset: 500.0,
        });
        let effects = app.reduce(Message::ScriptScrollDown);
        assert!(
            effects
                .iter()
                .any(|effect| matches!(effect, Effect::ScrollScript(y) if *y == 20.0))
        );
        let effects = app.reduce(Message::ScriptTop);
        assert!(matches!(effects.as_slice(), [Effect::ScrollScript(y)] if *y == 0.0));
    }
}
