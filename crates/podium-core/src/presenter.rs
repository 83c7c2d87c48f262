//! The pure update step: input events in, state changes plus requested side
//! effects out.

use crate::compose::Compositor;
use crate::config::AppConfig;
use crate::deck::Deck;
use crate::geometry::{Point, Size};
use crate::input::{Action, InputEvent, Keymap, PointerButton};
use crate::strokes::{DrawingOverlay, PenColor};
use crate::viewport::{DEFAULT_ZOOM_STEP, ViewState, ZoomLimits};
use image::RgbaImage;
use tracing::{debug, info};

/// Side effects the caller has to carry out after [`Presenter::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Redraw,
    SlideChanged(usize),
    ToggleFullscreen,
    ToggleRecording,
    ToggleScript,
    Quit,
}

#[derive(Debug, Clone)]
pub struct PresenterSettings {
    pub zoom_limits: ZoomLimits,
    pub zoom_step: f32,
    /// Window-space position of the viewport's top-left corner.
    pub chrome_offset: Point,
    pub pen_color: PenColor,
    pub pen_width: u32,
    pub keymap: Keymap,
}

impl Default for PresenterSettings {
    fn default() -> Self {
        PresenterSettings {
            zoom_limits: ZoomLimits::default(),
            zoom_step: DEFAULT_ZOOM_STEP,
            chrome_offset: Point::ORIGIN,
            pen_color: PenColor::default(),
            pen_width: crate::strokes::DEFAULT_PEN_WIDTH,
            keymap: Keymap::default(),
        }
    }
}

impl PresenterSettings {
    pub fn from_config(config: &AppConfig, chrome_offset: Point) -> Self {
        PresenterSettings {
            zoom_limits: config.zoom_limits(),
            zoom_step: config.zoom_step,
            chrome_offset,
            pen_color: config.pen_color,
            pen_width: config.pen_width,
            keymap: Keymap::from_config(config),
        }
    }
}

pub struct Presenter {
    deck: Deck,
    view: ViewState,
    overlay: DrawingOverlay,
    overlay_visible: bool,
    keymap: Keymap,
    zoom_step: f32,
    viewport: Size,
    pan_anchor: Option<Point>,
}

impl Presenter {
    pub fn new(settings: PresenterSettings, viewport: Size) -> Self {
        let mut overlay = DrawingOverlay::new(viewport, settings.chrome_offset);
        overlay.set_color(settings.pen_color);
        overlay.set_width(settings.pen_width);
        Presenter {
            deck: Deck::default(),
            view: ViewState::new(settings.zoom_limits),
            overlay,
            overlay_visible: false,
            keymap: settings.keymap,
            zoom_step: settings.zoom_step,
            viewport,
            pan_anchor: None,
        }
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn overlay(&self) -> &DrawingOverlay {
        &self.overlay
    }

    pub fn overlay_visible(&self) -> bool {
        self.overlay_visible
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn replace_deck(&mut self, deck: Deck) -> Vec<Outcome> {
        info!(slides = deck.len(), "Deck replaced");
        self.deck = deck;
        self.view.reset();
        self.pan_anchor = None;
        vec![Outcome::SlideChanged(self.deck.current_index()), Outcome::Redraw]
    }

    pub fn goto(&mut self, index: usize) -> Vec<Outcome> {
        self.navigate(|deck| deck.goto(index))
    }

    pub fn set_pen_width(&mut self, width: u32) {
        self.overlay.set_width(width);
    }

    pub fn set_pen_color(&mut self, color: PenColor) {
        self.overlay.set_color(color);
    }

    pub fn compose(&self, compositor: &mut Compositor) -> RgbaImage {
        let overlay = self.overlay_visible.then_some(&self.overlay);
        compositor.compose(&self.deck, &self.view, self.viewport, overlay)
    }

    pub fn apply(&mut self, event: InputEvent) -> Vec<Outcome> {
        match event {
            InputEvent::PointerDown {
                pos,
                button: PointerButton::Secondary,
            } => {
                self.pan_anchor = Some(pos);
                Vec::new()
            }
            InputEvent::PointerDown {
                pos,
                button: PointerButton::Primary,
            } => {
                if !self.overlay_visible {
                    return Vec::new();
                }
                let committed = self.overlay.log().len();
                self.overlay.begin_stroke(pos, self.view.pan_offset());
                if self.overlay.log().len() > committed {
                    vec![Outcome::Redraw]
                } else {
                    Vec::new()
                }
            }
            InputEvent::PointerMove(pos) => self.pointer_moved(pos),
            InputEvent::PointerUp {
                button: PointerButton::Secondary,
            } => {
                self.pan_anchor = None;
                Vec::new()
            }
            InputEvent::PointerUp {
                button: PointerButton::Primary,
            } => {
                if self.overlay.is_drawing() {
                    self.overlay.end_stroke();
                    vec![Outcome::Redraw]
                } else {
                    Vec::new()
                }
            }
            InputEvent::Wheel { delta_y, modifiers } => {
                if delta_y == 0.0 || !delta_y.is_finite() {
                    return Vec::new();
                }
                let action = match (modifiers.ctrl, delta_y > 0.0) {
                    (true, true) => Action::ZoomIn,
                    (true, false) => Action::ZoomOut,
                    (false, true) => Action::PrevSlide,
                    (false, false) => Action::NextSlide,
                };
                self.perform(action)
            }
            InputEvent::KeyPress(press) => match self.keymap.resolve(&press) {
                Some(action) => self.perform(action),
                None => Vec::new(),
            },
            InputEvent::Resize(size) => self.resize(size),
        }
    }

    pub fn perform(&mut self, action: Action) -> Vec<Outcome> {
        debug!(?action, "Presenter action");
        match action {
            Action::NextSlide => self.navigate(Deck::next),
            Action::PrevSlide => self.navigate(Deck::previous),
            Action::FirstSlide => self.navigate(Deck::first),
            Action::LastSlide => self.navigate(Deck::last),
            Action::ToggleFullscreen => vec![Outcome::ToggleFullscreen],
            Action::ToggleDrawing => {
                self.set_overlay_visible(!self.overlay_visible);
                vec![Outcome::Redraw]
            }
            Action::HideOverlay => {
                if self.overlay_visible {
                    self.set_overlay_visible(false);
                    vec![Outcome::Redraw]
                } else {
                    Vec::new()
                }
            }
            Action::ClearStrokes => redraw_if(self.overlay.clear()),
            Action::UndoStroke => redraw_if(self.overlay.undo()),
            Action::CycleColor => {
                let color = self.overlay.cycle_color();
                debug!(?color, "Pen colour changed");
                vec![Outcome::Redraw]
            }
            Action::ZoomIn => {
                let before = self.view.zoom_factor();
                self.view.zoom_in(self.zoom_step);
                redraw_if(self.view.zoom_factor() != before)
            }
            Action::ZoomOut => {
                let before = self.view.zoom_factor();
                self.view.zoom_out(self.zoom_step);
                redraw_if(self.view.zoom_factor() != before)
            }
            Action::ResetZoom => {
                self.view.reset_zoom();
                vec![Outcome::Redraw]
            }
            Action::ResetPan => {
                self.view.reset_pan();
                vec![Outcome::Redraw]
            }
            Action::ToggleRecording => vec![Outcome::ToggleRecording],
            Action::ToggleScript => vec![Outcome::ToggleScript],
            Action::Quit => vec![Outcome::Quit],
        }
    }

    fn navigate(&mut self, step: impl FnOnce(&mut Deck) -> bool) -> Vec<Outcome> {
        if !step(&mut self.deck) {
            return Vec::new();
        }
        self.view.reset();
        self.pan_anchor = None;
        vec![
            Outcome::SlideChanged(self.deck.current_index()),
            Outcome::Redraw,
        ]
    }

    fn pointer_moved(&mut self, pos: Point) -> Vec<Outcome> {
        if let Some(anchor) = self.pan_anchor {
            let dx = (pos.x - anchor.x).round();
            let dy = (pos.y - anchor.y).round();
            if dx == 0.0 && dy == 0.0 {
                return Vec::new();
            }
            self.view.pan_by(dx as i32, dy as i32);
            // Advance by the applied whole pixels so fractions carry over.
            self.pan_anchor = Some(Point::new(anchor.x + dx, anchor.y + dy));
            return vec![Outcome::Redraw];
        }
        if self.overlay.is_drawing() && self.overlay.extend_stroke(pos, self.view.pan_offset()) {
            return vec![Outcome::Redraw];
        }
        Vec::new()
    }

    fn resize(&mut self, size: Size) -> Vec<Outcome> {
        if size == self.viewport {
            return Vec::new();
        }
        debug!(width = size.width, height = size.height, "Viewport resized");
        self.viewport = size;
        self.overlay.resize(size);
        vec![Outcome::Redraw]
    }

    fn set_overlay_visible(&mut self, visible: bool) {
        if !visible && self.overlay.is_drawing() {
            self.overlay.end_stroke();
        }
        self.overlay_visible = visible;
        info!(visible, "Drawing overlay toggled");
    }
}

fn redraw_if(changed: bool) -> Vec<Outcome> {
    if changed {
        vec![Outcome::Redraw]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::Slide;
    use crate::geometry::Offset;
    use crate::input::{KeyPress, Modifiers};

    const CHROME: Point = Point::new(0.0, 40.0);

    fn presenter_with(slides: usize) -> Presenter {
        let settings = PresenterSettings {
            chrome_offset: CHROME,
            ..PresenterSettings::default()
        };
        let mut presenter = Presenter::new(settings, Size::new(400, 300));
        let deck = Deck::new(
            (0..slides)
                .map(|_| Slide::blank(Size::new(160, 90)))
                .collect(),
        );
        presenter.replace_deck(deck);
        presenter
    }

    fn key(name: &str) -> InputEvent {
        InputEvent::KeyPress(KeyPress::plain(name))
    }

    fn ctrl(name: &str) -> InputEvent {
        InputEvent::KeyPress(KeyPress::new(name, Modifiers::CTRL))
    }

    fn down(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerDown {
            pos: Point::new(x, y),
            button: PointerButton::Primary,
        }
    }

    fn up() -> InputEvent {
        InputEvent::PointerUp {
            button: PointerButton::Primary,
        }
    }

    #[test]
    fn navigate_zoom_draw_undo_session() {
        let mut presenter = presenter_with(3);

        let outcomes = presenter.apply(key("right"));
        assert_eq!(outcomes, vec![Outcome::SlideChanged(1), Outcome::Redraw]);
        assert_eq!(presenter.deck().current_index(), 1);

        presenter.apply(ctrl("="));
        assert!((presenter.view().zoom_factor() - 1.2).abs() < 1e-6);
        presenter.apply(ctrl("0"));
        assert_eq!(presenter.view().zoom_factor(), 1.0);

        presenter.apply(key("d"));
        assert!(presenter.overlay_visible());
        presenter.apply(down(10.0, 60.0));
        for x in [20.0, 30.0, 40.0, 50.0] {
            presenter.apply(InputEvent::PointerMove(Point::new(x, 60.0)));
        }
        assert_eq!(presenter.apply(up()), vec![Outcome::Redraw]);
        assert_eq!(presenter.overlay().log().len(), 1);
        assert_eq!(presenter.overlay().log().iter().next().map(|s| s.points().len()), Some(5));

        presenter.apply(ctrl("z"));
        assert!(presenter.overlay().log().is_empty());
    }

    #[test]
    fn navigation_resets_view_and_clamps() {
        let mut presenter = presenter_with(2);
        presenter.apply(ctrl("="));
        presenter.apply(ctrl("="));
        presenter.perform(Action::NextSlide);
        assert_eq!(presenter.view().zoom_factor(), 1.0);
        assert!(presenter.apply(key("right")).is_empty());
        assert!(presenter.apply(key("end")).is_empty());
        assert_eq!(presenter.apply(key("home")), vec![Outcome::SlideChanged(0), Outcome::Redraw]);
        assert!(presenter.apply(key("left")).is_empty());
    }

    #[test]
    fn out_of_range_goto_is_ignored() {
        let mut presenter = presenter_with(3);
        assert!(presenter.goto(9).is_empty());
        assert_eq!(presenter.deck().current_index(), 0);
    }

    #[test]
    fn hidden_overlay_does_not_draw() {
        let mut presenter = presenter_with(1);
        presenter.apply(down(10.0, 60.0));
        presenter.apply(InputEvent::PointerMove(Point::new(50.0, 60.0)));
        presenter.apply(up());
        assert!(presenter.overlay().log().is_empty());
    }

    #[test]
    fn pointer_in_chrome_never_starts_a_stroke() {
        let mut presenter = presenter_with(1);
        presenter.apply(key("d"));
        presenter.apply(down(10.0, 20.0));
        presenter.apply(InputEvent::PointerMove(Point::new(50.0, 80.0)));
        presenter.apply(up());
        assert!(presenter.overlay().log().is_empty());
    }

    #[test]
    fn right_drag_pans_without_drift() {
        let mut presenter = presenter_with(1);
        presenter.apply(InputEvent::PointerDown {
            pos: Point::new(100.0, 100.0),
            button: PointerButton::Secondary,
        });
        for step in 1..=10 {
            let t = step as f32 * 1.4;
            presenter.apply(InputEvent::PointerMove(Point::new(100.0 + t, 100.0 - t)));
        }
        presenter.apply(InputEvent::PointerUp {
            button: PointerButton::Secondary,
        });
        assert_eq!(presenter.view().pan_offset(), Offset::new(14, -14));
        presenter.apply(ctrl("r"));
        assert_eq!(presenter.view().pan_offset(), Offset::ZERO);
    }

    #[test]
    fn wheel_navigates_and_ctrl_wheel_zooms() {
        let mut presenter = presenter_with(3);
        presenter.apply(InputEvent::Wheel {
            delta_y: -1.0,
            modifiers: Modifiers::NONE,
        });
        assert_eq!(presenter.deck().current_index(), 1);
        presenter.apply(InputEvent::Wheel {
            delta_y: 1.0,
            modifiers: Modifiers::NONE,
        });
        assert_eq!(presenter.deck().current_index(), 0);
        presenter.apply(InputEvent::Wheel {
            delta_y: 1.0,
            modifiers: Modifiers::CTRL,
        });
        assert!(presenter.view().zoom_factor() > 1.0);
        presenter.apply(InputEvent::Wheel {
            delta_y: -1.0,
            modifiers: Modifiers::CTRL,
        });
        assert!((presenter.view().zoom_factor() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn escape_hides_overlay_and_ink() {
        let mut presenter = presenter_with(1);
        presenter.apply(key("d"));
        presenter.apply(down(10.0, 60.0));
        presenter.apply(InputEvent::PointerMove(Point::new(80.0, 60.0)));
        presenter.apply(up());
        let mut compositor = Compositor::default();
        let with_ink = presenter.compose(&mut compositor);
        assert_eq!(presenter.apply(key("escape")), vec![Outcome::Redraw]);
        assert!(presenter.apply(key("escape")).is_empty());
        let without_ink = presenter.compose(&mut compositor);
        assert_ne!(with_ink, without_ink);
        assert_eq!(presenter.overlay().log().len(), 1);
    }

    #[test]
    fn resize_rebuilds_overlay_surface() {
        let mut presenter = presenter_with(1);
        assert_eq!(presenter.apply(InputEvent::Resize(Size::new(800, 600))), vec![Outcome::Redraw]);
        assert_eq!(presenter.overlay().committed_canvas().size(), Size::new(800, 600));
        assert!(presenter.apply(InputEvent::Resize(Size::new(800, 600))).is_empty());
    }

    #[test]
    fn toggles_surface_as_outcomes() {
        let mut presenter = presenter_with(1);
        assert_eq!(presenter.apply(key("f11")), vec![Outcome::ToggleFullscreen]);
        assert_eq!(
            presenter.apply(InputEvent::KeyPress(KeyPress::new("r", Modifiers::CTRL_SHIFT))),
            vec![Outcome::ToggleRecording]
        );
        assert_eq!(presenter.apply(ctrl("t")), vec![Outcome::ToggleScript]);
    }
}
