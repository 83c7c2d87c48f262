//! Toolkit-independent input events and keyboard shortcut resolution.

use crate::config::AppConfig;
use crate::geometry::{Point, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub logo: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        alt: false,
        shift: false,
        logo: false,
    };
    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };
    pub const CTRL_SHIFT: Modifiers = Modifiers {
        ctrl: true,
        shift: true,
        ..Modifiers::NONE
    };
}

/// A key press with the key already lower-cased into a stable name
/// (`"left"`, `"f11"`, `"z"`, `"="`...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub key: String,
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        KeyPress {
            key: key.into().to_ascii_lowercase(),
            modifiers,
        }
    }

    pub fn plain(key: impl Into<String>) -> Self {
        KeyPress::new(key, Modifiers::NONE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// Everything the presenter reacts to. Pointer positions are window
/// coordinates; the chrome offset is removed further down.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown { pos: Point, button: PointerButton },
    PointerMove(Point),
    PointerUp { button: PointerButton },
    /// Positive `delta_y` scrolls up.
    Wheel { delta_y: f32, modifiers: Modifiers },
    KeyPress(KeyPress),
    Resize(Size),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    NextSlide,
    PrevSlide,
    FirstSlide,
    LastSlide,
    ToggleFullscreen,
    ToggleDrawing,
    ClearStrokes,
    UndoStroke,
    CycleColor,
    ZoomIn,
    ZoomOut,
    ResetZoom,
    ResetPan,
    HideOverlay,
    ToggleRecording,
    ToggleScript,
    Quit,
}

/// Configured shortcut strings paired with their built-in fallbacks.
#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: Vec<(Action, String, &'static str)>,
}

impl Default for Keymap {
    fn default() -> Self {
        Keymap::from_config(&AppConfig::default())
    }
}

impl Keymap {
    pub fn from_config(config: &AppConfig) -> Self {
        let bindings = vec![
            (Action::NextSlide, config.key_next_slide.clone(), "right"),
            (Action::PrevSlide, config.key_prev_slide.clone(), "left"),
            (Action::FirstSlide, config.key_first_slide.clone(), "home"),
            (Action::LastSlide, config.key_last_slide.clone(), "end"),
            (
                Action::ToggleFullscreen,
                config.key_toggle_fullscreen.clone(),
                "f11",
            ),
            (Action::ToggleDrawing, config.key_toggle_drawing.clone(), "d"),
            (Action::ClearStrokes, config.key_clear_strokes.clone(), "delete"),
            (Action::UndoStroke, config.key_undo_stroke.clone(), "ctrl+z"),
            (Action::CycleColor, config.key_cycle_color.clone(), "c"),
            (Action::ZoomIn, config.key_zoom_in.clone(), "ctrl+="),
            (Action::ZoomOut, config.key_zoom_out.clone(), "ctrl+-"),
            (Action::ResetZoom, config.key_reset_zoom.clone(), "ctrl+0"),
            (Action::ResetPan, config.key_reset_pan.clone(), "ctrl+r"),
            (Action::HideOverlay, config.key_hide_overlay.clone(), "escape"),
            (
                Action::ToggleRecording,
                config.key_toggle_recording.clone(),
                "ctrl+shift+r",
            ),
            (Action::ToggleScript, config.key_toggle_script.clone(), "ctrl+t"),
            (Action::Quit, config.key_quit.clone(), "ctrl+q"),
        ];
        Keymap { bindings }
    }

    pub fn resolve(&self, press: &KeyPress) -> Option<Action> {
        self.bindings
            .iter()
            .find(|(_, raw, fallback)| shortcut_matches(raw, fallback, &press.key, press.modifiers))
            .map(|(action, _, _)| *action)
    }
}

/// True when `pressed` with `modifiers` is exactly the shortcut `raw`
/// (or `fallback` when `raw` is blank). Extra modifiers do not match.
pub fn shortcut_matches(raw: &str, fallback: &str, pressed: &str, modifiers: Modifiers) -> bool {
    let normalized = normalize_shortcut_token(raw, fallback);

    let mut required_ctrl = false;
    let mut required_alt = false;
    let mut required_logo = false;
    let mut required_shift = false;
    let mut required_key: Option<&str> = None;

    for token in normalized
        .split('+')
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        match token {
            "ctrl" | "control" => required_ctrl = true,
            "alt" => required_alt = true,
            "logo" | "meta" | "super" | "cmd" | "command" => required_logo = true,
            "shift" => required_shift = true,
            key => required_key = Some(key),
        }
    }

    let Some(required_key) = required_key else {
        return false;
    };
    let required_key = match required_key {
        "plus" => "+",
        "minus" => "-",
        "equals" | "equal" => "=",
        "esc" => "escape",
        "del" => "delete",
        other => other,
    };
    if pressed != required_key {
        return false;
    }

    modifiers.ctrl == required_ctrl
        && modifiers.alt == required_alt
        && modifiers.logo == required_logo
        && modifiers.shift == required_shift
}

pub fn normalize_shortcut_token(raw: &str, fallback: &str) -> String {
    let normalized = raw.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        fallback.to_string()
    } else {
        normalized.replace("spacebar", "space")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_ctrl_z_shortcut() {
        assert!(shortcut_matches("ctrl+z", "x", "z", Modifiers::CTRL));
        assert!(shortcut_matches("Ctrl + Z", "x", "z", Modifiers::CTRL));
    }

    #[test]
    fn rejects_unexpected_extra_modifier() {
        assert!(!shortcut_matches("ctrl+r", "x", "r", Modifiers::CTRL_SHIFT));
        assert!(!shortcut_matches("d", "x", "d", Modifiers::CTRL));
    }

    #[test]
    fn blank_binding_uses_fallback() {
        assert!(shortcut_matches("  ", "f11", "f11", Modifiers::NONE));
        assert_eq!(normalize_shortcut_token(" SpaceBar ", "x"), "space");
    }

    #[test]
    fn named_symbols_are_accepted() {
        assert!(shortcut_matches("ctrl+equals", "x", "=", Modifiers::CTRL));
        assert!(shortcut_matches("ctrl+minus", "x", "-", Modifiers::CTRL));
    }

    #[test]
    fn default_keymap_covers_keyboard_surface() {
        let keymap = Keymap::default();
        let cases = [
            (KeyPress::plain("Right"), Action::NextSlide),
            (KeyPress::plain("left"), Action::PrevSlide),
            (KeyPress::plain("home"), Action::FirstSlide),
            (KeyPress::plain("end"), Action::LastSlide),
            (KeyPress::plain("f11"), Action::ToggleFullscreen),
            (KeyPress::plain("d"), Action::ToggleDrawing),
            (KeyPress::plain("delete"), Action::ClearStrokes),
            (KeyPress::new("z", Modifiers::CTRL), Action::UndoStroke),
            (KeyPress::plain("c"), Action::CycleColor),
            (KeyPress::new("=", Modifiers::CTRL), Action::ZoomIn),
            (KeyPress::new("-", Modifiers::CTRL), Action::ZoomOut),
            (KeyPress::new("0", Modifiers::CTRL), Action::ResetZoom),
            (KeyPress::new("r", Modifiers::CTRL), Action::ResetPan),
            (KeyPress::plain("escape"), Action::HideOverlay),
            (KeyPress::new("R", Modifiers::CTRL_SHIFT), Action::ToggleRecording),
            (KeyPress::new("t", Modifiers::CTRL), Action::ToggleScript),
        ];
        for (press, action) in cases {
            assert_eq!(keymap.resolve(&press), Some(action), "{press:?}");
        }
        assert_eq!(keymap.resolve(&KeyPress::plain("x")), None);
    }

    #[test]
    fn configured_binding_overrides_default() {
        let config = AppConfig {
            key_next_slide: "space".to_string(),
            ..AppConfig::default()
        };
        let keymap = Keymap::from_config(&config);
        assert_eq!(keymap.resolve(&KeyPress::plain("space")), Some(Action::NextSlide));
        assert_eq!(keymap.resolve(&KeyPress::plain("right")), None);
    }
}
