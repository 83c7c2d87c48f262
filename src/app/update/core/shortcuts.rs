use iced::keyboard::{Key, Modifiers, key};
use podium_core::input::{self, KeyPress};

/// Translate an iced key event into the toolkit-independent key name used by
/// the keymap. Keys without a stable name are dropped.
pub(super) fn key_press_from_iced(key: &Key, modifiers: Modifiers) -> Option<KeyPress> {
    let name = match key.as_ref() {
        Key::Named(named) => named_key(named)?.to_string(),
        Key::Character(ch) => ch.to_ascii_lowercase(),
        Key::Unidentified => return None,
    };
    Some(KeyPress::new(name, modifiers_from_iced(modifiers)))
}

pub(super) fn modifiers_from_iced(modifiers: Modifiers) -> input::Modifiers {
    input::Modifiers {
        ctrl: modifiers.control(),
        alt: modifiers.alt(),
        shift: modifiers.shift(),
        logo: modifiers.logo(),
    }
}

fn named_key(named: key::Named) -> Option<&'static str> {
    let name = match named {
        key::Named::ArrowLeft => "left",
        key::Named::ArrowRight => "right",
        key::Named::ArrowUp => "up",
        key::Named::ArrowDown => "down",
        key::Named::Home => "home",
        key::Named::End => "end",
        key::Named::PageUp => "pageup",
        key::Named::PageDown => "pagedown",
        key::Named::Delete => "delete",
        key::Named::Backspace => "backspace",
        key::Named::Escape => "escape",
        key::Named::Enter => "enter",
        key::Named::Tab => "tab",
        key::Named::Space => "space",
        key::Named::F1 => "f1",
        key::Named::F2 => "f2",
        key::Named::F3 => "f3",
        key::Named::F4 => "f4",
        key::Named::F5 => "f5",
        key::Named::F6 => "f6",
        key::Named::F7 => "f7",
        key::Named::F8 => "f8",
        key::Named::F9 => "f9",
        key::Named::F10 => "f10",
        key::Named::F11 => "f11",
        key::Named::F12 => "f12",
        _ => return None,
    };
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrow_keys_use_short_names() {
        let press = key_press_from_iced(&Key::Named(key::Named::ArrowRight), Modifiers::empty());
        assert_eq!(press, Some(KeyPress::plain("right")));
    }

    #[test]
    fn shifted_letters_are_lowercased() {
        let press = key_press_from_iced(
            &Key::Character("R".into()),
            Modifiers::CTRL | Modifiers::SHIFT,
        );
        assert_eq!(press, Some(KeyPress::new("r", input::Modifiers::CTRL_SHIFT)));
    }

    #[test]
    fn unnamed_keys_are_dropped() {
        assert_eq!(
            key_press_from_iced(&Key::Named(key::Named::CapsLock), Modifiers::empty()),
            None
        );
        assert_eq!(key_press_from_iced(&Key::Unidentified, Modifiers::empty()), None);
    }
}
