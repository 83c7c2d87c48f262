//! Day/night theme selection for the viewer chrome and slide backdrop.

use iced::Theme as IcedTheme;
use image::Rgba;
use podium_core::compose::DEFAULT_BACKGROUND;
use podium_core::config::ThemeMode;

const DAY_BACKGROUND: Rgba<u8> = Rgba([228, 228, 231, 255]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    /// Fill colour behind the slide inside the presentation viewport.
    pub fn viewport_background(self) -> Rgba<u8> {
        match self {
            Theme::Light => DAY_BACKGROUND,
            Theme::Dark => DEFAULT_BACKGROUND,
        }
    }
}

impl From<ThemeMode> for Theme {
    fn from(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Night => Theme::Dark,
            ThemeMode::Day => Theme::Light,
        }
    }
}

impl From<Theme> for IcedTheme {
    fn from(theme: Theme) -> Self {
        match theme {
            Theme::Light => IcedTheme::Light,
            Theme::Dark => IcedTheme::Dark,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn night_mode_maps_to_dark_theme() {
        assert_eq!(Theme::from(ThemeMode::Night), Theme::Dark);
        assert_eq!(Theme::from(ThemeMode::Day), Theme::Light);
        assert_eq!(IcedTheme::from(Theme::Dark), IcedTheme::Dark);
    }

    #[test]
    fn day_backdrop_is_lighter_than_night() {
        let day = Theme::Light.viewport_background();
        let night = Theme::Dark.viewport_background();
        assert!(day.0[0] > night.0[0]);
    }
}
