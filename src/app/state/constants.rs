use iced::widget::scrollable::Id as ScrollId;
use once_cell::sync::Lazy;
use std::time::Duration;

/// Layout of the window chrome around the presentation viewport.
pub(crate) const TOOLBAR_HEIGHT: f32 = 52.0;
pub(crate) const STATUS_BAR_HEIGHT: f32 = 28.0;
pub(crate) const SCRIPT_PANEL_WIDTH: f32 = 360.0;
pub(crate) const TICK_INTERVAL: Duration = Duration::from_millis(100);
pub(crate) const CONFIG_PATH: &str = "conf/config.toml";
pub(crate) static SCRIPT_SCROLL_ID: Lazy<ScrollId> = Lazy::new(|| ScrollId::new("script-scroll"));
