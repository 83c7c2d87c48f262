//! Configuration loading for the presenter.
//!
//! All user-tunable settings are centralized here and loaded from
//! `conf/config.toml` if present. Any missing or invalid entries fall back to
//! defaults so the viewer can still launch.

mod defaults;
mod io;
mod models;
mod tables;

pub use io::{clamp_config, load_config, parse_config};
pub use models::{AppConfig, LogLevel, ThemeMode};
