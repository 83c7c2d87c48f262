use super::defaults;
use crate::loader::LoaderOptions;
use crate::strokes::PenColor;
use crate::viewport::ZoomLimits;
use serde::Deserialize;
use std::path::PathBuf;

/// Flattened application configuration. On disk it is split into sections,
/// see `tables.rs`.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub theme: ThemeMode,
    pub window_width: f32,
    pub window_height: f32,
    pub show_script: bool,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub zoom_step: f32,
    pub render_dpi: u32,
    pub pen_color: PenColor,
    pub pen_width: u32,
    pub recording_output_dir: String,
    pub recording_fps: u32,
    pub recording_quality: u32,
    pub recording_display: String,
    pub recording_capture_audio: bool,
    pub recording_stop_timeout_secs: u64,
    pub recording_fallback_max_secs: u64,
    pub script_auto_scroll: bool,
    pub script_scroll_speed: u32,
    pub script_font_size: u32,
    pub log_level: LogLevel,
    pub pdftoppm_bin: String,
    pub soffice_bin: String,
    pub cache_dir: String,
    pub key_next_slide: String,
    pub key_prev_slide: String,
    pub key_first_slide: String,
    pub key_last_slide: String,
    pub key_toggle_fullscreen: String,
    pub key_toggle_drawing: String,
    pub key_clear_strokes: String,
    pub key_undo_stroke: String,
    pub key_cycle_color: String,
    pub key_zoom_in: String,
    pub key_zoom_out: String,
    pub key_reset_zoom: String,
    pub key_reset_pan: String,
    pub key_hide_overlay: String,
    pub key_toggle_recording: String,
    pub key_toggle_script: String,
    pub key_quit: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            theme: ThemeMode::default(),
            window_width: defaults::default_window_width(),
            window_height: defaults::default_window_height(),
            show_script: defaults::default_show_script(),
            min_zoom: defaults::default_min_zoom(),
            max_zoom: defaults::default_max_zoom(),
            zoom_step: defaults::default_zoom_step(),
            render_dpi: defaults::default_render_dpi(),
            pen_color: defaults::default_pen_color(),
            pen_width: defaults::default_pen_width(),
            recording_output_dir: defaults::default_recording_output_dir(),
            recording_fps: defaults::default_recording_fps(),
            recording_quality: defaults::default_recording_quality(),
            recording_display: defaults::default_recording_display(),
            recording_capture_audio: false,
            recording_stop_timeout_secs: defaults::default_recording_stop_timeout_secs(),
            recording_fallback_max_secs: defaults::default_recording_fallback_max_secs(),
            script_auto_scroll: defaults::default_script_auto_scroll(),
            script_scroll_speed: defaults::default_script_scroll_speed(),
            script_font_size: defaults::default_script_font_size(),
            log_level: defaults::default_log_level(),
            pdftoppm_bin: defaults::default_pdftoppm_bin(),
            soffice_bin: defaults::default_soffice_bin(),
            cache_dir: defaults::default_cache_dir(),
            key_next_slide: defaults::default_key_next_slide(),
            key_prev_slide: defaults::default_key_prev_slide(),
            key_first_slide: defaults::default_key_first_slide(),
            key_last_slide: defaults::default_key_last_slide(),
            key_toggle_fullscreen: defaults::default_key_toggle_fullscreen(),
            key_toggle_drawing: defaults::default_key_toggle_drawing(),
            key_clear_strokes: defaults::default_key_clear_strokes(),
            key_undo_stroke: defaults::default_key_undo_stroke(),
            key_cycle_color: defaults::default_key_cycle_color(),
            key_zoom_in: defaults::default_key_zoom_in(),
            key_zoom_out: defaults::default_key_zoom_out(),
            key_reset_zoom: defaults::default_key_reset_zoom(),
            key_reset_pan: defaults::default_key_reset_pan(),
            key_hide_overlay: defaults::default_key_hide_overlay(),
            key_toggle_recording: defaults::default_key_toggle_recording(),
            key_toggle_script: defaults::default_key_toggle_script(),
            key_quit: defaults::default_key_quit(),
        }
    }
}

impl AppConfig {
    pub fn zoom_limits(&self) -> ZoomLimits {
        ZoomLimits::sanitized(self.min_zoom, self.max_zoom)
    }

    pub fn cache_root(&self) -> PathBuf {
        PathBuf::from(&self.cache_dir)
    }

    pub fn loader_options(&self) -> LoaderOptions {
        LoaderOptions {
            pdftoppm_bin: self.pdftoppm_bin.clone(),
            soffice_bin: self.soffice_bin.clone(),
            cache_root: self.cache_root(),
            render_dpi: self.render_dpi,
        }
    }
}

/// Theme mode.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeMode {
    Day,
    #[default]
    Night,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Day => ThemeMode::Night,
            ThemeMode::Night => ThemeMode::Day,
        }
    }
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ThemeMode::Day => "Day",
            ThemeMode::Night => "Night",
        };
        write!(f, "{}", label)
    }
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        defaults::default_log_level()
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
