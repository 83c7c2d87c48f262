use super::models::AppConfig;
use super::tables::ConfigTables;
use super::defaults;
use crate::viewport::ZoomLimits;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Read `path`, falling back to defaults when it is missing or malformed.
pub fn load_config(path: &Path) -> AppConfig {
    let contents = match fs::read_to_string(path) {
        Ok(data) => {
            info!(path = %path.display(), "Loaded base config");
            data
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                "Falling back to default config: {err}"
            );
            return AppConfig::default();
        }
    };

    match parse_config(&contents) {
        Ok(cfg) => {
            debug!("Parsed configuration from disk");
            cfg
        }
        Err(err) => {
            warn!(path = %path.display(), "Invalid config TOML: {err}");
            AppConfig::default()
        }
    }
}

pub fn parse_config(contents: &str) -> Result<AppConfig, toml::de::Error> {
    let tables: ConfigTables = toml::from_str(contents)?;
    let mut config = AppConfig::from(tables);
    clamp_config(&mut config);
    Ok(config)
}

/// Pull every numeric setting back into its supported range.
pub fn clamp_config(config: &mut AppConfig) {
    let limits = ZoomLimits::sanitized(config.min_zoom, config.max_zoom);
    config.min_zoom = limits.min;
    config.max_zoom = limits.max;
    if !config.zoom_step.is_finite() || config.zoom_step <= 1.0 {
        config.zoom_step = defaults::default_zoom_step();
    }
    config.render_dpi = config.render_dpi.clamp(36, 600);
    config.pen_width = config
        .pen_width
        .clamp(crate::strokes::MIN_PEN_WIDTH, crate::strokes::MAX_PEN_WIDTH);
    config.recording_fps = config.recording_fps.clamp(1, 60);
    config.recording_quality = config.recording_quality.clamp(1, 100);
    config.recording_stop_timeout_secs = config.recording_stop_timeout_secs.clamp(1, 60);
    config.recording_fallback_max_secs = config.recording_fallback_max_secs.max(1);
    config.script_scroll_speed = config
        .script_scroll_speed
        .clamp(crate::script::MIN_SCROLL_SPEED, crate::script::MAX_SCROLL_SPEED);
    config.script_font_size = config.script_font_size.clamp(8, 72);
    if !config.window_width.is_finite() || config.window_width < 320.0 {
        config.window_width = defaults::default_window_width();
    }
    if !config.window_height.is_finite() || config.window_height < 240.0 {
        config.window_height = defaults::default_window_height();
    }
    if config.recording_output_dir.trim().is_empty() {
        config.recording_output_dir = defaults::default_recording_output_dir();
    }
    if config.cache_dir.trim().is_empty() {
        config.cache_dir = defaults::default_cache_dir();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LogLevel, ThemeMode};
    use crate::strokes::PenColor;

    #[test]
    fn empty_document_yields_defaults() {
        let config = parse_config("").expect("parse");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn sections_map_onto_flat_fields() {
        let config = parse_config(
            r#"
            [ui]
            theme = "day"

            [viewer]
            max_zoom = 3.0

            [drawing]
            pen_color = { r = 0, g = 0, b = 255 }
            pen_width = 8

            [recording]
            output_dir = "captures"
            quality = 50

            [keys]
            next_slide = "space"

            [logging]
            log_level = "warn"
            "#,
        )
        .expect("parse");
        assert_eq!(config.theme, ThemeMode::Day);
        assert_eq!(config.max_zoom, 3.0);
        assert_eq!(config.min_zoom, crate::viewport::DEFAULT_MIN_ZOOM);
        assert_eq!(config.pen_color, PenColor::rgb(0, 0, 255));
        assert_eq!(config.pen_width, 8);
        assert_eq!(config.recording_output_dir, "captures");
        assert_eq!(config.recording_quality, 50);
        assert_eq!(config.recording_fps, 30);
        assert_eq!(config.key_next_slide, "space");
        assert_eq!(config.key_prev_slide, "left");
        assert_eq!(config.log_level, LogLevel::Warn);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let config = parse_config(
            r#"
            [viewer]
            min_zoom = 8.0
            max_zoom = 0.5
            zoom_step = 0.9

            [drawing]
            pen_width = 99

            [script]
            scroll_speed = 40
            "#,
        )
        .expect("parse");
        assert_eq!((config.min_zoom, config.max_zoom), (0.5, 8.0));
        assert_eq!(config.zoom_step, crate::viewport::DEFAULT_ZOOM_STEP);
        assert_eq!(config.pen_width, crate::strokes::MAX_PEN_WIDTH);
        assert_eq!(config.script_scroll_speed, crate::script::MAX_SCROLL_SPEED);
    }

    #[test]
    fn serialized_config_parses_back() {
        let config = AppConfig {
            theme: ThemeMode::Day,
            pen_width: 5,
            key_quit: "ctrl+w".to_string(),
            ..AppConfig::default()
        };
        let encoded = toml::to_string_pretty(&ConfigTables::from(&config)).expect("serialize");
        assert!(encoded.contains("[recording]"));
        assert_eq!(parse_config(&encoded).expect("parse"), config);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[viewer\nmax_zoom = ").expect("write");
        assert_eq!(load_config(&path), AppConfig::default());
        assert_eq!(load_config(&dir.path().join("missing.toml")), AppConfig::default());
    }
}
