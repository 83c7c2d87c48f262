use super::defaults;
use super::models::{AppConfig, LogLevel, ThemeMode};
use crate::strokes::PenColor;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub(super) struct ConfigTables {
    #[serde(default)]
    ui: UiConfig,
    #[serde(default)]
    viewer: ViewerConfig,
    #[serde(default)]
    drawing: DrawingConfig,
    #[serde(default)]
    recording: RecordingConfig,
    #[serde(default)]
    script: ScriptConfig,
    #[serde(default)]
    keys: KeysConfig,
    #[serde(default)]
    logging: LoggingConfig,
    #[serde(default)]
    tools: ToolsConfig,
}

impl From<ConfigTables> for AppConfig {
    fn from(tables: ConfigTables) -> Self {
        AppConfig {
            theme: tables.ui.theme,
            window_width: tables.ui.window_width,
            window_height: tables.ui.window_height,
            show_script: tables.ui.show_script,
            min_zoom: tables.viewer.min_zoom,
            max_zoom: tables.viewer.max_zoom,
            zoom_step: tables.viewer.zoom_step,
            render_dpi: tables.viewer.render_dpi,
            pen_color: tables.drawing.pen_color,
            pen_width: tables.drawing.pen_width,
            recording_output_dir: tables.recording.output_dir,
            recording_fps: tables.recording.fps,
            recording_quality: tables.recording.quality,
            recording_display: tables.recording.display,
            recording_capture_audio: tables.recording.capture_audio,
            recording_stop_timeout_secs: tables.recording.stop_timeout_secs,
            recording_fallback_max_secs: tables.recording.fallback_max_secs,
            script_auto_scroll: tables.script.auto_scroll,
            script_scroll_speed: tables.script.scroll_speed,
            script_font_size: tables.script.font_size,
            log_level: tables.logging.log_level,
            pdftoppm_bin: tables.tools.pdftoppm_bin,
            soffice_bin: tables.tools.soffice_bin,
            cache_dir: tables.tools.cache_dir,
            key_next_slide: tables.keys.next_slide,
            key_prev_slide: tables.keys.prev_slide,
            key_first_slide: tables.keys.first_slide,
            key_last_slide: tables.keys.last_slide,
            key_toggle_fullscreen: tables.keys.toggle_fullscreen,
            key_toggle_drawing: tables.keys.toggle_drawing,
            key_clear_strokes: tables.keys.clear_strokes,
            key_undo_stroke: tables.keys.undo_stroke,
            key_cycle_color: tables.keys.cycle_color,
            key_zoom_in: tables.keys.zoom_in,
            key_zoom_out: tables.keys.zoom_out,
            key_reset_zoom: tables.keys.reset_zoom,
            key_reset_pan: tables.keys.reset_pan,
            key_hide_overlay: tables.keys.hide_overlay,
            key_toggle_recording: tables.keys.toggle_recording,
            key_toggle_script: tables.keys.toggle_script,
            key_quit: tables.keys.quit,
        }
    }
}

impl From<&AppConfig> for ConfigTables {
    fn from(config: &AppConfig) -> Self {
        ConfigTables {
            ui: UiConfig {
                theme: config.theme,
                window_width: config.window_width,
                window_height: config.window_height,
                show_script: config.show_script,
            },
            viewer: ViewerConfig {
                min_zoom: config.min_zoom,
                max_zoom: config.max_zoom,
                zoom_step: config.zoom_step,
                render_dpi: config.render_dpi,
            },
            drawing: DrawingConfig {
                pen_color: config.pen_color,
                pen_width: config.pen_width,
            },
            recording: RecordingConfig {
                output_dir: config.recording_output_dir.clone(),
                fps: config.recording_fps,
                quality: config.recording_quality,
                display: config.recording_display.clone(),
                capture_audio: config.recording_capture_audio,
                stop_timeout_secs: config.recording_stop_timeout_secs,
                fallback_max_secs: config.recording_fallback_max_secs,
            },
            script: ScriptConfig {
                auto_scroll: config.script_auto_scroll,
                scroll_speed: config.script_scroll_speed,
                font_size: config.script_font_size,
            },
            keys: KeysConfig {
                next_slide: config.key_next_slide.clone(),
                prev_slide: config.key_prev_slide.clone(),
                first_slide: config.key_first_slide.clone(),
                last_slide: config.key_last_slide.clone(),
                toggle_fullscreen: config.key_toggle_fullscreen.clone(),
                toggle_drawing: config.key_toggle_drawing.clone(),
                clear_strokes: config.key_clear_strokes.clone(),
                undo_stroke: config.key_undo_stroke.clone(),
                cycle_color: config.key_cycle_color.clone(),
                zoom_in: config.key_zoom_in.clone(),
                zoom_out: config.key_zoom_out.clone(),
                reset_zoom: config.key_reset_zoom.clone(),
                reset_pan: config.key_reset_pan.clone(),
                hide_overlay: config.key_hide_overlay.clone(),
                toggle_recording: config.key_toggle_recording.clone(),
                toggle_script: config.key_toggle_script.clone(),
                quit: config.key_quit.clone(),
            },
            logging: LoggingConfig {
                log_level: config.log_level,
            },
            tools: ToolsConfig {
                pdftoppm_bin: config.pdftoppm_bin.clone(),
                soffice_bin: config.soffice_bin.clone(),
                cache_dir: config.cache_dir.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct UiConfig {
    #[serde(default)]
    theme: ThemeMode,
    #[serde(default = "defaults::default_window_width")]
    window_width: f32,
    #[serde(default = "defaults::default_window_height")]
    window_height: f32,
    #[serde(default = "defaults::default_show_script")]
    show_script: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            theme: ThemeMode::default(),
            window_width: defaults::default_window_width(),
            window_height: defaults::default_window_height(),
            show_script: defaults::default_show_script(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct ViewerConfig {
    #[serde(default = "defaults::default_min_zoom")]
    min_zoom: f32,
    #[serde(default = "defaults::default_max_zoom")]
    max_zoom: f32,
    #[serde(default = "defaults::default_zoom_step")]
    zoom_step: f32,
    #[serde(default = "defaults::default_render_dpi")]
    render_dpi: u32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        ViewerConfig {
            min_zoom: defaults::default_min_zoom(),
            max_zoom: defaults::default_max_zoom(),
            zoom_step: defaults::default_zoom_step(),
            render_dpi: defaults::default_render_dpi(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct DrawingConfig {
    #[serde(default = "defaults::default_pen_color")]
    pen_color: PenColor,
    #[serde(default = "defaults::default_pen_width")]
    pen_width: u32,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        DrawingConfig {
            pen_color: defaults::default_pen_color(),
            pen_width: defaults::default_pen_width(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct RecordingConfig {
    #[serde(default = "defaults::default_recording_output_dir")]
    output_dir: String,
    #[serde(default = "defaults::default_recording_fps")]
    fps: u32,
    #[serde(default = "defaults::default_recording_quality")]
    quality: u32,
    #[serde(default = "defaults::default_recording_display")]
    display: String,
    #[serde(default)]
    capture_audio: bool,
    #[serde(default = "defaults::default_recording_stop_timeout_secs")]
    stop_timeout_secs: u64,
    #[serde(default = "defaults::default_recording_fallback_max_secs")]
    fallback_max_secs: u64,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        RecordingConfig {
            output_dir: defaults::default_recording_output_dir(),
            fps: defaults::default_recording_fps(),
            quality: defaults::default_recording_quality(),
            display: defaults::default_recording_display(),
            capture_audio: false,
            stop_timeout_secs: defaults::default_recording_stop_timeout_secs(),
            fallback_max_secs: defaults::default_recording_fallback_max_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct ScriptConfig {
    #[serde(default = "defaults::default_script_auto_scroll")]
    auto_scroll: bool,
    #[serde(default = "defaults::default_script_scroll_speed")]
    scroll_speed: u32,
    #[serde(default = "defaults::default_script_font_size")]
    font_size: u32,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        ScriptConfig {
            auto_scroll: defaults::default_script_auto_scroll(),
            scroll_speed: defaults::default_script_scroll_speed(),
            font_size: defaults::default_script_font_size(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct KeysConfig {
    #[serde(default = "defaults::default_key_next_slide")]
    next_slide: String,
    #[serde(default = "defaults::default_key_prev_slide")]
    prev_slide: String,
    #[serde(default = "defaults::default_key_first_slide")]
    first_slide: String,
    #[serde(default = "defaults::default_key_last_slide")]
    last_slide: String,
    #[serde(default = "defaults::default_key_toggle_fullscreen")]
    toggle_fullscreen: String,
    #[serde(default = "defaults::default_key_toggle_drawing")]
    toggle_drawing: String,
    #[serde(default = "defaults::default_key_clear_strokes")]
    clear_strokes: String,
    #[serde(default = "defaults::default_key_undo_stroke")]
    undo_stroke: String,
    #[serde(default = "defaults::default_key_cycle_color")]
    cycle_color: String,
    #[serde(default = "defaults::default_key_zoom_in")]
    zoom_in: String,
    #[serde(default = "defaults::default_key_zoom_out")]
    zoom_out: String,
    #[serde(default = "defaults::default_key_reset_zoom")]
    reset_zoom: String,
    #[serde(default = "defaults::default_key_reset_pan")]
    reset_pan: String,
    #[serde(default = "defaults::default_key_hide_overlay")]
    hide_overlay: String,
    #[serde(default = "defaults::default_key_toggle_recording")]
    toggle_recording: String,
    #[serde(default = "defaults::default_key_toggle_script")]
    toggle_script: String,
    #[serde(default = "defaults::default_key_quit")]
    quit: String,
}

impl Default for KeysConfig {
    fn default() -> Self {
        KeysConfig {
            next_slide: defaults::default_key_next_slide(),
            prev_slide: defaults::default_key_prev_slide(),
            first_slide: defaults::default_key_first_slide(),
            last_slide: defaults::default_key_last_slide(),
            toggle_fullscreen: defaults::default_key_toggle_fullscreen(),
            toggle_drawing: defaults::default_key_toggle_drawing(),
            clear_strokes: defaults::default_key_clear_strokes(),
            undo_stroke: defaults::default_key_undo_stroke(),
            cycle_color: defaults::default_key_cycle_color(),
            zoom_in: defaults::default_key_zoom_in(),
            zoom_out: defaults::default_key_zoom_out(),
            reset_zoom: defaults::default_key_reset_zoom(),
            reset_pan: defaults::default_key_reset_pan(),
            hide_overlay: defaults::default_key_hide_overlay(),
            toggle_recording: defaults::default_key_toggle_recording(),
            toggle_script: defaults::default_key_toggle_script(),
            quit: defaults::default_key_quit(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct LoggingConfig {
    #[serde(default = "defaults::default_log_level")]
    log_level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            log_level: defaults::default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct ToolsConfig {
    #[serde(default = "defaults::default_pdftoppm_bin")]
    pdftoppm_bin: String,
    #[serde(default = "defaults::default_soffice_bin")]
    soffice_bin: String,
    #[serde(default = "defaults::default_cache_dir")]
    cache_dir: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        ToolsConfig {
            pdftoppm_bin: defaults::default_pdftoppm_bin(),
            soffice_bin: defaults::default_soffice_bin(),
            cache_dir: defaults::default_cache_dir(),
        }
    }
}
