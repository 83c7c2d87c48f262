use crate::strokes::PenColor;

pub(crate) fn default_window_width() -> f32 {
    1280.0
}

pub(crate) fn default_window_height() -> f32 {
    800.0
}

pub(crate) fn default_show_script() -> bool {
    false
}

pub(crate) fn default_min_zoom() -> f32 {
    crate::viewport::DEFAULT_MIN_ZOOM
}

pub(crate) fn default_max_zoom() -> f32 {
    crate::viewport::DEFAULT_MAX_ZOOM
}

pub(crate) fn default_zoom_step() -> f32 {
    crate::viewport::DEFAULT_ZOOM_STEP
}

pub(crate) fn default_render_dpi() -> u32 {
    crate::loader::DEFAULT_RENDER_DPI
}

pub(crate) fn default_pen_color() -> PenColor {
    PenColor::RED
}

pub(crate) fn default_pen_width() -> u32 {
    crate::strokes::DEFAULT_PEN_WIDTH
}

pub(crate) fn default_recording_output_dir() -> String {
    "recordings".to_string()
}

pub(crate) fn default_recording_fps() -> u32 {
    30
}

pub(crate) fn default_recording_quality() -> u32 {
    80
}

pub(crate) fn default_recording_display() -> String {
    std::env::var("DISPLAY").unwrap_or_else(|_| ":0.0".to_string())
}

pub(crate) fn default_recording_stop_timeout_secs() -> u64 {
    5
}

pub(crate) fn default_recording_fallback_max_secs() -> u64 {
    60
}

pub(crate) fn default_script_auto_scroll() -> bool {
    true
}

pub(crate) fn default_script_scroll_speed() -> u32 {
    crate::script::DEFAULT_SCROLL_SPEED
}

pub(crate) fn default_script_font_size() -> u32 {
    18
}

pub(crate) fn default_log_level() -> crate::config::LogLevel {
    crate::config::LogLevel::Info
}

pub(crate) fn default_pdftoppm_bin() -> String {
    "pdftoppm".to_string()
}

pub(crate) fn default_soffice_bin() -> String {
    "soffice".to_string()
}

pub(crate) fn default_cache_dir() -> String {
    crate::cache::DEFAULT_CACHE_DIR.to_string()
}

pub(crate) fn default_key_next_slide() -> String {
    "right".to_string()
}

pub(crate) fn default_key_prev_slide() -> String {
    "left".to_string()
}

pub(crate) fn default_key_first_slide() -> String {
    "home".to_string()
}

pub(crate) fn default_key_last_slide() -> String {
    "end".to_string()
}

pub(crate) fn default_key_toggle_fullscreen() -> String {
    "f11".to_string()
}

pub(crate) fn default_key_toggle_drawing() -> String {
    "d".to_string()
}

pub(crate) fn default_key_clear_strokes() -> String {
    "delete".to_string()
}

pub(crate) fn default_key_undo_stroke() -> String {
    "ctrl+z".to_string()
}

pub(crate) fn default_key_cycle_color() -> String {
    "c".to_string()
}

pub(crate) fn default_key_zoom_in() -> String {
    "ctrl+=".to_string()
}

pub(crate) fn default_key_zoom_out() -> String {
    "ctrl+-".to_string()
}

pub(crate) fn default_key_reset_zoom() -> String {
    "ctrl+0".to_string()
}

pub(crate) fn default_key_reset_pan() -> String {
    "ctrl+r".to_string()
}

pub(crate) fn default_key_hide_overlay() -> String {
    "escape".to_string()
}

pub(crate) fn default_key_toggle_recording() -> String {
    "ctrl+shift+r".to_string()
}

pub(crate) fn default_key_toggle_script() -> String {
    "ctrl+t".to_string()
}

pub(crate) fn default_key_quit() -> String {
    "ctrl+q".to_string()
}
