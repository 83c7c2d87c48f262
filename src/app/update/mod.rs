use std::path::PathBuf;

mod core;
mod recording;
mod script;

/// Describes work that must be performed outside the pure reducer.
pub(super) enum Effect {
    Redraw,
    SaveBookmark(usize),
    ToggleFullscreen,
    ToggleRecording,
    LoadDeck(PathBuf),
    SaveScript(PathBuf),
    ScrollScript(f32),
    ExportAnnotations,
    QuitSafely,
}
