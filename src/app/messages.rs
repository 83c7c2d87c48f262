use iced::keyboard::{Key, Modifiers};
use iced::{Point, mouse};
use podium_core::deck::Deck;
use std::path::PathBuf;
use std::time::Instant;

/// Messages emitted by the UI.
#[derive(Debug, Clone)]
pub enum Message {
    NextSlide,
    PreviousSlide,
    ZoomIn,
    ZoomOut,
    ResetView,
    ToggleTheme,
    ToggleFullscreen,
    ToggleDrawing,
    ClearStrokes,
    UndoStroke,
    CycleColor,
    PenWidthChanged(u32),
    ExportAnnotations,
    ToggleRecording,
    ToggleScript,
    OpenPathInputChanged(String),
    OpenPathRequested,
    DeckLoaded {
        path: PathBuf,
        deck: Deck,
        resume_at: Option<usize>,
    },
    DeckLoadFailed {
        path: PathBuf,
        error: String,
    },
    ScriptPathInputChanged(String),
    LoadScriptRequested,
    SaveScriptRequested,
    ScriptSpeedChanged(u32),
    ToggleScriptAutoScroll,
    ScriptScrollUp,
    ScriptScrollDown,
    ScriptTop,
    ScriptBottom,
    ScriptScrolled {
        offset: f32,
        max_offset: f32,
    },
    WindowResized {
        width: f32,
        height: f32,
    },
    RecordingOriginFetched(Option<Point>),
    CloseRequested,
    KeyPressed {
        key: Key,
        modifiers: Modifiers,
    },
    ModifiersChanged(Modifiers),
    CursorMoved {
        x: f32,
        y: f32,
    },
    MousePressed(mouse::Button),
    MouseReleased(mouse::Button),
    WheelScrolled {
        delta_y: f32,
    },
    Tick(Instant),
}
