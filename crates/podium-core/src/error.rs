use std::io;
use thiserror::Error;

pub type Result<T, E = ViewerError> = std::result::Result<T, E>;

/// Failures that can reach the user. Each one is recovered at the action that
/// triggered it (opening a deck, starting a recording, saving a file) and shown
/// as a single message.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),
    #[error("could not decode document: {0}")]
    DecodeFailure(String),
    #[error("could not start screen recording: {0}")]
    RecordingLaunchFailure(String),
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl ViewerError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        ViewerError::Io {
            context: context.into(),
            source,
        }
    }
}
