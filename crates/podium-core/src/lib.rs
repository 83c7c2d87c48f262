//! Headless core of the podium presentation viewer.
//!
//! Slide navigation, the zoom/fit/pan transform, the annotation overlay and
//! the screen-recording session live here, free of any GUI toolkit. The
//! binary crate maps toolkit events onto [`input::InputEvent`] and feeds them
//! to [`presenter::Presenter`].

pub mod cache;
pub mod compose;
pub mod config;
pub mod deck;
pub mod error;
pub mod geometry;
pub mod input;
pub mod loader;
pub mod presenter;
pub mod raster;
pub mod recording;
pub mod script;
pub mod strokes;
pub mod viewport;

pub use error::{Result, ViewerError};
