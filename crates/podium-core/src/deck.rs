//! Slide storage and navigation.

use crate::geometry::Size;
use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// One decoded page. Immutable after load.
#[derive(Debug, Clone)]
pub struct Slide {
    image: RgbaImage,
}

impl Slide {
    pub fn new(image: RgbaImage) -> Self {
        Slide { image }
    }

    pub fn blank(size: Size) -> Self {
        Slide {
            image: RgbaImage::from_pixel(size.width, size.height, Rgba([255, 255, 255, 255])),
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.image.width(), self.image.height())
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

/// Ordered slides of one opened document plus the current cursor.
#[derive(Debug, Clone)]
pub struct Deck {
    id: u64,
    source: Option<PathBuf>,
    slides: Vec<Slide>,
    current: usize,
}

impl Default for Deck {
    fn default() -> Self {
        Deck::new(Vec::new())
    }
}

impl Deck {
    pub fn new(slides: Vec<Slide>) -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        Deck {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            source: None,
            slides,
            current: 0,
        }
    }

    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Unique per constructed deck; lets render caches tell decks apart.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_slide(&self) -> Option<&Slide> {
        self.slides.get(self.current)
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.slides.len()
    }

    /// Returns `true` when the cursor moved.
    pub fn next(&mut self) -> bool {
        if self.current + 1 < self.slides.len() {
            self.current += 1;
            info!(slide = self.current + 1, total = self.len(), "Navigated to slide");
            return true;
        }
        false
    }

    pub fn previous(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            info!(slide = self.current + 1, total = self.len(), "Navigated to slide");
            return true;
        }
        false
    }

    /// Out-of-range targets are ignored.
    pub fn goto(&mut self, index: usize) -> bool {
        if index >= self.slides.len() || index == self.current {
            return false;
        }
        self.current = index;
        info!(slide = self.current + 1, total = self.len(), "Jumped to slide");
        true
    }

    pub fn first(&mut self) -> bool {
        self.goto(0)
    }

    pub fn last(&mut self) -> bool {
        match self.slides.len() {
            0 => false,
            len => self.goto(len - 1),
        }
    }
}
