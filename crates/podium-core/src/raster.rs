//! Software raster for annotation strokes.
//!
//! Segments are drawn by stamping filled discs along the line, which gives
//! round caps and joins for free and keeps the output independent of any GPU
//! or toolkit painter.

use crate::error::{Result, ViewerError};
use crate::geometry::{Point, Size};
use crate::strokes::{PenColor, Stroke};
use image::{Rgba, RgbaImage};
use std::path::Path;
use tracing::{debug, info};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);
/// Distance between disc stamps along a segment, in pixels.
const STAMP_SPACING: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    pub fn new(size: Size) -> Self {
        Canvas {
            image: RgbaImage::from_pixel(size.width, size.height, TRANSPARENT),
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.image.width(), self.image.height())
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = TRANSPARENT;
        }
    }

    pub fn is_blank(&self) -> bool {
        self.image.pixels().all(|pixel| pixel.0[3] == 0)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<PenColor> {
        if x >= self.image.width() || y >= self.image.height() {
            return None;
        }
        let [r, g, b, a] = self.image.get_pixel(x, y).0;
        Some(PenColor { r, g, b, a })
    }

    pub fn draw_segment(&mut self, from: Point, to: Point, color: PenColor, width: u32) {
        let radius = width.max(1) as f32 / 2.0;
        let rgba = Rgba([color.r, color.g, color.b, color.a]);
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let distance = (dx * dx + dy * dy).sqrt();
        let steps = (distance / STAMP_SPACING).ceil().max(1.0) as u32;
        for step in 0..=steps {
            let t = step as f32 / steps as f32;
            self.stamp(from.x + dx * t, from.y + dy * t, radius, rgba);
        }
    }

    pub fn draw_stroke(&mut self, stroke: &Stroke) {
        for pair in stroke.points().windows(2) {
            self.draw_segment(pair[0], pair[1], stroke.color(), stroke.width());
        }
    }

    /// Blank the raster and paint every stroke again, oldest first.
    pub fn replay<'a>(&mut self, strokes: impl IntoIterator<Item = &'a Stroke>) {
        self.clear();
        let mut count = 0usize;
        for stroke in strokes {
            self.draw_stroke(stroke);
            count += 1;
        }
        debug!(strokes = count, "Replayed stroke log onto canvas");
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|err| {
                ViewerError::io(format!("creating {}", parent.display()), err)
            })?;
        }
        self.image
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|err| match err {
                image::ImageError::IoError(source) => {
                    ViewerError::io(format!("writing {}", path.display()), source)
                }
                other => ViewerError::io(
                    format!("writing {}", path.display()),
                    std::io::Error::other(other.to_string()),
                ),
            })?;
        info!(path = %path.display(), "Saved annotation canvas");
        Ok(())
    }

    fn stamp(&mut self, cx: f32, cy: f32, radius: f32, rgba: Rgba<u8>) {
        let (width, height) = (self.image.width() as i64, self.image.height() as i64);
        if radius <= 0.5 {
            let (x, y) = (cx.floor() as i64, cy.floor() as i64);
            if (0..width).contains(&x) && (0..height).contains(&y) {
                self.image.put_pixel(x as u32, y as u32, rgba);
            }
            return;
        }
        let r_sq = radius * radius;
        let min_x = ((cx - radius).floor() as i64).max(0);
        let max_x = ((cx + radius).ceil() as i64).min(width - 1);
        let min_y = ((cy - radius).floor() as i64).max(0);
        let max_y = ((cy + radius).ceil() as i64).min(height - 1);
        for y in min_y..=max_y {
            let fy = y as f32 + 0.5 - cy;
            for x in min_x..=max_x {
                let fx = x as f32 + 0.5 - cx;
                if fx * fx + fy * fy <= r_sq {
                    self.image.put_pixel(x as u32, y as u32, rgba);
                }
            }
        }
    }
}
