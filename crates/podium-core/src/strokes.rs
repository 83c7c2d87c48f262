//! Freehand annotation model.
//!
//! Committed strokes live in a [`StrokeLog`]; the committed raster is always
//! derived from it by replay, so `undo`, `clear` and resizes simply rebuild it.
//! The stroke being drawn right now is painted segment by segment onto a
//! separate live layer and only folded into the log on pointer release.

use crate::error::Result;
use crate::geometry::{Offset, Point, Size};
use crate::raster::Canvas;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

pub const MIN_PEN_WIDTH: u32 = 1;
pub const MAX_PEN_WIDTH: u32 = 20;
pub const DEFAULT_PEN_WIDTH: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PenColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

fn opaque() -> u8 {
    255
}

impl PenColor {
    pub const TRANSPARENT: PenColor = PenColor::rgba(0, 0, 0, 0);
    pub const RED: PenColor = PenColor::rgb(255, 0, 0);
    pub const YELLOW: PenColor = PenColor::rgb(255, 214, 0);
    pub const GREEN: PenColor = PenColor::rgb(0, 200, 83);
    pub const BLUE: PenColor = PenColor::rgb(41, 98, 255);
    pub const WHITE: PenColor = PenColor::rgb(255, 255, 255);
    pub const BLACK: PenColor = PenColor::rgb(0, 0, 0);

    /// Order used when cycling through pen colours from the keyboard.
    pub const PALETTE: [PenColor; 6] = [
        PenColor::RED,
        PenColor::YELLOW,
        PenColor::GREEN,
        PenColor::BLUE,
        PenColor::WHITE,
        PenColor::BLACK,
    ];

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        PenColor { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        PenColor { r, g, b, a }
    }

    /// The palette entry after `self`; colours outside the palette restart at red.
    pub fn next_in_palette(self) -> Self {
        let position = PenColor::PALETTE.iter().position(|c| *c == self);
        match position {
            Some(idx) => PenColor::PALETTE[(idx + 1) % PenColor::PALETTE.len()],
            None => PenColor::PALETTE[0],
        }
    }
}

impl Default for PenColor {
    fn default() -> Self {
        PenColor::RED
    }
}

/// One continuous gesture from pointer-down to pointer-up.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    points: Vec<Point>,
    color: PenColor,
    width: u32,
}

impl Stroke {
    pub fn new(points: Vec<Point>, color: PenColor, width: u32) -> Self {
        Stroke {
            points,
            color,
            width: width.clamp(MIN_PEN_WIDTH, MAX_PEN_WIDTH),
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn color(&self) -> PenColor {
        self.color
    }

    pub fn width(&self) -> u32 {
        self.width
    }
}

#[derive(Debug, Clone, Default)]
pub struct StrokeLog {
    strokes: Vec<Stroke>,
}

impl StrokeLog {
    pub fn push(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
    }

    pub fn undo(&mut self) -> Option<Stroke> {
        self.strokes.pop()
    }

    /// Returns `true` if anything was removed.
    pub fn clear(&mut self) -> bool {
        let had_strokes = !self.strokes.is_empty();
        self.strokes.clear();
        had_strokes
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stroke> {
        self.strokes.iter()
    }
}

/// Overlay state: the log, both raster layers and the current pen.
#[derive(Debug, Clone)]
pub struct DrawingOverlay {
    log: StrokeLog,
    committed: Canvas,
    live: Canvas,
    in_progress: Option<Stroke>,
    pen_color: PenColor,
    pen_width: u32,
    chrome_offset: Point,
}

impl DrawingOverlay {
    pub fn new(surface: Size, chrome_offset: Point) -> Self {
        DrawingOverlay {
            log: StrokeLog::default(),
            committed: Canvas::new(surface),
            live: Canvas::new(surface),
            in_progress: None,
            pen_color: PenColor::default(),
            pen_width: DEFAULT_PEN_WIDTH,
            chrome_offset,
        }
    }

    pub fn log(&self) -> &StrokeLog {
        &self.log
    }

    pub fn committed_canvas(&self) -> &Canvas {
        &self.committed
    }

    pub fn live_canvas(&self) -> &Canvas {
        &self.live
    }

    pub fn is_drawing(&self) -> bool {
        self.in_progress.is_some()
    }

    pub fn pen_color(&self) -> PenColor {
        self.pen_color
    }

    pub fn pen_width(&self) -> u32 {
        self.pen_width
    }

    pub fn set_color(&mut self, color: PenColor) {
        self.pen_color = color;
    }

    pub fn cycle_color(&mut self) -> PenColor {
        self.pen_color = self.pen_color.next_in_palette();
        self.pen_color
    }

    pub fn set_width(&mut self, width: u32) {
        self.pen_width = width.clamp(MIN_PEN_WIDTH, MAX_PEN_WIDTH);
    }

    /// Map a raw pointer position onto the drawing surface. Positions that land
    /// above or left of the surface origin are rejected.
    pub fn to_surface(&self, raw: Point, pan: Offset) -> Option<Point> {
        let x = raw.x - self.chrome_offset.x - pan.x as f32;
        let y = raw.y - self.chrome_offset.y - pan.y as f32;
        if x < 0.0 || y < 0.0 || !x.is_finite() || !y.is_finite() {
            return None;
        }
        Some(Point::new(x, y))
    }

    /// Returns `true` when a stroke was opened.
    pub fn begin_stroke(&mut self, raw: Point, pan: Offset) -> bool {
        let Some(point) = self.to_surface(raw, pan) else {
            return false;
        };
        // A press without a matching release keeps whatever was drawn so far.
        self.end_stroke();
        self.in_progress = Some(Stroke::new(vec![point], self.pen_color, self.pen_width));
        true
    }

    /// Returns `true` when a segment was painted.
    pub fn extend_stroke(&mut self, raw: Point, pan: Offset) -> bool {
        let Some(point) = self.to_surface(raw, pan) else {
            return false;
        };
        let Some(stroke) = self.in_progress.as_mut() else {
            return false;
        };
        let Some(last) = stroke.points.last().copied() else {
            return false;
        };
        self.live
            .draw_segment(last, point, stroke.color, stroke.width);
        stroke.points.push(point);
        true
    }

    /// Commit the open stroke. Strokes with fewer than two points are dropped.
    pub fn end_stroke(&mut self) -> bool {
        let Some(stroke) = self.in_progress.take() else {
            return false;
        };
        self.live.clear();
        if stroke.points.len() < 2 {
            debug!("Discarded single-point stroke");
            return false;
        }
        self.committed.draw_stroke(&stroke);
        self.log.push(stroke);
        debug!(strokes = self.log.len(), "Committed stroke");
        true
    }

    pub fn undo(&mut self) -> bool {
        if self.log.undo().is_none() {
            return false;
        }
        self.committed.replay(self.log.iter());
        info!(strokes = self.log.len(), "Undid last stroke");
        true
    }

    pub fn clear(&mut self) -> bool {
        if !self.log.clear() {
            return false;
        }
        self.committed.clear();
        info!("Cleared all strokes");
        true
    }

    /// Rebuild both layers at a new surface size.
    pub fn resize(&mut self, surface: Size) {
        if surface == self.committed.size() {
            return;
        }
        self.committed = Canvas::new(surface);
        self.committed.replay(self.log.iter());
        self.live = Canvas::new(surface);
        if let Some(stroke) = &self.in_progress {
            self.live.draw_stroke(stroke);
        }
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.committed.save_png(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlay() -> DrawingOverlay {
        DrawingOverlay::new(Size::new(200, 120), Point::new(0.0, 50.0))
    }

    fn draw(overlay: &mut DrawingOverlay, points: &[(f32, f32)]) {
        let mut iter = points.iter();
        if let Some(&(x, y)) = iter.next() {
            overlay.begin_stroke(Point::new(x, y), Offset::ZERO);
        }
        for &(x, y) in iter {
            overlay.extend_stroke(Point::new(x, y), Offset::ZERO);
        }
        overlay.end_stroke();
    }

    #[test]
    fn click_without_drag_commits_nothing() {
        let mut overlay = overlay();
        draw(&mut overlay, &[(10.0, 60.0)]);
        assert!(overlay.log().is_empty());
        assert!(overlay.committed_canvas().is_blank());
    }

    #[test]
    fn pointer_inside_chrome_is_ignored() {
        let mut overlay = overlay();
        assert!(!overlay.begin_stroke(Point::new(10.0, 20.0), Offset::ZERO));
        assert!(!overlay.extend_stroke(Point::new(30.0, 80.0), Offset::ZERO));
        assert!(!overlay.end_stroke());
        assert!(overlay.log().is_empty());
    }

    #[test]
    fn surface_mapping_subtracts_chrome_and_pan() {
        let overlay = overlay();
        let mapped = overlay.to_surface(Point::new(40.0, 90.0), Offset::new(10, 20));
        assert_eq!(mapped, Some(Point::new(30.0, 20.0)));
        assert_eq!(overlay.to_surface(Point::new(5.0, 90.0), Offset::new(10, 0)), None);
    }

    #[test]
    fn live_segments_paint_before_commit() {
        let mut overlay = overlay();
        overlay.begin_stroke(Point::new(10.0, 60.0), Offset::ZERO);
        overlay.extend_stroke(Point::new(40.0, 60.0), Offset::ZERO);
        assert!(!overlay.live_canvas().is_blank());
        assert!(overlay.committed_canvas().is_blank());
        overlay.end_stroke();
        assert!(overlay.live_canvas().is_blank());
        assert!(!overlay.committed_canvas().is_blank());
    }

    #[test]
    fn undo_removes_last_stroke_and_rebuilds_raster() {
        let mut overlay = overlay();
        draw(&mut overlay, &[(10.0, 60.0), (20.0, 60.0), (30.0, 60.0), (40.0, 60.0), (50.0, 60.0)]);
        assert_eq!(overlay.log().len(), 1);
        assert!(overlay.undo());
        assert_eq!(overlay.log().len(), 0);
        assert!(overlay.committed_canvas().is_blank());
        assert!(!overlay.undo());
    }

    #[test]
    fn clear_then_undo_leaves_log_empty() {
        let mut overlay = overlay();
        draw(&mut overlay, &[(10.0, 60.0), (60.0, 100.0)]);
        draw(&mut overlay, &[(15.0, 70.0), (80.0, 70.0)]);
        assert!(overlay.clear());
        assert!(!overlay.clear());
        assert!(!overlay.undo());
        assert!(overlay.log().is_empty());
        assert!(overlay.committed_canvas().is_blank());
    }

    #[test]
    fn pen_changes_only_affect_later_strokes() {
        let mut overlay = overlay();
        draw(&mut overlay, &[(10.0, 60.0), (20.0, 60.0)]);
        overlay.set_color(PenColor::BLUE);
        overlay.set_width(40);
        draw(&mut overlay, &[(10.0, 90.0), (20.0, 90.0)]);
        let strokes: Vec<_> = overlay.log().iter().collect();
        assert_eq!(strokes[0].color(), PenColor::RED);
        assert_eq!(strokes[0].width(), DEFAULT_PEN_WIDTH);
        assert_eq!(strokes[1].color(), PenColor::BLUE);
        assert_eq!(strokes[1].width(), MAX_PEN_WIDTH);
    }

    #[test]
    fn resize_replays_remaining_strokes() {
        let mut overlay = overlay();
        draw(&mut overlay, &[(10.0, 60.0), (30.0, 60.0)]);
        draw(&mut overlay, &[(10.0, 100.0), (30.0, 100.0)]);
        overlay.resize(Size::new(400, 300));
        assert_eq!(overlay.committed_canvas().size(), Size::new(400, 300));
        assert_eq!(overlay.committed_canvas().pixel(20, 10), Some(PenColor::RED));
        assert_eq!(overlay.committed_canvas().pixel(20, 50), Some(PenColor::RED));

        assert!(overlay.undo());
        assert_eq!(overlay.committed_canvas().size(), Size::new(400, 300));
        assert_eq!(overlay.committed_canvas().pixel(20, 10), Some(PenColor::RED));
        assert_ne!(overlay.committed_canvas().pixel(20, 50), Some(PenColor::RED));
    }

    #[test]
    fn second_press_commits_the_open_stroke() {
        let mut overlay = overlay();
        overlay.begin_stroke(Point::new(10.0, 60.0), Offset::ZERO);
        overlay.extend_stroke(Point::new(40.0, 60.0), Offset::ZERO);
        assert!(overlay.begin_stroke(Point::new(10.0, 90.0), Offset::ZERO));
        assert_eq!(overlay.log().len(), 1);
        assert_eq!(overlay.committed_canvas().pixel(25, 10), Some(PenColor::RED));
        assert!(overlay.is_drawing());

        // A lone point left open is still dropped.
        assert!(overlay.begin_stroke(Point::new(50.0, 90.0), Offset::ZERO));
        assert_eq!(overlay.log().len(), 1);
    }

    #[test]
    fn palette_cycles_and_wraps() {
        assert_eq!(PenColor::RED.next_in_palette(), PenColor::YELLOW);
        assert_eq!(PenColor::BLACK.next_in_palette(), PenColor::RED);
        assert_eq!(PenColor::rgb(1, 2, 3).next_in_palette(), PenColor::RED);
    }
}
