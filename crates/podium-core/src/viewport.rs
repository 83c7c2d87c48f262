//! Fit-to-window, zoom and pan arithmetic for the slide viewer.
//!
//! The slide is first scaled so it fits the viewport without cropping, then the
//! user zoom factor is applied on top, and finally the result is centred and
//! shifted by the pan offset. Everything here is deterministic and free of side
//! effects so the renderer can call it on every redraw.

use crate::geometry::{Offset, Placement, Size};
use tracing::debug;

pub const DEFAULT_MIN_ZOOM: f32 = 0.1;
pub const DEFAULT_MAX_ZOOM: f32 = 5.0;
pub const DEFAULT_ZOOM_STEP: f32 = 1.2;

/// Bounds applied both to the user zoom factor and to the final scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLimits {
    pub min: f32,
    pub max: f32,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        ZoomLimits {
            min: DEFAULT_MIN_ZOOM,
            max: DEFAULT_MAX_ZOOM,
        }
    }
}

impl ZoomLimits {
    /// Build limits from user input, repairing inverted or non-positive bounds.
    pub fn sanitized(min: f32, max: f32) -> Self {
        let min = if min.is_finite() && min > 0.0 {
            min
        } else {
            DEFAULT_MIN_ZOOM
        };
        let max = if max.is_finite() && max > 0.0 {
            max
        } else {
            DEFAULT_MAX_ZOOM
        };
        if min <= max {
            ZoomLimits { min, max }
        } else {
            ZoomLimits { min: max, max: min }
        }
    }

    pub fn clamp(self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

/// Scale that makes `slide` fit inside `viewport` with its aspect ratio kept.
pub fn fit_scale(slide: Size, viewport: Size) -> f32 {
    if slide.is_empty() || viewport.is_empty() {
        return 0.0;
    }
    let width_ratio = viewport.width as f32 / slide.width as f32;
    let height_ratio = viewport.height as f32 / slide.height as f32;
    width_ratio.min(height_ratio)
}

/// Placement of a slide using the default zoom limits.
pub fn compute_placement(
    slide_size: Size,
    viewport_size: Size,
    zoom_factor: f32,
    pan_offset: Offset,
) -> Placement {
    compute_placement_with_limits(
        slide_size,
        viewport_size,
        zoom_factor,
        pan_offset,
        ZoomLimits::default(),
    )
}

pub fn compute_placement_with_limits(
    slide_size: Size,
    viewport_size: Size,
    zoom_factor: f32,
    pan_offset: Offset,
    limits: ZoomLimits,
) -> Placement {
    let scaled = if slide_size.is_empty() || viewport_size.is_empty() {
        Size::ZERO
    } else {
        let scale = limits.clamp(fit_scale(slide_size, viewport_size) * zoom_factor);
        Size {
            width: scale_dimension(slide_size.width, scale),
            height: scale_dimension(slide_size.height, scale),
        }
    };

    // Floor division keeps the centring identical for slides larger than the viewport.
    let center_x = (viewport_size.width as i64 - scaled.width as i64).div_euclid(2);
    let center_y = (viewport_size.height as i64 - scaled.height as i64).div_euclid(2);

    Placement {
        size: scaled,
        origin: Offset {
            x: saturate_i32(center_x + pan_offset.x as i64),
            y: saturate_i32(center_y + pan_offset.y as i64),
        },
    }
}

fn scale_dimension(value: u32, scale: f32) -> u32 {
    let scaled = (value as f64 * scale as f64).round();
    scaled.clamp(1.0, u32::MAX as f64) as u32
}

fn saturate_i32(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// User-controlled zoom and pan for the current slide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    zoom_factor: f32,
    pan_offset: Offset,
    limits: ZoomLimits,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState::new(ZoomLimits::default())
    }
}

impl ViewState {
    pub fn new(limits: ZoomLimits) -> Self {
        ViewState {
            zoom_factor: 1.0,
            pan_offset: Offset::ZERO,
            limits,
        }
    }

    pub fn zoom_factor(&self) -> f32 {
        self.zoom_factor
    }

    pub fn pan_offset(&self) -> Offset {
        self.pan_offset
    }

    pub fn limits(&self) -> ZoomLimits {
        self.limits
    }

    pub fn zoom_percent(&self) -> u32 {
        (self.zoom_factor * 100.0).round() as u32
    }

    pub fn zoom_in(&mut self, step: f32) {
        if !valid_step(step) {
            return;
        }
        self.zoom_factor = self.limits.clamp(self.zoom_factor * step);
        debug!(zoom = self.zoom_factor, "Zoomed in");
    }

    pub fn zoom_out(&mut self, step: f32) {
        if !valid_step(step) {
            return;
        }
        self.zoom_factor = self.limits.clamp(self.zoom_factor / step);
        debug!(zoom = self.zoom_factor, "Zoomed out");
    }

    pub fn pan_by(&mut self, dx: i32, dy: i32) {
        self.pan_offset = self.pan_offset.translated(dx, dy);
    }

    pub fn reset_zoom(&mut self) {
        self.zoom_factor = 1.0;
    }

    pub fn reset_pan(&mut self) {
        self.pan_offset = Offset::ZERO;
    }

    pub fn reset(&mut self) {
        self.reset_zoom();
        self.reset_pan();
    }

    pub fn placement(&self, slide: Size, viewport: Size) -> Placement {
        compute_placement_with_limits(
            slide,
            viewport,
            self.zoom_factor,
            self.pan_offset,
            self.limits,
        )
    }
}

fn valid_step(step: f32) -> bool {
    step.is_finite() && step > 0.0
}
