//! Builds the RGBA frame shown in the presentation viewport.
//!
//! Layers, bottom to top: background fill, the visible part of the scaled
//! slide at its placement origin, the committed annotation raster, then the
//! live stroke. Annotation layers are shifted by the pan offset so ink stays
//! attached to the slide while panning, and are skipped while the overlay is
//! hidden.

use crate::deck::Deck;
use crate::geometry::{Placement, Size};
use crate::strokes::DrawingOverlay;
use crate::viewport::ViewState;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use tracing::trace;

pub const DEFAULT_BACKGROUND: Rgba<u8> = Rgba([24, 24, 27, 255]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LayerKey {
    deck: u64,
    slide: usize,
    viewport: Size,
    placement: Placement,
}

/// Frame builder that remembers the last scaled slide layer.
#[derive(Debug, Clone)]
pub struct Compositor {
    background: Rgba<u8>,
    slide_layer: Option<(LayerKey, RgbaImage)>,
}

impl Default for Compositor {
    fn default() -> Self {
        Compositor::new(DEFAULT_BACKGROUND)
    }
}

impl Compositor {
    pub fn new(background: Rgba<u8>) -> Self {
        Compositor {
            background,
            slide_layer: None,
        }
    }

    pub fn set_background(&mut self, background: Rgba<u8>) {
        if self.background != background {
            self.background = background;
            self.slide_layer = None;
        }
    }

    pub fn compose(
        &mut self,
        deck: &Deck,
        view: &ViewState,
        viewport: Size,
        overlay: Option<&DrawingOverlay>,
    ) -> RgbaImage {
        let mut frame = self.slide_layer(deck, view, viewport);
        let Some(overlay) = overlay else {
            return frame;
        };
        let pan = view.pan_offset();
        imageops::overlay(
            &mut frame,
            overlay.committed_canvas().image(),
            pan.x as i64,
            pan.y as i64,
        );
        if overlay.is_drawing() {
            imageops::overlay(
                &mut frame,
                overlay.live_canvas().image(),
                pan.x as i64,
                pan.y as i64,
            );
        }
        frame
    }

    fn slide_layer(&mut self, deck: &Deck, view: &ViewState, viewport: Size) -> RgbaImage {
        let Some(slide) = deck.current_slide() else {
            return RgbaImage::from_pixel(viewport.width, viewport.height, self.background);
        };
        let placement = view.placement(slide.size(), viewport);
        let key = LayerKey {
            deck: deck.id(),
            slide: deck.current_index(),
            viewport,
            placement,
        };
        if let Some((cached_key, layer)) = &self.slide_layer {
            if *cached_key == key {
                return layer.clone();
            }
        }

        let mut layer = RgbaImage::from_pixel(viewport.width, viewport.height, self.background);
        if let Some((scaled, x, y)) = visible_slide(slide.image(), placement, viewport) {
            imageops::overlay(&mut layer, &scaled, x, y);
        }
        trace!(
            slide = key.slide,
            width = placement.size.width,
            height = placement.size.height,
            "Rebuilt slide layer"
        );
        self.slide_layer = Some((key, layer.clone()));
        layer
    }
}

/// Scale only the source pixels that reach the viewport. The crop is widened
/// to whole source pixels and scaled to where those pixels sit inside the
/// placement, so the returned origin may lie left of or above the viewport.
fn visible_slide(
    source: &RgbaImage,
    placement: Placement,
    viewport: Size,
) -> Option<(RgbaImage, i64, i64)> {
    if placement.size.is_empty() || viewport.is_empty() {
        return None;
    }
    let (ox, oy) = (placement.origin.x as i64, placement.origin.y as i64);
    let (pw, ph) = (placement.size.width as i64, placement.size.height as i64);
    let x0 = ox.max(0);
    let y0 = oy.max(0);
    let x1 = (ox + pw).min(viewport.width as i64);
    let y1 = (oy + ph).min(viewport.height as i64);
    if x0 >= x1 || y0 >= y1 {
        return None;
    }

    let (sw, sh) = (source.width() as f64, source.height() as f64);
    let scale_x = sw / pw as f64;
    let scale_y = sh / ph as f64;
    let src_x0 = (((x0 - ox) as f64) * scale_x).floor().clamp(0.0, sw - 1.0) as u32;
    let src_y0 = (((y0 - oy) as f64) * scale_y).floor().clamp(0.0, sh - 1.0) as u32;
    let src_x1 = (((x1 - ox) as f64) * scale_x).ceil().clamp(1.0, sw) as u32;
    let src_y1 = (((y1 - oy) as f64) * scale_y).ceil().clamp(1.0, sh) as u32;
    let crop_w = src_x1.saturating_sub(src_x0).max(1);
    let crop_h = src_y1.saturating_sub(src_y0).max(1);

    // Placement-space span covered by the cropped source pixels.
    let dst_x0 = (src_x0 as f64 / scale_x).round() as i64;
    let dst_y0 = (src_y0 as f64 / scale_y).round() as i64;
    let dst_x1 = ((src_x0 + crop_w) as f64 / scale_x).round() as i64;
    let dst_y1 = ((src_y0 + crop_h) as f64 / scale_y).round() as i64;

    let cropped = imageops::crop_imm(source, src_x0, src_y0, crop_w, crop_h).to_image();
    let scaled = imageops::resize(
        &cropped,
        (dst_x1 - dst_x0).max(1) as u32,
        (dst_y1 - dst_y0).max(1) as u32,
        FilterType::Triangle,
    );
    Some((scaled, ox + dst_x0, oy + dst_y0))
}
