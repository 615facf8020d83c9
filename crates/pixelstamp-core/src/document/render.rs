//! Flattening a document into a single raster.

use super::{Document, LayerContent, LayerNode, TextRenderer};
use crate::composite::overlay;
use crate::geometry::Rect;
use crate::transform::RESAMPLE_FILTER;
use image::RgbaImage;

impl Document {
    /// Composite every visible layer onto a transparent canvas.
    ///
    /// Text layers need a `text` renderer; without one they are skipped
    /// with a warning.
    pub fn render(&self, text: Option<&TextRenderer>) -> RgbaImage {
        let mut canvas = RgbaImage::new(self.width.max(1), self.height.max(1));
        let mut skipped_text = 0usize;
        draw_layers(&mut canvas, &self.layers, 1.0, text, &mut skipped_text);

        if skipped_text > 0 {
            tracing::warn!(
                document = %self.name,
                layers = skipped_text,
                "no font configured, text layers were not drawn"
            );
        }
        canvas
    }
}

fn draw_layers(
    canvas: &mut RgbaImage,
    layers: &[LayerNode],
    parent_opacity: f32,
    text: Option<&TextRenderer>,
    skipped_text: &mut usize,
) {
    // Bottom-most first so earlier siblings end up on top
    for layer in layers.iter().rev() {
        if !layer.visible {
            continue;
        }
        let opacity = parent_opacity * layer.opacity;

        match &layer.content {
            LayerContent::Group(children) => {
                draw_layers(canvas, children, opacity, text, skipped_text);
            }
            LayerContent::Pixel(raster) => {
                if let Some((x, y, width, height)) = pixel_window(&layer.bounds()) {
                    let stretched = if raster.dimensions() == (width, height) {
                        raster.clone()
                    } else {
                        image::imageops::resize(raster, width, height, RESAMPLE_FILTER)
                    };
                    overlay(canvas, &stretched, x, y, opacity);
                }
            }
            LayerContent::Text { contents, style } => {
                let Some(renderer) = text else {
                    *skipped_text += 1;
                    continue;
                };
                if let Some((x, y, width, height)) = pixel_window(&layer.bounds()) {
                    let raster = renderer.render(contents, style, width, height);
                    overlay(canvas, &raster, x, y, opacity);
                }
            }
        }
    }
}

/// Round layer bounds to whole pixels: `(x, y, width, height)`.
///
/// `None` when the bounds cover less than one pixel.
fn pixel_window(bounds: &Rect) -> Option<(i64, i64, u32, u32)> {
    let left = bounds.left.round();
    let top = bounds.top.round();
    let width = (bounds.right.round() - left).max(0.0);
    let height = (bounds.bottom.round() - top).max(0.0);
    if width < 1.0 || height < 1.0 || !width.is_finite() || !height.is_finite() {
        return None;
    }
    Some((left as i64, top as i64, width as u32, height as u32))
}
