//! Rasterizing a tile plan and stamping it onto images.

use super::TilePlan;
use crate::composite::overlay;
use crate::transform::apply_rotation;
use image::RgbaImage;

/// Draw every tile of `plan` and rotate the merged pattern.
///
/// The unrotated pattern is a `ceil(E) x ceil(E)` square; the result is
/// its rotated bounding box, with the pattern center at the raster center.
/// `tile` is drawn as-is, so it should already be `tile_width x tile_height`.
pub fn render_pattern(tile: &RgbaImage, plan: &TilePlan) -> RgbaImage {
    let extent = plan.grid.canvas_extent;
    let side = extent.ceil().max(1.0) as u32;
    let half = extent / 2.0;

    let mut pattern = RgbaImage::new(side, side);
    for placement in &plan.placements {
        overlay(
            &mut pattern,
            tile,
            (placement.x + half).round() as i64,
            (placement.y + half).round() as i64,
            placement.opacity,
        );
    }

    apply_rotation(&pattern, plan.rotation_degrees)
}

/// Lay a rendered pattern over `target`, centered and shifted by `offset`
/// on both axes.
pub fn stamp_pattern(target: &mut RgbaImage, pattern: &RgbaImage, offset: f64) {
    let x = (target.width() as f64 - pattern.width() as f64) / 2.0 + offset;
    let y = (target.height() as f64 - pattern.height() as f64) / 2.0 + offset;
    overlay(target, pattern, x.round() as i64, y.round() as i64, 1.0);
}
