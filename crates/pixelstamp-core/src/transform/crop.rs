//! Image cropping in pixel coordinates.
//!
//! Crop windows come from [`crate::geometry::aspect_fill`] and are
//! expressed in pixels of the image being cropped. Windows that extend
//! beyond the image are clamped rather than rejected.

use crate::geometry::Rect;
use image::RgbaImage;

/// Crop `image` to `window`.
///
/// # Behavior
///
/// - Window edges are rounded to whole pixels
/// - Edges outside the image are clamped to the image bounds
/// - Minimum output dimension is 1x1 pixels
/// - A window covering the whole image returns a copy of the original
pub fn apply_crop(image: &RgbaImage, window: &Rect) -> RgbaImage {
    let (img_w, img_h) = image.dimensions();

    let px_left = (window.left.round().max(0.0) as u32).min(img_w.saturating_sub(1));
    let px_top = (window.top.round().max(0.0) as u32).min(img_h.saturating_sub(1));
    let px_right = (window.right.round().max(0.0) as u32).min(img_w);
    let px_bottom = (window.bottom.round().max(0.0) as u32).min(img_h);

    // Fast path: full crop returns a clone
    if px_left == 0 && px_top == 0 && px_right == img_w && px_bottom == img_h {
        return image.clone();
    }

    let out_width = px_right.saturating_sub(px_left).max(1);
    let out_height = px_bottom.saturating_sub(px_top).max(1);

    image::imageops::crop_imm(image, px_left, px_top, out_width, out_height).to_image()
}
