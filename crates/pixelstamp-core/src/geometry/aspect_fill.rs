//! Aspect-fill resize/crop computation.
//!
//! Fills a fixed `target_width x target_height` output without distortion:
//! the source is scaled until the *limiting* dimension matches the target,
//! then the excess along the other dimension is cropped symmetrically.
//!
//! - Source wider than target ratio: match height, crop left/right
//! - Source taller than target ratio: match width, crop top/bottom
//! - Same ratio: resize directly, no crop

use super::{GeometryError, Rect};
use serde::{Deserialize, Serialize};

/// Resize dimensions plus the crop window applied after resizing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectFill {
    /// Width of the intermediate resized image.
    pub resize_width: u32,
    /// Height of the intermediate resized image.
    pub resize_height: u32,
    /// Crop window in resized-image pixel coordinates.
    /// Always exactly `target_width x target_height`.
    pub crop: Rect,
}

impl AspectFill {
    /// Crop window as integer `(x, y, width, height)`.
    pub fn crop_window(&self) -> (u32, u32, u32, u32) {
        (
            self.crop.left as u32,
            self.crop.top as u32,
            self.crop.width() as u32,
            self.crop.height() as u32,
        )
    }

    /// True when the resize alone produces the target size.
    pub fn is_uncropped(&self) -> bool {
        self.crop.left == 0.0
            && self.crop.top == 0.0
            && self.crop.width() as u32 == self.resize_width
            && self.crop.height() as u32 == self.resize_height
    }
}

/// Compute the aspect-fill resize and crop for `source`.
///
/// Ratios are compared by cross-multiplication so integer-sized sources
/// never hit floating point equality issues. When the excess is odd, the
/// extra pixel is taken from the right (or bottom) edge.
///
/// # Errors
///
/// Returns [`GeometryError::Degenerate`] if the source or the target has
/// zero width or height.
pub fn aspect_fill(
    source: &Rect,
    target_width: u32,
    target_height: u32,
) -> Result<AspectFill, GeometryError> {
    source.require_area("source image")?;
    if target_width == 0 || target_height == 0 {
        return Err(GeometryError::Degenerate {
            what: "target size",
            width: target_width as f64,
            height: target_height as f64,
        });
    }

    let (src_w, src_h) = (source.width(), source.height());
    let (tw, th) = (target_width as f64, target_height as f64);

    // src_w / src_h compared against tw / th
    let source_side = src_w * th;
    let target_side = src_h * tw;

    if source_side > target_side {
        // Width is the excess dimension
        let resize_width = ((src_w * th / src_h).round() as u32).max(target_width);
        let excess = resize_width - target_width;
        let left = (excess / 2) as f64;
        Ok(AspectFill {
            resize_width,
            resize_height: target_height,
            crop: Rect::new(left, 0.0, left + tw, th),
        })
    } else if source_side < target_side {
        // Height is the excess dimension
        let resize_height = ((src_h * tw / src_w).round() as u32).max(target_height);
        let excess = resize_height - target_height;
        let top = (excess / 2) as f64;
        Ok(AspectFill {
            resize_width: target_width,
            resize_height,
            crop: Rect::new(0.0, top, tw, top + th),
        })
    } else {
        Ok(AspectFill {
            resize_width: target_width,
            resize_height: target_height,
            crop: Rect::from_size(tw, th),
        })
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
