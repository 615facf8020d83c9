//! Image resizing for layer placement and batch exports.
//!
//! Provides resize operations using the `image` crate's algorithms.
//! All functions return new images without modifying the input.

use super::apply_crop;
use crate::geometry::{aspect_fill, GeometryError, Rect};
use image::imageops::FilterType;
use image::RgbaImage;

/// Resampling filter for every resize in the pipeline.
///
/// Cubic (Catmull-Rom) avoids the aliasing nearest-neighbor produces on
/// downscale. Not configurable.
pub const RESAMPLE_FILTER: FilterType = FilterType::CatmullRom;

/// Resize an image to exact dimensions.
///
/// # Errors
///
/// Returns [`GeometryError::Degenerate`] if either target dimension is zero.
pub fn resize_exact(image: &RgbaImage, width: u32, height: u32) -> Result<RgbaImage, GeometryError> {
    if width == 0 || height == 0 {
        return Err(GeometryError::Degenerate {
            what: "resize target",
            width: width as f64,
            height: height as f64,
        });
    }

    // Fast path: if dimensions match, just clone
    if image.dimensions() == (width, height) {
        return Ok(image.clone());
    }

    Ok(image::imageops::resize(image, width, height, RESAMPLE_FILTER))
}

/// Resize and crop an image so it fills `target_width x target_height`
/// exactly without distortion.
///
/// # Errors
///
/// Returns [`GeometryError::Degenerate`] if the image or target is empty.
pub fn aspect_fill_image(
    image: &RgbaImage,
    target_width: u32,
    target_height: u32,
) -> Result<RgbaImage, GeometryError> {
    let (width, height) = image.dimensions();
    let fill = aspect_fill(
        &Rect::from_size(width as f64, height as f64),
        target_width,
        target_height,
    )?;

    let resized = resize_exact(image, fill.resize_width, fill.resize_height)?;
    if fill.is_uncropped() {
        return Ok(resized);
    }
    Ok(apply_crop(&resized, &fill.crop))
}
