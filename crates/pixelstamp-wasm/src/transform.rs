//! WASM bindings for the resize and crop raster operations.

use crate::js_error;
use crate::types::JsRgbaImage;
use pixelstamp_core::geometry::Rect;
use pixelstamp_core::transform::{aspect_fill_image, apply_crop};
use wasm_bindgen::prelude::*;

/// Resize and center-crop an image so it is exactly `width x height`
/// without distortion.
///
/// The excess dimension is trimmed evenly from both sides; an odd extra
/// pixel comes off the right or bottom edge.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const web = aspect_fill_resize(photo, 1200, 800);
/// ```
#[wasm_bindgen]
pub fn aspect_fill_resize(
    image: &JsRgbaImage,
    width: u32,
    height: u32,
) -> Result<JsRgbaImage, JsValue> {
    fill_resize(image, width, height).map_err(js_error)
}

fn fill_resize(image: &JsRgbaImage, width: u32, height: u32) -> Result<JsRgbaImage, String> {
    let source = image.to_rgba()?;
    let fitted = aspect_fill_image(&source, width, height).map_err(|e| e.to_string())?;
    Ok(JsRgbaImage::from_rgba(fitted))
}

/// Crop an image to a pixel window.
///
/// Edges are rounded to whole pixels and clamped to the image.
#[wasm_bindgen]
pub fn crop(
    image: &JsRgbaImage,
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
) -> Result<JsRgbaImage, JsValue> {
    crop_window(image, Rect::new(left, top, right, bottom)).map_err(js_error)
}

fn crop_window(image: &JsRgbaImage, window: Rect) -> Result<JsRgbaImage, String> {
    let source = image.to_rgba()?;
    Ok(JsRgbaImage::from_rgba(apply_crop(&source, &window)))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Create a test image whose red channel encodes the column.
    fn test_image(width: u32, height: u32) -> JsRgbaImage {
        let pixels: Vec<u8> = (0..height)
            .flat_map(|_| (0..width).flat_map(|x| [x as u8, 0, 0, 255]))
            .collect();
        JsRgbaImage::new(width, height, pixels)
    }

    #[test]
    fn test_fill_resize_exact_size() {
        let result = fill_resize(&test_image(400, 200), 100, 100).unwrap();
        assert_eq!((result.width(), result.height()), (100, 100));
        assert_eq!(result.byte_length(), 100 * 100 * 4);
    }

    #[test]
    fn test_fill_resize_rejects_zero_target() {
        assert!(fill_resize(&test_image(10, 10), 0, 5).is_err());
    }

    #[test]
    fn test_fill_resize_rejects_bad_buffer() {
        let bad = JsRgbaImage::new(10, 10, vec![0; 10]);
        assert!(fill_resize(&bad, 5, 5).is_err());
    }

    #[test]
    fn test_crop_window() {
        let result = crop_window(&test_image(20, 10), Rect::new(5.0, 0.0, 15.0, 10.0)).unwrap();
        assert_eq!((result.width(), result.height()), (10, 10));
        // First pixel of the crop was column 5
        assert_eq!(result.pixels()[0], 5);
    }
}
