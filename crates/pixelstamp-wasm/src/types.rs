//! WASM-compatible wrapper types for image data.
//!
//! Pixels cross the boundary as flat RGBA bytes, the layout a canvas
//! `ImageData` uses, and are converted to the core `RgbaImage` on demand.

use image::RgbaImage;
use pixelstamp_core::geometry::Rect;
use serde::Deserialize;
use wasm_bindgen::prelude::*;

/// An RGBA image wrapper for JavaScript.
///
/// `pixels()` copies the data into JavaScript memory as a `Uint8Array`.
#[wasm_bindgen]
pub struct JsRgbaImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsRgbaImage {
    /// Create a new image from dimensions and RGBA pixel data
    /// (4 bytes per pixel, row-major order).
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsRgbaImage {
        JsRgbaImage {
            width,
            height,
            pixels,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGBA pixel data as Uint8Array.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {}
}

impl JsRgbaImage {
    pub(crate) fn from_rgba(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            pixels: image.into_raw(),
        }
    }

    /// Copy into a core image.
    ///
    /// Fails when the buffer length is not `width * height * 4`.
    pub(crate) fn to_rgba(&self) -> Result<RgbaImage, String> {
        RgbaImage::from_raw(self.width, self.height, self.pixels.clone()).ok_or_else(|| {
            format!(
                "Pixel buffer holds {} bytes, expected {} for {}x{} RGBA",
                self.pixels.len(),
                self.width as usize * self.height as usize * 4,
                self.width,
                self.height
            )
        })
    }
}

/// Rectangle as passed from JavaScript: `{ left, top, right, bottom }`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct JsBounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl From<JsBounds> for Rect {
    fn from(bounds: JsBounds) -> Self {
        Rect::new(bounds.left, bounds.top, bounds.right, bounds.bottom)
    }
}
