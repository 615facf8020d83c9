//! Image encoding for batch exports.
//!
//! This module provides functionality for:
//! - Encoding rendered documents to PNG, JPEG or GIF
//! - Optional palette reduction with ordered dithering (PNG-8 style output)
//! - Optional pre-encode blur
//!
//! All encoders take an RGBA image and return the encoded bytes; writing
//! them somewhere is the caller's job.
//!
//! # Examples
//!
//! ```ignore
//! use pixelstamp_core::encode::{encode_image, ExportOptions};
//!
//! let image = image::RgbaImage::new(100, 100);
//! let png = encode_image(&image, &ExportOptions::png8())?;
//! ```

mod gif;
mod jpeg;
mod png;
mod quantize;

pub use self::gif::encode_gif;
pub use self::jpeg::encode_jpeg;
pub use self::png::encode_png;
pub use quantize::{reduce_palette, DEFAULT_COLOR_COUNT};

use crate::composite::flatten;
use image::{DynamicImage, RgbaImage};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use thiserror::Error;

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying encoder failed
    #[error("{format} encoding failed: {message}")]
    EncodingFailed {
        format: ExportFormat,
        message: String,
    },
}

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
    Gif,
}

impl ExportFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
            ExportFormat::Gif => "gif",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ExportFormat::Png => "PNG",
            ExportFormat::Jpeg => "JPEG",
            ExportFormat::Gif => "GIF",
        })
    }
}

/// Options for one export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// Quality 0-100. JPEG quality, or PNG compression effort.
    pub quality: u8,
    /// Reduce to an indexed-style palette before encoding.
    pub palette_reduction: bool,
    /// Accepted for compatibility; output is never interlaced.
    pub interlaced: bool,
    /// Keep the alpha channel. When false the image is flattened onto white.
    pub transparency: bool,
    /// Accepted for compatibility; no metadata is ever written.
    pub strip_metadata: bool,
    /// Gaussian blur sigma applied before encoding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blur: Option<f32>,
    /// Ordered dither strength in percent (0-100) for palette reduction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dither: Option<f32>,
    /// Palette size for palette reduction, default 256.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_count: Option<u16>,
    /// Lossiness 0-100; shrinks the palette proportionally.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lossy: Option<u8>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::png8()
    }
}

impl ExportOptions {
    /// Palette PNG with transparency at quality 40.
    pub fn png8() -> Self {
        Self {
            format: ExportFormat::Png,
            quality: 40,
            palette_reduction: true,
            interlaced: false,
            transparency: true,
            strip_metadata: true,
            blur: None,
            dither: None,
            color_count: None,
            lossy: None,
        }
    }

    /// Baseline JPEG at the given quality.
    pub fn jpeg(quality: u8) -> Self {
        Self {
            format: ExportFormat::Jpeg,
            quality,
            palette_reduction: false,
            interlaced: false,
            transparency: false,
            strip_metadata: false,
            blur: None,
            dither: None,
            color_count: None,
            lossy: None,
        }
    }

    /// Effective palette size after applying `lossy`.
    fn palette_size(&self) -> u16 {
        let base = self.color_count.unwrap_or(DEFAULT_COLOR_COUNT).clamp(2, 256) as f32;
        let keep = 1.0 - self.lossy.unwrap_or(0).min(100) as f32 / 100.0;
        (base * keep).round().max(2.0) as u16
    }
}

/// Encode `image` according to `options`.
///
/// Processing order: blur, flatten (JPEG or `transparency = false`),
/// palette reduction, encode.
pub fn encode_image(image: &RgbaImage, options: &ExportOptions) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    if options.interlaced {
        tracing::debug!("interlaced output is not supported, writing a non-interlaced image");
    }

    let mut working: Cow<'_, RgbaImage> = Cow::Borrowed(image);

    if let Some(sigma) = options.blur.filter(|s| *s > 0.0) {
        working = Cow::Owned(image::imageops::blur(&*working, sigma));
    }

    if !options.transparency || options.format == ExportFormat::Jpeg {
        working = Cow::Owned(flatten(&*working, [255, 255, 255]));
    }

    if options.palette_reduction || options.color_count.is_some() {
        let dither = options.dither.unwrap_or(0.0);
        reduce_palette(working.to_mut(), options.palette_size(), dither);
    }

    match options.format {
        ExportFormat::Png => encode_png(&*working, options.quality),
        ExportFormat::Gif => encode_gif(&*working),
        ExportFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(working.into_owned()).into_rgb8();
            encode_jpeg(rgb.as_raw(), width, height, options.quality)
        }
    }
}
