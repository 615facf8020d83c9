//! PNG encoding for mockup and translation exports.

use super::{EncodeError, ExportFormat};
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use std::io::Cursor;

/// Map the 0-100 export quality onto zlib effort.
fn compression_for(quality: u8) -> CompressionType {
    match quality {
        0..=33 => CompressionType::Fast,
        34..=66 => CompressionType::Default,
        _ => CompressionType::Best,
    }
}

/// Encode an RGBA image to PNG bytes.
///
/// PNG is lossless, so `quality` only trades encode time for file size.
pub fn encode_png(image: &RgbaImage, quality: u8) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let mut buffer = Cursor::new(Vec::new());
    PngEncoder::new_with_quality(&mut buffer, compression_for(quality), FilterType::Adaptive)
        .write_image(image.as_raw(), width, height, ExtendedColorType::Rgba8)
        .map_err(|e| EncodeError::EncodingFailed {
            format: ExportFormat::Png,
            message: e.to_string(),
        })?;

    Ok(buffer.into_inner())
}
