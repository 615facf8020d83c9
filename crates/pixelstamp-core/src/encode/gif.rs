//! GIF encoding.

use super::{EncodeError, ExportFormat};
use image::codecs::gif::GifEncoder;
use image::{Frame, RgbaImage};

/// Encode an RGBA image as a single-frame GIF.
///
/// GIF holds at most 256 colors; the encoder quantizes whatever it is given.
pub fn encode_gif(image: &RgbaImage) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let mut buffer = Vec::new();
    {
        let mut encoder = GifEncoder::new(&mut buffer);
        encoder
            .encode_frame(Frame::new(image.clone()))
            .map_err(|e| EncodeError::EncodingFailed {
                format: ExportFormat::Gif,
                message: e.to_string(),
            })?;
    }
    Ok(buffer)
}
