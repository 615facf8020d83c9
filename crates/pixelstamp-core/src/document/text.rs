//! Rasterizing text layers.
//!
//! Text layers are drawn with a single font supplied at runtime. Each line
//! starts at the left edge of the layer bounds; glyphs falling outside the
//! bounds are clipped.

use super::TextStyle;
use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::composite::blend_pixels;

/// Errors raised while loading a font.
#[derive(Debug, Error)]
pub enum FontError {
    #[error("Failed to read font {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Not a usable TrueType/OpenType font: {0}")]
    Invalid(String),
}

/// Draws text layers with one font.
pub struct TextRenderer {
    font: FontVec,
}

impl std::fmt::Debug for TextRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRenderer")
            .field("glyphs", &self.font.glyph_count())
            .finish()
    }
}

impl TextRenderer {
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, FontError> {
        let font = FontVec::try_from_vec(data).map_err(|e| FontError::Invalid(e.to_string()))?;
        Ok(Self { font })
    }

    pub fn from_file(path: &Path) -> Result<Self, FontError> {
        let data = std::fs::read(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let renderer = Self::from_bytes(data)?;
        tracing::debug!(path = %path.display(), "loaded font");
        Ok(renderer)
    }

    /// Render `contents` into a transparent `width x height` raster.
    ///
    /// `\n`, `\r` and `\r\n` each start a new line.
    pub fn render(&self, contents: &str, style: &TextStyle, width: u32, height: u32) -> RgbaImage {
        let mut image = RgbaImage::new(width.max(1), height.max(1));
        let scale = PxScale::from(style.font_size.max(1.0));
        let scaled = self.font.as_scaled(scale);
        let line_height = scaled.height() + scaled.line_gap();
        let [r, g, b] = style.color.to_rgb();

        let normalized = contents.replace("\r\n", "\n");
        for (line_index, line) in normalized.split(['\n', '\r']).enumerate() {
            let baseline = scaled.ascent() + line_index as f32 * line_height;
            if baseline - scaled.ascent() >= image.height() as f32 {
                break;
            }

            let mut cursor_x = 0.0f32;
            let mut previous = None;
            for c in line.chars() {
                let glyph_id = scaled.glyph_id(c);
                if let Some(prev) = previous {
                    cursor_x += scaled.kern(prev, glyph_id);
                }

                let glyph =
                    glyph_id.with_scale_and_position(scale, ab_glyph::point(cursor_x, baseline));
                if let Some(outlined) = self.font.outline_glyph(glyph) {
                    let bounds = outlined.px_bounds();
                    outlined.draw(|px, py, coverage| {
                        let x = px as i64 + bounds.min.x as i64;
                        let y = py as i64 + bounds.min.y as i64;
                        if x < 0 || y < 0 || x >= image.width() as i64 || y >= image.height() as i64
                        {
                            return;
                        }
                        let alpha = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
                        let pixel = image.get_pixel_mut(x as u32, y as u32);
                        *pixel = blend_pixels(*pixel, Rgba([r, g, b, alpha]), 1.0);
                    });
                }

                cursor_x += scaled.h_advance(glyph_id);
                previous = Some(glyph_id);
            }
        }

        image
    }
}

/// Renderer over the bundled test font.
#[cfg(test)]
pub(crate) fn test_renderer() -> TextRenderer {
    const FONT: &[u8] = include_bytes!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/DejaVuSansMono.ttf"
    ));
    TextRenderer::from_bytes(FONT.to_vec()).unwrap()
}
