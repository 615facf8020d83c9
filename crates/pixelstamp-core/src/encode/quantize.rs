//! Palette reduction for PNG-8 style exports.
//!
//! Colors are snapped to a uniform grid of `levels` values per channel,
//! with `levels³ ≤ color_count`. An ordered (Bayer 4x4) dither spreads the
//! rounding error to hide banding. Alpha becomes binary, as in an indexed
//! PNG with a single transparent entry.

use image::RgbaImage;

/// Palette size when none is requested.
pub const DEFAULT_COLOR_COUNT: u16 = 256;

const BAYER_4X4: [[u8; 4]; 4] = [[0, 8, 2, 10], [12, 4, 14, 6], [3, 11, 1, 9], [15, 7, 13, 5]];

/// Largest per-channel level count whose cube fits in `color_count`.
fn levels_for(color_count: u16) -> u32 {
    let mut levels = 2u32;
    while (levels + 1).pow(3) <= color_count as u32 {
        levels += 1;
    }
    levels
}

/// Reduce `image` in place to at most `color_count` opaque colors.
///
/// `dither_percent` (0-100) scales the ordered dither; 0 disables it.
pub fn reduce_palette(image: &mut RgbaImage, color_count: u16, dither_percent: f32) {
    let levels = levels_for(color_count.max(8));
    let step = 255.0 / (levels - 1) as f32;
    let strength = dither_percent.clamp(0.0, 100.0) / 100.0;

    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let threshold = BAYER_4X4[(y % 4) as usize][(x % 4) as usize] as f32;
        // Centered in (-0.5, 0.5) steps
        let bias = (threshold + 0.5) / 16.0 - 0.5;
        let jitter = bias * step * strength;

        for channel in 0..3 {
            let value = pixel[channel] as f32 + jitter;
            let snapped = (value / step).round().clamp(0.0, (levels - 1) as f32) * step;
            pixel[channel] = snapped.round() as u8;
        }
        pixel[3] = if pixel[3] >= 128 { 255 } else { 0 };
    }
}
