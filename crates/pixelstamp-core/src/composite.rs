//! Alpha compositing of one RGBA image over another.
//!
//! Uses the Porter-Duff "over" operator with an extra per-layer opacity,
//! which is how layers, watermark tiles and finished patterns are merged.

use image::{Rgba, RgbaImage};

/// Blend `source` over `target` with its top-left corner at `(x, y)`.
///
/// The offset may be negative or extend past the target; only the
/// overlapping region is touched.
pub fn overlay(target: &mut RgbaImage, source: &RgbaImage, x: i64, y: i64, opacity: f32) {
    if opacity <= 0.0 {
        return;
    }

    let target_width = target.width() as i64;
    let target_height = target.height() as i64;

    // Visible region, clamped to target bounds
    let x_start = x.max(0);
    let y_start = y.max(0);
    let x_end = (x + source.width() as i64).min(target_width);
    let y_end = (y + source.height() as i64).min(target_height);

    for ty in y_start..y_end {
        for tx in x_start..x_end {
            let src = *source.get_pixel((tx - x) as u32, (ty - y) as u32);
            if src[3] == 0 {
                continue;
            }
            let dst = target.get_pixel_mut(tx as u32, ty as u32);
            *dst = blend_pixels(*dst, src, opacity);
        }
    }
}

/// Flatten an image onto an opaque background color.
pub fn flatten(image: &RgbaImage, background: [u8; 3]) -> RgbaImage {
    let mut out = RgbaImage::from_pixel(
        image.width(),
        image.height(),
        Rgba([background[0], background[1], background[2], 255]),
    );
    overlay(&mut out, image, 0, 0, 1.0);
    out
}

/// Blend two pixels using alpha compositing with additional opacity.
///
/// `result = foreground + background * (1 - foreground.alpha)`
pub fn blend_pixels(background: Rgba<u8>, foreground: Rgba<u8>, opacity: f32) -> Rgba<u8> {
    let fg_alpha = (foreground[3] as f32 / 255.0) * opacity.clamp(0.0, 1.0);
    let bg_alpha = background[3] as f32 / 255.0;

    let out_alpha = fg_alpha + bg_alpha * (1.0 - fg_alpha);
    if out_alpha < 0.001 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend_channel = |fg: u8, bg: u8| -> u8 {
        let fg_f = fg as f32 / 255.0;
        let bg_f = bg as f32 / 255.0;
        let result = (fg_f * fg_alpha + bg_f * bg_alpha * (1.0 - fg_alpha)) / out_alpha;
        (result * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend_channel(foreground[0], background[0]),
        blend_channel(foreground[1], background[1]),
        blend_channel(foreground[2], background[2]),
        (out_alpha * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}
