//! Rotating the merged watermark pattern.
//!
//! Rotation expands the canvas to the rotated bounding box and fills it by
//! inverse mapping: each output pixel center is rotated back into the
//! source and sampled bilinearly. Anything that maps outside the source is
//! left transparent.
//!
//! With y pointing down, a clockwise rotation by θ maps an output offset
//! `(dx, dy)` from the center back to
//! ```text
//! sx =  dx·cos θ + dy·sin θ
//! sy = -dx·sin θ + dy·cos θ
//! ```

use image::{Rgba, RgbaImage};

/// Angles closer than this to a multiple of 90° snap to it.
const SNAP_DEGREES: f64 = 0.001;

/// Size of the box that holds a `width x height` image rotated by
/// `angle_degrees`.
pub fn compute_rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> (u32, u32) {
    let quarter = angle_degrees.rem_euclid(360.0) / 90.0;
    let nearest = quarter.round();
    if (quarter - nearest).abs() * 90.0 < SNAP_DEGREES {
        // Quarter turns swap the sides, half turns keep them
        return if nearest as u32 % 2 == 1 {
            (height, width)
        } else {
            (width, height)
        };
    }

    let (sin, cos) = angle_degrees.to_radians().sin_cos();
    let (sin, cos) = (sin.abs(), cos.abs());
    let (w, h) = (width as f64, height as f64);

    let rotated_w = (w * cos + h * sin).round() as u32;
    let rotated_h = (w * sin + h * cos).round() as u32;
    (rotated_w.max(1), rotated_h.max(1))
}

/// Rotate `image` clockwise by `angle_degrees` about its center.
///
/// The output is the rotated bounding box; corners not covered by the
/// source are transparent. Whole turns return a copy.
pub fn apply_rotation(image: &RgbaImage, angle_degrees: f64) -> RgbaImage {
    let turns = angle_degrees.rem_euclid(360.0);
    if turns < SNAP_DEGREES || 360.0 - turns < SNAP_DEGREES {
        return image.clone();
    }

    let (out_w, out_h) = compute_rotated_bounds(image.width(), image.height(), angle_degrees);
    let (sin, cos) = angle_degrees.to_radians().sin_cos();
    let src_center = (image.width() as f64 / 2.0, image.height() as f64 / 2.0);
    let out_center = (out_w as f64 / 2.0, out_h as f64 / 2.0);

    RgbaImage::from_fn(out_w, out_h, |x, y| {
        let dx = x as f64 + 0.5 - out_center.0;
        let dy = y as f64 + 0.5 - out_center.1;
        let sx = dx * cos + dy * sin + src_center.0 - 0.5;
        let sy = -dx * sin + dy * cos + src_center.1 - 0.5;
        sample_bilinear(image, sx, sy)
    })
}

/// Bilinear sample at pixel-center coordinates `(x, y)`.
///
/// Up to half a pixel past the edge clamps to the edge; beyond that the
/// sample is transparent.
fn sample_bilinear(image: &RgbaImage, x: f64, y: f64) -> Rgba<u8> {
    let (width, height) = image.dimensions();
    let (w, h) = (width as f64, height as f64);
    if width == 0 || height == 0 || x < -0.5 || y < -0.5 || x > w - 0.5 || y > h - 0.5 {
        return Rgba([0, 0, 0, 0]);
    }

    let x = x.clamp(0.0, w - 1.0);
    let y = y.clamp(0.0, h - 1.0);
    let (x0, y0) = (x.floor() as u32, y.floor() as u32);
    let (x1, y1) = ((x0 + 1).min(width - 1), (y0 + 1).min(height - 1));
    let (fx, fy) = (x - x0 as f64, y - y0 as f64);

    let corners = [
        (image.get_pixel(x0, y0), (1.0 - fx) * (1.0 - fy)),
        (image.get_pixel(x1, y0), fx * (1.0 - fy)),
        (image.get_pixel(x0, y1), (1.0 - fx) * fy),
        (image.get_pixel(x1, y1), fx * fy),
    ];
    let mut out = [0u8; 4];
    for (channel, value) in out.iter_mut().enumerate() {
        let sum: f64 = corners
            .iter()
            .map(|(pixel, weight)| pixel[channel] as f64 * weight)
            .sum();
        *value = sum.round().clamp(0.0, 255.0) as u8;
    }
    Rgba(out)
}
