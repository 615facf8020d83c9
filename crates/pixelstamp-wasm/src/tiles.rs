//! Watermark tile planning bindings.

use crate::{js_error, to_js};
use pixelstamp_core::tiles::{
    coverage_extent, plan_tiles, OffsetStrategy, TilePlan, TileRequest, DEFAULT_TILE_CAP,
};
use std::f64::consts::SQRT_2;
use wasm_bindgen::prelude::*;

/// Side of the square pattern needed to cover an image with the given
/// diagonal at any rotation.
#[wasm_bindgen]
pub fn watermark_extent(diagonal: f64) -> f64 {
    coverage_extent(diagonal)
}

/// Plan the tile grid for a watermark pattern.
///
/// # Arguments
///
/// * `tile_width`, `tile_height` - Tile size in pixels
/// * `diagonal` - Diagonal of the largest image to cover
/// * `rotation_degrees` - Pattern rotation, positive = clockwise
/// * `opacity` - Tile opacity (0.0 to 1.0)
/// * `tile_cap` - Maximum tile count; `undefined` uses the default of 10000,
///   `0` disables the cap
/// * `closed_form_offset` - Shift the rotated pattern by the closed-form
///   offset instead of keeping it centered
///
/// Returns `{ grid, rotation_degrees, placements: [{ x, y, opacity }], offset }`
/// with placements relative to the pattern center.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const plan = plan_watermark(200, 100, 1500, 45, 0.4, undefined, false);
/// for (const p of plan.placements) {
///   duplicateTile(p.x + center, p.y + center, p.opacity);
/// }
/// ```
#[wasm_bindgen]
pub fn plan_watermark(
    tile_width: u32,
    tile_height: u32,
    diagonal: f64,
    rotation_degrees: f64,
    opacity: f32,
    tile_cap: Option<u32>,
    closed_form_offset: bool,
) -> Result<JsValue, JsValue> {
    let plan = plan_for(
        tile_width,
        tile_height,
        diagonal,
        rotation_degrees,
        opacity,
        tile_cap,
        closed_form_offset,
    )
    .map_err(js_error)?;

    let side = diagonal / SQRT_2;
    if !plan.covers(side, side) {
        web_sys::console::warn_1(&JsValue::from_str(
            "pattern offset leaves part of the target uncovered",
        ));
    }
    to_js(&plan)
}

fn plan_for(
    tile_width: u32,
    tile_height: u32,
    diagonal: f64,
    rotation_degrees: f64,
    opacity: f32,
    tile_cap: Option<u32>,
    closed_form_offset: bool,
) -> Result<TilePlan, String> {
    let request = TileRequest {
        tile_width,
        tile_height,
        canvas_extent: coverage_extent(diagonal),
        rotation_degrees,
        opacity,
    };
    let cap = match tile_cap {
        None => Some(DEFAULT_TILE_CAP),
        Some(0) => None,
        Some(cap) => Some(cap as u64),
    };
    let strategy = if closed_form_offset {
        OffsetStrategy::ClosedForm
    } else {
        OffsetStrategy::Centered
    };

    plan_tiles(&request, cap, strategy).map_err(|e| e.to_string())
}
