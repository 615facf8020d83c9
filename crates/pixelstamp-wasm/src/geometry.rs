//! Geometry bindings: fit, aspect-fill sizing and hex colors.
//!
//! Results come back as plain objects so the host script can apply them
//! to its own layers.

use crate::types::JsBounds;
use crate::{js_error, to_js};
use pixelstamp_core::color::parse_hex_color;
use pixelstamp_core::geometry::{aspect_fill, fit, AspectFill, Placement, Rect};
use wasm_bindgen::prelude::*;

/// Compute the translation and per-axis scale that centers `moving` on
/// `reference` and stretches it to the same size.
///
/// Both arguments are `{ left, top, right, bottom }` objects. Returns
/// `{ translation: [dx, dy], scale: [sx, sy] }`. Apply the translation
/// first, then scale about the moved layer's center.
///
/// # Errors
///
/// Fails when `moving` has zero width or height.
#[wasm_bindgen]
pub fn fit_rect(moving: JsValue, reference: JsValue) -> Result<JsValue, JsValue> {
    let moving: JsBounds = serde_wasm_bindgen::from_value(moving)
        .map_err(|e| js_error(format!("Invalid moving bounds: {e}")))?;
    let reference: JsBounds = serde_wasm_bindgen::from_value(reference)
        .map_err(|e| js_error(format!("Invalid reference bounds: {e}")))?;

    let placement = fit_bounds(moving, reference).map_err(js_error)?;
    to_js(&placement)
}

fn fit_bounds(moving: JsBounds, reference: JsBounds) -> Result<Placement, String> {
    fit(&Rect::from(moving), &Rect::from(reference)).map_err(|e| e.to_string())
}

/// Compute how to resize and crop a `source_width x source_height` image
/// so it fills `target_width x target_height` exactly.
///
/// Returns `{ resize_width, resize_height, crop: { left, top, right, bottom } }`.
#[wasm_bindgen]
pub fn aspect_fill_size(
    source_width: u32,
    source_height: u32,
    target_width: u32,
    target_height: u32,
) -> Result<JsValue, JsValue> {
    let fill = fill_for(source_width, source_height, target_width, target_height)
        .map_err(js_error)?;
    to_js(&fill)
}

fn fill_for(
    source_width: u32,
    source_height: u32,
    target_width: u32,
    target_height: u32,
) -> Result<AspectFill, String> {
    let source = Rect::from_size(source_width as f64, source_height as f64);
    aspect_fill(&source, target_width, target_height).map_err(|e| e.to_string())
}

/// Parse a 6-digit hex color (optional leading `#`) into `[r, g, b]`.
#[wasm_bindgen]
pub fn parse_color(value: &str) -> Result<Vec<u8>, JsValue> {
    color_channels(value).map_err(js_error)
}

fn color_channels(value: &str) -> Result<Vec<u8>, String> {
    parse_hex_color(value)
        .map(|color| color.to_rgb().to_vec())
        .map_err(|e| e.to_string())
}


/// Tests that go through `JsValue`; run with `wasm-pack test`.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn js_rect(left: f64, top: f64, right: f64, bottom: f64) -> JsValue {
        serde_wasm_bindgen::to_value(&Rect::new(left, top, right, bottom)).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_fit_rect_returns_placement_object() {
        let result = fit_rect(js_rect(0.0, 0.0, 50.0, 40.0), js_rect(0.0, 0.0, 200.0, 200.0)).unwrap();
        let placement: Placement = serde_wasm_bindgen::from_value(result).unwrap();

        assert_eq!(placement.translation, (75.0, 80.0));
        assert_eq!(placement.scale, (4.0, 5.0));
    }

    #[wasm_bindgen_test]
    fn test_fit_rect_rejects_bad_input() {
        assert!(fit_rect(JsValue::from_str("nope"), js_rect(0.0, 0.0, 1.0, 1.0)).is_err());
        assert!(fit_rect(js_rect(0.0, 0.0, 0.0, 10.0), js_rect(0.0, 0.0, 1.0, 1.0)).is_err());
    }

    #[wasm_bindgen_test]
    fn test_aspect_fill_size_object() {
        let fill: AspectFill =
            serde_wasm_bindgen::from_value(aspect_fill_size(400, 200, 100, 100).unwrap()).unwrap();
        assert_eq!((fill.resize_width, fill.resize_height), (200, 100));
    }

    #[wasm_bindgen_test]
    fn test_parse_color_error_is_js_error() {
        let err = parse_color("xyz").unwrap_err();
        assert!(err.is_instance_of::<js_sys::Error>());
    }
}
