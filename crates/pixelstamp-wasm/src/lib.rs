//! Pixelstamp WASM - WebAssembly bindings for pixelstamp
//!
//! Exposes the pure geometry of pixelstamp-core to a JavaScript host script
//! that drives its own layer document: the host asks where to put things,
//! then performs the moves itself.
//!
//! # Module Structure
//!
//! - `geometry` - Fit transform, aspect-fill sizing and hex color parsing
//! - `tiles` - Watermark tile grid planning
//! - `transform` - Aspect-fill resize and crop of RGBA pixels
//! - `types` - WASM-compatible wrapper for RGBA image data
//!
//! # Usage
//!
//! ```typescript
//! import init, { fit_rect, plan_watermark } from '@pixelstamp/wasm';
//!
//! await init();
//!
//! const placement = fit_rect(layer.bounds, slot.bounds);
//! layer.translate(placement.translation[0], placement.translation[1]);
//! layer.resize(placement.scale[0] * 100, placement.scale[1] * 100);
//! ```

use wasm_bindgen::prelude::*;

mod geometry;
mod tiles;
mod transform;
mod types;

pub use geometry::{aspect_fill_size, fit_rect, parse_color};
pub use tiles::{plan_watermark, watermark_extent};
pub use transform::{aspect_fill_resize, crop};
pub use types::JsRgbaImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::debug_1(&JsValue::from_str(&format!(
        "pixelstamp-wasm {} loaded",
        version()
    )));
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Build a JavaScript `Error` from a core error message.
pub(crate) fn js_error(message: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&message.to_string()).into()
}

/// Serialize a result record into a plain JavaScript object.
pub(crate) fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(js_error)
}
