//! Pipeline configuration.
//!
//! Every field has a default, so a configuration file only needs the
//! values it changes:
//!
//! ```json
//! {
//!   "tile_cap": null,
//!   "offset_strategy": "closed_form",
//!   "mockup_export": { "format": "gif" }
//! }
//! ```

use crate::encode::ExportOptions;
use crate::tiles::{OffsetStrategy, DEFAULT_TILE_CAP};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Settings shared by all batch flows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Layer the mockup design replaces.
    pub design_layer: String,
    /// Pixel layer the mockup fills with the row color.
    pub color_layer: String,
    /// Maximum watermark tiles; `null` disables the cap.
    pub tile_cap: Option<u64>,
    pub offset_strategy: OffsetStrategy,
    pub mockup_export: ExportOptions,
    pub translate_export: ExportOptions,
    pub resize_export: ExportOptions,
    pub watermark_export: ExportOptions,
    /// TrueType/OpenType font for text layers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_path: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            design_layer: "Place your design here".to_string(),
            color_layer: "Color".to_string(),
            tile_cap: Some(DEFAULT_TILE_CAP),
            offset_strategy: OffsetStrategy::default(),
            mockup_export: ExportOptions::png8(),
            translate_export: ExportOptions::png8(),
            resize_export: ExportOptions::jpeg(60),
            watermark_export: ExportOptions::jpeg(90),
            font_path: None,
        }
    }
}

impl PipelineConfig {
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
