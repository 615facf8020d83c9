//! Pixelstamp Core - geometric compositing and batch export engine
//!
//! This crate provides the pieces behind pixelstamp's batch flows:
//! layered documents and template loading, rectangle fitting, aspect-fill
//! resizing, tiled watermark patterns, encoding, and the row-by-row
//! pipeline driver that ties them together.

pub mod assets;
pub mod color;
pub mod composite;
pub mod config;
pub mod document;
pub mod encode;
pub mod geometry;
pub mod pipeline;
pub mod tiles;
pub mod transform;

pub use assets::{image_dimensions, AssetError, AssetSource, FsAssets, MemoryAssets};
pub use color::{parse_hex_color, ColorError, HexColor};
pub use config::{ConfigError, PipelineConfig};
pub use document::{Document, LayerKind, LayerNode, LayerPath, TextRenderer};
pub use encode::{encode_image, ExportFormat, ExportOptions};
pub use geometry::{aspect_fill, fit, AspectFill, GeometryError, Placement, Rect};
pub use pipeline::{
    run_batch, BatchReport, ExportSink, FileExporter, MemoryExporter, Pipeline, PipelineError,
};
pub use tiles::{coverage_extent, plan_tiles, rotation_offset, OffsetStrategy, TilePlan};
pub use transform::{aspect_fill_image, apply_crop, apply_rotation};
