//! Batch flows: mockup, resize, watermark and translate.
//!
//! Every flow follows the same shape: resolve inputs, then walk the rows
//! strictly in order, exporting one file per row through an
//! [`ExportSink`]. The first failing row aborts the whole run.
//!
//! # Cancellation
//!
//! A [`Pipeline`] may carry a shared flag. It is checked between rows, so a
//! row that has started always finishes (or fails) before the run stops
//! with [`PipelineError::Cancelled`].

mod mockup;
mod resize;
mod table;
mod translate;
mod watermark;

pub use mockup::MockupReport;
pub use table::{MockupRow, Table, TableError, TranslationRow, TranslationTable};
pub use watermark::{parse_image_list, WatermarkRequest};

use crate::assets::{AssetError, AssetSource};
use crate::color::ColorError;
use crate::config::PipelineConfig;
use crate::document::{Document, LayerKind, LayerPath, TemplateError, TextRenderer};
use crate::encode::{encode_image, EncodeError, ExportOptions};
use crate::geometry::GeometryError;
use crate::tiles::TileError;
use image::RgbaImage;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// Errors that abort a batch run.
///
/// `row` is the 1-based data row being processed, `None` when the failure
/// happened before the first row.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{}Layer \"{name}\" was not found", row_prefix(.row))]
    LayerNotFound { row: Option<usize>, name: String },

    #[error("{}Layer \"{name}\" is a {found} layer, expected a {expected} layer", row_prefix(.row))]
    WrongLayerKind {
        row: Option<usize>,
        name: String,
        expected: LayerKind,
        found: LayerKind,
    },

    #[error("{}{source}", row_prefix(.row))]
    InvalidColorFormat {
        row: Option<usize>,
        source: ColorError,
    },

    #[error("{}{source}", row_prefix(.row))]
    DegenerateGeometry {
        row: Option<usize>,
        source: GeometryError,
    },

    #[error(
        "Too many watermark tiles: {tiles_per_side}² = {tile_count} exceeds the cap of {cap}"
    )]
    TooManyTiles {
        tiles_per_side: u64,
        tile_count: u64,
        cap: u64,
    },

    #[error("{}Language \"{language}\" cannot be used in a file name", row_prefix(.row))]
    InvalidLanguage { row: Option<usize>, language: String },

    #[error("No font configured to draw text layer \"{layer}\"")]
    MissingFont { layer: String },

    #[error("{}Image not found: {}", row_prefix(.row), .path.display())]
    MissingAsset { row: Option<usize>, path: PathBuf },

    #[error(transparent)]
    MalformedTable(#[from] TableError),

    #[error("{}Failed to decode {}: {message}", row_prefix(.row), .path.display())]
    Decode {
        row: Option<usize>,
        path: PathBuf,
        message: String,
    },

    #[error("Failed to encode {}: {source}", .path.display())]
    Encode { path: PathBuf, source: EncodeError },

    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("Cancelled after {completed} row(s)")]
    Cancelled { completed: usize },
}

fn row_prefix(row: &Option<usize>) -> String {
    row.map(|row| format!("Row {row}: ")).unwrap_or_default()
}

impl PipelineError {
    /// Attach a row number if none is set yet.
    pub fn with_row(mut self, index: usize) -> Self {
        match &mut self {
            PipelineError::LayerNotFound { row, .. }
            | PipelineError::WrongLayerKind { row, .. }
            | PipelineError::InvalidColorFormat { row, .. }
            | PipelineError::DegenerateGeometry { row, .. }
            | PipelineError::MissingAsset { row, .. }
            | PipelineError::Decode { row, .. }
            | PipelineError::InvalidLanguage { row, .. } => {
                row.get_or_insert(index);
            }
            _ => {}
        }
        self
    }

    /// Row the error is attributed to, if any.
    pub fn row(&self) -> Option<usize> {
        match self {
            PipelineError::LayerNotFound { row, .. }
            | PipelineError::WrongLayerKind { row, .. }
            | PipelineError::InvalidColorFormat { row, .. }
            | PipelineError::DegenerateGeometry { row, .. }
            | PipelineError::MissingAsset { row, .. }
            | PipelineError::Decode { row, .. }
            | PipelineError::InvalidLanguage { row, .. } => *row,
            _ => None,
        }
    }
}

impl From<AssetError> for PipelineError {
    fn from(err: AssetError) -> Self {
        match err {
            AssetError::Missing { path } => PipelineError::MissingAsset { row: None, path },
            AssetError::Decode { path, message } => PipelineError::Decode {
                row: None,
                path,
                message,
            },
        }
    }
}

impl From<ColorError> for PipelineError {
    fn from(source: ColorError) -> Self {
        PipelineError::InvalidColorFormat { row: None, source }
    }
}

impl From<GeometryError> for PipelineError {
    fn from(source: GeometryError) -> Self {
        PipelineError::DegenerateGeometry { row: None, source }
    }
}

impl From<TileError> for PipelineError {
    fn from(err: TileError) -> Self {
        match err {
            TileError::TooManyTiles {
                tiles_per_side,
                tile_count,
                cap,
            } => PipelineError::TooManyTiles {
                tiles_per_side,
                tile_count,
                cap,
            },
            TileError::Degenerate(source) => source.into(),
        }
    }
}

/// Receives finished images.
pub trait ExportSink {
    /// Encode and store `image` at `path`.
    fn export(
        &mut self,
        image: &RgbaImage,
        path: &Path,
        options: &ExportOptions,
    ) -> Result<(), PipelineError>;
}

/// Writes exports to the filesystem, creating directories as needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileExporter;

impl ExportSink for FileExporter {
    fn export(
        &mut self,
        image: &RgbaImage,
        path: &Path,
        options: &ExportOptions,
    ) -> Result<(), PipelineError> {
        let bytes = encode_image(image, options).map_err(|source| PipelineError::Encode {
            path: path.to_path_buf(),
            source,
        })?;

        let io_error = |source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        std::fs::write(path, &bytes).map_err(io_error)?;

        tracing::debug!(path = %path.display(), bytes = bytes.len(), format = %options.format, "wrote file");
        Ok(())
    }
}

/// One export captured by [`MemoryExporter`].
#[derive(Debug, Clone)]
pub struct CapturedExport {
    pub path: PathBuf,
    pub image: RgbaImage,
    pub options: ExportOptions,
}

/// Keeps exports in memory instead of encoding them.
#[derive(Debug, Clone, Default)]
pub struct MemoryExporter {
    pub exports: Vec<CapturedExport>,
}

impl MemoryExporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ExportSink for MemoryExporter {
    fn export(
        &mut self,
        image: &RgbaImage,
        path: &Path,
        options: &ExportOptions,
    ) -> Result<(), PipelineError> {
        self.exports.push(CapturedExport {
            path: path.to_path_buf(),
            image: image.clone(),
            options: options.clone(),
        });
        Ok(())
    }
}

/// Files written by a run, in row order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub outputs: Vec<PathBuf>,
}

/// Run `per_row` over `rows` in order, stopping at the first error.
///
/// `per_row` receives the 1-based row number. Errors without a row get
/// this one attached. Returns the number of completed rows.
pub fn run_batch<R>(
    rows: &[R],
    cancel: Option<&AtomicBool>,
    mut per_row: impl FnMut(usize, &R) -> Result<(), PipelineError>,
) -> Result<usize, PipelineError> {
    for (index, row) in rows.iter().enumerate() {
        if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            tracing::warn!(completed = index, remaining = rows.len() - index, "batch cancelled");
            return Err(PipelineError::Cancelled { completed: index });
        }
        per_row(index + 1, row).map_err(|err| err.with_row(index + 1))?;
    }
    Ok(rows.len())
}

/// Runs batch flows against an asset source and an export sink.
pub struct Pipeline<'a, A: AssetSource, S: ExportSink> {
    config: PipelineConfig,
    assets: &'a A,
    sink: &'a mut S,
    cancel: Option<&'a AtomicBool>,
    text: Option<&'a TextRenderer>,
}

impl<'a, A: AssetSource, S: ExportSink> Pipeline<'a, A, S> {
    pub fn new(config: PipelineConfig, assets: &'a A, sink: &'a mut S) -> Self {
        Self {
            config,
            assets,
            sink,
            cancel: None,
            text: None,
        }
    }

    /// Stop between rows once `flag` is set.
    pub fn with_cancel_flag(mut self, flag: &'a AtomicBool) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Draw text layers with `renderer`.
    pub fn with_text_renderer(mut self, renderer: &'a TextRenderer) -> Self {
        self.text = Some(renderer);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn export(
        &mut self,
        image: &RgbaImage,
        path: PathBuf,
        options: &ExportOptions,
        report: &mut BatchReport,
    ) -> Result<(), PipelineError> {
        self.sink.export(image, &path, options)?;
        tracing::info!(path = %path.display(), "exported");
        report.outputs.push(path);
        Ok(())
    }
}

/// File name stem of `path`, or `"image"` when it has none.
fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string())
}

/// Check that the layer named `name` exists and has kind `expected`.
fn require_kind(
    document: &Document,
    name: &str,
    expected: LayerKind,
) -> Result<LayerPath, PipelineError> {
    let path = document
        .locate(name)
        .ok_or_else(|| PipelineError::LayerNotFound {
            row: None,
            name: name.to_string(),
        })?;
    let found = document
        .node(&path)
        .map(|node| node.kind())
        .ok_or_else(|| PipelineError::LayerNotFound {
            row: None,
            name: name.to_string(),
        })?;
    if found != expected {
        return Err(PipelineError::WrongLayerKind {
            row: None,
            name: name.to_string(),
            expected,
            found,
        });
    }
    Ok(path)
}
