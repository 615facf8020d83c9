//! Watermark batch: tile a rotated watermark pattern over each image.

use super::{file_stem, run_batch, BatchReport, ExportSink, Pipeline, PipelineError};
use crate::assets::AssetSource;
use crate::tiles::{coverage_extent, plan_tiles, render_pattern, stamp_pattern, TileRequest};
use crate::transform::resize_exact;
use std::path::PathBuf;

/// Parameters of a watermark run.
#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkRequest {
    pub images: Vec<PathBuf>,
    pub watermark: PathBuf,
    pub output_dir: PathBuf,
    /// Pattern rotation in degrees, positive = clockwise.
    pub rotation_degrees: f64,
    /// Tile opacity in `[0, 1]`.
    pub opacity: f32,
    /// Diagonal of the largest image the pattern has to cover.
    pub diagonal: f64,
    pub tile_width: u32,
    pub tile_height: u32,
}

/// Split a comma-separated list of image paths, trimming whitespace and
/// skipping empty entries.
pub fn parse_image_list(list: &str) -> Vec<PathBuf> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(PathBuf::from)
        .collect()
}

impl<A: AssetSource, S: ExportSink> Pipeline<'_, A, S> {
    /// Stamp the watermark pattern on every image in `request.images`.
    ///
    /// The tile plan is checked against the tile cap before anything is
    /// loaded or composited. The pattern is built once and reused.
    #[tracing::instrument(skip_all, fields(images = request.images.len(), rotation = request.rotation_degrees))]
    pub fn watermark(&mut self, request: &WatermarkRequest) -> Result<BatchReport, PipelineError> {
        let tile_request = TileRequest {
            tile_width: request.tile_width,
            tile_height: request.tile_height,
            canvas_extent: coverage_extent(request.diagonal),
            rotation_degrees: request.rotation_degrees,
            opacity: request.opacity,
        };
        let plan = plan_tiles(&tile_request, self.config.tile_cap, self.config.offset_strategy)?;
        tracing::info!(
            tiles_per_side = plan.grid.tiles_per_side,
            extent = plan.grid.canvas_extent,
            offset = plan.offset,
            "planned watermark pattern"
        );

        let mut tile = self.assets.load_image(&request.watermark)?;
        if tile.dimensions() != (request.tile_width, request.tile_height) {
            tracing::debug!(
                from = ?tile.dimensions(),
                to = ?(request.tile_width, request.tile_height),
                "resizing watermark to tile size"
            );
            tile = resize_exact(&tile, request.tile_width, request.tile_height)?;
        }
        let pattern = render_pattern(&tile, &plan);
        drop(tile);

        let options = self.config.watermark_export.clone();
        let mut report = BatchReport::default();

        run_batch(&request.images, self.cancel, |_, path| {
            let mut image = self.assets.load_image(path)?;
            let (width, height) = image.dimensions();
            if !plan.covers(width as f64, height as f64) {
                tracing::warn!(
                    image = %path.display(),
                    width,
                    height,
                    diagonal = request.diagonal,
                    "watermark pattern does not fully cover the image"
                );
            }

            stamp_pattern(&mut image, &pattern, plan.offset);

            let output = request.output_dir.join(format!(
                "{}_watermarked.{}",
                file_stem(path),
                options.format.extension()
            ));
            self.export(&image, output, &options, &mut report)
        })?;

        Ok(report)
    }
}
