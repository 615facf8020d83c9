//! Resize batch: aspect-fill an image to a fixed size for the web.

use super::{file_stem, run_batch, BatchReport, ExportSink, Pipeline, PipelineError};
use crate::assets::AssetSource;
use crate::transform::aspect_fill_image;
use std::path::{Path, PathBuf};

impl<A: AssetSource, S: ExportSink> Pipeline<'_, A, S> {
    /// Resize and center-crop `image_path` to exactly `width x height` and
    /// export it as `<stem>_web.<ext>` in `export_dir`.
    #[tracing::instrument(skip(self), fields(image = %image_path.display()))]
    pub fn resize(
        &mut self,
        image_path: &Path,
        export_dir: &Path,
        width: u32,
        height: u32,
    ) -> Result<BatchReport, PipelineError> {
        let options = self.config.resize_export.clone();
        let mut report = BatchReport::default();
        let images: [PathBuf; 1] = [image_path.to_path_buf()];

        run_batch(&images, self.cancel, |_, path| {
            let source = self.assets.load_image(path)?;
            let fitted = aspect_fill_image(&source, width, height)?;
            tracing::debug!(
                from = ?source.dimensions(),
                to = ?fitted.dimensions(),
                "aspect-filled image"
            );

            let output = export_dir.join(format!(
                "{}_web.{}",
                file_stem(path),
                options.format.extension()
            ));
            self.export(&fitted, output, &options, &mut report)
        })?;

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryAssets;
    use crate::config::PipelineConfig;
    use crate::encode::ExportFormat;
    use crate::pipeline::MemoryExporter;
    use image::RgbaImage;

    #[test]
    fn test_resize_exports_exact_size() {
        let mut assets = MemoryAssets::new();
        assets.insert("in/photo.png", RgbaImage::new(400, 200));
        let mut sink = MemoryExporter::new();

        let report = Pipeline::new(PipelineConfig::default(), &assets, &mut sink)
            .resize(Path::new("in/photo.png"), Path::new("web"), 100, 100)
            .unwrap();

        assert_eq!(report.outputs, vec![PathBuf::from("web/photo_web.jpg")]);
        let export = &sink.exports[0];
        assert_eq!(export.image.dimensions(), (100, 100));
        assert_eq!(export.options.format, ExportFormat::Jpeg);
        assert_eq!(export.options.quality, 60);
    }

    #[test]
    fn test_resize_missing_image() {
        let assets = MemoryAssets::new();
        let mut sink = MemoryExporter::new();

        let err = Pipeline::new(PipelineConfig::default(), &assets, &mut sink)
            .resize(Path::new("missing.png"), Path::new("web"), 100, 100)
            .unwrap_err();
        assert!(matches!(err, PipelineError::MissingAsset { .. }));
    }

    #[test]
    fn test_resize_zero_target_is_degenerate() {
        let mut assets = MemoryAssets::new();
        assets.insert("a.png", RgbaImage::new(10, 10));
        let mut sink = MemoryExporter::new();

        let err = Pipeline::new(PipelineConfig::default(), &assets, &mut sink)
            .resize(Path::new("a.png"), Path::new("web"), 0, 100)
            .unwrap_err();
        assert!(matches!(err, PipelineError::DegenerateGeometry { .. }));
    }
}
