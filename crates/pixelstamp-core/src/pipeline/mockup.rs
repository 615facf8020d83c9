//! Mockup batch: recolor the product and drop a design into its slot.
//!
//! For each row:
//! 1. Fill the color layer with the row's hex color
//! 2. Load the design image, paste it centered on the canvas
//! 3. Center and stretch it onto the design slot's bounds
//! 4. Put it in the slot layer (keeping the slot's name, opacity and visibility)
//! 5. Render and export `<design stem>.<ext>`

use super::{
    file_stem, require_kind, run_batch, BatchReport, ExportSink, MockupRow, Pipeline, PipelineError,
};
use crate::assets::AssetSource;
use crate::color::parse_hex_color;
use crate::document::{Document, LayerContent, LayerKind, LayerNode};
use crate::geometry::{fit, Placement, Rect};
use std::path::Path;

/// Result of a mockup run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MockupReport {
    pub batch: BatchReport,
    /// Placement applied to each row's design, in row order.
    pub placements: Vec<Placement>,
}

impl<A: AssetSource, S: ExportSink> Pipeline<'_, A, S> {
    /// Produce one mockup per row.
    ///
    /// Design files are looked up in `images_dir`; exports go to `output_dir`.
    #[tracing::instrument(skip_all, fields(document = %document.name, rows = rows.len()))]
    pub fn mockup(
        &mut self,
        document: &mut Document,
        images_dir: &Path,
        output_dir: &Path,
        rows: &[MockupRow],
    ) -> Result<MockupReport, PipelineError> {
        let color_layer = self.config.color_layer.clone();
        let design_layer = self.config.design_layer.clone();
        let options = self.config.mockup_export.clone();
        let mut report = MockupReport::default();

        run_batch(rows, self.cancel, |row, entry| {
            let color = parse_hex_color(&entry.color)?;

            let color_path = require_kind(document, &color_layer, LayerKind::Pixel)?;
            let canvas = document.canvas_rect();
            if let Some(layer) = document.node_mut(&color_path) {
                layer.fill(color, canvas);
            }

            let slot_path = require_kind(document, &design_layer, LayerKind::Pixel)?;
            let slot_bounds = document
                .node(&slot_path)
                .map(LayerNode::bounds)
                .ok_or_else(|| PipelineError::LayerNotFound {
                    row: None,
                    name: design_layer.clone(),
                })?;

            let design_path = images_dir.join(&entry.design);
            let design = self.assets.load_image(&design_path)?;

            // Pasting centers the image on the canvas at its native size
            let (cx, cy) = canvas.center();
            let pasted = Rect::centered_at(cx, cy, design.width() as f64, design.height() as f64);
            let placement = fit(&pasted, &slot_bounds)?;
            let placed = placement.apply(&pasted);
            tracing::debug!(row, ?placement, ?placed, "placed design");

            if let Some(slot) = document.node_mut(&slot_path) {
                slot.content = LayerContent::Pixel(design);
                slot.set_bounds(placed);
            }

            let rendered = document.render(self.text);
            let output = output_dir.join(format!(
                "{}.{}",
                file_stem(Path::new(&entry.design)),
                options.format.extension()
            ));
            self.export(&rendered, output, &options, &mut report.batch)?;
            report.placements.push(placement);
            Ok(())
        })?;

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryAssets;
    use crate::color::HexColor;
    use crate::config::PipelineConfig;
    use crate::document::TextStyle;
    use crate::pipeline::MemoryExporter;
    use image::{Rgba, RgbaImage};

    fn template() -> Document {
        Document::new("shirt", 400, 300).with_layers(vec![
            LayerNode::group(
                "Front",
                vec![LayerNode::pixel(
                    "Place your design here",
                    RgbaImage::new(1, 1),
                    Rect::new(100.0, 50.0, 300.0, 250.0),
                )],
            ),
            LayerNode::solid("Color", HexColor::WHITE, Rect::from_size(400.0, 300.0)),
        ])
    }

    fn assets() -> MemoryAssets {
        let mut assets = MemoryAssets::new();
        assets.insert("designs/logo.png", RgbaImage::from_pixel(50, 25, Rgba([0, 0, 255, 255])));
        assets
    }

    fn row(design: &str, color: &str) -> MockupRow {
        MockupRow {
            design: design.into(),
            color: color.into(),
        }
    }

    #[test]
    fn test_mockup_places_design_and_fills_color() {
        let assets = assets();
        let mut sink = MemoryExporter::new();
        let mut doc = template();

        let report = Pipeline::new(PipelineConfig::default(), &assets, &mut sink)
            .mockup(&mut doc, Path::new("designs"), Path::new("out"), &[row("logo.png", "#FF0000")])
            .unwrap();

        assert_eq!(report.batch.outputs, vec![Path::new("out/logo.png").to_path_buf()]);
        assert_eq!(report.placements[0].scale, (4.0, 8.0));

        let slot = doc.find("Place your design here").unwrap();
        assert!(slot.bounds().approx_eq(&Rect::new(100.0, 50.0, 300.0, 250.0), 1e-9));
        match &slot.content {
            LayerContent::Pixel(raster) => assert_eq!(raster.dimensions(), (50, 25)),
            _ => panic!("design layer should be a pixel layer"),
        }

        let image = &sink.exports[0].image;
        assert_eq!(image.get_pixel(10, 10).0, [255, 0, 0, 255]);
        let center = image.get_pixel(200, 150);
        assert!(center[0] < 5 && center[2] > 250, "{center:?}");
    }

    #[test]
    fn test_bad_color_reports_row() {
        let assets = assets();
        let mut sink = MemoryExporter::new();
        let rows = [row("logo.png", "FF0000"), row("logo.png", "F00")];

        let err = Pipeline::new(PipelineConfig::default(), &assets, &mut sink)
            .mockup(&mut template(), Path::new("designs"), Path::new("out"), &rows)
            .unwrap_err();

        assert!(matches!(err, PipelineError::InvalidColorFormat { row: Some(2), .. }));
        assert_eq!(sink.exports.len(), 1);
    }

    #[test]
    fn test_missing_design_aborts() {
        let assets = assets();
        let mut sink = MemoryExporter::new();

        let err = Pipeline::new(PipelineConfig::default(), &assets, &mut sink)
            .mockup(&mut template(), Path::new("designs"), Path::new("out"), &[row("nope.png", "FF0000")])
            .unwrap_err();

        assert!(matches!(err, PipelineError::MissingAsset { row: Some(1), .. }));
        assert!(sink.exports.is_empty());
    }

    #[test]
    fn test_color_layer_must_be_pixel() {
        let assets = assets();
        let mut sink = MemoryExporter::new();
        let mut doc = template();
        doc.layers[1] = LayerNode::text("Color", "x", TextStyle::default(), Rect::from_size(1.0, 1.0));

        let err = Pipeline::new(PipelineConfig::default(), &assets, &mut sink)
            .mockup(&mut doc, Path::new("designs"), Path::new("out"), &[row("logo.png", "FF0000")])
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::WrongLayerKind {
                row: Some(1),
                expected: LayerKind::Pixel,
                found: LayerKind::Text,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_slot_layer() {
        let assets = assets();
        let mut sink = MemoryExporter::new();
        let config = PipelineConfig {
            design_layer: "Slot".into(),
            ..PipelineConfig::default()
        };

        let err = Pipeline::new(config, &assets, &mut sink)
            .mockup(&mut template(), Path::new("designs"), Path::new("out"), &[row("logo.png", "FF0000")])
            .unwrap_err();

        assert!(matches!(err, PipelineError::LayerNotFound { ref name, .. } if name == "Slot"));
    }

    #[test]
    fn test_zero_area_slot_is_degenerate() {
        let assets = assets();
        let mut sink = MemoryExporter::new();
        let mut doc = template();
        doc.layers[0] = LayerNode::pixel(
            "Place your design here",
            RgbaImage::new(1, 1),
            Rect::new(40.0, 40.0, 40.0, 90.0),
        );

        let err = Pipeline::new(PipelineConfig::default(), &assets, &mut sink)
            .mockup(&mut doc, Path::new("designs"), Path::new("out"), &[row("logo.png", "FF0000")])
            .unwrap_err();

        assert!(matches!(err, PipelineError::DegenerateGeometry { row: Some(1), .. }));
    }

    #[test]
    fn test_group_slot_is_rejected_and_kept() {
        let assets = assets();
        let mut sink = MemoryExporter::new();
        let mut doc = template();
        doc.layers[0] = LayerNode::group(
            "Place your design here",
            vec![
                LayerNode::solid("Print area", HexColor::BLACK, Rect::new(100.0, 50.0, 300.0, 250.0)),
                LayerNode::solid("Shadow", HexColor::BLACK, Rect::new(110.0, 60.0, 310.0, 260.0)),
            ],
        );

        let err = Pipeline::new(PipelineConfig::default(), &assets, &mut sink)
            .mockup(&mut doc, Path::new("designs"), Path::new("out"), &[row("logo.png", "FF0000")])
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::WrongLayerKind {
                row: Some(1),
                expected: LayerKind::Pixel,
                found: LayerKind::Group,
                ..
            }
        ));
        assert!(sink.exports.is_empty());
        assert_eq!(doc.find("Place your design here").unwrap().kind(), LayerKind::Group);
        assert!(doc.find("Print area").is_some());
    }

    #[test]
    fn test_slot_keeps_opacity_and_visibility() {
        let assets = assets();
        let mut sink = MemoryExporter::new();
        let mut doc = template();
        let path = doc.locate("Place your design here").unwrap();
        doc.node_mut(&path).unwrap().opacity = 0.5;

        Pipeline::new(PipelineConfig::default(), &assets, &mut sink)
            .mockup(&mut doc, Path::new("designs"), Path::new("out"), &[row("logo.png", "FFFFFF")])
            .unwrap();

        let slot = doc.find("Place your design here").unwrap();
        assert_eq!(slot.opacity, 0.5);
        assert!(slot.visible);
        let center = sink.exports[0].image.get_pixel(200, 150);
        assert!((120..=135).contains(&center[0]) && center[2] == 255, "{center:?}");
    }
}
