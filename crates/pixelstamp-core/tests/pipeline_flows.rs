//! End-to-end batch flows through the public API.

use image::{Rgba, RgbaImage};
use pixelstamp_core::document::LayerContent;
use pixelstamp_core::pipeline::{MockupRow, Table, TranslationTable};
use pixelstamp_core::tiles::{TileError, TileRequest};
use pixelstamp_core::{
    image_dimensions, plan_tiles, rotation_offset, Document, FileExporter, FsAssets, HexColor,
    LayerNode, MemoryAssets, MemoryExporter, OffsetStrategy, Pipeline, PipelineConfig,
    PipelineError, Rect, TextRenderer,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;

const SLOT: &str = "Place your design here";

fn test_font() -> TextRenderer {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/DejaVuSansMono.ttf");
    TextRenderer::from_file(&path).unwrap()
}

fn mockup_template() -> Document {
    Document::new("tee", 400, 300).with_layers(vec![
        LayerNode::pixel(SLOT, RgbaImage::new(1, 1), Rect::new(0.0, 0.0, 200.0, 200.0)),
        LayerNode::solid("Color", HexColor::WHITE, Rect::from_size(400.0, 300.0)),
    ])
}

#[test]
fn test_mockup_fills_color_and_fits_design() {
    let mut assets = MemoryAssets::new();
    assets.insert("designs/logo.png", RgbaImage::from_pixel(50, 40, Rgba([0, 0, 255, 255])));
    let mut sink = MemoryExporter::new();
    let mut doc = mockup_template();
    let rows = MockupRow::from_table(&Table::parse("file,color\nlogo.png,#FF0000\n").unwrap()).unwrap();

    let report = Pipeline::new(PipelineConfig::default(), &assets, &mut sink)
        .mockup(&mut doc, Path::new("designs"), Path::new("out"), &rows)
        .unwrap();

    assert_eq!(report.placements.len(), 1);
    assert_eq!(report.placements[0].scale, (200.0 / 50.0, 200.0 / 40.0));
    assert_eq!(sink.exports.len(), 1);
    assert_eq!(sink.exports[0].path, PathBuf::from("out/logo.png"));

    match &doc.find("Color").unwrap().content {
        LayerContent::Pixel(raster) => {
            assert!(raster.pixels().all(|p| p.0 == [255, 0, 0, 255]));
        }
        _ => panic!("Color should stay a pixel layer"),
    }
    let slot = doc.find(SLOT).unwrap();
    assert!(slot.bounds().approx_eq(&Rect::new(0.0, 0.0, 200.0, 200.0), 1.0));

    let image = &sink.exports[0].image;
    assert_eq!(image.get_pixel(300, 250).0, [255, 0, 0, 255]);
    let inside = image.get_pixel(100, 100);
    assert!(inside[2] > 250 && inside[0] < 5, "{inside:?}");
}

#[test]
fn test_mockup_rows_run_in_order_until_failure() {
    let mut assets = MemoryAssets::new();
    assets.insert("d/a.png", RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255])));
    assets.insert("d/c.png", RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255])));
    let mut sink = MemoryExporter::new();
    let rows = MockupRow::from_table(
        &Table::parse("file,color\na.png,000000\nb.png,000000\nc.png,000000\n").unwrap(),
    )
    .unwrap();

    let err = Pipeline::new(PipelineConfig::default(), &assets, &mut sink)
        .mockup(&mut mockup_template(), Path::new("d"), Path::new("out"), &rows)
        .unwrap_err();

    assert_eq!(err.row(), Some(2));
    assert!(err.to_string().starts_with("Row 2: "), "{err}");
    assert_eq!(sink.exports.len(), 1);
}

#[test]
fn test_cancelled_run_exports_nothing() {
    let assets = MemoryAssets::new();
    let mut sink = MemoryExporter::new();
    let cancel = AtomicBool::new(true);
    let rows = vec![MockupRow {
        design: "a.png".into(),
        color: "000000".into(),
    }];

    let err = Pipeline::new(PipelineConfig::default(), &assets, &mut sink)
        .with_cancel_flag(&cancel)
        .mockup(&mut mockup_template(), Path::new("d"), Path::new("out"), &rows)
        .unwrap_err();

    assert!(matches!(err, PipelineError::Cancelled { completed: 0 }));
    assert!(sink.exports.is_empty());
}

#[test]
fn test_translation_restores_template_texts() {
    let manifest = r##"{
        "name": "flyer.psd",
        "width": 200,
        "height": 100,
        "layers": [
            {"name": "Headline", "kind": "text", "contents": "Summer sale"},
            {"name": "Details", "kind": "group", "children": [
                {"name": "Body", "kind": "text", "contents": "All week long", "font_size": 12}
            ]},
            {"name": "Background", "kind": "pixel", "fill": "#FFFFFF"}
        ]
    }"##;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flyer.json");
    std::fs::write(&path, manifest).unwrap();
    let mut doc = Document::load_template(&path, &FsAssets).unwrap();

    let table = TranslationTable::parse(
        "*,Headline,Body\nfr,Soldes d'ete,Toute la semaine\nde,Sommerschlussverkauf,Die ganze Woche\n",
    )
    .unwrap();
    let mut sink = MemoryExporter::new();
    let font = test_font();

    let report = Pipeline::new(PipelineConfig::default(), &MemoryAssets::new(), &mut sink)
        .with_text_renderer(&font)
        .translate(&mut doc, &table, Path::new("out"))
        .unwrap();

    assert_eq!(
        report.outputs,
        vec![PathBuf::from("out/flyer_fr.png"), PathBuf::from("out/flyer_de.png")]
    );
    assert_eq!(doc.find("Headline").unwrap().text_contents(), Some("Summer sale"));
    assert_eq!(doc.find("Body").unwrap().text_contents(), Some("All week long"));
}

#[test]
fn test_tile_cap_boundary() {
    let request = |extent: f64| TileRequest {
        tile_width: 10,
        tile_height: 10,
        canvas_extent: extent,
        rotation_degrees: 0.0,
        opacity: 1.0,
    };

    let plan = plan_tiles(&request(1000.0), Some(10_000), OffsetStrategy::Centered).unwrap();
    assert_eq!(plan.grid.tiles_per_side, 100);
    assert_eq!(plan.placements.len(), 10_000);

    let err = plan_tiles(&request(1010.0), Some(10_000), OffsetStrategy::Centered).unwrap_err();
    assert!(matches!(
        err,
        TileError::TooManyTiles {
            tiles_per_side: 101,
            tile_count: 10_201,
            cap: 10_000
        }
    ));
}

#[test]
fn test_rotation_offset_signs() {
    assert_eq!(rotation_offset(0.0, 1000.0), 0.0);
    let forward = rotation_offset(45.0, 1000.0);
    let backward = rotation_offset(315.0, 1000.0);
    assert!(forward != 0.0);
    assert!(forward.signum() != backward.signum());
}

#[test]
fn test_filesystem_mockup_and_resize() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    std::fs::create_dir_all(root.join("designs")).unwrap();
    RgbaImage::from_pixel(30, 20, Rgba([0, 0, 255, 255]))
        .save(root.join("designs/logo.png"))
        .unwrap();
    RgbaImage::from_pixel(300, 100, Rgba([10, 200, 10, 255]))
        .save(root.join("photo.png"))
        .unwrap();
    std::fs::write(
        root.join("tee.json"),
        r##"{
            "width": 120,
            "height": 80,
            "layers": [
                {"name": "Place your design here", "kind": "pixel",
                 "bounds": {"left": 10, "top": 10, "right": 60, "bottom": 40}},
                {"name": "Color", "kind": "pixel", "fill": "#FFFFFF"}
            ]
        }"##,
    )
    .unwrap();

    let mut doc = Document::load_template(&root.join("tee.json"), &FsAssets).unwrap();
    assert_eq!(doc.name, "tee");
    let rows = MockupRow::from_table(&Table::parse("file,color\nlogo.png,00FF00\n").unwrap()).unwrap();

    let mut sink = FileExporter;
    let mut pipeline = Pipeline::new(PipelineConfig::default(), &FsAssets, &mut sink);
    let mockups = pipeline
        .mockup(&mut doc, &root.join("designs"), &root.join("out"), &rows)
        .unwrap();
    let resized = pipeline
        .resize(&root.join("photo.png"), &root.join("web"), 50, 50)
        .unwrap();

    let mockup_path = root.join("out/logo.png");
    assert_eq!(mockups.batch.outputs, vec![mockup_path.clone()]);
    let mockup = image::open(&mockup_path).unwrap().to_rgba8();
    assert_eq!(mockup.dimensions(), (120, 80));
    let corner = mockup.get_pixel(110, 70);
    assert!(corner[1] > 150 && corner[0] < 100 && corner[2] < 100, "{corner:?}");

    assert_eq!(resized.outputs, vec![root.join("web/photo_web.jpg")]);
    assert_eq!(image_dimensions(&root.join("web/photo_web.jpg")).unwrap(), (50, 50));
}
