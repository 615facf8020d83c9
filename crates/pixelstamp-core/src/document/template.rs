//! Loading documents from JSON template manifests.
//!
//! A manifest describes the canvas and its layer tree. Pixel layers may
//! reference an image file, resolved relative to the manifest's directory.
//!
//! ```json
//! {
//!   "width": 1200,
//!   "height": 1200,
//!   "layers": [
//!     { "name": "Place your design here", "kind": "pixel",
//!       "bounds": { "left": 300, "top": 250, "right": 900, "bottom": 850 } },
//!     { "name": "Shirt", "kind": "pixel", "source": "shirt.png" },
//!     { "name": "Color", "kind": "pixel", "fill": "#FFFFFF" }
//!   ]
//! }
//! ```

use super::{Document, LayerNode, TextStyle};
use crate::assets::{AssetError, AssetSource};
use crate::color::HexColor;
use crate::geometry::Rect;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading a template.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Failed to read template {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid template manifest: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Template canvas must be non-empty, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Layer \"{layer}\": {source}")]
    Asset {
        layer: String,
        #[source]
        source: AssetError,
    },
}

/// Top-level manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateManifest {
    /// Document name. Defaults to the manifest's file stem.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub width: u32,
    pub height: u32,
    /// Layers, top-most first.
    #[serde(default)]
    pub layers: Vec<LayerSpec>,
}

/// One layer entry of a manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerSpec {
    pub name: String,
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(flatten)]
    pub body: LayerBody,
}

/// Kind-specific part of a layer entry, tagged by `"kind"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LayerBody {
    Pixel {
        /// Image file drawn in the layer.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        source: Option<PathBuf>,
        /// Solid color filling the layer, used when there is no source.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fill: Option<HexColor>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bounds: Option<Rect>,
    },
    Text {
        contents: String,
        #[serde(default = "default_font_size")]
        font_size: f32,
        #[serde(default)]
        color: HexColor,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bounds: Option<Rect>,
    },
    Group {
        #[serde(default)]
        children: Vec<LayerSpec>,
    },
}

fn default_opacity() -> f32 {
    1.0
}

fn default_visible() -> bool {
    true
}

fn default_font_size() -> f32 {
    TextStyle::default().font_size
}

impl TemplateManifest {
    pub fn from_json(json: &str) -> Result<Self, TemplateError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Document {
    /// Build a document from a parsed manifest.
    ///
    /// Relative `source` paths are resolved against `base_dir`.
    pub fn from_manifest(
        manifest: TemplateManifest,
        base_dir: &Path,
        assets: &impl AssetSource,
    ) -> Result<Self, TemplateError> {
        if manifest.width == 0 || manifest.height == 0 {
            return Err(TemplateError::InvalidDimensions {
                width: manifest.width,
                height: manifest.height,
            });
        }

        let canvas = Rect::from_size(manifest.width as f64, manifest.height as f64);
        let layers = manifest
            .layers
            .into_iter()
            .map(|spec| build_layer(spec, &canvas, base_dir, assets))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Document {
            name: manifest.name.unwrap_or_default(),
            width: manifest.width,
            height: manifest.height,
            layers,
        })
    }

    /// Read and build the template at `path`.
    pub fn load_template(path: &Path, assets: &impl AssetSource) -> Result<Self, TemplateError> {
        let json = std::fs::read_to_string(path).map_err(|source| TemplateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut manifest = TemplateManifest::from_json(&json)?;
        if manifest.name.is_none() {
            manifest.name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned());
        }

        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        let document = Self::from_manifest(manifest, base_dir, assets)?;
        tracing::info!(
            template = %path.display(),
            width = document.width,
            height = document.height,
            layers = document.layers.len(),
            "loaded template"
        );
        Ok(document)
    }
}

fn build_layer(
    spec: LayerSpec,
    canvas: &Rect,
    base_dir: &Path,
    assets: &impl AssetSource,
) -> Result<LayerNode, TemplateError> {
    let node = match spec.body {
        LayerBody::Pixel {
            source,
            fill,
            bounds,
        } => match (source, fill) {
            (Some(source), _) => {
                let raster = assets
                    .load_image(&base_dir.join(source))
                    .map_err(|source| TemplateError::Asset {
                        layer: spec.name.clone(),
                        source,
                    })?;
                let bounds = bounds.unwrap_or_else(|| {
                    Rect::from_size(raster.width() as f64, raster.height() as f64)
                });
                LayerNode::pixel(spec.name, raster, bounds)
            }
            (None, Some(color)) => LayerNode::solid(spec.name, color, bounds.unwrap_or(*canvas)),
            // Empty pixel layer
            (None, None) => {
                LayerNode::pixel(spec.name, RgbaImage::new(1, 1), bounds.unwrap_or(*canvas))
            }
        },
        LayerBody::Text {
            contents,
            font_size,
            color,
            bounds,
        } => LayerNode::text(
            spec.name,
            contents,
            TextStyle { font_size, color },
            bounds.unwrap_or(*canvas),
        ),
        LayerBody::Group { children } => {
            let children = children
                .into_iter()
                .map(|child| build_layer(child, canvas, base_dir, assets))
                .collect::<Result<Vec<_>, _>>()?;
            LayerNode::group(spec.name, children)
        }
    };

    let mut node = node.with_opacity(spec.opacity);
    node.visible = spec.visible;
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryAssets;
    use crate::document::{LayerContent, LayerKind};

    const MANIFEST: &str = r##"{
        "width": 200,
        "height": 100,
        "layers": [
            { "name": "Title", "kind": "text", "contents": "Hello", "color": "#FF0000",
              "bounds": { "left": 0, "top": 0, "right": 200, "bottom": 30 } },
            { "name": "Art", "kind": "group", "opacity": 0.5, "children": [
                { "name": "Logo", "kind": "pixel", "source": "logo.png" }
            ] },
            { "name": "Color", "kind": "pixel", "fill": "00FF00", "visible": false }
        ]
    }"##;

    fn assets() -> MemoryAssets {
        let mut assets = MemoryAssets::new();
        assets.insert("tpl/logo.png", RgbaImage::new(40, 20));
        assets
    }

    #[test]
    fn test_build_from_manifest() {
        let manifest = TemplateManifest::from_json(MANIFEST).unwrap();
        let doc = Document::from_manifest(manifest, Path::new("tpl"), &assets()).unwrap();

        assert_eq!((doc.width, doc.height), (200, 100));
        assert_eq!(doc.layers.len(), 3);

        let title = doc.find("Title").unwrap();
        assert_eq!(title.kind(), LayerKind::Text);
        assert_eq!(title.text_contents(), Some("Hello"));
        match &title.content {
            LayerContent::Text { style, .. } => {
                assert_eq!(style.color, HexColor::new(255, 0, 0));
                assert_eq!(style.font_size, 24.0);
            }
            _ => unreachable!(),
        }

        let art = doc.find("Art").unwrap();
        assert_eq!(art.kind(), LayerKind::Group);
        assert_eq!(art.opacity, 0.5);
        assert_eq!(doc.find("Logo").unwrap().bounds(), Rect::from_size(40.0, 20.0));

        let color = doc.find("Color").unwrap();
        assert!(!color.visible);
        assert_eq!(color.bounds(), doc.canvas_rect());
    }

    #[test]
    fn test_missing_source_names_layer() {
        let manifest = TemplateManifest::from_json(MANIFEST).unwrap();
        let err = Document::from_manifest(manifest, Path::new("elsewhere"), &assets()).unwrap_err();

        assert!(matches!(&err, TemplateError::Asset { layer, .. } if layer == "Logo"));
    }

    #[test]
    fn test_zero_canvas_is_rejected() {
        let manifest = TemplateManifest::from_json(r#"{"width": 0, "height": 10}"#).unwrap();
        assert!(matches!(
            Document::from_manifest(manifest, Path::new(""), &MemoryAssets::new()),
            Err(TemplateError::InvalidDimensions { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_unknown_kind_is_a_parse_error() {
        let json = r#"{"width": 1, "height": 1, "layers": [{"name": "x", "kind": "shape"}]}"#;
        assert!(matches!(
            TemplateManifest::from_json(json),
            Err(TemplateError::Parse(_))
        ));
    }

    #[test]
    fn test_bad_color_is_a_parse_error() {
        let json = r##"{"width": 1, "height": 1, "layers": [{"name": "x", "kind": "pixel", "fill": "#12"}]}"##;
        assert!(TemplateManifest::from_json(json).is_err());
    }

    #[test]
    fn test_load_template_names_document_after_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("poster.json");
        std::fs::write(&path, r#"{"width": 10, "height": 10, "layers": []}"#).unwrap();

        let doc = Document::load_template(&path, &MemoryAssets::new()).unwrap();
        assert_eq!(doc.name, "poster");
    }

    #[test]
    fn test_load_template_missing_file() {
        assert!(matches!(
            Document::load_template(Path::new("/no/such/template.json"), &MemoryAssets::new()),
            Err(TemplateError::Io { .. })
        ));
    }
}
