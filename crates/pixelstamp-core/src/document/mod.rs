//! In-memory layered documents.
//!
//! A [`Document`] is a fixed-size canvas holding a tree of [`LayerNode`]s.
//! Groups own their children; the document owns the top-level layers.
//!
//! # Layer Order
//!
//! Siblings are stored top-most first, the way layer panels list them.
//! Searching visits them in that order, rendering draws them in reverse.
//!
//! # Layer Bounds
//!
//! Pixel layers carry a raster that is drawn stretched to the layer's
//! bounds, so moving or resizing a layer is a pure bounds update. A
//! group's bounds are the union of its children's bounds.

mod locate;
mod render;
mod template;
mod text;

pub use locate::{find_layer, locate, LayerPath};
pub use template::{LayerBody, LayerSpec, TemplateError, TemplateManifest};
pub use text::{FontError, TextRenderer};
#[cfg(test)]
pub(crate) use text::test_renderer;

use crate::color::HexColor;
use crate::geometry::{fit, Rect};
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a layer node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Pixel,
    Text,
    Group,
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LayerKind::Pixel => "pixel",
            LayerKind::Text => "text",
            LayerKind::Group => "group",
        })
    }
}

/// Styling of a text layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    /// Font size in pixels.
    pub font_size: f32,
    pub color: HexColor,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 24.0,
            color: HexColor::BLACK,
        }
    }
}

/// Content of a layer node.
#[derive(Clone)]
pub enum LayerContent {
    Pixel(RgbaImage),
    Text { contents: String, style: TextStyle },
    Group(Vec<LayerNode>),
}

/// A named node in the layer tree.
#[derive(Clone)]
pub struct LayerNode {
    pub name: String,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
    pub visible: bool,
    pub content: LayerContent,
    frame: Rect,
}

impl fmt::Debug for LayerNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("LayerNode");
        s.field("name", &self.name)
            .field("kind", &self.kind())
            .field("bounds", &self.bounds());
        match &self.content {
            LayerContent::Pixel(raster) => s.field("raster", &raster.dimensions()),
            LayerContent::Text { contents, .. } => s.field("contents", contents),
            LayerContent::Group(children) => s.field("children", children),
        };
        s.finish()
    }
}

impl LayerNode {
    /// Pixel layer drawing `raster` stretched to `bounds`.
    pub fn pixel(name: impl Into<String>, raster: RgbaImage, bounds: Rect) -> Self {
        Self {
            name: name.into(),
            opacity: 1.0,
            visible: true,
            content: LayerContent::Pixel(raster),
            frame: bounds,
        }
    }

    /// Pixel layer of a single opaque color.
    pub fn solid(name: impl Into<String>, color: HexColor, bounds: Rect) -> Self {
        let raster = solid_raster(color, &bounds);
        Self::pixel(name, raster, bounds)
    }

    pub fn text(
        name: impl Into<String>,
        contents: impl Into<String>,
        style: TextStyle,
        bounds: Rect,
    ) -> Self {
        Self {
            name: name.into(),
            opacity: 1.0,
            visible: true,
            content: LayerContent::Text {
                contents: contents.into(),
                style,
            },
            frame: bounds,
        }
    }

    pub fn group(name: impl Into<String>, children: Vec<LayerNode>) -> Self {
        Self {
            name: name.into(),
            opacity: 1.0,
            visible: true,
            content: LayerContent::Group(children),
            frame: Rect::default(),
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn kind(&self) -> LayerKind {
        match self.content {
            LayerContent::Pixel(_) => LayerKind::Pixel,
            LayerContent::Text { .. } => LayerKind::Text,
            LayerContent::Group(_) => LayerKind::Group,
        }
    }

    /// Current bounds. For groups, the union of the children's bounds
    /// (empty rectangle for an empty group).
    pub fn bounds(&self) -> Rect {
        match &self.content {
            LayerContent::Group(children) => children
                .iter()
                .map(LayerNode::bounds)
                .reduce(|acc, b| acc.union(&b))
                .unwrap_or_default(),
            _ => self.frame,
        }
    }

    /// Move/resize the layer so its bounds become `bounds`.
    ///
    /// Groups map every descendant proportionally. An empty group, or one
    /// with zero-area bounds, is left unchanged.
    pub fn set_bounds(&mut self, bounds: Rect) {
        match &mut self.content {
            LayerContent::Group(children) => {
                let current = children
                    .iter()
                    .map(LayerNode::bounds)
                    .reduce(|acc, b| acc.union(&b));
                let Some(current) = current else { return };
                let Ok(placement) = fit(&current, &bounds) else {
                    return;
                };
                let (cx, cy) = current.center();
                let (tx, ty) = bounds.center();
                for child in children.iter_mut() {
                    // Scale each child about the group's center, then move it
                    let b = child.bounds();
                    let mapped = Rect::new(
                        tx + (b.left - cx) * placement.scale.0,
                        ty + (b.top - cy) * placement.scale.1,
                        tx + (b.right - cx) * placement.scale.0,
                        ty + (b.bottom - cy) * placement.scale.1,
                    );
                    child.set_bounds(mapped);
                }
            }
            _ => self.frame = bounds,
        }
    }

    /// Children of a group, empty for leaf layers.
    pub fn children(&self) -> &[LayerNode] {
        match &self.content {
            LayerContent::Group(children) => children,
            _ => &[],
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<LayerNode>> {
        match &mut self.content {
            LayerContent::Group(children) => Some(children),
            _ => None,
        }
    }

    /// Contents of a text layer.
    pub fn text_contents(&self) -> Option<&str> {
        match &self.content {
            LayerContent::Text { contents, .. } => Some(contents),
            _ => None,
        }
    }

    /// Replace the contents of a text layer, returning the previous contents.
    ///
    /// Returns `None` and leaves the layer untouched if it is not a text layer.
    pub fn set_text_contents(&mut self, contents: impl Into<String>) -> Option<String> {
        match &mut self.content {
            LayerContent::Text { contents: current, .. } => {
                Some(std::mem::replace(current, contents.into()))
            }
            _ => None,
        }
    }

    /// Fill the whole of `area` with `color`, making this a solid pixel
    /// layer covering `area`.
    ///
    /// Returns `false` and leaves the layer untouched if it is not a pixel layer.
    pub fn fill(&mut self, color: HexColor, area: Rect) -> bool {
        if self.kind() != LayerKind::Pixel {
            return false;
        }
        self.content = LayerContent::Pixel(solid_raster(color, &area));
        self.frame = area;
        true
    }

    /// Depth-first, pre-order search starting at this node.
    pub fn find(&self, name: &str) -> Option<&LayerNode> {
        if self.name == name {
            return Some(self);
        }
        find_layer(self.children(), name)
    }
}

fn solid_raster(color: HexColor, bounds: &Rect) -> RgbaImage {
    let width = bounds.width().round().max(1.0) as u32;
    let height = bounds.height().round().max(1.0) as u32;
    RgbaImage::from_pixel(width, height, color.to_rgba())
}

/// A fixed-size canvas with a layer tree.
#[derive(Debug, Clone)]
pub struct Document {
    /// Document name, used to derive export file names.
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Top-level layers, top-most first.
    pub layers: Vec<LayerNode>,
}

impl Document {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            layers: Vec::new(),
        }
    }

    pub fn with_layers(mut self, layers: Vec<LayerNode>) -> Self {
        self.layers = layers;
        self
    }

    /// The full canvas as a rectangle.
    pub fn canvas_rect(&self) -> Rect {
        Rect::from_size(self.width as f64, self.height as f64)
    }

    /// First layer named `name` in pre-order.
    pub fn find(&self, name: &str) -> Option<&LayerNode> {
        find_layer(&self.layers, name)
    }

    /// Path to the first layer named `name` in pre-order.
    pub fn locate(&self, name: &str) -> Option<LayerPath> {
        locate(&self.layers, name)
    }

    pub fn node(&self, path: &LayerPath) -> Option<&LayerNode> {
        path.resolve(&self.layers)
    }

    pub fn node_mut(&mut self, path: &LayerPath) -> Option<&mut LayerNode> {
        path.resolve_mut(&mut self.layers)
    }
}
