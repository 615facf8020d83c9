//! Rectangle geometry for layer placement.
//!
//! This module provides the pure arithmetic behind the compositing flows:
//! - Fitting one rectangle onto another (center + per-axis resize)
//! - Aspect-fill resize/crop windows for fixed output sizes
//!
//! # Coordinate System
//!
//! - Units are pixels, stored as `f64` so that intermediate transforms
//!   do not accumulate rounding error
//! - Origin is the top-left corner of the canvas, y grows downwards

mod aspect_fill;
mod fit;

pub use aspect_fill::{aspect_fill, AspectFill};
pub use fit::{fit, Placement};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by geometry computations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// A rectangle has zero width or height, so no scale ratio exists.
    #[error("Degenerate geometry: {what} is {width}x{height}, width and height must be non-zero")]
    Degenerate {
        what: &'static str,
        width: f64,
        height: f64,
    },

    /// A value that must be a finite number was NaN or infinite.
    #[error("Degenerate geometry: {what} must be finite and positive, got {value}")]
    NotFinite { what: &'static str, value: f64 },
}

/// Axis-aligned rectangle in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    /// Create a rectangle from its edges.
    ///
    /// Reversed edges are swapped so that width and height are never negative.
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left: left.min(right),
            top: top.min(bottom),
            right: left.max(right),
            bottom: top.max(bottom),
        }
    }

    /// Rectangle anchored at the origin.
    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Rectangle of the given size whose center is `(cx, cy)`.
    pub fn centered_at(cx: f64, cy: f64, width: f64, height: f64) -> Self {
        let (half_w, half_h) = (width.abs() / 2.0, height.abs() / 2.0);
        Self::new(cx - half_w, cy - half_h, cx + half_w, cy + half_h)
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    /// True when the rectangle has no area.
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Return a copy shifted by `(dx, dy)`.
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
        }
    }

    /// Smallest rectangle containing both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Self {
        Self {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Compare edges with an absolute tolerance.
    pub fn approx_eq(&self, other: &Rect, tolerance: f64) -> bool {
        (self.left - other.left).abs() <= tolerance
            && (self.top - other.top).abs() <= tolerance
            && (self.right - other.right).abs() <= tolerance
            && (self.bottom - other.bottom).abs() <= tolerance
    }

    /// Fail with [`GeometryError::Degenerate`] if the rectangle has no area.
    pub(crate) fn require_area(&self, what: &'static str) -> Result<(), GeometryError> {
        if self.is_empty() || !self.width().is_finite() || !self.height().is_finite() {
            return Err(GeometryError::Degenerate {
                what,
                width: self.width(),
                height: self.height(),
            });
        }
        Ok(())
    }
}
