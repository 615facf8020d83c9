//! Center-and-resize placement of one rectangle onto another.
//!
//! The placement is computed in two independent steps, exactly as a layer
//! is moved by hand in an editor:
//!
//! 1. Translate so both centers coincide
//! 2. Scale about the (now shared) center, independently per axis
//!
//! Scaling is anisotropic on purpose: the result matches the reference
//! bounds exactly rather than preserving the moving element's aspect ratio.

use super::{GeometryError, Rect};
use serde::{Deserialize, Serialize};

/// Translation plus per-axis scale that maps one rectangle onto another.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Additive offset `(dx, dy)` applied to the current position.
    pub translation: (f64, f64),
    /// Scale ratio per axis, `1.0` means unchanged.
    pub scale: (f64, f64),
}

impl Default for Placement {
    fn default() -> Self {
        Self::identity()
    }
}

impl Placement {
    pub fn identity() -> Self {
        Self {
            translation: (0.0, 0.0),
            scale: (1.0, 1.0),
        }
    }

    /// Apply the placement: translate first, then scale about the
    /// translated rectangle's own center.
    pub fn apply(&self, rect: &Rect) -> Rect {
        let moved = rect.translate(self.translation.0, self.translation.1);
        let (cx, cy) = moved.center();
        Rect::centered_at(
            cx,
            cy,
            moved.width() * self.scale.0,
            moved.height() * self.scale.1,
        )
    }
}

/// Compute the placement that moves `moving` onto `reference`.
///
/// # Errors
///
/// Returns [`GeometryError::Degenerate`] if either rectangle has zero width
/// or height, since the scale ratio would be undefined (or collapse the
/// element to nothing).
///
/// # Example
///
/// ```ignore
/// let design = Rect::from_size(50.0, 100.0);
/// let slot = Rect::new(0.0, 0.0, 200.0, 200.0);
/// let placement = fit(&design, &slot)?;
/// assert_eq!(placement.scale, (4.0, 2.0));
/// ```
pub fn fit(moving: &Rect, reference: &Rect) -> Result<Placement, GeometryError> {
    moving.require_area("moving layer")?;
    reference.require_area("reference layer")?;

    let (ref_cx, ref_cy) = reference.center();
    let (mov_cx, mov_cy) = moving.center();

    Ok(Placement {
        translation: (ref_cx - mov_cx, ref_cy - mov_cy),
        scale: (
            reference.width() / moving.width(),
            reference.height() / moving.height(),
        ),
    })
}


// ============================================================================
// Property-Based Tests
// ============================================================================
