//! Tiled watermark grids.
//!
//! A watermark is stamped as a square pattern of identical tiles that is
//! rotated as a whole and laid over the target image. The pattern must be
//! large enough that, after rotation, no corner of the target peeks out.
//!
//! # Coordinate System
//!
//! - Placements are relative to the pattern's center, which sits at the
//!   origin; the pattern covers `[-E/2, E/2]` on both axes for an extent `E`
//! - Rotation is in degrees, positive = clockwise on screen
//!
//! Planning is pure arithmetic and fails with [`TileError::TooManyTiles`]
//! before anything is composited.

mod pattern;

pub use pattern::{render_pattern, stamp_pattern};

use crate::geometry::GeometryError;
use serde::{Deserialize, Serialize};
use std::f64::consts::SQRT_2;
use thiserror::Error;

/// Default maximum number of tiles in a pattern.
pub const DEFAULT_TILE_CAP: u64 = 10_000;

/// Errors raised while planning a tile grid.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TileError {
    #[error(
        "Too many tiles: {tiles_per_side} per side ({tile_count} total) exceeds the cap of {cap}"
    )]
    TooManyTiles {
        tiles_per_side: u64,
        tile_count: u64,
        cap: u64,
    },

    #[error(transparent)]
    Degenerate(#[from] GeometryError),
}

/// How the rotated pattern is aligned over the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffsetStrategy {
    /// Shift the pattern by [`rotation_offset`] on both axes.
    ClosedForm,
    /// Keep the rotated pattern centered on the target.
    #[default]
    Centered,
}

/// Input to [`plan_tiles`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileRequest {
    pub tile_width: u32,
    pub tile_height: u32,
    /// Side length of the square the grid must cover.
    pub canvas_extent: f64,
    pub rotation_degrees: f64,
    /// Opacity in `[0, 1]` applied to every tile.
    pub opacity: f32,
}

/// Size of a square tile grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileGridSpec {
    pub tiles_per_side: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub canvas_extent: f64,
}

impl TileGridSpec {
    pub fn tile_count(&self) -> u64 {
        self.tiles_per_side as u64 * self.tiles_per_side as u64
    }
}

/// Top-left corner of one tile, relative to the pattern center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TilePlacement {
    pub x: f64,
    pub y: f64,
    pub opacity: f32,
}

/// A planned tile grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilePlan {
    pub grid: TileGridSpec,
    pub rotation_degrees: f64,
    /// Row-major placements, `tiles_per_side²` entries.
    pub placements: Vec<TilePlacement>,
    /// Shift applied to both axes when stamping the rotated pattern.
    pub offset: f64,
}

/// Side of the square that, once rotated by any angle, still covers a
/// target whose diagonal is `diagonal`.
pub fn coverage_extent(diagonal: f64) -> f64 {
    diagonal * SQRT_2
}

/// Closed-form alignment shift for a pattern of side `extent` rotated by
/// `rotation_degrees`: `(3/4)(1 - √2)·sin(θ)·E`.
///
/// Zero without rotation; angles mirrored about zero give opposite shifts.
pub fn rotation_offset(rotation_degrees: f64, extent: f64) -> f64 {
    0.75 * (1.0 - SQRT_2) * rotation_degrees.to_radians().sin() * extent
}

/// Plan a square tile grid covering `request.canvas_extent`.
///
/// `cap` bounds the total tile count; `None` disables it.
///
/// # Errors
///
/// - [`TileError::Degenerate`] for a zero tile dimension or an extent that
///   is not a finite positive number
/// - [`TileError::TooManyTiles`] when the grid would exceed `cap`
pub fn plan_tiles(
    request: &TileRequest,
    cap: Option<u64>,
    strategy: OffsetStrategy,
) -> Result<TilePlan, TileError> {
    let TileRequest {
        tile_width,
        tile_height,
        canvas_extent: extent,
        rotation_degrees,
        opacity,
    } = *request;

    if tile_width == 0 || tile_height == 0 {
        return Err(GeometryError::Degenerate {
            what: "tile",
            width: tile_width as f64,
            height: tile_height as f64,
        }
        .into());
    }
    if !extent.is_finite() || extent <= 0.0 {
        return Err(GeometryError::NotFinite {
            what: "canvas extent",
            value: extent,
        }
        .into());
    }
    if !rotation_degrees.is_finite() {
        return Err(GeometryError::NotFinite {
            what: "rotation",
            value: rotation_degrees,
        }
        .into());
    }

    let min_side = tile_width.min(tile_height) as f64;
    // Float-to-int casts saturate, so absurd extents end up over the cap
    let tiles_per_side = (extent / min_side).ceil() as u64;
    let tile_count = tiles_per_side.saturating_mul(tiles_per_side);

    let too_many = |cap: u64| TileError::TooManyTiles {
        tiles_per_side,
        tile_count,
        cap,
    };
    if let Some(cap) = cap {
        if tile_count > cap {
            return Err(too_many(cap));
        }
    }
    let side = u32::try_from(tiles_per_side).map_err(|_| too_many(u64::MAX))?;

    let half = extent / 2.0;
    let opacity = opacity.clamp(0.0, 1.0);
    let placements = (0..side)
        .flat_map(|j| {
            (0..side).map(move |i| TilePlacement {
                x: i as f64 * tile_width as f64 - half,
                y: j as f64 * tile_height as f64 - half,
                opacity,
            })
        })
        .collect();

    let offset = match strategy {
        OffsetStrategy::ClosedForm => rotation_offset(rotation_degrees, extent),
        OffsetStrategy::Centered => 0.0,
    };

    tracing::debug!(
        tiles_per_side = side,
        tile_count,
        extent,
        rotation_degrees,
        offset,
        "planned tile grid"
    );

    Ok(TilePlan {
        grid: TileGridSpec {
            tiles_per_side: side,
            tile_width,
            tile_height,
            canvas_extent: extent,
        },
        rotation_degrees,
        placements,
        offset,
    })
}

impl TilePlan {
    /// Whether the rotated, offset pattern covers every corner of a
    /// `width x height` target centered on the pattern.
    ///
    /// The pattern is convex, so covering the corners covers the target.
    pub fn covers(&self, width: f64, height: f64) -> bool {
        let half = self.grid.canvas_extent / 2.0;
        let (sin, cos) = self.rotation_degrees.to_radians().sin_cos();
        let (half_w, half_h) = (width / 2.0, height / 2.0);

        [(-half_w, -half_h), (half_w, -half_h), (-half_w, half_h), (half_w, half_h)]
            .into_iter()
            .all(|(x, y)| {
                // Corner relative to the shifted pattern center, then back
                // into the unrotated pattern frame
                let dx = x - self.offset;
                let dy = y - self.offset;
                let u = dx * cos + dy * sin;
                let v = -dx * sin + dy * cos;
                u.abs() <= half + 1e-9 && v.abs() <= half + 1e-9
            })
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: the grid is the smallest one reaching the extent.
        #[test]
        fn prop_grid_is_minimal(
            tile_width in 1u32..200,
            tile_height in 1u32..200,
            extent in 1.0f64..3000.0,
        ) {
            let req = TileRequest {
                tile_width,
                tile_height,
                canvas_extent: extent,
                rotation_degrees: 0.0,
                opacity: 1.0,
            };
            let plan = plan_tiles(&req, None, OffsetStrategy::Centered).unwrap();
            let n = plan.grid.tiles_per_side as f64;
            let min_side = tile_width.min(tile_height) as f64;

            prop_assert!(n * min_side >= extent);
            prop_assert!((n - 1.0) * min_side < extent);
        }

        /// Property: the cap is enforced exactly at n² > cap.
        #[test]
        fn prop_cap_boundary(tile in 1u32..50, extent in 1.0f64..5000.0, cap in 1u64..20_000) {
            let req = TileRequest {
                tile_width: tile,
                tile_height: tile,
                canvas_extent: extent,
                rotation_degrees: 0.0,
                opacity: 1.0,
            };
            let n = (extent / tile as f64).ceil() as u64;
            let result = plan_tiles(&req, Some(cap), OffsetStrategy::Centered);
            prop_assert_eq!(result.is_ok(), n * n <= cap);
        }

        /// Property: mirrored rotations give mirrored offsets.
        #[test]
        fn prop_offset_is_odd(rotation in -360.0f64..360.0, extent in 1.0f64..10_000.0) {
            let a = rotation_offset(rotation, extent);
            let b = rotation_offset(-rotation, extent);
            prop_assert!((a + b).abs() < 1e-6);
        }

        /// Property: a centered pattern of coverage extent covers any target.
        #[test]
        fn prop_centered_always_covers(
            width in 1.0f64..4000.0,
            height in 1.0f64..4000.0,
            rotation in -360.0f64..360.0,
        ) {
            let req = TileRequest {
                tile_width: 500,
                tile_height: 500,
                canvas_extent: coverage_extent(width.hypot(height)),
                rotation_degrees: rotation,
                opacity: 1.0,
            };
            let plan = plan_tiles(&req, None, OffsetStrategy::Centered).unwrap();
            prop_assert!(plan.covers(width, height));
        }
    }
}
