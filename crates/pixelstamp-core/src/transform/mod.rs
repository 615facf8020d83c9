//! Raster transformations: resize, crop and rotation.
//!
//! These operate on RGBA images and are the raster counterparts of the
//! pure computations in [`crate::geometry`] and [`crate::tiles`].
//!
//! # Coordinate System
//!
//! - Crop windows are in pixel coordinates of the source image
//! - Rotation angles are in degrees, positive = clockwise on screen
//!   (the y axis points down)
//! - Origin is top-left corner

mod crop;
mod resize;
mod rotation;

pub use crop::apply_crop;
pub use resize::{aspect_fill_image, resize_exact, RESAMPLE_FILTER};
pub use rotation::{apply_rotation, compute_rotated_bounds};
