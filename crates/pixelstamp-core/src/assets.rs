//! Image asset loading.
//!
//! The pipelines never open files themselves; they ask an [`AssetSource`]
//! for decoded RGBA images. [`FsAssets`] reads from disk, [`MemoryAssets`]
//! serves images that are already in memory.

use image::RgbaImage;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading an image asset.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The referenced file does not exist.
    #[error("Image not found: {}", path.display())]
    Missing { path: PathBuf },

    /// The file exists but could not be decoded.
    #[error("Failed to decode {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },
}

/// Source of decoded images.
pub trait AssetSource {
    /// Load the image at `path` as RGBA.
    fn load_image(&self, path: &Path) -> Result<RgbaImage, AssetError>;
}

/// Loads images from the filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsAssets;

impl AssetSource for FsAssets {
    fn load_image(&self, path: &Path) -> Result<RgbaImage, AssetError> {
        if !path.is_file() {
            return Err(AssetError::Missing {
                path: path.to_path_buf(),
            });
        }

        let decoded = image::open(path).map_err(|e| AssetError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), width = decoded.width(), height = decoded.height(), "loaded image");
        Ok(decoded.to_rgba8())
    }
}

/// Read an image's dimensions from its header without decoding the pixels.
pub fn image_dimensions(path: &Path) -> Result<(u32, u32), AssetError> {
    if !path.is_file() {
        return Err(AssetError::Missing {
            path: path.to_path_buf(),
        });
    }
    image::image_dimensions(path).map_err(|e| AssetError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// In-memory image store keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    images: HashMap<PathBuf, RgbaImage>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `image` under `path`, replacing any previous entry.
    pub fn insert(&mut self, path: impl Into<PathBuf>, image: RgbaImage) {
        self.images.insert(path.into(), image);
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl AssetSource for MemoryAssets {
    fn load_image(&self, path: &Path) -> Result<RgbaImage, AssetError> {
        self.images
            .get(path)
            .cloned()
            .ok_or_else(|| AssetError::Missing {
                path: path.to_path_buf(),
            })
    }
}
