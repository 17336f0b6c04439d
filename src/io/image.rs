//! Raster codec collaborator backed by the `image` crate

use crate::io::error::{GeneratorError, Result};
use image::RgbaImage;
use std::path::Path;

/// Loads and stores pixel buffers; the engine never inspects file formats
pub trait RasterCodec: Send + Sync {
    /// Read an image as 8-bit RGBA
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded
    fn load(&self, path: &Path) -> Result<RgbaImage>;

    /// Write an image, creating parent directories as needed
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or encoding fails
    fn save(&self, image: &RgbaImage, path: &Path) -> Result<()>;
}

/// Codec choosing the format from the file extension
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageCodec;

impl RasterCodec for ImageCodec {
    fn load(&self, path: &Path) -> Result<RgbaImage> {
        let decoded = image::open(path).map_err(|source| GeneratorError::ImageLoad {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(decoded.to_rgba8())
    }

    fn save(&self, image: &RgbaImage, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| GeneratorError::FileSystem {
                path: parent.to_path_buf(),
                operation: "create directory",
                source,
            })?;
        }
        image
            .save(path)
            .map_err(|source| GeneratorError::ImageExport {
                path: path.to_path_buf(),
                source,
            })
    }
}
