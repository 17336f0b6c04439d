//! Integrity gate every generated tile set passes before promotion

use crate::io::error::{Result, integrity_error};
use crate::tileset::model::TileSet;

/// Rejects empty sets, missing tiles and inconsistent dimensions
pub struct TileSetValidator;

impl TileSetValidator {
    /// Whether the tile set may be promoted
    pub fn is_valid(tile_set: &TileSet) -> bool {
        Self::validate(tile_set).is_ok()
    }

    /// Check the tile set, reporting the first violation
    ///
    /// # Errors
    ///
    /// Returns `Integrity` if:
    /// - The tile size is zero
    /// - The set holds no tiles
    /// - Edge patterns and tiles differ in count
    /// - A tile is zero-sized or not `tile_size` square
    /// - The quality metric is not a finite number
    pub fn validate(tile_set: &TileSet) -> Result<()> {
        if tile_set.tile_size == 0 {
            return Err(integrity_error(&"tile size must be positive"));
        }
        if tile_set.is_empty() {
            return Err(integrity_error(&"tile set is empty"));
        }
        if tile_set.edge_patterns.len() != tile_set.tiles.len() {
            return Err(integrity_error(&format!(
                "{} edge patterns for {} tiles",
                tile_set.edge_patterns.len(),
                tile_set.tiles.len()
            )));
        }

        for (index, tile) in tile_set.tiles.iter().enumerate() {
            if tile.width() == 0 || tile.height() == 0 {
                return Err(integrity_error(&format!("tile {index} is missing")));
            }
            if tile.width() != tile_set.tile_size || tile.height() != tile_set.tile_size {
                return Err(integrity_error(&format!(
                    "tile {index} is {}x{}, expected {size}x{size}",
                    tile.width(),
                    tile.height(),
                    size = tile_set.tile_size
                )));
            }
        }

        if !tile_set.quality.is_finite() {
            return Err(integrity_error(&"quality metric is not finite"));
        }

        Ok(())
    }
}
