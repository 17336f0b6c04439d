//! Seam quality metric: how far a tile's opposite borders are from matching

use crate::math::color::pixel_delta_e;
use crate::tileset::model::TileSet;
use image::RgbaImage;

/// ΔE that maps to the worst quality score of 1.0
const DELTA_E_SCALE: f64 = 100.0;

/// Mean ΔE between each tile's opposite border rows and columns
///
/// Measures the seam that appears when the tile repeats against itself.
/// Returns `None` for zero-sized tiles.
pub fn seam_delta_e(tile: &RgbaImage) -> Option<f64> {
    let (width, height) = tile.dimensions();
    if width == 0 || height == 0 {
        return None;
    }

    let mut total = 0.0;
    let mut samples = 0u64;

    for x in 0..width {
        total += pixel_delta_e(*tile.get_pixel(x, 0), *tile.get_pixel(x, height - 1));
        samples += 1;
    }
    for y in 0..height {
        total += pixel_delta_e(*tile.get_pixel(0, y), *tile.get_pixel(width - 1, y));
        samples += 1;
    }

    Some(total / samples as f64)
}

/// Quality score of a whole set in [0, 1]
///
/// The mean seam ΔE over all tiles divided by 100 and clamped. Empty sets
/// score the worst value.
pub fn measure_quality(tile_set: &TileSet) -> f32 {
    let scores: Vec<f64> = tile_set.tiles.iter().filter_map(seam_delta_e).collect();
    if scores.is_empty() {
        return 1.0;
    }
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    (mean / DELTA_E_SCALE).clamp(0.0, 1.0) as f32
}
