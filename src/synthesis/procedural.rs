//! Procedural mode: coloured noise tiles, one per parallax layer

use crate::io::configuration::PROCEDURAL_PALETTE;
use crate::io::error::Result;
use crate::math::interpolation::sample_ramp;
use crate::settings::config::GenerationConfig;
use crate::synthesis::noise::{NoiseParams, NoiseSynthesizer};
use crate::tileset::model::{EdgePattern, TileSet};
use image::{Rgba, RgbaImage};
use ndarray::Array2;
use tracing::debug;

/// Map a normalized heightfield through a colour ramp
pub fn colorize(heightfield: &Array2<f64>, palette: &[[u8; 3]]) -> RgbaImage {
    let (rows, cols) = heightfield.dim();
    let mut image = RgbaImage::new(cols as u32, rows as u32);
    for ((row, col), &height) in heightfield.indexed_iter() {
        image.put_pixel(col as u32, row as u32, Rgba(sample_ramp(palette, height)));
    }
    image
}

/// Noise parameters of parallax layer `layer`
///
/// Deeper layers use a shifted seed and a doubled frequency per level.
pub fn layer_params(config: &GenerationConfig, layer: u32) -> NoiseParams {
    let mut params = NoiseParams::from_config(config);
    params.seed = config.seed.wrapping_add(u64::from(layer));
    params.scale = config.noise_scale * 2f32.powi(layer as i32);
    params
}

/// Generate the procedural tile set, one coloured heightmap per layer
///
/// # Errors
///
/// Returns an error if noise synthesis rejects the parameters
pub fn generate_procedural(config: &GenerationConfig) -> Result<TileSet> {
    let layers = config.parallax_layers.max(1);
    let mut tile_set = TileSet::new(config.tile_size);

    for layer in 0..layers {
        let params = layer_params(config, layer);
        let heightfield = NoiseSynthesizer::heightfield(&params)?;
        tile_set.push(
            colorize(&heightfield, &PROCEDURAL_PALETTE),
            EdgePattern::uniform(0),
        );
        debug!(layer, seed = params.seed, scale = params.scale, "procedural layer done");
    }

    Ok(tile_set)
}
