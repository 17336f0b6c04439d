//! Patch quilting onto a toroidal canvas

use crate::io::error::{Result, generation_error};
use crate::tileset::model::{EdgePattern, TileSet};
use image::{Rgba, RgbaImage};
use ndarray::{Array2, Array3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Smallest patch edge the quilter works with
pub const MIN_PATCH_SIZE: u32 = 8;

/// Quilts random source patches into a tileable texture
///
/// Patches overlap by a quarter of their edge and are feathered linearly
/// towards their borders. Placement wraps around the output, so the last
/// column and row of patches blend into the first.
#[derive(Clone, Copy, Debug, Default)]
pub struct TextureSynthesizer {
    patch_size: Option<u32>,
}

impl TextureSynthesizer {
    /// Synthesizer with a fixed patch edge instead of a quarter of the output
    pub const fn with_patch_size(patch_size: u32) -> Self {
        Self {
            patch_size: Some(patch_size),
        }
    }

    /// Patch edge used for a given sample and output size
    pub fn patch_size_for(&self, sample: &RgbaImage, output: u32) -> u32 {
        let limit = sample.width().min(sample.height()).min(output.max(1));
        self.patch_size
            .unwrap_or(output / 4)
            .max(MIN_PATCH_SIZE)
            .min(limit)
    }

    /// Quilt a `size`×`size` texture from `sample`
    ///
    /// # Errors
    ///
    /// Returns an error if `size` is zero or the sample is smaller than
    /// the minimum patch
    pub fn synthesize(&self, sample: &RgbaImage, size: u32, seed: u64) -> Result<RgbaImage> {
        if size == 0 {
            return Err(generation_error(
                "texture synthesis",
                &"tile edge length must be positive",
            ));
        }
        if sample.width() < MIN_PATCH_SIZE || sample.height() < MIN_PATCH_SIZE {
            return Err(generation_error(
                "texture synthesis",
                &format!(
                    "sample is {}x{}, needs at least {MIN_PATCH_SIZE}x{MIN_PATCH_SIZE}",
                    sample.width(),
                    sample.height()
                ),
            ));
        }

        let patch = self.patch_size_for(sample, size);
        let overlap = patch / 4;
        let step = (patch - overlap).max(1);
        let placements = size.div_ceil(step);
        let feather = feather_ramp(patch, overlap);

        let edge = size as usize;
        let mut color = Array3::<f64>::zeros((edge, edge, 4));
        let mut weight = Array2::<f64>::zeros((edge, edge));
        let mut rng = Pcg32::seed_from_u64(seed);

        for gy in 0..placements {
            for gx in 0..placements {
                let source_x = rng.random_range(0..=sample.width() - patch);
                let source_y = rng.random_range(0..=sample.height() - patch);
                for (py, &wy) in (0..patch).zip(&feather) {
                    for (px, &wx) in (0..patch).zip(&feather) {
                        let out_x = ((gx * step + px) % size) as usize;
                        let out_y = ((gy * step + py) % size) as usize;
                        let w = wx * wy;
                        let pixel = sample.get_pixel(source_x + px, source_y + py);
                        for (channel, &value) in pixel.0.iter().enumerate() {
                            if let Some(slot) = color.get_mut((out_y, out_x, channel)) {
                                *slot += w * f64::from(value);
                            }
                        }
                        if let Some(slot) = weight.get_mut((out_y, out_x)) {
                            *slot += w;
                        }
                    }
                }
            }
        }

        Ok(RgbaImage::from_fn(size, size, |x, y| {
            let (col, row) = (x as usize, y as usize);
            let total = weight.get((row, col)).copied().unwrap_or(0.0);
            let mut out = [0u8; 4];
            if total > 0.0 {
                for (channel, slot) in out.iter_mut().enumerate() {
                    let sum = color.get((row, col, channel)).copied().unwrap_or(0.0);
                    *slot = (sum / total).round().clamp(0.0, 255.0) as u8;
                }
            }
            Rgba(out)
        }))
    }

    /// Quilt one tile and wrap it in a tile set
    ///
    /// # Errors
    ///
    /// Returns an error if synthesis fails
    pub fn synthesize_set(&self, sample: &RgbaImage, tile_size: u32, seed: u64) -> Result<TileSet> {
        let tile = self.synthesize(sample, tile_size, seed)?;
        let mut tile_set = TileSet::new(tile_size);
        tile_set.push(tile, EdgePattern::uniform(0));
        Ok(tile_set)
    }
}

/// Linear feather weights across one patch edge, strictly positive
fn feather_ramp(patch: u32, overlap: u32) -> Vec<f64> {
    let width = f64::from(overlap + 1);
    (0..patch)
        .map(|i| {
            let rising = f64::from(i + 1) / width;
            let falling = f64::from(patch - i) / width;
            rising.min(falling).min(1.0)
        })
        .collect()
}
