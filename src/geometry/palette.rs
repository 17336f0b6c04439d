//! Colour segmentation and palette reduction

use crate::math::color::{Lab, delta_e76, srgb_to_lab};
use image::RgbaImage;
use std::collections::HashMap;

/// ΔE corresponding to a colour tolerance of 1.0
const TOLERANCE_DELTA_E_SCALE: f64 = 100.0;

/// Extract representative colours of an image, most frequent first
///
/// Distinct colours are visited in descending frequency (ties broken by
/// value). A colour joins the first cluster whose representative lies within
/// `tolerance × 100` ΔE, otherwise it starts a new cluster. Representatives
/// are the most frequent colour of their cluster.
pub fn segment_by_color(image: &RgbaImage, tolerance: f32) -> Vec<[u8; 3]> {
    let mut histogram: HashMap<[u8; 3], usize> = HashMap::new();
    for pixel in image.pixels() {
        let [r, g, b, _] = pixel.0;
        *histogram.entry([r, g, b]).or_insert(0) += 1;
    }

    let mut colors: Vec<([u8; 3], usize)> = histogram.into_iter().collect();
    colors.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let threshold = f64::from(tolerance.max(0.0)) * TOLERANCE_DELTA_E_SCALE;
    let mut representatives: Vec<([u8; 3], Lab)> = Vec::new();
    for (color, _) in colors {
        let lab = srgb_to_lab(color);
        let merged = representatives
            .iter()
            .any(|(_, existing)| delta_e76(*existing, lab) <= threshold);
        if !merged {
            representatives.push((color, lab));
        }
    }

    representatives.into_iter().map(|(color, _)| color).collect()
}

/// Shrink a palette to at most `max_colors` entries by even subsampling
///
/// Keeps order; entry `i` of the result is entry `i × len / max_colors` of
/// the input. Palettes already within the limit are returned unchanged.
pub fn reduce_palette(palette: &[[u8; 3]], max_colors: usize) -> Vec<[u8; 3]> {
    if palette.len() <= max_colors {
        return palette.to_vec();
    }
    (0..max_colors)
        .filter_map(|i| palette.get(i * palette.len() / max_colors).copied())
        .collect()
}

/// Index of the palette entry perceptually closest to `color`
pub fn nearest_index(palette_lab: &[Lab], color: [u8; 3]) -> Option<usize> {
    let lab = srgb_to_lab(color);
    palette_lab
        .iter()
        .enumerate()
        .map(|(index, entry)| (index, delta_e76(*entry, lab)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _)| index)
}

/// Label every pixel with its nearest palette entry
///
/// Returns row-major labels. Caches the lookup per distinct colour.
pub fn label_pixels(image: &RgbaImage, palette: &[[u8; 3]]) -> Vec<usize> {
    let palette_lab: Vec<Lab> = palette.iter().map(|&c| srgb_to_lab(c)).collect();
    let mut cache: HashMap<[u8; 3], usize> = HashMap::new();
    image
        .pixels()
        .map(|pixel| {
            let [r, g, b, _] = pixel.0;
            let color = [r, g, b];
            *cache
                .entry(color)
                .or_insert_with(|| nearest_index(&palette_lab, color).unwrap_or(0))
        })
        .collect()
}
