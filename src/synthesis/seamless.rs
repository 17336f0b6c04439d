//! Turn an arbitrary image into a tileable one by offset and cross-fade

use crate::io::error::{Result, generation_error};
use crate::math::interpolation::{hann, lerp_rgba};
use crate::tileset::model::{EdgePattern, TileSet};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

/// Blend an image with its half-offset copy so opposite borders match
///
/// The copy shifted by half the width and height wraps toroidally, so its
/// borders are continuous. A separable Hann window keeps the original in the
/// centre and hands over to the shifted copy near every border.
pub fn make_seamless(source: &RgbaImage) -> RgbaImage {
    let (width, height) = source.dimensions();
    if width == 0 || height == 0 {
        return source.clone();
    }

    let half_x = width / 2;
    let half_y = height / 2;
    RgbaImage::from_fn(width, height, |x, y| {
        let original = source.get_pixel(x, y).0;
        let shifted = source
            .get_pixel((x + half_x) % width, (y + half_y) % height)
            .0;
        let weight = hann(x, width) * hann(y, height);
        Rgba(lerp_rgba(shifted, original, weight))
    })
}

/// Resize a source image to the tile size and make it seamless
///
/// # Errors
///
/// Returns an error if the source image or the tile size is empty
pub fn create_seamless_from_image(source: &RgbaImage, tile_size: u32) -> Result<TileSet> {
    if source.width() == 0 || source.height() == 0 {
        return Err(generation_error("seamless", &"source image is empty"));
    }
    if tile_size == 0 {
        return Err(generation_error(
            "seamless",
            &"tile edge length must be positive",
        ));
    }

    let resized = if source.dimensions() == (tile_size, tile_size) {
        source.clone()
    } else {
        imageops::resize(source, tile_size, tile_size, FilterType::Triangle)
    };

    let mut tile_set = TileSet::new(tile_size);
    tile_set.push(make_seamless(&resized), EdgePattern::uniform(0));
    Ok(tile_set)
}
