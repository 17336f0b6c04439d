//! Wang tile synthesis: tiles whose border bands carry edge-class colours
//!
//! Top and bottom edges use the horizontal classes `0..H`, left and right
//! edges the vertical classes `H..H+V`. Every class has one colour for the
//! whole set, and the outermost pixel row or column of a side is painted
//! exactly that colour, so two edges of the same class sample as identical
//! and the sampling border check agrees with the declared patterns.

use crate::io::configuration::{WANG_HORIZONTAL_CLASSES, WANG_VERTICAL_CLASSES};
use crate::io::error::{Result, generation_error, invalid_parameter};
use crate::math::interpolation::{lerp_rgba, smoothstep};
use crate::settings::config::GenerationConfig;
use crate::tileset::model::{EdgePattern, Side, TileSet};
use image::{Rgba, RgbaImage};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Channel range of the set's base colour
const BASE_CHANNEL_MIN: u8 = 64;
const BASE_CHANNEL_MAX: u8 = 192;

/// Per-channel magnitude range of the class colour offsets
const CLASS_OFFSET_MIN: i32 = 24;
const CLASS_OFFSET_MAX: i32 = 40;

/// Base jitter at full variety, per channel
const MAX_BASE_JITTER: f32 = 48.0;

/// Number of (top, left) class combinations a set needs to cover
const CORNER_COMBINATIONS: usize = (WANG_HORIZONTAL_CLASSES * WANG_VERTICAL_CLASSES) as usize;

/// Colours and patterns of one tile set, drawn from a single seed
#[derive(Clone, Debug)]
struct WangPlan {
    class_colors: Vec<[u8; 3]>,
    patterns: Vec<EdgePattern>,
    bases: Vec<[u8; 3]>,
}

/// Produces colour-coded Wang tiles
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WangTileSynthesizer {
    continuity: f32,
    variety: f32,
}

impl Default for WangTileSynthesizer {
    fn default() -> Self {
        Self::from_config(&GenerationConfig::default())
    }
}

impl WangTileSynthesizer {
    /// Synthesizer with explicit continuity and variety, both clamped to [0, 1]
    pub const fn new(continuity: f32, variety: f32) -> Self {
        Self {
            continuity: continuity.clamp(0.0, 1.0),
            variety: variety.clamp(0.0, 1.0),
        }
    }

    /// Synthesizer using the config's continuity and variety
    pub const fn from_config(config: &GenerationConfig) -> Self {
        Self::new(config.continuity, config.variety)
    }

    /// Width of the blended border band for a given tile edge
    ///
    /// Grows with continuity from 5% to 25% of the edge, at least 2 pixels
    /// and never more than half the tile.
    pub fn band_width(&self, edge: u32) -> u32 {
        let fraction = 0.2f64.mul_add(f64::from(self.continuity), 0.05);
        let band = (f64::from(edge) * fraction).round().max(2.0) as u32;
        band.min(edge / 2).max(1)
    }

    /// Edge patterns of a `count`-tile set
    ///
    /// The first tiles cover every (top, left) class combination so a
    /// row-major layout always has a candidate for the next cell.
    pub fn edge_patterns(&self, count: usize, seed: u64) -> Vec<EdgePattern> {
        self.plan(count, seed).patterns
    }

    /// Paint `count` tiles of `edge` pixels
    ///
    /// # Errors
    ///
    /// Returns an error if `count` or `edge` is zero
    pub fn synthesize_tiles(&self, count: usize, edge: u32, seed: u64) -> Result<Vec<RgbaImage>> {
        Ok(self.synthesize_set(count, edge, seed)?.tiles)
    }

    /// Paint `count` tiles and pair them with their edge patterns
    ///
    /// # Errors
    ///
    /// Returns an error if `count` or `edge` is zero
    pub fn synthesize_set(&self, count: usize, edge: u32, seed: u64) -> Result<TileSet> {
        if count == 0 {
            return Err(invalid_parameter(
                "wang_tile_count",
                &count,
                &"at least one tile is required",
            ));
        }
        if edge == 0 {
            return Err(generation_error(
                "wang synthesis",
                &"tile edge length must be positive",
            ));
        }

        let plan = self.plan(count, seed);
        let band = self.band_width(edge);
        let mut tile_set = TileSet::new(edge);
        for (pattern, base) in plan.patterns.iter().zip(&plan.bases) {
            let tile = paint_tile(edge, band, *pattern, *base, &plan.class_colors);
            tile_set.push(tile, *pattern);
        }
        Ok(tile_set)
    }

    fn plan(&self, count: usize, seed: u64) -> WangPlan {
        let mut rng = Pcg32::seed_from_u64(seed);

        let base: [u8; 3] = std::array::from_fn(|_| rng.random_range(BASE_CHANNEL_MIN..=BASE_CHANNEL_MAX));
        let horizontal = draw_offset(&mut rng);
        let mut vertical = draw_offset(&mut rng);
        if vertical == horizontal {
            vertical = vertical.map(|channel| -channel);
        }

        let mut class_colors = class_group(base, horizontal, WANG_HORIZONTAL_CLASSES);
        class_colors.extend(class_group(base, vertical, WANG_VERTICAL_CLASSES));

        let patterns = draw_patterns(&mut rng, count);

        let jitter = f64::from(self.variety * MAX_BASE_JITTER);
        let bases = (0..count)
            .map(|_| {
                base.map(|channel| {
                    let shift = if jitter > 0.0 {
                        rng.random_range(-jitter..=jitter)
                    } else {
                        0.0
                    };
                    (f64::from(channel) + shift).round().clamp(0.0, 255.0) as u8
                })
            })
            .collect();

        WangPlan {
            class_colors,
            patterns,
            bases,
        }
    }
}

/// Random offset vector with each component `±[24, 40]`
fn draw_offset(rng: &mut Pcg32) -> [i32; 3] {
    std::array::from_fn(|_| {
        let magnitude = rng.random_range(CLASS_OFFSET_MIN..=CLASS_OFFSET_MAX);
        if rng.random::<bool>() {
            magnitude
        } else {
            -magnitude
        }
    })
}

/// Colours of a class group spread symmetrically along `offset`
fn class_group(base: [u8; 3], offset: [i32; 3], classes: u32) -> Vec<[u8; 3]> {
    let span = classes.saturating_sub(1).max(1) as f64;
    (0..classes)
        .map(|class| {
            let factor = 2.0f64.mul_add(-(f64::from(class) / span), 1.0);
            let mut color = [0u8; 3];
            for ((slot, &channel), &delta) in color.iter_mut().zip(&base).zip(&offset) {
                let value = f64::from(delta).mul_add(factor, f64::from(channel));
                *slot = value.round().clamp(0.0, 255.0) as u8;
            }
            color
        })
        .collect()
}

/// Pattern for a (top, left) combination and a (bottom, right) pair index
const fn pattern_for(corner: usize, pair: usize) -> EdgePattern {
    let h = WANG_HORIZONTAL_CLASSES as usize;
    EdgePattern::new(
        (corner % h) as u32,
        (h + pair / h) as u32,
        (pair % h) as u32,
        (h + corner / h) as u32,
    )
}

fn draw_patterns(rng: &mut Pcg32, count: usize) -> Vec<EdgePattern> {
    let mut pairs: Vec<usize> = Vec::with_capacity(count);
    for index in 0..count {
        let pair = if index < CORNER_COMBINATIONS || index >= 2 * CORNER_COMBINATIONS {
            rng.random_range(0..CORNER_COMBINATIONS)
        } else {
            // Second round gives each corner combination a different exit
            let previous = pairs
                .get(index - CORNER_COMBINATIONS)
                .copied()
                .unwrap_or(0);
            (previous + 1 + rng.random_range(0..CORNER_COMBINATIONS - 1)) % CORNER_COMBINATIONS
        };
        pairs.push(pair);
    }

    pairs
        .iter()
        .enumerate()
        .map(|(index, &pair)| pattern_for(index % CORNER_COMBINATIONS, pair))
        .collect()
}

/// Nearest side of pixel `(x, y)` and its distance; ties go to Top, Right, Bottom, Left
fn nearest_side(x: u32, y: u32, edge: u32) -> (Side, u32) {
    let last = edge - 1;
    let candidates = [
        (Side::Top, y),
        (Side::Right, last - x),
        (Side::Bottom, last - y),
        (Side::Left, x),
    ];
    candidates
        .into_iter()
        .fold((Side::Top, u32::MAX), |best, candidate| {
            if candidate.1 < best.1 { candidate } else { best }
        })
}

fn paint_tile(
    edge: u32,
    band: u32,
    pattern: EdgePattern,
    base: [u8; 3],
    class_colors: &[[u8; 3]],
) -> RgbaImage {
    let base_rgba = [base[0], base[1], base[2], 255];
    let side_colors = Side::ALL.map(|side| {
        let class = pattern.get(side) as usize;
        class_colors
            .get(class)
            .map_or(base_rgba, |c| [c[0], c[1], c[2], 255])
    });

    RgbaImage::from_fn(edge, edge, |x, y| {
        let (side, distance) = nearest_side(x, y, edge);
        if distance >= band {
            return Rgba(base_rgba);
        }
        let edge_color = match side {
            Side::Top => side_colors[0],
            Side::Right => side_colors[1],
            Side::Bottom => side_colors[2],
            Side::Left => side_colors[3],
        };
        let t = smoothstep(0.0, f64::from(band), f64::from(distance));
        Rgba(lerp_rgba(edge_color, base_rgba, t))
    })
}
