//! Sampling-based edge compatibility checks for Wang tile sets

use crate::io::configuration::{
    BORDER_CONSISTENCY_THRESHOLD, BORDER_DELTA_E_THRESHOLD, BORDER_SAMPLE_COUNT,
};
use crate::math::color::pixel_delta_e;
use crate::tileset::model::{Side, TileSet};
use image::{Rgba, RgbaImage};
use std::fmt::Write as _;

/// Maximum number of individual disagreements listed in diagnostics
const MAX_REPORTED_MISMATCHES: usize = 5;

/// Outcome of validating every edge of a Wang tile set
#[derive(Clone, Debug, PartialEq)]
pub struct ValidationResult {
    /// Consistency above threshold and no visual cuts
    pub has_valid_borders: bool,
    /// Some edges declared compatible by their patterns do not match visually
    pub has_visual_cuts: bool,
    /// Fraction of edge checks where patterns and pixels agree, in [0, 1]
    pub border_consistency: f32,
    /// Human-readable description of the disagreements found
    pub error_details: String,
}

/// Compares the pixels along shared edges of tile pairs
///
/// Compatibility is decided from the pixels: a fixed number of points is
/// sampled along both edges and the mean ΔE must stay under a threshold.
#[derive(Clone, Debug)]
pub struct BorderValidator {
    sample_count: usize,
    delta_e_threshold: f64,
    consistency_threshold: f32,
}

impl Default for BorderValidator {
    fn default() -> Self {
        Self::new(
            BORDER_SAMPLE_COUNT,
            BORDER_DELTA_E_THRESHOLD,
            BORDER_CONSISTENCY_THRESHOLD,
        )
    }
}

impl BorderValidator {
    /// Validator with explicit sampling and threshold settings
    pub const fn new(
        sample_count: usize,
        delta_e_threshold: f64,
        consistency_threshold: f32,
    ) -> Self {
        Self {
            sample_count,
            delta_e_threshold,
            consistency_threshold,
        }
    }

    /// Mean ΔE between the edge of `tile_a` on `side` and the facing edge of `tile_b`
    ///
    /// `tile_b` is taken to sit on `side` of `tile_a`. Samples are spread
    /// over the edge without its two corner pixels, which also belong to the
    /// neighbouring sides; edges of one or two pixels are sampled whole.
    /// Returns `None` when either tile is zero-sized or no samples are
    /// configured.
    pub fn edge_distance(&self, tile_a: &RgbaImage, tile_b: &RgbaImage, side: Side) -> Option<f64> {
        let length = edge_length(tile_a, side).min(edge_length(tile_b, side));
        if length == 0 || self.sample_count == 0 || tile_a.width() == 0 || tile_b.width() == 0 {
            return None;
        }

        let (start, span) = if length > 2 {
            (1, u64::from(length - 2))
        } else {
            (0, u64::from(length))
        };
        let samples = self.sample_count as u64;
        let mut total = 0.0;
        for i in 0..samples {
            let offset = start + ((2 * i + 1) * span / (2 * samples)) as u32;
            let a = edge_pixel(tile_a, side, offset)?;
            let b = edge_pixel(tile_b, side.opposite(), offset)?;
            total += pixel_delta_e(a, b);
        }
        Some(total / samples as f64)
    }

    /// Whether `tile_b` visually continues `tile_a` across `side`
    pub fn check(&self, tile_a: &RgbaImage, tile_b: &RgbaImage, side: Side) -> bool {
        self.edge_distance(tile_a, tile_b, side)
            .is_some_and(|distance| distance < self.delta_e_threshold)
    }

    /// Check every ordered tile pair on every side against the declared patterns
    ///
    /// A check agrees when the patterns and the pixels give the same verdict.
    /// A visual cut is a pair the patterns declare compatible whose pixels do
    /// not match; the layout solver would place such a pair and show a seam.
    pub fn validate_set(&self, tile_set: &TileSet) -> ValidationResult {
        if tile_set.is_empty() || tile_set.edge_patterns.len() != tile_set.tiles.len() {
            return ValidationResult {
                has_valid_borders: false,
                has_visual_cuts: false,
                border_consistency: 0.0,
                error_details: "tile set is empty or missing edge patterns".to_string(),
            };
        }

        let mut checks = 0usize;
        let mut agreements = 0usize;
        let mut cuts = 0usize;
        let mut mismatches = Vec::new();

        for (a, (tile_a, pattern_a)) in tile_set
            .tiles
            .iter()
            .zip(&tile_set.edge_patterns)
            .enumerate()
        {
            for (b, (tile_b, pattern_b)) in tile_set
                .tiles
                .iter()
                .zip(&tile_set.edge_patterns)
                .enumerate()
            {
                for side in Side::ALL {
                    let declared = pattern_a.matches(pattern_b, side);
                    let sampled = self.check(tile_a, tile_b, side);
                    checks += 1;
                    if declared == sampled {
                        agreements += 1;
                        continue;
                    }
                    if declared {
                        cuts += 1;
                    }
                    if mismatches.len() < MAX_REPORTED_MISMATCHES {
                        mismatches.push((a, b, side, declared));
                    }
                }
            }
        }

        let border_consistency = agreements as f32 / checks as f32;
        let has_visual_cuts = cuts > 0;
        let has_valid_borders = border_consistency > self.consistency_threshold && !has_visual_cuts;

        let mut error_details = String::new();
        if checks > agreements {
            let _ = write!(
                error_details,
                "{} of {checks} edge checks disagree ({cuts} visual cuts)",
                checks - agreements
            );
            for (a, b, side, declared) in mismatches {
                let verdict = if declared {
                    "declared compatible but differs"
                } else {
                    "declared incompatible but matches"
                };
                let _ = write!(error_details, "; tile {a} {} of tile {b}: {verdict}", side.name());
            }
        }

        ValidationResult {
            has_valid_borders,
            has_visual_cuts,
            border_consistency,
            error_details,
        }
    }
}

fn edge_length(tile: &RgbaImage, side: Side) -> u32 {
    match side {
        Side::Top | Side::Bottom => tile.width(),
        Side::Left | Side::Right => tile.height(),
    }
}

fn edge_pixel(tile: &RgbaImage, side: Side, offset: u32) -> Option<Rgba<u8>> {
    let (width, height) = tile.dimensions();
    let (x, y) = match side {
        Side::Top => (offset, 0),
        Side::Bottom => (offset, height.checked_sub(1)?),
        Side::Left => (0, offset),
        Side::Right => (width.checked_sub(1)?, offset),
    };
    tile.get_pixel_checked(x, y).copied()
}
