//! Seeded, periodic fractal noise heightmaps
//!
//! Every octave samples a lattice that wraps around the tile, so the
//! heightmap repeats seamlessly. Lattice values come from an integer hash and
//! interpolation uses only multiply and add, so a given parameter set yields
//! the same bytes on every run and platform.

use crate::io::configuration::{
    DEFAULT_LACUNARITY, DEFAULT_PERSISTENCE, NOISE_CYCLES_PER_UNIT_SCALE,
};
use crate::io::error::{Result, generation_error, invalid_parameter};
use crate::math::interpolation::{lerp, quintic_fade};
use crate::settings::config::{GenerationConfig, NoiseKind};
use image::{Rgba, RgbaImage};
use ndarray::Array2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Parameters of one heightmap
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseParams {
    /// Heightmap edge length in pixels
    pub edge: u32,
    /// Frequency scale; `scale × 40` lattice cells span the first octave
    pub scale: f32,
    /// Number of fractal layers
    pub octaves: u32,
    /// Amplitude factor between octaves
    pub persistence: f32,
    /// Frequency factor between octaves
    pub lacunarity: f32,
    /// Seed for the per-octave phase draws
    pub seed: u64,
    /// Basis function
    pub kind: NoiseKind,
}

impl NoiseParams {
    /// Standard fractal parameters: amplitude halves and frequency doubles
    pub const fn new(edge: u32, scale: f32, octaves: u32, seed: u64) -> Self {
        Self {
            edge,
            scale,
            octaves,
            persistence: DEFAULT_PERSISTENCE,
            lacunarity: DEFAULT_LACUNARITY,
            seed,
            kind: NoiseKind::Perlin,
        }
    }

    /// Parameters taken from a generation config
    pub const fn from_config(config: &GenerationConfig) -> Self {
        Self {
            edge: config.tile_size,
            scale: config.noise_scale,
            octaves: config.octaves,
            persistence: config.persistence,
            lacunarity: config.lacunarity,
            seed: config.seed,
            kind: config.noise_kind,
        }
    }
}

/// One fractal layer with its own wrapped lattice
#[derive(Clone, Copy, Debug)]
struct Octave {
    cycles: u32,
    amplitude: f64,
    phase_x: f64,
    phase_y: f64,
    salt: u64,
}

/// Produces grayscale heightmaps from layered periodic noise
pub struct NoiseSynthesizer;

impl NoiseSynthesizer {
    /// Heightmap with standard fractal parameters
    ///
    /// # Errors
    ///
    /// Returns an error if `edge` is zero or the scale is not positive
    pub fn synthesize(edge: u32, scale: f32, octaves: u32, seed: u64) -> Result<RgbaImage> {
        Self::synthesize_with(&NoiseParams::new(edge, scale, octaves, seed))
    }

    /// Heightmap quantized to 8-bit gray with full opacity
    ///
    /// # Errors
    ///
    /// Returns an error if the edge or octave count is zero or the scale is
    /// not positive
    pub fn synthesize_with(params: &NoiseParams) -> Result<RgbaImage> {
        let field = Self::heightfield(params)?;
        let mut image = RgbaImage::new(params.edge, params.edge);
        for ((row, col), &value) in field.indexed_iter() {
            let level = (value * 255.0).round().clamp(0.0, 255.0) as u8;
            image.put_pixel(col as u32, row as u32, Rgba([level, level, level, 255]));
        }
        Ok(image)
    }

    /// Normalized heightfield in [0, 1], indexed `[row, col]`
    ///
    /// # Errors
    ///
    /// Returns an error if the edge or octave count is zero or the scale is
    /// not positive
    pub fn heightfield(params: &NoiseParams) -> Result<Array2<f64>> {
        if params.edge == 0 {
            return Err(generation_error(
                "noise",
                &"heightmap edge length must be positive",
            ));
        }
        if params.octaves == 0 {
            return Err(invalid_parameter(
                "octaves",
                &params.octaves,
                &"at least one octave is required",
            ));
        }
        if !params.scale.is_finite() || params.scale <= 0.0 {
            return Err(invalid_parameter(
                "noise_scale",
                &params.scale,
                &"must be a positive number",
            ));
        }

        let octaves = draw_octaves(params);
        let edge = params.edge as usize;
        let inverse_edge = 1.0 / f64::from(params.edge);

        let mut field = Array2::<f64>::zeros((edge, edge));
        for ((row, col), value) in field.indexed_iter_mut() {
            let u = col as f64 * inverse_edge;
            let v = row as f64 * inverse_edge;
            let mut sum = 0.0;
            for octave in &octaves {
                let sample = match params.kind {
                    NoiseKind::Perlin | NoiseKind::Simplex => value_noise(octave, u, v),
                    NoiseKind::Worley => cellular_noise(octave, u, v),
                };
                sum += octave.amplitude * sample;
            }
            *value = sum;
        }

        normalize(&mut field);
        Ok(field)
    }
}

/// Draw one phase offset per octave from the seeded generator
fn draw_octaves(params: &NoiseParams) -> Vec<Octave> {
    let mut rng = Pcg32::seed_from_u64(params.seed);
    let base_cycles = (f64::from(params.scale) * NOISE_CYCLES_PER_UNIT_SCALE)
        .round()
        .max(1.0);
    let max_cycles = f64::from(params.edge.max(1));

    let mut frequency = 1.0f64;
    let mut amplitude = 1.0f64;
    let mut octaves = Vec::with_capacity(params.octaves as usize);

    for _ in 0..params.octaves {
        let phase: u64 = rng.random();
        // Whole cycles per tile keep every octave periodic
        let cycles = (base_cycles * frequency).round().clamp(1.0, max_cycles) as u32;
        octaves.push(Octave {
            cycles,
            amplitude,
            phase_x: (phase >> 40) as f64 / f64::from(1u32 << 24),
            phase_y: ((phase >> 16) & 0x00FF_FFFF) as f64 / f64::from(1u32 << 24),
            salt: phase,
        });
        frequency *= f64::from(params.lacunarity);
        amplitude *= f64::from(params.persistence);
    }

    octaves
}

fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Hash a wrapped lattice coordinate to a value in [0, 1)
fn lattice_value(ix: u64, iy: u64, salt: u64) -> f64 {
    let h = mix64(
        salt ^ ix.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ iy.wrapping_mul(0xC2B2_AE3D_27D4_EB4F),
    );
    (h >> 11) as f64 / (1u64 << 53) as f64
}

fn wrap(index: f64, cycles: u32) -> u64 {
    (index as i64).rem_euclid(i64::from(cycles)) as u64
}

/// Smoothly interpolated value noise on a lattice wrapping every `cycles` cells
fn value_noise(octave: &Octave, u: f64, v: f64) -> f64 {
    let cycles = f64::from(octave.cycles);
    let x = (u + octave.phase_x) * cycles;
    let y = (v + octave.phase_y) * cycles;
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = quintic_fade(x - x0);
    let fy = quintic_fade(y - y0);

    let ix0 = wrap(x0, octave.cycles);
    let ix1 = wrap(x0 + 1.0, octave.cycles);
    let iy0 = wrap(y0, octave.cycles);
    let iy1 = wrap(y0 + 1.0, octave.cycles);

    let top = lerp(
        lattice_value(ix0, iy0, octave.salt),
        lattice_value(ix1, iy0, octave.salt),
        fx,
    );
    let bottom = lerp(
        lattice_value(ix0, iy1, octave.salt),
        lattice_value(ix1, iy1, octave.salt),
        fx,
    );
    lerp(top, bottom, fy)
}

/// Distance to the nearest jittered feature point, one point per wrapped cell
fn cellular_noise(octave: &Octave, u: f64, v: f64) -> f64 {
    let cycles = f64::from(octave.cycles);
    let x = (u + octave.phase_x) * cycles;
    let y = (v + octave.phase_y) * cycles;
    let cell_x = x.floor();
    let cell_y = y.floor();

    let mut nearest = f64::MAX;
    for dy in -1i32..=1 {
        for dx in -1i32..=1 {
            let nx = cell_x + f64::from(dx);
            let ny = cell_y + f64::from(dy);
            let ix = wrap(nx, octave.cycles);
            let iy = wrap(ny, octave.cycles);
            let jitter_x = lattice_value(ix, iy, octave.salt);
            let jitter_y = lattice_value(iy, ix, !octave.salt);
            let px = nx + jitter_x - x;
            let py = ny + jitter_y - y;
            nearest = nearest.min(px.mul_add(px, py * py));
        }
    }

    nearest.sqrt().min(1.0)
}

/// Stretch the field so its minimum maps to 0 and maximum to 1
fn normalize(field: &mut Array2<f64>) {
    let (min, max) = field
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let range = max - min;
    if range <= f64::EPSILON {
        field.fill(0.5);
        return;
    }
    field.mapv_inplace(|v| (v - min) / range);
}
