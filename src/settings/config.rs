//! Generation configuration value and its mode enumerations

use crate::io::configuration::{
    CURRENT_SCHEMA_VERSION, DEFAULT_COLOR_TOLERANCE, DEFAULT_CONTINUITY, DEFAULT_LACUNARITY,
    DEFAULT_LAYOUT_HEIGHT, DEFAULT_LAYOUT_WIDTH, DEFAULT_MAX_COLORS, DEFAULT_NOISE_SCALE,
    DEFAULT_OCTAVES, DEFAULT_OPTIMIZE_FOR_TILING, DEFAULT_PARALLAX_LAYERS, DEFAULT_PERSISTENCE,
    DEFAULT_SEED, DEFAULT_SIMPLIFICATION_TOLERANCE, DEFAULT_TARGET_RESOLUTION, DEFAULT_TILE_SIZE,
    DEFAULT_VARIETY, DEFAULT_WANG_TILE_COUNT,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Generative algorithm used to produce a tile set
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum GenerationMode {
    /// Layered periodic noise, coloured through a height palette
    #[default]
    Procedural,
    /// Edge-coloured tiles arranged by the backtracking layout solver
    WangTiles,
    /// Source image reduced to flat-coloured polygons
    Geometrization,
    /// Source image made tileable by offset and windowed cross-fade
    SeamlessFromImage,
    /// Patch quilting from a source sample on a toroidal canvas
    TextureSynthesis,
}

impl GenerationMode {
    /// Every supported mode
    pub const ALL: [Self; 5] = [
        Self::Procedural,
        Self::WangTiles,
        Self::Geometrization,
        Self::SeamlessFromImage,
        Self::TextureSynthesis,
    ];

    /// Stable name used in logs and exported presets
    pub const fn name(self) -> &'static str {
        match self {
            Self::Procedural => "Procedural",
            Self::WangTiles => "WangTiles",
            Self::Geometrization => "Geometrization",
            Self::SeamlessFromImage => "SeamlessFromImage",
            Self::TextureSynthesis => "TextureSynthesis",
        }
    }

    /// Whether the mode reads a source image
    pub const fn requires_source_image(self) -> bool {
        matches!(
            self,
            Self::Geometrization | Self::SeamlessFromImage | Self::TextureSynthesis
        )
    }
}

/// Basis used by the noise synthesizer
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum NoiseKind {
    /// Layered periodic value noise
    #[default]
    Perlin,
    /// Same basis as `Perlin`
    Simplex,
    /// Periodic cellular noise (distance to nearest feature point)
    Worley,
}

/// Complete description of one generation request
///
/// Treated as a value: callers replace it wholesale after validation or
/// migration instead of mutating fields of a live configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Generation mode
    pub mode: GenerationMode,
    /// Tile edge length in pixels
    pub tile_size: u32,
    /// How smoothly tile edges blend into the tile body, in [0, 1]
    pub continuity: f32,
    /// How much tiles differ from one another, in [0, 1]
    pub variety: f32,
    /// Seed for every stochastic choice
    pub seed: u64,
    /// Noise basis
    pub noise_kind: NoiseKind,
    /// Noise frequency scale
    pub noise_scale: f32,
    /// Fractal octave count
    pub octaves: u32,
    /// Amplitude factor between octaves
    pub persistence: f32,
    /// Frequency factor between octaves
    pub lacunarity: f32,
    /// Number of procedural layers, one tile each
    pub parallax_layers: u32,
    /// Schema version these settings were written with
    pub schema_version: u32,
    /// Number of Wang tiles to synthesize
    pub wang_tile_count: u32,
    /// Wang layout width in tiles
    pub layout_width: u32,
    /// Wang layout height in tiles
    pub layout_height: u32,
    /// Colour merge tolerance for geometrization, in [0, 1]
    pub color_tolerance: f32,
    /// Maximum palette size for geometrization
    pub max_colors: u32,
    /// Polygon simplification tolerance in output pixels
    pub simplification_tolerance: f32,
    /// Geometrization output resolution
    pub target_resolution: u32,
    /// Snap geometrized vertices to tile borders
    pub optimize_for_tiling: bool,
    /// Source image for image-driven modes
    pub source_image: Option<PathBuf>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            mode: GenerationMode::default(),
            tile_size: DEFAULT_TILE_SIZE,
            continuity: DEFAULT_CONTINUITY,
            variety: DEFAULT_VARIETY,
            seed: DEFAULT_SEED,
            noise_kind: NoiseKind::default(),
            noise_scale: DEFAULT_NOISE_SCALE,
            octaves: DEFAULT_OCTAVES,
            persistence: DEFAULT_PERSISTENCE,
            lacunarity: DEFAULT_LACUNARITY,
            parallax_layers: DEFAULT_PARALLAX_LAYERS,
            schema_version: CURRENT_SCHEMA_VERSION,
            wang_tile_count: DEFAULT_WANG_TILE_COUNT,
            layout_width: DEFAULT_LAYOUT_WIDTH,
            layout_height: DEFAULT_LAYOUT_HEIGHT,
            color_tolerance: DEFAULT_COLOR_TOLERANCE,
            max_colors: DEFAULT_MAX_COLORS,
            simplification_tolerance: DEFAULT_SIMPLIFICATION_TOLERANCE,
            target_resolution: DEFAULT_TARGET_RESOLUTION,
            optimize_for_tiling: DEFAULT_OPTIMIZE_FOR_TILING,
            source_image: None,
        }
    }
}

impl GenerationConfig {
    /// Default settings for the given mode
    pub fn for_mode(mode: GenerationMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Same settings with a different seed
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Same settings with a different tile size
    #[must_use]
    pub const fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    /// Same settings reading from the given source image
    #[must_use]
    pub fn with_source_image(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_image = Some(path.into());
        self
    }

    /// Edge length of the tiles this configuration produces
    ///
    /// Geometrization renders at its own target resolution.
    pub const fn output_tile_size(&self) -> u32 {
        match self.mode {
            GenerationMode::Geometrization => self.target_resolution,
            _ => self.tile_size,
        }
    }
}
