//! Export artifacts: tile images, packed atlas, preset and Wang compatibility record

use crate::io::configuration::{ATLAS_FILE_NAME, COMPATIBILITY_FILE_NAME, PRESET_FILE_NAME};
use crate::io::error::{GeneratorError, Result, integrity_error};
use crate::io::image::RasterCodec;
use crate::settings::config::{GenerationConfig, GenerationMode, NoiseKind};
use crate::tileset::border::ValidationResult;
use crate::tileset::model::TileSet;
use image::RgbaImage;
use image::imageops;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Parameters specific to the generation mode
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ModeParameters {
    /// Noise settings
    Procedural {
        /// Noise basis
        noise_kind: NoiseKind,
        /// Frequency scale
        noise_scale: f32,
        /// Octave count
        octaves: u32,
        /// Amplitude factor between octaves
        persistence: f32,
        /// Frequency factor between octaves
        lacunarity: f32,
        /// Parallax layer count
        parallax_layers: u32,
    },
    /// Wang synthesis and layout settings
    WangTiles {
        /// Tiles in the set
        tile_count: u32,
        /// Border band smoothness
        continuity: f32,
        /// Per-tile colour jitter
        variety: f32,
        /// Layout width in tiles
        layout_width: u32,
        /// Layout height in tiles
        layout_height: u32,
    },
    /// Geometrization settings
    Geometrization {
        /// Colour merge tolerance
        color_tolerance: f32,
        /// Palette limit
        max_colors: u32,
        /// Outline tolerance
        simplification_tolerance: f32,
        /// Output resolution
        target_resolution: u32,
        /// Border snapping
        optimize_for_tiling: bool,
    },
    /// Seamless conversion of a source image
    SeamlessFromImage {
        /// Source image path
        source_image: Option<PathBuf>,
    },
    /// Patch quilting from a source image
    TextureSynthesis {
        /// Source image path
        source_image: Option<PathBuf>,
    },
}

impl ModeParameters {
    /// Parameters of the config's mode
    pub fn from_config(config: &GenerationConfig) -> Self {
        match config.mode {
            GenerationMode::Procedural => Self::Procedural {
                noise_kind: config.noise_kind,
                noise_scale: config.noise_scale,
                octaves: config.octaves,
                persistence: config.persistence,
                lacunarity: config.lacunarity,
                parallax_layers: config.parallax_layers,
            },
            GenerationMode::WangTiles => Self::WangTiles {
                tile_count: config.wang_tile_count,
                continuity: config.continuity,
                variety: config.variety,
                layout_width: config.layout_width,
                layout_height: config.layout_height,
            },
            GenerationMode::Geometrization => Self::Geometrization {
                color_tolerance: config.color_tolerance,
                max_colors: config.max_colors,
                simplification_tolerance: config.simplification_tolerance,
                target_resolution: config.target_resolution,
                optimize_for_tiling: config.optimize_for_tiling,
            },
            GenerationMode::SeamlessFromImage => Self::SeamlessFromImage {
                source_image: config.source_image.clone(),
            },
            GenerationMode::TextureSynthesis => Self::TextureSynthesis {
                source_image: config.source_image.clone(),
            },
        }
    }
}

/// Quality figures stored with a preset
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    /// Seam difference metric in [0, 1]
    pub delta_e: f32,
    /// Wang border consistency, absent for other modes
    pub border_consistency: Option<f32>,
    /// Number of tiles
    pub tile_count: usize,
}

/// Everything needed to reproduce and judge a generated tile set
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PresetDescription {
    /// Settings schema version
    pub schema_version: u32,
    /// Mode name
    pub mode: String,
    /// Generation seed
    pub seed: u64,
    /// Tile edge length
    pub tile_size: u32,
    /// Mode-specific settings
    pub parameters: ModeParameters,
    /// Hex digest identifying the reproducible inputs
    pub reproducibility_hash: String,
    /// Quality of the exported set
    pub quality: QualityMetrics,
}

/// Edge pattern of one tile in the compatibility record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityEntry {
    /// Tile index, matching the atlas order
    pub tile: usize,
    /// Classes as `[top, right, bottom, left]`
    pub edges: [u32; 4],
}

/// Files written by one export
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportSummary {
    /// One image per tile
    pub tile_files: Vec<PathBuf>,
    /// Packed atlas image
    pub atlas: PathBuf,
    /// Preset JSON
    pub preset: PathBuf,
    /// Compatibility JSON, Wang mode only
    pub compatibility: Option<PathBuf>,
    /// Hash stored in the preset
    pub reproducibility_hash: String,
}

/// Digest of `(mode, seed, tile size, scale, octaves)`
///
/// Hashes the mode name, a zero byte, then the little-endian encodings of the
/// seed, tile size, the scale's IEEE-754 bits and the octave count.
pub fn reproducibility_hash(config: &GenerationConfig) -> String {
    let mut input = Vec::with_capacity(64);
    input.extend_from_slice(config.mode.name().as_bytes());
    input.push(0);
    input.extend_from_slice(&config.seed.to_le_bytes());
    input.extend_from_slice(&config.tile_size.to_le_bytes());
    input.extend_from_slice(&config.noise_scale.to_bits().to_le_bytes());
    input.extend_from_slice(&config.octaves.to_le_bytes());
    blake3::hash(&input).to_hex().to_string()
}

/// Preset for a tile set generated from `config`
pub fn build_preset(
    config: &GenerationConfig,
    tile_set: &TileSet,
    validation: Option<&ValidationResult>,
) -> PresetDescription {
    PresetDescription {
        schema_version: config.schema_version,
        mode: config.mode.name().to_string(),
        seed: config.seed,
        tile_size: tile_set.tile_size,
        parameters: ModeParameters::from_config(config),
        reproducibility_hash: reproducibility_hash(config),
        quality: QualityMetrics {
            delta_e: tile_set.quality,
            border_consistency: validation.map(|v| v.border_consistency),
            tile_count: tile_set.len(),
        },
    }
}

/// Tiles per atlas row: the smallest `k` with `k² ≥ count`
pub const fn tiles_per_row(count: usize) -> usize {
    let mut per_row = 0usize;
    while per_row * per_row < count {
        per_row += 1;
    }
    per_row
}

/// Pack all tiles into one image in row-major order
///
/// # Errors
///
/// Returns an error if the set is empty or its tile size is zero
pub fn pack_atlas(tile_set: &TileSet) -> Result<RgbaImage> {
    if tile_set.is_empty() || tile_set.tile_size == 0 {
        return Err(integrity_error(&"cannot pack an empty tile set"));
    }
    let per_row = tiles_per_row(tile_set.len());
    let rows = tile_set.len().div_ceil(per_row);
    let size = tile_set.tile_size;

    let mut atlas = RgbaImage::new(per_row as u32 * size, rows as u32 * size);
    for (index, tile) in tile_set.tiles.iter().enumerate() {
        let x = (index % per_row) as i64 * i64::from(size);
        let y = (index / per_row) as i64 * i64::from(size);
        imageops::replace(&mut atlas, tile, x, y);
    }
    Ok(atlas)
}

/// Edge patterns of every tile, in atlas order
pub fn compatibility_record(tile_set: &TileSet) -> Vec<CompatibilityEntry> {
    tile_set
        .edge_patterns
        .iter()
        .enumerate()
        .map(|(tile, pattern)| CompatibilityEntry {
            tile,
            edges: pattern.as_array(),
        })
        .collect()
}

/// Serialize a value as pretty JSON to `path`
///
/// # Errors
///
/// Returns an error if serialization or writing fails
pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let text = serde_json::to_string_pretty(value).map_err(|source| {
        GeneratorError::Serialization {
            path: path.to_path_buf(),
            source,
        }
    })?;
    std::fs::write(path, text).map_err(|source| GeneratorError::FileSystem {
        path: path.to_path_buf(),
        operation: "write",
        source,
    })
}

/// Write tiles, atlas, preset and (for Wang mode) compatibility record
///
/// # Errors
///
/// Returns an error if the directory cannot be created or any artifact
/// fails to encode or write
pub fn export_tile_set(
    tile_set: &TileSet,
    config: &GenerationConfig,
    validation: Option<&ValidationResult>,
    directory: &Path,
    codec: &dyn RasterCodec,
) -> Result<ExportSummary> {
    std::fs::create_dir_all(directory).map_err(|source| GeneratorError::FileSystem {
        path: directory.to_path_buf(),
        operation: "create directory",
        source,
    })?;

    let mut tile_files = Vec::with_capacity(tile_set.len());
    for (index, tile) in tile_set.tiles.iter().enumerate() {
        let path = directory.join(format!("tile_{index}.png"));
        codec.save(tile, &path)?;
        tile_files.push(path);
    }

    let atlas = directory.join(ATLAS_FILE_NAME);
    codec.save(&pack_atlas(tile_set)?, &atlas)?;

    let description = build_preset(config, tile_set, validation);
    let preset = directory.join(PRESET_FILE_NAME);
    write_json(&description, &preset)?;

    let mut compatibility = None;
    if config.mode == GenerationMode::WangTiles {
        let path = directory.join(COMPATIBILITY_FILE_NAME);
        write_json(&compatibility_record(tile_set), &path)?;
        compatibility = Some(path);
    }

    info!(
        directory = %directory.display(),
        tiles = tile_files.len(),
        hash = %description.reproducibility_hash,
        "tile set exported"
    );

    Ok(ExportSummary {
        tile_files,
        atlas,
        preset,
        compatibility,
        reproducibility_hash: description.reproducibility_hash,
    })
}
