//! Range validation and schema migration for generation settings

use crate::io::configuration::{
    CURRENT_SCHEMA_VERSION, DEFAULT_COLOR_TOLERANCE, DEFAULT_CONTINUITY, DEFAULT_LACUNARITY,
    DEFAULT_LAYOUT_HEIGHT, DEFAULT_LAYOUT_WIDTH, DEFAULT_MAX_COLORS, DEFAULT_NOISE_SCALE,
    DEFAULT_PARALLAX_LAYERS, DEFAULT_PERSISTENCE, DEFAULT_SIMPLIFICATION_TOLERANCE,
    DEFAULT_TARGET_RESOLUTION, DEFAULT_VARIETY, DEFAULT_WANG_TILE_COUNT, MAX_LAYOUT_CELLS, MAX_OCTAVES,
    MAX_PALETTE_COLORS, MAX_PARALLAX_LAYERS, MAX_TILE_SIZE, MAX_WANG_TILE_COUNT,
    MIGRATION_MAX_TILE_SIZE, MIGRATION_MIN_TILE_SIZE, MIN_OCTAVES, MIN_WANG_TILE_COUNT,
};
use crate::io::error::{GeneratorError, Result, invalid_parameter};
use crate::settings::config::GenerationConfig;
use tracing::debug;

/// Gatekeeper for generation settings
///
/// Generation must not start unless [`SettingsValidator::validate`] accepts the
/// configuration. Older presets are brought forward with
/// [`SettingsValidator::migrate`], which always returns a fresh value.
pub struct SettingsValidator;

impl SettingsValidator {
    /// Whether every field lies inside its documented range
    pub fn validate(config: &GenerationConfig) -> bool {
        Self::check(config).is_ok()
    }

    /// Check every field, reporting the first violation
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` naming the first out-of-range field
    pub fn check(config: &GenerationConfig) -> Result<()> {
        if config.tile_size == 0 || config.tile_size > MAX_TILE_SIZE {
            return Err(invalid_parameter(
                "tile_size",
                &config.tile_size,
                &format!("must be in (0, {MAX_TILE_SIZE}]"),
            ));
        }
        if !(MIN_OCTAVES..=MAX_OCTAVES).contains(&config.octaves) {
            return Err(invalid_parameter(
                "octaves",
                &config.octaves,
                &format!("must be in [{MIN_OCTAVES}, {MAX_OCTAVES}]"),
            ));
        }
        check_unit("continuity", config.continuity)?;
        check_unit("variety", config.variety)?;

        if !config.noise_scale.is_finite() || config.noise_scale <= 0.0 {
            return Err(invalid_parameter(
                "noise_scale",
                &config.noise_scale,
                &"must be a positive number",
            ));
        }
        if !config.persistence.is_finite()
            || config.persistence <= 0.0
            || config.persistence > 1.0
        {
            return Err(invalid_parameter(
                "persistence",
                &config.persistence,
                &"must be in (0, 1]",
            ));
        }
        if !config.lacunarity.is_finite() || config.lacunarity < 1.0 || config.lacunarity > 4.0 {
            return Err(invalid_parameter(
                "lacunarity",
                &config.lacunarity,
                &"must be in [1, 4]",
            ));
        }
        if config.parallax_layers == 0 || config.parallax_layers > MAX_PARALLAX_LAYERS {
            return Err(invalid_parameter(
                "parallax_layers",
                &config.parallax_layers,
                &format!("must be in [1, {MAX_PARALLAX_LAYERS}]"),
            ));
        }
        if !(MIN_WANG_TILE_COUNT..=MAX_WANG_TILE_COUNT).contains(&config.wang_tile_count) {
            return Err(invalid_parameter(
                "wang_tile_count",
                &config.wang_tile_count,
                &format!("must be in [{MIN_WANG_TILE_COUNT}, {MAX_WANG_TILE_COUNT}]"),
            ));
        }
        let layout = format!("{}x{}", config.layout_width, config.layout_height);
        if config.layout_width == 0 || config.layout_height == 0 {
            return Err(invalid_parameter(
                "layout",
                &layout,
                &"layout dimensions must be positive",
            ));
        }
        let cells = (config.layout_width as usize).checked_mul(config.layout_height as usize);
        if cells.is_none_or(|cells| cells > MAX_LAYOUT_CELLS) {
            return Err(invalid_parameter(
                "layout",
                &layout,
                &format!("layout must have at most {MAX_LAYOUT_CELLS} cells"),
            ));
        }
        check_unit("color_tolerance", config.color_tolerance)?;
        if config.max_colors == 0 || config.max_colors > MAX_PALETTE_COLORS {
            return Err(invalid_parameter(
                "max_colors",
                &config.max_colors,
                &format!("must be in [1, {MAX_PALETTE_COLORS}]"),
            ));
        }
        if !config.simplification_tolerance.is_finite() || config.simplification_tolerance < 0.0 {
            return Err(invalid_parameter(
                "simplification_tolerance",
                &config.simplification_tolerance,
                &"must be a non-negative number",
            ));
        }
        if config.target_resolution == 0 || config.target_resolution > MAX_TILE_SIZE {
            return Err(invalid_parameter(
                "target_resolution",
                &config.target_resolution,
                &format!("must be in (0, {MAX_TILE_SIZE}]"),
            ));
        }
        Ok(())
    }

    /// Whether the settings already carry the current schema version
    pub const fn is_current_version(config: &GenerationConfig) -> bool {
        config.schema_version == CURRENT_SCHEMA_VERSION
    }

    /// Bring settings written with `from_version` up to `to_version`
    ///
    /// Fields introduced after `from_version` that hold unset values are filled
    /// with defaults, tile size is clamped into the canonical range and the
    /// unit coefficients into [0, 1]. Applying the migration to its own output
    /// changes nothing but the version stamp.
    ///
    /// # Errors
    ///
    /// Returns `Migration` if `to_version` is newer than this crate understands
    /// or older than `from_version`
    pub fn migrate(
        config: &GenerationConfig,
        from_version: u32,
        to_version: u32,
    ) -> Result<GenerationConfig> {
        if to_version > CURRENT_SCHEMA_VERSION {
            return Err(GeneratorError::Migration {
                from: from_version,
                to: to_version,
                reason: format!("newest known schema is v{CURRENT_SCHEMA_VERSION}"),
            });
        }
        if from_version > to_version {
            return Err(GeneratorError::Migration {
                from: from_version,
                to: to_version,
                reason: "downgrades are not supported".to_string(),
            });
        }

        let mut migrated = config.clone();

        // v0 presets predate layered noise shaping, Wang layouts and geometrization
        if from_version < 1 {
            fill_v1_defaults(&mut migrated);
        }

        migrated.tile_size = migrated
            .tile_size
            .clamp(MIGRATION_MIN_TILE_SIZE, MIGRATION_MAX_TILE_SIZE);
        migrated.continuity = clamp_unit(migrated.continuity, DEFAULT_CONTINUITY);
        migrated.variety = clamp_unit(migrated.variety, DEFAULT_VARIETY);
        migrated.octaves = migrated.octaves.clamp(MIN_OCTAVES, MAX_OCTAVES);
        migrated.schema_version = to_version;

        debug!(
            from_version,
            to_version,
            tile_size = migrated.tile_size,
            "Migrated generation settings"
        );

        Ok(migrated)
    }
}

fn check_unit(parameter: &'static str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid_parameter(parameter, &value, &"must be in [0, 1]"))
    }
}

fn clamp_unit(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        fallback
    }
}

fn fill_v1_defaults(config: &mut GenerationConfig) {
    if !config.noise_scale.is_finite() || config.noise_scale <= 0.0 {
        config.noise_scale = DEFAULT_NOISE_SCALE;
    }
    if !config.persistence.is_finite() || config.persistence <= 0.0 {
        config.persistence = DEFAULT_PERSISTENCE;
    }
    if !config.lacunarity.is_finite() || config.lacunarity < 1.0 {
        config.lacunarity = DEFAULT_LACUNARITY;
    }
    if config.parallax_layers == 0 {
        config.parallax_layers = DEFAULT_PARALLAX_LAYERS;
    }
    if config.wang_tile_count == 0 {
        config.wang_tile_count = DEFAULT_WANG_TILE_COUNT;
    }
    if config.layout_width == 0 {
        config.layout_width = DEFAULT_LAYOUT_WIDTH;
    }
    if config.layout_height == 0 {
        config.layout_height = DEFAULT_LAYOUT_HEIGHT;
    }
    if !config.color_tolerance.is_finite() || config.color_tolerance < 0.0 {
        config.color_tolerance = DEFAULT_COLOR_TOLERANCE;
    }
    if config.max_colors == 0 {
        config.max_colors = DEFAULT_MAX_COLORS;
    }
    if !config.simplification_tolerance.is_finite() || config.simplification_tolerance < 0.0 {
        config.simplification_tolerance = DEFAULT_SIMPLIFICATION_TOLERANCE;
    }
    if config.target_resolution == 0 {
        config.target_resolution = DEFAULT_TARGET_RESOLUTION;
    }
}
