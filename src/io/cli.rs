//! Command-line interface: build a configuration, generate variants and export them

use crate::io::configuration::{DEFAULT_OUTPUT_DIR, PREVIEW_FILE_NAME};
use crate::io::error::{GeneratorError, Result};
use crate::io::export::ExportSummary;
use crate::io::progress::ProgressManager;
use crate::orchestrator::generator::{
    GenerationContext, GenerationOrchestrator, GenerationOutcome, GenerationPolicy,
};
use crate::settings::config::{GenerationConfig, GenerationMode, NoiseKind};
use crate::settings::validator::SettingsValidator;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "tilesmith")]
#[command(
    author,
    version,
    about = "Generate validated, seamlessly tileable background tile sets"
)]
/// Command-line arguments for the tile set generator
// Flags mirror independent user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Generation mode
    #[arg(short, long, value_enum)]
    pub mode: Option<GenerationMode>,

    /// JSON settings file; flags override its fields
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Random seed for reproducible generation
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Tile edge length in pixels
    #[arg(short, long)]
    pub tile_size: Option<u32>,

    /// Noise basis for procedural mode
    #[arg(long, value_enum)]
    pub noise: Option<NoiseKind>,

    /// Noise frequency scale
    #[arg(long)]
    pub scale: Option<f32>,

    /// Noise octave count
    #[arg(long)]
    pub octaves: Option<u32>,

    /// Procedural parallax layers, one tile each
    #[arg(long)]
    pub layers: Option<u32>,

    /// Border band smoothness for Wang tiles, in [0, 1]
    #[arg(long)]
    pub continuity: Option<f32>,

    /// Colour variation between Wang tiles, in [0, 1]
    #[arg(long)]
    pub variety: Option<f32>,

    /// Number of Wang tiles
    #[arg(long)]
    pub wang_tiles: Option<u32>,

    /// Wang layout width in tiles
    #[arg(long)]
    pub layout_width: Option<u32>,

    /// Wang layout height in tiles
    #[arg(long)]
    pub layout_height: Option<u32>,

    /// Source image for image-driven modes
    #[arg(short, long, value_name = "IMAGE")]
    pub input: Option<PathBuf>,

    /// Palette limit for geometrization
    #[arg(long)]
    pub max_colors: Option<u32>,

    /// Geometrization output resolution
    #[arg(long)]
    pub resolution: Option<u32>,

    /// Do not snap geometrized shapes to the tile border
    #[arg(long)]
    pub no_tiling_snap: bool,

    /// Output directory
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,

    /// Number of variants, using consecutive seeds
    #[arg(short = 'n', long, default_value_t = 1)]
    pub variants: u32,

    /// Reject Wang sets whose borders fail validation
    #[arg(long)]
    pub strict: bool,

    /// Also write a 3x3 preview composite
    #[arg(short, long)]
    pub preview: bool,

    /// Suppress progress output and lower log verbosity
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Settings from the config file (migrated if older) with flag overrides applied
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read, parsed or
    /// migrated, or if the resulting settings fail validation
    pub fn build_config(&self) -> Result<GenerationConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => GenerationConfig::default(),
        };

        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(tile_size) = self.tile_size {
            config.tile_size = tile_size;
        }
        if let Some(noise) = self.noise {
            config.noise_kind = noise;
        }
        if let Some(scale) = self.scale {
            config.noise_scale = scale;
        }
        if let Some(octaves) = self.octaves {
            config.octaves = octaves;
        }
        if let Some(layers) = self.layers {
            config.parallax_layers = layers;
        }
        if let Some(continuity) = self.continuity {
            config.continuity = continuity;
        }
        if let Some(variety) = self.variety {
            config.variety = variety;
        }
        if let Some(count) = self.wang_tiles {
            config.wang_tile_count = count;
        }
        if let Some(width) = self.layout_width {
            config.layout_width = width;
        }
        if let Some(height) = self.layout_height {
            config.layout_height = height;
        }
        if let Some(input) = &self.input {
            config.source_image = Some(input.clone());
        }
        if let Some(max_colors) = self.max_colors {
            config.max_colors = max_colors;
        }
        if let Some(resolution) = self.resolution {
            config.target_resolution = resolution;
        }
        if self.no_tiling_snap {
            config.optimize_for_tiling = false;
        }

        SettingsValidator::check(&config)?;
        Ok(config)
    }

    /// Orchestrator policy selected by the flags
    pub fn policy(&self) -> GenerationPolicy {
        GenerationPolicy {
            strict_borders: self.strict,
            ..GenerationPolicy::default()
        }
    }
}

/// Read a JSON settings file, migrating it if it predates the current schema
///
/// # Errors
///
/// Returns an error if reading, parsing or migration fails
pub fn load_config(path: &Path) -> Result<GenerationConfig> {
    let text = std::fs::read_to_string(path).map_err(|source| GeneratorError::FileSystem {
        path: path.to_path_buf(),
        operation: "read config",
        source,
    })?;
    let config: GenerationConfig =
        serde_json::from_str(&text).map_err(|source| GeneratorError::Serialization {
            path: path.to_path_buf(),
            source,
        })?;

    if SettingsValidator::is_current_version(&config) {
        return Ok(config);
    }
    SettingsValidator::migrate(
        &config,
        config.schema_version,
        crate::io::configuration::CURRENT_SCHEMA_VERSION,
    )
}

/// Generates and exports every requested variant
pub struct GenerationRunner {
    cli: Cli,
    orchestrator: GenerationOrchestrator,
}

impl GenerationRunner {
    /// Runner with the standard collaborators and the CLI's policy
    pub fn new(cli: Cli) -> Self {
        let context = GenerationContext::standard().with_policy(cli.policy());
        Self {
            cli,
            orchestrator: GenerationOrchestrator::new(context),
        }
    }

    /// Orchestrator driving the run
    pub const fn orchestrator(&self) -> &GenerationOrchestrator {
        &self.orchestrator
    }

    /// Generate, export and optionally preview each variant
    ///
    /// Variant `k` uses seed `seed + k`. With more than one variant, each is
    /// written to its own `variant_<k>` subdirectory. Stops at the first
    /// rejected generation.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid, a generation is
    /// rejected or writing output fails
    pub fn run(&mut self) -> Result<Vec<ExportSummary>> {
        let base = self.cli.build_config()?;
        let variants = u64::from(self.cli.variants.max(1));
        let progress = if self.cli.should_show_progress() {
            ProgressManager::new(variants)
        } else {
            ProgressManager::hidden(variants)
        };

        let mut summaries = Vec::new();
        for index in 0..variants {
            let config = base.clone().with_seed(base.seed.wrapping_add(index));
            progress.start_variant(index, config.seed);

            if let GenerationOutcome::Rejected { error, .. } = self.orchestrator.generate(&config) {
                progress.finish();
                return Err(error);
            }

            let directory = if variants == 1 {
                self.cli.output.clone()
            } else {
                self.cli.output.join(format!("variant_{index}"))
            };
            let summary = self.orchestrator.export_tile_set(&directory)?;

            if self.cli.preview {
                self.write_preview(&directory)?;
            }

            info!("{}", self.orchestrator.report().trim_end());
            summaries.push(summary);
            progress.complete_variant();
        }

        progress.finish();
        Ok(summaries)
    }

    fn write_preview(&mut self, directory: &Path) -> Result<()> {
        let composite = self.orchestrator.preview()?.composite.clone();
        self.orchestrator
            .context()
            .codec()
            .save(&composite, &directory.join(PREVIEW_FILE_NAME))?;
        self.orchestrator.apply_preview()
    }
}
