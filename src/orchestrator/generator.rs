use crate::geometry::pipeline::GeometrizationPipeline;
use crate::io::configuration::{
    DEFAULT_PREVIEW_COLS, DEFAULT_PREVIEW_ROWS, MAX_OPERATION_HISTORY, SOLVER_MAX_CELLS,
    SOLVER_NODE_BUDGET,
};
use crate::io::error::{GeneratorError, Result, generation_error};
use crate::io::export::{self, ExportSummary};
use crate::io::image::{ImageCodec, RasterCodec};
use crate::io::sink::{LoggingSink, TracingSink};
use crate::layout::solver::{LayoutOutcome, LayoutSolution, LayoutSolver};
use crate::orchestrator::operation::{GenerationOperation, OperationIdGenerator, OperationOutcome};
use crate::orchestrator::preview::{PreviewArtifact, PreviewHost, build_preview};
use crate::settings::config::{GenerationConfig, GenerationMode};
use crate::settings::validator::SettingsValidator;
use crate::synthesis::procedural::generate_procedural;
use crate::synthesis::seamless::create_seamless_from_image;
use crate::synthesis::texture::TextureSynthesizer;
use crate::synthesis::wang::WangTileSynthesizer;
use crate::tileset::border::{BorderValidator, ValidationResult};
use crate::tileset::integrity::TileSetValidator;
use crate::tileset::model::TileSet;
use crate::tileset::quality::measure_quality;
use image::RgbaImage;
use std::any::Any;
use std::fmt::{self, Write as _};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

const COMPONENT: &str = "generator";

/// Lifecycle state of the orchestrator
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GeneratorState {
    /// Nothing generated yet
    Idle,
    /// A generation call is running
    Generating,
    /// The last call produced the current tile set
    Accepted,
    /// The last call failed; the current tile set is empty
    Rejected,
    /// A preview of the current tile set is shown
    Previewing,
    /// The shown preview was confirmed
    Applied,
    /// The shown preview was dismissed
    Cancelled,
}

impl fmt::Display for GeneratorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Generating => "generating",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Previewing => "previewing",
            Self::Applied => "applied",
            Self::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Policy knobs of the orchestrator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenerationPolicy {
    /// Reject Wang sets whose borders fail validation instead of warning
    pub strict_borders: bool,
    /// Layout solver node budget
    pub solver_node_budget: usize,
    /// Largest layout grid the solver searches
    pub solver_max_cells: usize,
    /// Preview width in tiles
    pub preview_cols: u32,
    /// Preview height in tiles
    pub preview_rows: u32,
}

impl Default for GenerationPolicy {
    fn default() -> Self {
        Self {
            strict_borders: false,
            solver_node_budget: SOLVER_NODE_BUDGET,
            solver_max_cells: SOLVER_MAX_CELLS,
            preview_cols: DEFAULT_PREVIEW_COLS,
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

/// Collaborators and policy handed to the orchestrator at construction
pub struct GenerationContext {
    sink: Box<dyn LoggingSink>,
    codec: Box<dyn RasterCodec>,
    preview_host: Option<Box<dyn PreviewHost>>,
    policy: GenerationPolicy,
}

impl GenerationContext {
    /// Context with the given sink and codec, default policy and no preview host
    pub fn new(sink: Box<dyn LoggingSink>, codec: Box<dyn RasterCodec>) -> Self {
        Self {
            sink,
            codec,
            preview_host: None,
            policy: GenerationPolicy::default(),
        }
    }

    /// Context logging through `tracing` and reading files with the `image` crate
    pub fn standard() -> Self {
        Self::new(Box::new(TracingSink), Box::new(ImageCodec))
    }

    /// Attach a preview host
    #[must_use]
    pub fn with_preview_host(mut self, host: Box<dyn PreviewHost>) -> Self {
        self.preview_host = Some(host);
        self
    }

    /// Replace the policy
    #[must_use]
    pub const fn with_policy(mut self, policy: GenerationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Active policy
    pub const fn policy(&self) -> &GenerationPolicy {
        &self.policy
    }

    /// Raster codec used for sources and exports
    pub fn codec(&self) -> &dyn RasterCodec {
        self.codec.as_ref()
    }
}

/// Details of an accepted generation
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationReport {
    /// Identifier of the operation
    pub operation_id: String,
    /// Mode that ran
    pub mode: GenerationMode,
    /// Border validation, Wang mode only
    pub validation: Option<ValidationResult>,
    /// Solved layout, Wang mode only
    pub layout: Option<LayoutSolution>,
    /// Non-fatal problems found while generating
    pub warnings: Vec<String>,
    /// Whether the layout fell back to an unconstrained fill
    pub degraded: bool,
}

/// Result of `generate`: an accepted tile set or the reason it was rejected
#[derive(Debug)]
pub enum GenerationOutcome {
    /// The tile set passed validation and is now the last valid set
    Accepted {
        /// The accepted tiles
        tile_set: Arc<TileSet>,
        /// Validation and layout details
        report: GenerationReport,
    },
    /// Nothing was promoted
    Rejected {
        /// Why the attempt failed
        error: GeneratorError,
        /// Identifier of the operation
        operation_id: String,
    },
}

impl GenerationOutcome {
    /// Whether the attempt was accepted
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    /// Accepted tiles, if any
    pub fn tile_set(&self) -> Option<&TileSet> {
        match self {
            Self::Accepted { tile_set, .. } => Some(tile_set.as_ref()),
            Self::Rejected { .. } => None,
        }
    }

    /// Report of an accepted attempt
    pub const fn report(&self) -> Option<&GenerationReport> {
        match self {
            Self::Accepted { report, .. } => Some(report),
            Self::Rejected { .. } => None,
        }
    }

    /// Rejection reason
    pub const fn error(&self) -> Option<&GeneratorError> {
        match self {
            Self::Accepted { .. } => None,
            Self::Rejected { error, .. } => Some(error),
        }
    }

    /// Identifier of the operation either way
    pub fn operation_id(&self) -> &str {
        match self {
            Self::Accepted { report, .. } => &report.operation_id,
            Self::Rejected { operation_id, .. } => operation_id,
        }
    }

    /// Convert into a plain `Result`
    ///
    /// # Errors
    ///
    /// Returns the rejection reason for a rejected attempt
    pub fn into_result(self) -> Result<Arc<TileSet>> {
        match self {
            Self::Accepted { tile_set, .. } => Ok(tile_set),
            Self::Rejected { error, .. } => Err(error),
        }
    }
}

/// Everything a pipeline run produces besides the tiles
struct PipelineExtras {
    validation: Option<ValidationResult>,
    layout: Option<LayoutSolution>,
    warnings: Vec<String>,
}

/// Runs generation modes and guards which tile set is visible
///
/// Every `generate` call either replaces the last valid tile set with a
/// validated one or leaves it untouched. Mutating calls take `&mut self`, so
/// one instance never runs two generations at once; share it across threads
/// behind a mutex. Readers that must not block generation take a snapshot
/// with [`Self::last_valid_snapshot`].
pub struct GenerationOrchestrator {
    context: GenerationContext,
    state: GeneratorState,
    current: Arc<TileSet>,
    last_valid: Option<Arc<TileSet>>,
    last_valid_config: Option<GenerationConfig>,
    last_valid_report: Option<GenerationReport>,
    operations: Vec<GenerationOperation>,
    preview: Option<PreviewArtifact>,
    ids: OperationIdGenerator,
}

impl GenerationOrchestrator {
    /// Idle orchestrator using the given collaborators
    pub fn new(context: GenerationContext) -> Self {
        Self {
            context,
            state: GeneratorState::Idle,
            current: Arc::new(TileSet::default()),
            last_valid: None,
            last_valid_config: None,
            last_valid_report: None,
            operations: Vec::new(),
            preview: None,
            ids: OperationIdGenerator::new(),
        }
    }

    /// Current lifecycle state
    pub const fn state(&self) -> GeneratorState {
        self.state
    }

    /// Tile set currently shown; empty after a rejection
    pub fn current(&self) -> &TileSet {
        &self.current
    }

    /// Most recent accepted tile set
    pub fn last_valid(&self) -> Option<&TileSet> {
        self.last_valid.as_deref()
    }

    /// Shared handle to the last valid tile set, unaffected by later generations
    pub fn last_valid_snapshot(&self) -> Option<Arc<TileSet>> {
        self.last_valid.clone()
    }

    /// Configuration that produced the last valid tile set
    pub const fn last_valid_config(&self) -> Option<&GenerationConfig> {
        self.last_valid_config.as_ref()
    }

    /// Report of the last accepted generation
    pub const fn last_report(&self) -> Option<&GenerationReport> {
        self.last_valid_report.as_ref()
    }

    /// Most recent operations, oldest first
    ///
    /// Holds at most [`MAX_OPERATION_HISTORY`] entries.
    pub fn operations(&self) -> &[GenerationOperation] {
        &self.operations
    }

    /// Preview currently shown
    pub const fn preview_artifact(&self) -> Option<&PreviewArtifact> {
        self.preview.as_ref()
    }

    /// Collaborators and policy
    pub const fn context(&self) -> &GenerationContext {
        &self.context
    }

    /// Run one generation attempt
    ///
    /// Never panics and never returns a partially updated state: on success
    /// the validated set becomes both current and last valid; on failure the
    /// current set is emptied and the last valid set is kept.
    pub fn generate(&mut self, config: &GenerationConfig) -> GenerationOutcome {
        let id = self.ids.next_id();
        self.dismiss_preview();
        self.state = GeneratorState::Generating;
        self.context
            .sink
            .log_operation_start(&id, config.mode.name());
        let mut operation = GenerationOperation::new(id.clone(), config.clone());

        let result = catch_unwind(AssertUnwindSafe(|| self.run_pipeline(config)))
            .unwrap_or_else(|payload| Err(internal_fault(payload.as_ref())));

        match result {
            Ok((tile_set, extras)) => {
                for warning in &extras.warnings {
                    self.context.sink.log_warning(COMPONENT, warning);
                }
                let degraded = matches!(
                    extras.layout.as_ref().map(|layout| layout.outcome),
                    Some(LayoutOutcome::Fallback { .. })
                );
                let detail = format!(
                    "{} tiles, quality {:.3}{}",
                    tile_set.len(),
                    tile_set.quality,
                    if degraded { ", degraded layout" } else { "" }
                );
                let report = GenerationReport {
                    operation_id: id.clone(),
                    mode: config.mode,
                    validation: extras.validation,
                    layout: extras.layout,
                    warnings: extras.warnings,
                    degraded,
                };

                let tile_set = Arc::new(tile_set);
                self.current = Arc::clone(&tile_set);
                self.last_valid = Some(Arc::clone(&tile_set));
                self.last_valid_config = Some(config.clone());
                self.last_valid_report = Some(report.clone());
                self.state = GeneratorState::Accepted;

                operation.finish(OperationOutcome::Accepted, detail.clone());
                self.context.sink.log_operation_end(&id, true, &detail);
                self.record(operation);

                GenerationOutcome::Accepted { tile_set, report }
            }
            Err(error) => {
                let detail = format!("{} error: {error}", error.kind());
                self.context.sink.log_error(COMPONENT, &detail);

                self.current = Arc::new(TileSet::default());
                self.state = GeneratorState::Rejected;

                operation.finish(OperationOutcome::Rejected, detail.clone());
                self.context.sink.log_operation_end(&id, false, &detail);
                self.record(operation);

                GenerationOutcome::Rejected {
                    error,
                    operation_id: id,
                }
            }
        }
    }

    fn record(&mut self, operation: GenerationOperation) {
        if self.operations.len() >= MAX_OPERATION_HISTORY {
            let excess = self.operations.len() + 1 - MAX_OPERATION_HISTORY;
            self.operations.drain(..excess);
        }
        self.operations.push(operation);
    }

    /// Build a preview of the accepted tile set and hand it to the preview host
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` unless the current tile set is an accepted one
    /// and no preview is already shown
    pub fn preview(&mut self) -> Result<&PreviewArtifact> {
        let allowed = matches!(
            self.state,
            GeneratorState::Accepted | GeneratorState::Applied | GeneratorState::Cancelled
        );
        if !allowed || self.current.is_empty() {
            return Err(self.invalid_state("preview"));
        }

        let layout = self
            .last_valid_report
            .as_ref()
            .and_then(|report| report.layout.as_ref());
        let policy = self.context.policy;
        let artifact = build_preview(&self.current, layout, policy.preview_cols, policy.preview_rows)?;
        if let Some(host) = &self.context.preview_host {
            host.present(&artifact);
        }
        self.state = GeneratorState::Previewing;
        Ok(&*self.preview.insert(artifact))
    }

    /// Confirm the shown preview
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` when no preview is shown
    pub fn apply_preview(&mut self) -> Result<()> {
        if self.state != GeneratorState::Previewing {
            return Err(self.invalid_state("apply preview"));
        }
        self.dismiss_preview();
        self.state = GeneratorState::Applied;
        Ok(())
    }

    /// Dismiss the shown preview
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` when no preview is shown
    pub fn cancel_preview(&mut self) -> Result<()> {
        if self.state != GeneratorState::Previewing {
            return Err(self.invalid_state("cancel preview"));
        }
        self.dismiss_preview();
        self.state = GeneratorState::Cancelled;
        Ok(())
    }

    /// Restore the last valid tile set as current
    ///
    /// Returns `false` and changes nothing when no set was ever accepted.
    pub fn revert_to_last_valid(&mut self) -> bool {
        let Some(last_valid) = &self.last_valid else {
            return false;
        };
        self.current = Arc::clone(last_valid);
        self.dismiss_preview();
        self.state = GeneratorState::Accepted;
        debug!(tiles = self.current.len(), "reverted to last valid tile set");
        true
    }

    /// Export the last valid tile set with its preset and atlas
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if nothing was accepted yet, or an I/O error
    /// if writing fails
    pub fn export_tile_set(&self, directory: &Path) -> Result<ExportSummary> {
        let (Some(tile_set), Some(config)) = (&self.last_valid, &self.last_valid_config) else {
            return Err(self.invalid_state("export"));
        };
        let validation = self
            .last_valid_report
            .as_ref()
            .and_then(|report| report.validation.as_ref());
        export::export_tile_set(
            tile_set,
            config,
            validation,
            directory,
            self.context.codec(),
        )
    }

    /// Plain-text summary of the most recent operation
    pub fn report(&self) -> String {
        let mut text = String::new();
        let Some(operation) = self.operations.last() else {
            let _ = writeln!(text, "No generation has run.");
            return text;
        };

        let _ = writeln!(text, "Operation: {}", operation.id);
        let _ = writeln!(text, "Mode: {}", operation.config.mode.name());
        let _ = writeln!(text, "Seed: {}", operation.config.seed);
        let _ = writeln!(text, "Outcome: {}", operation.outcome);
        let _ = writeln!(text, "Detail: {}", operation.detail);

        let report = self
            .last_valid_report
            .as_ref()
            .filter(|report| report.operation_id == operation.id);
        if let (Some(report), Some(tile_set)) = (report, &self.last_valid) {
            let _ = writeln!(text, "Tiles: {}", tile_set.len());
            let _ = writeln!(text, "Tile size: {}", tile_set.tile_size);
            let _ = writeln!(text, "Delta E: {:.4}", tile_set.quality);
            if let Some(validation) = &report.validation {
                let _ = writeln!(
                    text,
                    "Border consistency: {:.4} (valid: {}, visual cuts: {})",
                    validation.border_consistency,
                    validation.has_valid_borders,
                    validation.has_visual_cuts
                );
            }
            if let Some(layout) = &report.layout {
                let status = match layout.outcome {
                    LayoutOutcome::Solved => "solved".to_string(),
                    LayoutOutcome::Fallback { reason } => format!("fallback ({reason})"),
                };
                let _ = writeln!(
                    text,
                    "Layout: {}x{} {status}, {} nodes",
                    layout.width(),
                    layout.height(),
                    layout.nodes_visited
                );
            }
            for warning in &report.warnings {
                let _ = writeln!(text, "Warning: {warning}");
            }
        }
        text
    }

    fn run_pipeline(&self, config: &GenerationConfig) -> Result<(TileSet, PipelineExtras)> {
        SettingsValidator::check(config)?;

        let mut tile_set = match config.mode {
            GenerationMode::Procedural => generate_procedural(config)?,
            GenerationMode::WangTiles => WangTileSynthesizer::from_config(config).synthesize_set(
                config.wang_tile_count as usize,
                config.tile_size,
                config.seed,
            )?,
            GenerationMode::Geometrization => {
                let source = self.load_source(config)?;
                GeometrizationPipeline::from_config(config).geometrize(&source)?
            }
            GenerationMode::SeamlessFromImage => {
                let source = self.load_source(config)?;
                create_seamless_from_image(&source, config.tile_size)?
            }
            GenerationMode::TextureSynthesis => {
                let source = self.load_source(config)?;
                TextureSynthesizer::default().synthesize_set(&source, config.tile_size, config.seed)?
            }
        };

        tile_set.quality = measure_quality(&tile_set);
        TileSetValidator::validate(&tile_set)?;

        let mut extras = PipelineExtras {
            validation: None,
            layout: None,
            warnings: Vec::new(),
        };
        if config.mode == GenerationMode::WangTiles {
            self.check_wang(&tile_set, config, &mut extras)?;
        }
        Ok((tile_set, extras))
    }

    fn check_wang(
        &self,
        tile_set: &TileSet,
        config: &GenerationConfig,
        extras: &mut PipelineExtras,
    ) -> Result<()> {
        let policy = self.context.policy;
        let validation = BorderValidator::default().validate_set(tile_set);
        if !validation.has_valid_borders {
            if policy.strict_borders {
                return Err(GeneratorError::BorderIncompatibility {
                    consistency: validation.border_consistency,
                    details: validation.error_details,
                });
            }
            extras.warnings.push(format!(
                "border consistency {:.3} below threshold: {}",
                validation.border_consistency, validation.error_details
            ));
        }
        extras.validation = Some(validation);

        let solver = LayoutSolver::new(policy.solver_node_budget, policy.solver_max_cells);
        let layout = solver.solve_layout(
            tile_set,
            config.layout_width as usize,
            config.layout_height as usize,
            config.seed,
        )?;
        if let LayoutOutcome::Fallback { reason } = layout.outcome {
            extras
                .warnings
                .push(format!("layout is not a valid tiling: {reason}"));
        }
        extras.layout = Some(layout);
        Ok(())
    }

    fn load_source(&self, config: &GenerationConfig) -> Result<RgbaImage> {
        let path = config
            .source_image
            .as_deref()
            .ok_or(GeneratorError::MissingInput {
                mode: config.mode,
                input: "source image",
            })?;
        self.context.codec.load(path)
    }

    fn dismiss_preview(&mut self) {
        if self.preview.take().is_none() {
            return;
        }
        if let Some(host) = &self.context.preview_host {
            host.dismiss();
        }
    }

    fn invalid_state(&self, operation: &'static str) -> GeneratorError {
        GeneratorError::InvalidState {
            operation,
            state: self.state.to_string(),
        }
    }
}

/// Convert a caught panic into a generation error
fn internal_fault(payload: &(dyn Any + Send)) -> GeneratorError {
    let message = payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    generation_error("pipeline", &format!("internal fault: {message}"))
}
