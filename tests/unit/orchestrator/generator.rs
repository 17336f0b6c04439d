//! Tests for the generation state machine, promotion rules and previews

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;
    use tilesmith::io::configuration::MAX_OPERATION_HISTORY;
    use tilesmith::io::error::{ErrorKind, GeneratorError, Result};
    use tilesmith::io::image::RasterCodec;
    use tilesmith::io::sink::{LogEvent, MemorySink};
    use tilesmith::orchestrator::generator::{
        GenerationContext, GenerationOrchestrator, GenerationPolicy, GeneratorState,
    };
    use tilesmith::orchestrator::operation::OperationOutcome;
    use tilesmith::orchestrator::preview::{PreviewArtifact, PreviewHost};
    use tilesmith::settings::config::{GenerationConfig, GenerationMode};

    /// Codec serving images from memory
    #[derive(Default)]
    struct MemoryCodec {
        images: Mutex<HashMap<PathBuf, RgbaImage>>,
    }

    impl MemoryCodec {
        fn with_image(path: &str, image: RgbaImage) -> Self {
            let codec = Self::default();
            if let Ok(mut images) = codec.images.lock() {
                images.insert(PathBuf::from(path), image);
            }
            codec
        }
    }

    impl RasterCodec for MemoryCodec {
        fn load(&self, path: &Path) -> Result<RgbaImage> {
            self.images
                .lock()
                .ok()
                .and_then(|images| images.get(path).cloned())
                .ok_or_else(|| GeneratorError::FileSystem {
                    path: path.to_path_buf(),
                    operation: "load",
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                })
        }

        fn save(&self, image: &RgbaImage, path: &Path) -> Result<()> {
            if let Ok(mut images) = self.images.lock() {
                images.insert(path.to_path_buf(), image.clone());
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct HostCounts {
        presented: AtomicUsize,
        dismissed: AtomicUsize,
    }

    struct CountingHost(Arc<HostCounts>);

    impl PreviewHost for CountingHost {
        fn present(&self, _preview: &PreviewArtifact) {
            self.0.presented.fetch_add(1, Ordering::SeqCst);
        }

        fn dismiss(&self) {
            self.0.dismissed.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn sample_image() -> RgbaImage {
        RgbaImage::from_fn(48, 48, |x, y| {
            if (x / 6 + y / 6) % 2 == 0 {
                Rgba([220, 180, 40, 255])
            } else {
                Rgba([40, 70, 170, 255])
            }
        })
    }

    fn orchestrator_with(sink: &Arc<MemorySink>) -> GenerationOrchestrator {
        let context = GenerationContext::new(
            Box::new(Arc::clone(sink)),
            Box::new(MemoryCodec::with_image("sample.png", sample_image())),
        );
        GenerationOrchestrator::new(context)
    }

    fn procedural(seed: u64) -> GenerationConfig {
        GenerationConfig::default().with_tile_size(32).with_seed(seed)
    }

    fn wang(tile_size: u32) -> GenerationConfig {
        let mut config = GenerationConfig::for_mode(GenerationMode::WangTiles)
            .with_tile_size(tile_size)
            .with_seed(123);
        config.layout_width = 3;
        config.layout_height = 3;
        config
    }

    // Tests an accepted generation becomes current and last valid and is logged
    // Verified by promoting before validation
    #[test]
    fn test_accepted_generation_promoted() {
        let sink = Arc::new(MemorySink::new());
        let mut orchestrator = orchestrator_with(&sink);
        assert_eq!(orchestrator.state(), GeneratorState::Idle);

        let outcome = orchestrator.generate(&procedural(42));
        assert!(outcome.is_accepted());
        assert_eq!(orchestrator.state(), GeneratorState::Accepted);
        assert_eq!(Some(orchestrator.current()), orchestrator.last_valid());
        assert_eq!(outcome.tile_set(), orchestrator.last_valid());
        assert_eq!(orchestrator.last_valid_config(), Some(&procedural(42)));

        let operations = orchestrator.operations();
        assert_eq!(operations.len(), 1);
        assert_eq!(
            operations.first().map(|op| op.outcome),
            Some(OperationOutcome::Accepted)
        );

        let events = sink.events();
        assert!(matches!(events.first(), Some(LogEvent::Start { .. })));
        assert!(matches!(
            events.last(),
            Some(LogEvent::End { success: true, .. })
        ));
    }

    // Tests a rejected generation empties current and keeps the last valid set
    // Verified by clearing last_valid on rejection
    #[test]
    fn test_rejection_keeps_last_valid() {
        let sink = Arc::new(MemorySink::new());
        let mut orchestrator = orchestrator_with(&sink);
        assert!(orchestrator.generate(&procedural(1)).is_accepted());
        let accepted = orchestrator.last_valid_snapshot().expect("accepted set");

        let outcome = orchestrator.generate(&procedural(2).with_tile_size(5000));
        assert!(!outcome.is_accepted());
        assert_eq!(outcome.error().map(GeneratorError::kind), Some(ErrorKind::Config));
        assert_eq!(orchestrator.state(), GeneratorState::Rejected);
        assert!(orchestrator.current().is_empty());
        assert_eq!(orchestrator.last_valid(), Some(accepted.as_ref()));
        assert_eq!(orchestrator.last_valid_config(), Some(&procedural(1)));
        assert!(matches!(
            sink.events().last(),
            Some(LogEvent::End { success: false, .. })
        ));
    }

    // Tests a first-ever rejection leaves no last valid set and revert is refused
    // Verified by returning true from revert without a last valid set
    #[test]
    fn test_rejection_without_history() {
        let sink = Arc::new(MemorySink::new());
        let mut orchestrator = orchestrator_with(&sink);
        let outcome = orchestrator.generate(&procedural(1).with_tile_size(5000));
        assert!(outcome.into_result().is_err());
        assert!(orchestrator.last_valid().is_none());
        assert!(!orchestrator.revert_to_last_valid());
        assert_eq!(orchestrator.state(), GeneratorState::Rejected);
    }

    // Tests revert restores exactly the last accepted tiles
    // Verified by regenerating instead of restoring
    #[test]
    fn test_revert_restores_exact_tiles() {
        let sink = Arc::new(MemorySink::new());
        let mut orchestrator = orchestrator_with(&sink);
        assert!(orchestrator.generate(&procedural(8)).is_accepted());
        let accepted = orchestrator.current().clone();

        assert!(!orchestrator.generate(&procedural(9).with_tile_size(0)).is_accepted());
        assert!(orchestrator.revert_to_last_valid());
        assert_eq!(orchestrator.current(), &accepted);
        assert_eq!(orchestrator.state(), GeneratorState::Accepted);
    }

    // Tests snapshots are unaffected by later generations
    // Verified by mutating the shared set in place on generation
    #[test]
    fn test_snapshot_isolated_from_later_generation() {
        let sink = Arc::new(MemorySink::new());
        let mut orchestrator = orchestrator_with(&sink);
        assert!(orchestrator.generate(&procedural(3)).is_accepted());
        let snapshot = orchestrator.last_valid_snapshot().expect("accepted set");
        let before = snapshot.as_ref().clone();

        assert!(orchestrator.generate(&procedural(4)).is_accepted());
        assert_eq!(snapshot.as_ref(), &before);
        assert_ne!(orchestrator.last_valid(), Some(&before));
    }

    // Tests Wang generation reports border validation and a solved layout
    // Verified by skipping the layout solver
    #[test]
    fn test_wang_report() {
        let sink = Arc::new(MemorySink::new());
        let mut orchestrator = orchestrator_with(&sink);
        let outcome = orchestrator.generate(&wang(64));
        let report = outcome.report().expect("accepted");

        let validation = report.validation.as_ref().expect("wang validation");
        assert_eq!(
            validation.has_valid_borders,
            validation.border_consistency > 0.8 && !validation.has_visual_cuts
        );
        let layout = report.layout.as_ref().expect("wang layout");
        assert!(layout.is_solved());
        assert_eq!((layout.width(), layout.height()), (3, 3));
        assert!(!report.degraded);
        assert!(orchestrator.report().contains("Layout: 3x3 solved"));
    }

    // Tests a layout fallback is accepted but flagged as degraded with a warning
    // Verified by rejecting fallback layouts
    #[test]
    fn test_wang_layout_fallback_is_degraded() {
        let sink = Arc::new(MemorySink::new());
        let policy = GenerationPolicy {
            solver_max_cells: 4,
            ..GenerationPolicy::default()
        };
        let context = GenerationContext::new(
            Box::new(Arc::clone(&sink)),
            Box::new(MemoryCodec::default()),
        )
        .with_policy(policy);
        let mut orchestrator = GenerationOrchestrator::new(context);

        let outcome = orchestrator.generate(&wang(32));
        let report = outcome.report().expect("accepted");
        assert!(report.degraded);
        assert!(report.layout.as_ref().is_some_and(|layout| layout.is_fallback()));
        assert!(
            report
                .warnings
                .iter()
                .any(|warning| warning.contains("not a valid tiling"))
        );
        assert!(!sink.warnings().is_empty());
    }

    // Tests broken borders warn by default and reject under the strict policy
    // Verified by ignoring the strict flag
    #[test]
    fn test_border_policy() {
        // One-pixel tiles paint every side with the top class colour
        let sink = Arc::new(MemorySink::new());
        let mut lenient = orchestrator_with(&sink);
        let outcome = lenient.generate(&wang(1));
        let report = outcome.report().expect("accepted with warning");
        assert!(
            report
                .validation
                .as_ref()
                .is_some_and(|validation| !validation.has_valid_borders)
        );
        assert!(report.warnings.iter().any(|w| w.contains("border consistency")));

        let strict_context = GenerationContext::new(
            Box::new(Arc::clone(&sink)),
            Box::new(MemoryCodec::default()),
        )
        .with_policy(GenerationPolicy {
            strict_borders: true,
            ..GenerationPolicy::default()
        });
        let mut strict = GenerationOrchestrator::new(strict_context);
        let rejected = strict.generate(&wang(1));
        assert_eq!(
            rejected.error().map(GeneratorError::kind),
            Some(ErrorKind::BorderIncompatibility)
        );
        assert!(strict.last_valid().is_none());
    }

    // Tests image modes read the source through the codec
    // Verified by reading from the file system directly
    #[test]
    fn test_image_modes_use_codec() {
        let sink = Arc::new(MemorySink::new());
        let mut orchestrator = orchestrator_with(&sink);
        for mode in [
            GenerationMode::SeamlessFromImage,
            GenerationMode::TextureSynthesis,
            GenerationMode::Geometrization,
        ] {
            let mut config = GenerationConfig::for_mode(mode)
                .with_tile_size(32)
                .with_source_image("sample.png");
            config.target_resolution = 32;
            let outcome = orchestrator.generate(&config);
            assert!(outcome.is_accepted(), "{mode:?}: {:?}", outcome.error());
            assert_eq!(orchestrator.current().tile_size, 32);
        }
    }

    // Tests image modes without a source are rejected as missing input
    // Verified by substituting a blank source image
    #[test]
    fn test_missing_source_rejected() {
        let sink = Arc::new(MemorySink::new());
        let mut orchestrator = orchestrator_with(&sink);
        let outcome =
            orchestrator.generate(&GenerationConfig::for_mode(GenerationMode::TextureSynthesis));
        assert!(matches!(
            outcome.error(),
            Some(GeneratorError::MissingInput { .. })
        ));

        let unreadable = GenerationConfig::for_mode(GenerationMode::SeamlessFromImage)
            .with_source_image("absent.png");
        let outcome = orchestrator.generate(&unreadable);
        assert_eq!(outcome.error().map(GeneratorError::kind), Some(ErrorKind::Io));
    }

    // Tests the preview transitions and host notifications
    // Verified by allowing apply from the Accepted state
    #[test]
    fn test_preview_state_machine() {
        let sink = Arc::new(MemorySink::new());
        let counts = Arc::new(HostCounts::default());
        let context = GenerationContext::new(
            Box::new(Arc::clone(&sink)),
            Box::new(MemoryCodec::default()),
        )
        .with_preview_host(Box::new(CountingHost(Arc::clone(&counts))));
        let mut orchestrator = GenerationOrchestrator::new(context);

        assert!(orchestrator.preview().is_err());
        assert!(orchestrator.apply_preview().is_err());

        assert!(orchestrator.generate(&procedural(5)).is_accepted());
        assert!(orchestrator.apply_preview().is_err());

        let cells = orchestrator.preview().expect("preview allowed").placement.len();
        assert_eq!(cells, 9);
        assert_eq!(orchestrator.state(), GeneratorState::Previewing);
        assert!(orchestrator.preview().is_err());

        orchestrator.apply_preview().expect("previewing");
        assert_eq!(orchestrator.state(), GeneratorState::Applied);
        assert!(orchestrator.preview_artifact().is_none());
        assert!(orchestrator.cancel_preview().is_err());

        orchestrator.preview().expect("preview after apply");
        orchestrator.cancel_preview().expect("previewing");
        assert_eq!(orchestrator.state(), GeneratorState::Cancelled);

        assert_eq!(counts.presented.load(Ordering::SeqCst), 2);
        assert_eq!(counts.dismissed.load(Ordering::SeqCst), 2);
    }

    // Tests a new generation dismisses an open preview
    // Verified by keeping the preview across generations
    #[test]
    fn test_generation_dismisses_preview() {
        let sink = Arc::new(MemorySink::new());
        let mut orchestrator = orchestrator_with(&sink);
        assert!(orchestrator.generate(&procedural(6)).is_accepted());
        orchestrator.preview().expect("preview allowed");

        assert!(!orchestrator.generate(&procedural(6).with_tile_size(0)).is_accepted());
        assert!(orchestrator.preview_artifact().is_none());
        assert!(orchestrator.preview().is_err());
    }

    // Tests export needs an accepted set and writes every artifact
    // Verified by exporting the current set instead of the last valid one
    #[test]
    fn test_export_last_valid() {
        let context = GenerationContext::standard();
        let mut orchestrator = GenerationOrchestrator::new(context);
        let dir = tempdir().expect("temp dir");
        assert!(orchestrator.export_tile_set(dir.path()).is_err());

        assert!(orchestrator.generate(&procedural(42)).is_accepted());
        assert!(!orchestrator.generate(&procedural(1).with_tile_size(0)).is_accepted());

        let summary = orchestrator
            .export_tile_set(dir.path())
            .expect("export succeeds");
        assert_eq!(summary.tile_files.len(), 1);
        assert!(summary.atlas.exists());
        assert!(summary.preset.exists());
        assert!(summary.compatibility.is_none());
        assert_eq!(summary.reproducibility_hash.len(), 64);
    }

    // Tests the text report covers the last operation
    // Verified by reporting the first operation instead
    #[test]
    fn test_text_report() {
        let sink = Arc::new(MemorySink::new());
        let mut orchestrator = orchestrator_with(&sink);
        assert_eq!(orchestrator.report().trim(), "No generation has run.");

        assert!(orchestrator.generate(&procedural(42)).is_accepted());
        let accepted = orchestrator.report();
        assert!(accepted.contains("Outcome: accepted"));
        assert!(accepted.contains("Seed: 42"));
        assert!(accepted.contains("Tiles: 1"));

        assert!(!orchestrator.generate(&procedural(7).with_tile_size(0)).is_accepted());
        let rejected = orchestrator.report();
        assert!(rejected.contains("Outcome: rejected"));
        assert!(rejected.contains("tile_size"));
        assert!(!rejected.contains("Tiles:"));
    }

    // Tests the operation history keeps only the most recent entries
    // Verified by pushing without dropping the oldest operation
    #[test]
    fn test_operation_history_capped() {
        let sink = Arc::new(MemorySink::new());
        let mut orchestrator = orchestrator_with(&sink);
        let mut last_id = String::new();
        for seed in (0_u64..).take(MAX_OPERATION_HISTORY + 5) {
            let outcome = orchestrator.generate(&procedural(seed).with_tile_size(0));
            assert!(!outcome.is_accepted());
            last_id = outcome.operation_id().to_owned();
        }

        let operations = orchestrator.operations();
        assert_eq!(operations.len(), MAX_OPERATION_HISTORY);
        assert_eq!(operations.last().map(|op| op.id.as_str()), Some(last_id.as_str()));
        assert_eq!(operations.first().map(|op| op.config.seed), Some(5));
        assert!(orchestrator.report().contains(&last_id));
    }

    // Tests a layout grid beyond the cell limit is rejected before any work
    // Verified by letting the layout fallback allocate the oversized grid
    #[test]
    fn test_oversized_layout_rejected() {
        let sink = Arc::new(MemorySink::new());
        let mut orchestrator = orchestrator_with(&sink);
        let mut config = wang(16);
        config.layout_width = 1_000_000;
        config.layout_height = 1_000_000;

        let outcome = orchestrator.generate(&config);
        let error = outcome.error().expect("oversized layout rejected");
        assert_eq!(error.kind(), ErrorKind::Config);
        assert!(error.to_string().contains("layout"));
        assert!(orchestrator.current().is_empty());
    }
}
