/// Command-line interface and variant runner
pub mod cli;
/// Constants and defaults
pub mod configuration;
/// Error types and classification
pub mod error;
/// Preset, atlas and compatibility export
pub mod export;
/// Raster codec interface and `image` crate implementation
pub mod image;
/// Tracing subscriber setup
pub mod logging;
/// Variant progress display
pub mod progress;
/// Operation logging sinks
pub mod sink;
