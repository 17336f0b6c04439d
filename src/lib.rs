//! Reproducible, validated generation of seamlessly tileable background tiles
//!
//! Three families of generators produce tile sets: layered periodic noise,
//! edge-coloured Wang tiles arranged by a backtracking layout solver, and
//! image-driven modes (geometrization, seamless conversion, texture
//! quilting). Every result passes integrity checks before the orchestrator
//! promotes it to the last valid set that previews and exports read from.

#![forbid(unsafe_code)]

/// Polygon reduction of source images
pub mod geometry;
/// Input/output collaborators, configuration constants and error handling
pub mod io;
/// Backtracking layout of Wang tiles on a grid
pub mod layout;
/// Colour science and interpolation helpers
pub mod math;
/// Generation state machine
pub mod orchestrator;
/// Generation settings, validation and migration
pub mod settings;
/// Tile synthesizers
pub mod synthesis;
/// Tile sets and their validators
pub mod tileset;

pub use io::error::{GeneratorError, Result};
