/// Sampling-based Wang border validation
pub mod border;
/// Integrity gate for generated tile sets
pub mod integrity;
/// Tile set and edge pattern types
pub mod model;
/// Seam ΔE quality metric
pub mod quality;
