/// Colour segmentation and palette reduction
pub mod palette;
/// End-to-end image geometrization
pub mod pipeline;
/// Even-odd polygon rasterization
pub mod raster;
/// Connected regions and outline tracing
pub mod regions;
/// Outline simplification
pub mod simplify;
/// Border snapping for seamless repetition
pub mod tiling;
