//! Numeric helpers shared by the synthesizers and validators

/// sRGB to CIELAB conversion and ΔE distances
pub mod color;
/// Interpolation curves, windows and colour ramps
pub mod interpolation;
