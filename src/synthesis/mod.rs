/// Seeded periodic fractal noise heightmaps
pub mod noise;
/// Procedural mode: coloured noise tiles per parallax layer
pub mod procedural;
/// Offset and windowed cross-fade of a source image
pub mod seamless;
/// Patch quilting on a toroidal canvas
pub mod texture;
/// Edge-class coloured Wang tiles
pub mod wang;
