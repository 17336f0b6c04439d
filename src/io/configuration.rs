//! Generation constants, limits and runtime configuration defaults

// Schema versioning
/// Schema version stamped on settings written by this crate
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

// Hard validation limits
/// Largest accepted tile edge length in pixels
pub const MAX_TILE_SIZE: u32 = 4096;
/// Smallest accepted octave count
pub const MIN_OCTAVES: u32 = 1;
/// Largest accepted octave count
pub const MAX_OCTAVES: u32 = 8;
/// Largest accepted number of parallax layers
pub const MAX_PARALLAX_LAYERS: u32 = 4;
/// Smallest accepted Wang tile count
pub const MIN_WANG_TILE_COUNT: u32 = 2;
/// Largest accepted Wang tile count
pub const MAX_WANG_TILE_COUNT: u32 = 16;
/// Largest accepted palette size for geometrization
pub const MAX_PALETTE_COLORS: u32 = 256;

// Migration clamps tile size into this canonical range
/// Lower bound of the canonical tile size range
pub const MIGRATION_MIN_TILE_SIZE: u32 = 256;
/// Upper bound of the canonical tile size range
pub const MIGRATION_MAX_TILE_SIZE: u32 = 2048;

// Defaults for configurable parameters
/// Default tile edge length in pixels
pub const DEFAULT_TILE_SIZE: u32 = 1024;
/// Default continuity coefficient
pub const DEFAULT_CONTINUITY: f32 = 0.8;
/// Default variety coefficient
pub const DEFAULT_VARIETY: f32 = 0.5;
/// Fixed seed for reproducible generation
pub const DEFAULT_SEED: u64 = 12345;
/// Default noise scale
pub const DEFAULT_NOISE_SCALE: f32 = 0.1;
/// Default fractal octave count
pub const DEFAULT_OCTAVES: u32 = 4;
/// Default amplitude factor between octaves
pub const DEFAULT_PERSISTENCE: f32 = 0.5;
/// Default frequency factor between octaves
pub const DEFAULT_LACUNARITY: f32 = 2.0;
/// Default number of parallax layers
pub const DEFAULT_PARALLAX_LAYERS: u32 = 1;
/// Default number of Wang tiles in a set
pub const DEFAULT_WANG_TILE_COUNT: u32 = 8;
/// Default Wang layout width in tiles
pub const DEFAULT_LAYOUT_WIDTH: u32 = 8;
/// Default Wang layout height in tiles
pub const DEFAULT_LAYOUT_HEIGHT: u32 = 6;
/// Default colour merge tolerance for geometrization
pub const DEFAULT_COLOR_TOLERANCE: f32 = 0.15;
/// Default palette size for geometrization
pub const DEFAULT_MAX_COLORS: u32 = 8;
/// Default polygon simplification tolerance in output pixels
pub const DEFAULT_SIMPLIFICATION_TOLERANCE: f32 = 1.0;
/// Default geometrization output resolution
pub const DEFAULT_TARGET_RESOLUTION: u32 = 512;
/// Whether geometrized regions are adjusted for tiling by default
pub const DEFAULT_OPTIMIZE_FOR_TILING: bool = true;

// Noise synthesis
/// Lattice cells across one tile per unit of noise scale
pub const NOISE_CYCLES_PER_UNIT_SCALE: f64 = 40.0;

/// Heightmap colour stops from low to high
pub const PROCEDURAL_PALETTE: [[u8; 3]; 5] = [
    [64, 128, 255],
    [128, 200, 255],
    [255, 255, 200],
    [200, 255, 128],
    [128, 200, 64],
];

// Wang synthesis and border validation
/// Edge classes available to top and bottom edges
pub const WANG_HORIZONTAL_CLASSES: u32 = 2;
/// Edge classes available to left and right edges
pub const WANG_VERTICAL_CLASSES: u32 = 2;
/// Points sampled along a shared edge
pub const BORDER_SAMPLE_COUNT: usize = 16;
/// Mean ΔE below which two edges count as compatible
pub const BORDER_DELTA_E_THRESHOLD: f64 = 12.0;
/// Consistency ratio a Wang set must exceed to be valid
pub const BORDER_CONSISTENCY_THRESHOLD: f32 = 0.8;

// Safety limits preventing unbounded layout search
/// Search nodes the layout solver may visit before falling back
pub const SOLVER_NODE_BUDGET: usize = 200_000;
/// Largest grid the layout solver will search
pub const SOLVER_MAX_CELLS: usize = 4096;
/// Largest layout grid accepted at all; larger grids are rejected, not filled
pub const MAX_LAYOUT_CELLS: usize = 65_536;
/// Generation operations kept by the orchestrator; older ones are dropped
pub const MAX_OPERATION_HISTORY: usize = 64;

// Geometrization working limits
/// Longest side of the downsampled image used for segmentation
pub const GEOMETRY_WORKING_RESOLUTION: u32 = 128;
/// Components smaller than this many working pixels are dropped
pub const MIN_REGION_AREA: usize = 4;
/// Fraction of the output resolution within which vertices snap to a border
pub const TILING_SNAP_FRACTION: f64 = 0.02;

// Preview and export settings
/// Default preview columns
pub const DEFAULT_PREVIEW_COLS: u32 = 3;
/// Default preview rows
pub const DEFAULT_PREVIEW_ROWS: u32 = 3;
/// Tiles larger than this are downscaled in preview composites
pub const PREVIEW_MAX_TILE_EDGE: u32 = 256;
/// File name of the exported preset description
pub const PRESET_FILE_NAME: &str = "preset.json";
/// File name of the exported atlas
pub const ATLAS_FILE_NAME: &str = "atlas.png";
/// File name of the exported Wang compatibility record
pub const COMPATIBILITY_FILE_NAME: &str = "compatibility.json";
/// File name of the exported preview composite
pub const PREVIEW_FILE_NAME: &str = "preview.png";
/// Default output directory for the CLI
pub const DEFAULT_OUTPUT_DIR: &str = "tilesmith_out";

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;
