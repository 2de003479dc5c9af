//! Generation constants and runtime configuration defaults

// Layout
/// Fixed seed for reproducible layouts
pub const LAYOUT_SEED: u64 = 42;

/// Size weights for the default heterogeneous pattern
pub const MIXED_WEIGHTS: [f64; 6] = [0.15, 0.25, 0.30, 0.20, 0.08, 0.02];

/// Size weights favouring mid-sized placements
pub const UNIFORM_WEIGHTS: [f64; 4] = [0.1, 0.3, 0.4, 0.2];

// Search
/// Largest matrix dimension whose enumeration counter fits in 64 bits
pub const MAX_SEARCH_DIMENSION: usize = 7;

/// Number of candidates kept in each top/bottom slice
pub const DEFAULT_TOP_K: usize = 3;

// Compositing
/// Neutral gray used for feathering and normalizer blending
pub const NEUTRAL_GRAY: u8 = 128;

/// Gaussian kernel extent in standard deviations
pub const GAUSSIAN_TRUNCATE: f64 = 4.0;

/// Smallest sigma used when filling unpainted gaps
pub const MIN_FILL_SIGMA: f64 = 1.0;

// Tiled rendering
/// Edge length of a square render tile in pixels
pub const TILE_SIZE: usize = 512;

// Canvases larger than four tiles are rendered tile by tile
/// Pixel area above which the automatic strategy tiles
pub const TILING_AREA_THRESHOLD: usize = TILE_SIZE * TILE_SIZE * 4;

/// Minimum overlap margin around each tile in pixels
pub const MIN_TILE_OVERLAP: usize = 32;

// Default values for configurable parameters
/// Default canvas width in pixels
pub const DEFAULT_CANVAS_WIDTH: usize = 1920;
/// Default canvas height in pixels
pub const DEFAULT_CANVAS_HEIGHT: usize = 1080;
/// Default pixels per matrix cell
pub const DEFAULT_CELL_SIZE: usize = 12;
/// Default normalizer blend toward gray
pub const DEFAULT_NORMALIZER: f64 = 0.5;
/// Default palette hue
pub const DEFAULT_HUE: &str = "purple";
/// Default largest placement size in cells
pub const DEFAULT_MAX_MATRIX_SIZE: usize = 4;
/// Default size-weighting pattern
pub const DEFAULT_PATTERN: &str = "mixed";
/// Default Gaussian blur sigma applied inside blocks
pub const DEFAULT_BLUR_SIGMA: f64 = 1.5;
/// Default radial vignette strength
pub const DEFAULT_VIGNETTE_STRENGTH: f64 = 0.25;
/// Default gap between placements in cells
pub const DEFAULT_GAP_CELLS: usize = 1;

// Output settings
/// Suffix added to output filenames
pub const OUTPUT_SUFFIX: &str = "-map";
