//! Row-by-row packing of square placements onto the cell grid
//!
//! Sizes are drawn from a seeded generator, so identical configurations always
//! produce identical slot sequences.

use crate::algorithm::search::Matrix;
use crate::io::configuration::{MIXED_WEIGHTS, UNIFORM_WEIGHTS};
use crate::spatial::tiles::PixelRegion;
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::convert::Infallible;
use std::str::FromStr;
use std::sync::Arc;

/// Size-weighting scheme for placement draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizePattern {
    /// Heterogeneous default distribution
    #[default]
    Mixed,
    /// Favours mid-sized placements
    Uniform,
    /// Favours size 1, decaying as `1/(i+1)`
    Gradient,
}

impl SizePattern {
    /// Parse a pattern name, treating anything unrecognized as `Mixed`
    pub fn parse_lenient(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "uniform" => Self::Uniform,
            "gradient" => Self::Gradient,
            _ => Self::Mixed,
        }
    }

    /// Canonical lowercase name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mixed => "mixed",
            Self::Uniform => "uniform",
            Self::Gradient => "gradient",
        }
    }

    /// Normalized weights for sizes `1..=len`, truncated to `max_matrix_size`
    ///
    /// Sizes past the end of the pattern's vector are never drawn.
    pub fn weights(self, max_matrix_size: usize) -> Vec<f64> {
        let raw: Vec<f64> = match self {
            Self::Mixed => MIXED_WEIGHTS.iter().copied().take(max_matrix_size).collect(),
            Self::Uniform => UNIFORM_WEIGHTS
                .iter()
                .copied()
                .take(max_matrix_size)
                .collect(),
            Self::Gradient => (0..max_matrix_size).map(|i| 1.0 / (i as f64 + 1.0)).collect(),
        };
        let total: f64 = raw.iter().sum();
        if total > 0.0 {
            raw.into_iter().map(|w| w / total).collect()
        } else {
            raw
        }
    }
}

impl FromStr for SizePattern {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_lenient(s))
    }
}

/// Seeded random selector for reproducible stochastic choices
pub struct RandomSelector {
    rng: StdRng,
}

impl RandomSelector {
    /// Create a deterministic random selector
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generic weighted random selection
    ///
    /// Returns index into weights array using cumulative distribution
    pub fn weighted_choice(&mut self, weights: &[f64]) -> usize {
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return 0;
        }

        let mut rand_val = self.rng.random::<f64>() * total;
        for (i, &weight) in weights.iter().enumerate() {
            rand_val -= weight;
            if rand_val <= 0.0 {
                return i;
            }
        }
        weights.len().saturating_sub(1)
    }
}

/// Grid and drawing parameters for one layout
#[derive(Debug, Clone, Copy)]
pub struct LayoutConfig {
    /// Grid width in cells
    pub width_cells: usize,
    /// Grid height in cells
    pub height_cells: usize,
    /// Largest placement edge in cells
    pub max_matrix_size: usize,
    /// Size weighting
    pub pattern: SizePattern,
    /// Empty cells between neighbouring placements and rows
    pub gap_cells: usize,
    /// Generator seed
    pub seed: u64,
}

/// Size and cell position of one placement, before a matrix is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutSlot {
    /// Edge length in cells
    pub size: usize,
    /// Column of the top-left cell
    pub x_cell: usize,
    /// Row of the top-left cell
    pub y_cell: usize,
}

/// Pack the grid row by row
///
/// Each draw is bounded by the remaining width, remaining height and the
/// configured maximum. A row advances by its tallest placement plus the gap.
/// An empty grid or a zero maximum yields no slots.
pub fn plan_layout(config: &LayoutConfig) -> Vec<LayoutSlot> {
    let weights = config.pattern.weights(config.max_matrix_size);
    let mut selector = RandomSelector::new(config.seed);
    let mut slots = Vec::new();

    if weights.is_empty() || config.width_cells == 0 {
        return slots;
    }

    let mut y_cell = 0;
    while y_cell < config.height_cells {
        let mut x_cell = 0;
        let mut row_height = 0;

        while x_cell < config.width_cells {
            let max_n = config
                .max_matrix_size
                .min(config.height_cells - y_cell)
                .min(config.width_cells - x_cell)
                .min(weights.len());
            if max_n < 1 {
                break;
            }

            let valid_weights = weights.get(..max_n).unwrap_or(&[]);
            let size = selector.weighted_choice(valid_weights) + 1;

            slots.push(LayoutSlot {
                size,
                x_cell,
                y_cell,
            });

            row_height = row_height.max(size);
            x_cell += size + config.gap_cells;
        }

        y_cell += row_height.max(1) + config.gap_cells;
    }

    slots
}

/// A positioned matrix ready for compositing
#[derive(Debug, Clone)]
pub struct Placement {
    /// Matrix drawn in this placement
    pub matrix: Arc<Matrix>,
    /// Determinant used for shading
    pub determinant: i64,
    /// Footprint edge in cells
    pub size: usize,
    /// Column of the top-left cell
    pub x_cell: usize,
    /// Row of the top-left cell
    pub y_cell: usize,
    /// Left edge in pixels
    pub x_px: usize,
    /// Top edge in pixels
    pub y_px: usize,
    /// Footprint edge in pixels
    pub extent_px: usize,
}

impl Placement {
    /// Attach a matrix to a slot
    pub const fn new(
        slot: LayoutSlot,
        matrix: Arc<Matrix>,
        determinant: i64,
        cell_size: usize,
    ) -> Self {
        Self {
            matrix,
            determinant,
            size: slot.size,
            x_cell: slot.x_cell,
            y_cell: slot.y_cell,
            x_px: slot.x_cell * cell_size,
            y_px: slot.y_cell * cell_size,
            extent_px: slot.size * cell_size,
        }
    }

    /// Unclipped pixel footprint
    pub const fn region(&self) -> PixelRegion {
        PixelRegion {
            x: self.x_px,
            y: self.y_px,
            width: self.extent_px,
            height: self.extent_px,
        }
    }
}
