//! Pixel regions and the tile grid used for bounded-memory rendering

use crate::io::configuration::MIN_TILE_OVERLAP;
use crate::math::gaussian::kernel_radius;

/// Axis-aligned pixel rectangle, `x`/`y` inclusive, extents exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelRegion {
    /// Left edge
    pub x: usize,
    /// Top edge
    pub y: usize,
    /// Width in pixels
    pub width: usize,
    /// Height in pixels
    pub height: usize,
}

impl PixelRegion {
    /// Region covering a whole canvas
    pub const fn full(width: usize, height: usize) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    /// One past the right edge, saturating at `usize::MAX`
    pub const fn right(&self) -> usize {
        self.x.saturating_add(self.width)
    }

    /// One past the bottom edge, saturating at `usize::MAX`
    pub const fn bottom(&self) -> usize {
        self.y.saturating_add(self.height)
    }

    /// Whether the region covers no pixels
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Overlap of two regions, if any
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        (x1 > x0 && y1 > y0).then(|| Self {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        })
    }

    /// Grow by `margin` on every side, clamped to a `width`×`height` canvas
    pub fn expand_within(&self, margin: usize, width: usize, height: usize) -> Self {
        let x0 = self.x.saturating_sub(margin);
        let y0 = self.y.saturating_sub(margin);
        let x1 = self.right().saturating_add(margin).min(width);
        let y1 = self.bottom().saturating_add(margin).min(height);
        Self {
            x: x0,
            y: y0,
            width: x1.saturating_sub(x0),
            height: y1.saturating_sub(y0),
        }
    }
}

/// One tile: the pixels it owns and the larger region it renders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// Pixels written to the final canvas
    pub core: PixelRegion,
    /// Core plus overlap, clamped to the canvas
    pub expanded: PixelRegion,
}

/// Tile grid covering a canvas
#[derive(Debug, Clone)]
pub struct TilePlan {
    /// Canvas width in pixels
    pub canvas_width: usize,
    /// Canvas height in pixels
    pub canvas_height: usize,
    /// Square tile edge in pixels
    pub tile_size: usize,
    /// Overlap margin in pixels
    pub overlap: usize,
}

impl TilePlan {
    /// Plan tiles of edge `tile_size` with the given overlap
    pub fn new(canvas_width: usize, canvas_height: usize, tile_size: usize, overlap: usize) -> Self {
        Self {
            canvas_width,
            canvas_height,
            tile_size: tile_size.max(1),
            overlap,
        }
    }

    /// Tiles along x and y
    pub const fn grid(&self) -> (usize, usize) {
        (
            self.canvas_width.div_ceil(self.tile_size),
            self.canvas_height.div_ceil(self.tile_size),
        )
    }

    /// Total number of tiles
    pub const fn len(&self) -> usize {
        let (tx, ty) = self.grid();
        tx * ty
    }

    /// Whether the canvas produces no tiles
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tile at row-major index `index`
    pub fn tile(&self, index: usize) -> Option<Tile> {
        let (tiles_x, _) = self.grid();
        if index >= self.len() || tiles_x == 0 {
            return None;
        }
        let x = (index % tiles_x) * self.tile_size;
        let y = (index / tiles_x) * self.tile_size;
        let core = PixelRegion {
            x,
            y,
            width: self.tile_size.min(self.canvas_width - x),
            height: self.tile_size.min(self.canvas_height - y),
        };
        Some(Tile {
            core,
            expanded: core.expand_within(self.overlap, self.canvas_width, self.canvas_height),
        })
    }

    /// All tiles in row-major order
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        (0..self.len()).filter_map(|i| self.tile(i))
    }
}

/// Overlap margin wide enough that no tile edge influences its core
///
/// Covers three blur sigmas, the largest placement, the smoothing kernel used
/// to fill gaps, and [`MIN_TILE_OVERLAP`].
pub fn required_overlap(blur_sigma: f64, max_placement_px: usize, fill_sigma: Option<f64>) -> usize {
    let blur_reach = (blur_sigma.max(0.0) * 3.0) as usize;
    let fill_reach = fill_sigma.map_or(0, kernel_radius);
    blur_reach
        .max(max_placement_px)
        .max(fill_reach)
        .max(MIN_TILE_OVERLAP)
}
