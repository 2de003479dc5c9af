//! Render-agnostic description of a composited wallpaper
//!
//! A [`RenderSpec`] carries every placement and global setting needed to paint
//! the canvas elsewhere. [`RenderSpec::render`] runs the same compositor as
//! direct generation, so the two rasters are identical.

use crate::algorithm::search::Matrix;
use crate::io::error::{Result, WallpaperError, invalid_dimensions, invalid_parameter};
use crate::render::alpha::AlphaMap;
use crate::render::block::BlockStyle;
use crate::render::color::{ColorMapper, DeterminantRange, Hue};
use crate::render::compositor::{Canvas, CompositeSettings, composite_region};
use crate::io::configuration::MIN_FILL_SIGMA;
use crate::spatial::layout::Placement;
use crate::spatial::tiles::PixelRegion;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Canvas geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSpec {
    /// Width in pixels
    pub width: usize,
    /// Height in pixels
    pub height: usize,
    /// Pixels per matrix cell
    pub cell_size: usize,
}

/// Global visual parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualSpec {
    /// Palette hue name
    pub hue: String,
    /// Blend toward mid-gray
    pub normalizer: f64,
    /// Smallest matrix entry
    pub low: i64,
    /// Largest matrix entry
    pub high: i64,
    /// Blur inside blocks
    pub blur_sigma: f64,
    /// Vignette strength
    pub vignette_strength: f64,
    /// Edge feathering strength
    pub feather_strength: f64,
    /// Determinant shading enabled
    pub use_determinant: bool,
    /// Shading direction
    pub use_max: bool,
    /// Gap between placements; zero enables gap filling
    #[serde(default = "default_gap_cells")]
    pub gap_cells: usize,
}

const fn default_gap_cells() -> usize {
    crate::io::configuration::DEFAULT_GAP_CELLS
}

/// Optional alpha channel, row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlphaMapSpec {
    /// Width in pixels
    pub width: usize,
    /// Height in pixels
    pub height: usize,
    /// `width * height` alpha values
    pub alpha_values: Vec<u8>,
}

/// One placement in pixel space
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSpec {
    /// Left edge in pixels
    pub x: usize,
    /// Top edge in pixels
    pub y: usize,
    /// Unclipped width in pixels
    pub width: usize,
    /// Unclipped height in pixels
    pub height: usize,
    /// Matrix rows
    pub matrix: Vec<Vec<i64>>,
    /// Determinant used for shading
    pub determinant: i64,
    /// Footprint edge in cells
    pub size: usize,
}

/// Serializable wallpaper description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSpec {
    /// Canvas geometry
    pub canvas: CanvasSpec,
    /// Visual parameters
    pub visual: VisualSpec,
    /// Determinant span used for shading
    pub determinant_range: DeterminantRange,
    /// Alpha channel, when one was produced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha_map: Option<AlphaMapSpec>,
    /// Placements in layout order
    pub blocks: Vec<BlockSpec>,
}

impl AlphaMapSpec {
    /// Flatten an alpha map
    pub fn from_map(alpha: &AlphaMap) -> Self {
        let (height, width) = alpha.dim();
        Self {
            width,
            height,
            alpha_values: alpha.iter().copied().collect(),
        }
    }

    /// Rebuild the alpha map
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimensions` if the value count does not match
    pub fn to_map(&self) -> Result<AlphaMap> {
        AlphaMap::from_shape_vec((self.height, self.width), self.alpha_values.clone())
            .map_err(|e| invalid_dimensions(&e))
    }
}

impl BlockSpec {
    /// Describe one placement
    pub fn from_placement(placement: &Placement) -> Self {
        Self {
            x: placement.x_px,
            y: placement.y_px,
            width: placement.extent_px,
            height: placement.extent_px,
            matrix: placement.matrix.to_rows(),
            determinant: placement.determinant,
            size: placement.size,
        }
    }

    /// Check the block describes a square, addressable footprint
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimensions` if the footprint is not square or its far
    /// edge overflows, and `InvalidParameter` if `size` disagrees with the
    /// pixel extent
    pub fn validate(&self, cell_size: usize) -> Result<()> {
        if self.width != self.height {
            return Err(invalid_dimensions(&format!(
                "block at ({}, {}) is {}x{}, blocks must be square",
                self.x, self.y, self.width, self.height
            )));
        }
        if self.x.checked_add(self.width).is_none() || self.y.checked_add(self.height).is_none() {
            return Err(invalid_dimensions(&format!(
                "block at ({}, {}) extends past the addressable range",
                self.x, self.y
            )));
        }
        if self.size.checked_mul(cell_size) != Some(self.width) {
            return Err(invalid_parameter(
                "block size",
                &self.size,
                &format!("{} cells of {cell_size} px must span {} px", self.size, self.width),
            ));
        }
        Ok(())
    }
}

impl RenderSpec {
    /// Compositing settings described by this spec
    ///
    /// # Errors
    ///
    /// Returns `InvalidHue` if the hue is not in the palette
    pub fn composite_settings(&self) -> Result<CompositeSettings> {
        let visual = &self.visual;
        let hue: Hue = visual.hue.parse()?;
        Ok(CompositeSettings {
            style: BlockStyle {
                mapper: ColorMapper {
                    low: visual.low,
                    high: visual.high,
                    normalizer: visual.normalizer,
                    hue,
                },
                use_determinant: visual.use_determinant,
                use_max: visual.use_max,
                range: self.determinant_range,
                blur_sigma: visual.blur_sigma,
                feather_strength: visual.feather_strength,
            },
            canvas_width: self.canvas.width,
            canvas_height: self.canvas.height,
            fill_gaps: visual.gap_cells == 0,
            fill_sigma: visual.blur_sigma.max(MIN_FILL_SIGMA),
            vignette_strength: visual.vignette_strength,
        })
    }

    /// Placements rebuilt from the block list
    ///
    /// Blocks with identical matrices share one allocation.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimensions` for an empty canvas or cell size and for
    /// malformed footprints, and `InvalidParameter` if a block's matrix is
    /// empty, not square, or does not match its size
    pub fn placements(&self) -> Result<Vec<Placement>> {
        let CanvasSpec {
            width,
            height,
            cell_size,
        } = self.canvas;
        if width == 0 || height == 0 || cell_size == 0 {
            return Err(invalid_dimensions(&format!(
                "canvas {width}x{height} with cell size {cell_size} cannot be rendered"
            )));
        }
        let mut shared: Vec<Arc<Matrix>> = Vec::new();

        self.blocks
            .iter()
            .map(|block| {
                block.validate(cell_size)?;
                let parsed = Matrix::from_rows(&block.matrix)?;
                if parsed.size() == 0 {
                    return Err(invalid_parameter("matrix", &"[]", &"matrix must not be empty"));
                }
                let matrix = match shared.iter().find(|m| ***m == parsed) {
                    Some(existing) => Arc::clone(existing),
                    None => {
                        let fresh = Arc::new(parsed);
                        shared.push(Arc::clone(&fresh));
                        fresh
                    }
                };
                Ok(Placement {
                    matrix,
                    determinant: block.determinant,
                    size: block.size,
                    x_cell: block.x / cell_size,
                    y_cell: block.y / cell_size,
                    x_px: block.x,
                    y_px: block.y,
                    extent_px: block.width,
                })
            })
            .collect()
    }

    /// Paint the described canvas
    ///
    /// # Errors
    ///
    /// Returns an error if the hue, a matrix or an entry is invalid
    pub fn render(&self) -> Result<Canvas> {
        let settings = self.composite_settings()?;
        let placements = self.placements()?;
        composite_region(
            PixelRegion::full(self.canvas.width, self.canvas.height),
            &placements,
            &settings,
        )
    }

    /// Pretty JSON text
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| WallpaperError::Serialization {
            context: "render spec",
            source: e,
        })
    }

    /// Parse JSON text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid render spec
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| WallpaperError::Serialization {
            context: "render spec",
            source: e,
        })
    }

    /// Write JSON to `path`, creating parent directories
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or any file operation fails
    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| WallpaperError::FileSystem {
                path: parent.to_path_buf(),
                operation: "create directory",
                source: e,
            })?;
        }
        std::fs::write(path, self.to_json()?).map_err(|e| WallpaperError::FileSystem {
            path: path.to_path_buf(),
            operation: "write render spec",
            source: e,
        })
    }
}
