//! Run-time generation parameters, loadable from JSON

use crate::algorithm::executor::RenderStrategy;
use crate::algorithm::variants::MatrixVariant;
use crate::io::configuration::{
    DEFAULT_BLUR_SIGMA, DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, DEFAULT_CELL_SIZE,
    DEFAULT_GAP_CELLS, DEFAULT_HUE, DEFAULT_MAX_MATRIX_SIZE, DEFAULT_NORMALIZER, DEFAULT_PATTERN,
    DEFAULT_TOP_K, DEFAULT_VIGNETTE_STRENGTH, MAX_SEARCH_DIMENSION, TILE_SIZE,
};
use crate::io::error::{Result, WallpaperError, invalid_dimensions, invalid_parameter};
use crate::render::alpha::{AlphaScale, AlphaSource};
use crate::render::color::Hue;
use crate::spatial::layout::SizePattern;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Origin of the output alpha channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AlphaMode {
    /// Derived from the generated canvas
    #[default]
    Procedural,
    /// Derived from `reference_image`, falling back to procedural
    Reference,
    /// Plain RGB output
    None,
}

/// Complete parameter set for one wallpaper
///
/// Missing JSON fields take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    /// Canvas width in pixels
    pub canvas_width: usize,
    /// Canvas height in pixels
    pub canvas_height: usize,
    /// Pixels per matrix cell
    pub cell_size: usize,
    /// Smallest matrix entry
    pub low: i64,
    /// Largest matrix entry
    pub high: i64,
    /// Blend of every cell toward mid-gray, in `[0, 1]`
    pub normalizer: f64,
    /// Palette hue name, case-insensitive
    pub hue: String,
    /// Modulate block brightness by determinant
    pub use_determinant: bool,
    /// Search for maximum rather than minimum determinants
    pub use_max: bool,
    /// Largest placement edge in cells
    pub max_matrix_size: usize,
    /// Size-weighting pattern; unknown names mean `mixed`
    pub pattern: String,
    /// Gaussian blur inside each block
    pub blur_sigma: f64,
    /// Radial vignette strength
    pub vignette_strength: f64,
    /// Empty cells between placements
    pub gap_cells: usize,
    /// Edge feathering strength in `[0, 1]`
    pub feather_strength: f64,
    /// Matrix selection: `baseline`, `kronecker` or `top-k`
    pub variant: String,
    /// Slice length for `top-k`
    pub top_k: usize,
    /// Monolithic, tiled, or chosen by canvas area
    pub strategy: RenderStrategy,
    /// Tile edge for tiled rendering
    pub tile_size: usize,
    /// Alpha channel origin
    pub alpha_mode: AlphaMode,
    /// Reference image for `alpha_mode = reference`
    pub reference_image: Option<PathBuf>,
    /// Fixed intensity scale for reference alpha; `None` scales by the maximum
    pub alpha_scale: Option<f64>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            cell_size: DEFAULT_CELL_SIZE,
            low: 0,
            high: 1,
            normalizer: DEFAULT_NORMALIZER,
            hue: DEFAULT_HUE.to_string(),
            use_determinant: true,
            use_max: true,
            max_matrix_size: DEFAULT_MAX_MATRIX_SIZE,
            pattern: DEFAULT_PATTERN.to_string(),
            blur_sigma: DEFAULT_BLUR_SIGMA,
            vignette_strength: DEFAULT_VIGNETTE_STRENGTH,
            gap_cells: DEFAULT_GAP_CELLS,
            feather_strength: 0.0,
            variant: "baseline".to_string(),
            top_k: DEFAULT_TOP_K,
            strategy: RenderStrategy::Auto,
            tile_size: TILE_SIZE,
            alpha_mode: AlphaMode::Procedural,
            reference_image: None,
            alpha_scale: None,
        }
    }
}

impl GenerationParams {
    /// Read parameters from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| WallpaperError::FileSystem {
            path: path.to_path_buf(),
            operation: "read parameters",
            source: e,
        })?;
        Self::from_json(&text)
    }

    /// Parse parameters from JSON text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid parameter object
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| WallpaperError::Serialization {
            context: "generation parameters",
            source: e,
        })
    }

    /// Pretty JSON rendering of the effective parameters
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| WallpaperError::Serialization {
            context: "generation parameters",
            source: e,
        })
    }

    /// Resolved palette hue
    ///
    /// # Errors
    ///
    /// Returns `InvalidHue` for names outside the palette
    pub fn hue(&self) -> Result<Hue> {
        self.hue.parse()
    }

    /// Resolved size pattern
    pub fn pattern(&self) -> SizePattern {
        SizePattern::parse_lenient(&self.pattern)
    }

    /// Resolved matrix variant
    ///
    /// # Errors
    ///
    /// Returns an error for unknown variant names
    pub fn variant(&self) -> Result<MatrixVariant> {
        Ok(match self.variant.parse::<MatrixVariant>()? {
            MatrixVariant::TopK { .. } => MatrixVariant::TopK { k: self.top_k },
            other => other,
        })
    }

    /// Resolved alpha source
    pub fn alpha_source(&self) -> AlphaSource {
        match (self.alpha_mode, &self.reference_image) {
            (AlphaMode::None, _) => AlphaSource::None,
            (AlphaMode::Reference, Some(path)) => AlphaSource::ReferencePath(path.clone()),
            (AlphaMode::Reference, None) | (AlphaMode::Procedural, _) => AlphaSource::Procedural,
        }
    }

    /// Resolved alpha scaling
    pub fn alpha_scale(&self) -> AlphaScale {
        self.alpha_scale.map_or(AlphaScale::SelfMax, AlphaScale::Fixed)
    }

    /// Grid size in whole cells; partial cells at the edges are dropped
    pub const fn grid_cells(&self) -> (usize, usize) {
        if self.cell_size == 0 {
            return (0, 0);
        }
        (
            self.canvas_width / self.cell_size,
            self.canvas_height / self.cell_size,
        )
    }

    /// Check every parameter before any work is done
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimensions` for zero sizes, `InvalidHue` for unknown
    /// hues and `InvalidParameter` for out-of-range numeric settings
    pub fn validate(&self) -> Result<()> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(invalid_dimensions(&format!(
                "canvas must be non-empty, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if self.cell_size == 0 {
            return Err(invalid_dimensions(&"cell_size must be positive"));
        }
        if self.max_matrix_size == 0 {
            return Err(invalid_dimensions(
                &"max_matrix_size must be at least 1 for a non-empty layout",
            ));
        }
        if self.max_matrix_size > MAX_SEARCH_DIMENSION {
            return Err(invalid_parameter(
                "max_matrix_size",
                &self.max_matrix_size,
                &format!("search is exhaustive and limited to {MAX_SEARCH_DIMENSION}"),
            ));
        }
        if self.tile_size == 0 {
            return Err(invalid_dimensions(&"tile_size must be positive"));
        }

        self.hue()?;
        self.variant()?;

        check_unit("normalizer", self.normalizer)?;
        check_unit("feather_strength", self.feather_strength)?;
        check_non_negative("blur_sigma", self.blur_sigma)?;
        check_non_negative("vignette_strength", self.vignette_strength)?;
        Ok(())
    }
}

fn check_unit(name: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid_parameter(name, &value, &"must lie in [0, 1]"))
    }
}

fn check_non_negative(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid_parameter(name, &value, &"must be finite and non-negative"))
    }
}
