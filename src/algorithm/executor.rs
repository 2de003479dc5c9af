use crate::{
    algorithm::cache::MatrixCache,
    algorithm::search::{Matrix, SearchKey},
    algorithm::variants::{MatrixVariant, choose_matrix},
    io::configuration::{LAYOUT_SEED, MIN_FILL_SIGMA, TILING_AREA_THRESHOLD},
    io::error::{Result, invalid_dimensions},
    io::params::GenerationParams,
    io::render_spec::{AlphaMapSpec, BlockSpec, CanvasSpec, RenderSpec, VisualSpec},
    render::alpha::{AlphaMap, AlphaScale, AlphaSource, attach_alpha, derive_alpha},
    render::block::BlockStyle,
    render::color::{ColorMapper, DeterminantRange, Hue},
    render::compositor::{Canvas, CompositeSettings, composite_region},
    spatial::layout::{LayoutConfig, Placement, plan_layout},
    spatial::tiles::{PixelRegion, TilePlan, required_overlap},
};
use ndarray::{Array3, s};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// How the canvas is painted
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum RenderStrategy {
    /// Tile only when the canvas area exceeds the threshold
    #[default]
    Auto,
    /// Whole canvas in one buffer
    Monolithic,
    /// Overlapping tiles stitched by their cores
    Tiled,
}

/// One generation request with its layout resolved
///
/// Construction validates the parameters, runs the extremal searches through
/// the shared cache and fixes every placement. Rendering afterwards is pure
/// and can be repeated or split into tiles.
pub struct WallpaperGenerator {
    params: GenerationParams,
    hue: Hue,
    placements: Vec<Placement>,
    range: DeterminantRange,
    settings: CompositeSettings,
}

impl WallpaperGenerator {
    /// Resolve layout and matrices for `params`
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are invalid or a search fails
    pub fn new(params: &GenerationParams, cache: &MatrixCache) -> Result<Self> {
        params.validate()?;
        let hue = params.hue()?;
        let variant = params.variant()?;
        let (width_cells, height_cells) = params.grid_cells();

        let largest = params.max_matrix_size.min(width_cells).min(height_cells);

        // Shading range always comes from the baseline picks
        let mut baseline = Vec::with_capacity(largest);
        let mut selections: Vec<(Arc<Matrix>, i64)> = Vec::with_capacity(largest);
        for size in 1..=largest {
            let key = SearchKey::new(size, params.low, params.high);
            baseline.push(choose_matrix(cache, key, params.use_max, MatrixVariant::Baseline)?.1);
            selections.push(choose_matrix(cache, key, params.use_max, variant)?);
        }
        let range = DeterminantRange::from_determinants(baseline);

        let slots = plan_layout(&LayoutConfig {
            width_cells,
            height_cells,
            max_matrix_size: params.max_matrix_size,
            pattern: params.pattern(),
            gap_cells: params.gap_cells,
            seed: LAYOUT_SEED,
        });

        let placements = slots
            .into_iter()
            .filter_map(|slot| {
                selections.get(slot.size - 1).map(|(matrix, det)| {
                    Placement::new(slot, Arc::clone(matrix), *det, params.cell_size)
                })
            })
            .collect::<Vec<_>>();

        info!(
            width = params.canvas_width,
            height = params.canvas_height,
            placements = placements.len(),
            det_min = range.min,
            det_max = range.max,
            "layout resolved"
        );

        let settings = CompositeSettings {
            style: BlockStyle {
                mapper: ColorMapper {
                    low: params.low,
                    high: params.high,
                    normalizer: params.normalizer,
                    hue,
                },
                use_determinant: params.use_determinant,
                use_max: params.use_max,
                range,
                blur_sigma: params.blur_sigma,
                feather_strength: params.feather_strength,
            },
            canvas_width: params.canvas_width,
            canvas_height: params.canvas_height,
            fill_gaps: params.gap_cells == 0,
            fill_sigma: params.blur_sigma.max(MIN_FILL_SIGMA),
            vignette_strength: params.vignette_strength,
        };

        Ok(Self {
            params: params.clone(),
            hue,
            placements,
            range,
            settings,
        })
    }

    /// Parameters this generator was built from
    pub const fn params(&self) -> &GenerationParams {
        &self.params
    }

    /// Placements in layout order
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Determinant span used for shading
    pub const fn determinant_range(&self) -> DeterminantRange {
        self.range
    }

    /// Compositing settings shared by every strategy
    pub const fn settings(&self) -> &CompositeSettings {
        &self.settings
    }

    /// Whether rendering will go through tiles
    pub const fn uses_tiling(&self) -> bool {
        match self.params.strategy {
            RenderStrategy::Auto => {
                self.params.canvas_width * self.params.canvas_height > TILING_AREA_THRESHOLD
            }
            RenderStrategy::Monolithic => false,
            RenderStrategy::Tiled => true,
        }
    }

    /// Tile grid with an overlap wide enough for every effect
    pub fn tile_plan(&self) -> TilePlan {
        let overlap = required_overlap(
            self.params.blur_sigma,
            self.params.max_matrix_size * self.params.cell_size,
            self.settings.fill_gaps.then_some(self.settings.fill_sigma),
        );
        TilePlan::new(
            self.params.canvas_width,
            self.params.canvas_height,
            self.params.tile_size,
            overlap,
        )
    }

    /// Paint the whole canvas in one buffer
    ///
    /// # Errors
    ///
    /// Returns an error if a block cannot be colored
    pub fn render_monolithic(&self) -> Result<Canvas> {
        composite_region(
            PixelRegion::full(self.params.canvas_width, self.params.canvas_height),
            &self.placements,
            &self.settings,
        )
    }

    /// Step-wise tiled renderer over this generator's layout
    pub fn tiled_renderer(&self) -> TiledRenderer<'_> {
        TiledRenderer::new(self.tile_plan(), &self.placements, self.settings)
    }

    /// Paint the canvas with the configured strategy
    ///
    /// # Errors
    ///
    /// Returns an error if a block cannot be colored
    pub fn render(&self) -> Result<Canvas> {
        if self.uses_tiling() {
            info!(strategy = "tiled", "rendering canvas");
            self.tiled_renderer().run()
        } else {
            info!(strategy = "monolithic", "rendering canvas");
            self.render_monolithic()
        }
    }

    /// Paint the canvas and append an alpha channel from `source`
    ///
    /// Returns plain RGB when `source` is [`AlphaSource::None`].
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails; alpha failures fall back instead
    pub fn render_with_alpha(
        &self,
        source: &AlphaSource,
        scale: AlphaScale,
    ) -> Result<(Canvas, Option<AlphaMap>)> {
        let canvas = self.render()?;
        let alpha = derive_alpha(source, scale, &canvas);
        Ok((canvas, alpha))
    }

    /// Paint an RGBA canvas
    ///
    /// [`AlphaSource::None`] gives a fully opaque channel.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails
    pub fn render_rgba(&self, source: &AlphaSource, scale: AlphaScale) -> Result<Array3<u8>> {
        let (canvas, alpha) = self.render_with_alpha(source, scale)?;
        let (h, w, _) = canvas.dim();
        let alpha = alpha.unwrap_or_else(|| AlphaMap::from_elem((h, w), 255));
        attach_alpha(&canvas, &alpha)
    }

    /// Describe this generation without painting it
    pub fn render_spec(&self, alpha: Option<&AlphaMap>) -> RenderSpec {
        RenderSpec {
            canvas: CanvasSpec {
                width: self.params.canvas_width,
                height: self.params.canvas_height,
                cell_size: self.params.cell_size,
            },
            visual: VisualSpec {
                hue: self.hue.name().to_string(),
                normalizer: self.params.normalizer,
                low: self.params.low,
                high: self.params.high,
                blur_sigma: self.params.blur_sigma,
                vignette_strength: self.params.vignette_strength,
                feather_strength: self.params.feather_strength,
                use_determinant: self.params.use_determinant,
                use_max: self.params.use_max,
                gap_cells: self.params.gap_cells,
            },
            determinant_range: self.range,
            alpha_map: alpha.map(AlphaMapSpec::from_map),
            blocks: self.placements.iter().map(BlockSpec::from_placement).collect(),
        }
    }
}

/// Renders a canvas tile by tile into a shared output buffer
///
/// Each tile composites its expanded region with the global layout, settings
/// and canvas-centred vignette, then copies only its core. The result is
/// identical to the monolithic canvas.
pub struct TiledRenderer<'g> {
    plan: TilePlan,
    placements: &'g [Placement],
    settings: CompositeSettings,
    canvas: Canvas,
    next_tile: usize,
}

impl<'g> TiledRenderer<'g> {
    /// Prepare an empty output canvas for `plan`
    pub fn new(plan: TilePlan, placements: &'g [Placement], settings: CompositeSettings) -> Self {
        let canvas = Canvas::zeros((plan.canvas_height, plan.canvas_width, 3));
        Self {
            plan,
            placements,
            settings,
            canvas,
            next_tile: 0,
        }
    }

    /// Total number of tiles
    pub const fn tile_count(&self) -> usize {
        self.plan.len()
    }

    /// Tiles rendered so far
    pub const fn completed(&self) -> usize {
        self.next_tile
    }

    /// Render the next tile
    ///
    /// Returns `false` once every tile is done.
    ///
    /// # Errors
    ///
    /// Returns an error if a block cannot be colored
    pub fn render_next_tile(&mut self) -> Result<bool> {
        let Some(tile) = self.plan.tile(self.next_tile) else {
            return Ok(false);
        };

        debug!(index = self.next_tile, ?tile.core, "rendering tile");
        let rendered = composite_region(tile.expanded, self.placements, &self.settings)?;

        let off_x = tile.core.x - tile.expanded.x;
        let off_y = tile.core.y - tile.expanded.y;
        let core = rendered.slice(s![
            off_y..off_y + tile.core.height,
            off_x..off_x + tile.core.width,
            ..
        ]);
        if core.dim() != (tile.core.height, tile.core.width, 3) {
            return Err(invalid_dimensions(&"tile core exceeds its expanded region"));
        }
        self.canvas
            .slice_mut(s![
                tile.core.y..tile.core.bottom(),
                tile.core.x..tile.core.right(),
                ..
            ])
            .assign(&core);

        self.next_tile += 1;
        Ok(self.next_tile < self.tile_count())
    }

    /// Take the stitched canvas
    pub fn finish(self) -> Canvas {
        self.canvas
    }

    /// Render all remaining tiles and return the canvas
    ///
    /// # Errors
    ///
    /// Returns an error if a block cannot be colored
    pub fn run(mut self) -> Result<Canvas> {
        while self.render_next_tile()? {}
        Ok(self.finish())
    }
}

/// Generate an RGB canvas in one call
///
/// # Errors
///
/// Returns an error if the parameters are invalid or rendering fails
pub fn generate_canvas(params: &GenerationParams, cache: &MatrixCache) -> Result<Canvas> {
    WallpaperGenerator::new(params, cache)?.render()
}

/// Generate a render spec, with alpha when the parameters request it
///
/// # Errors
///
/// Returns an error if the parameters are invalid or rendering fails
pub fn generate_render_spec(params: &GenerationParams, cache: &MatrixCache) -> Result<RenderSpec> {
    let generator = WallpaperGenerator::new(params, cache)?;
    let source = params.alpha_source();
    if matches!(source, AlphaSource::None) {
        return Ok(generator.render_spec(None));
    }
    let (_, alpha) = generator.render_with_alpha(&source, params.alpha_scale())?;
    Ok(generator.render_spec(alpha.as_ref()))
}

/// Generate an RGBA canvas with alpha from the parameters' alpha source
///
/// # Errors
///
/// Returns an error if the parameters are invalid or rendering fails
pub fn generate_rgba(params: &GenerationParams, cache: &MatrixCache) -> Result<Array3<u8>> {
    WallpaperGenerator::new(params, cache)?.render_rgba(&params.alpha_source(), params.alpha_scale())
}
