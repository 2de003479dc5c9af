//! Command-line interface for rendering one wallpaper to PNG

use crate::algorithm::cache::MatrixCache;
use crate::algorithm::executor::{RenderStrategy, WallpaperGenerator};
use crate::io::configuration::OUTPUT_SUFFIX;
use crate::io::error::{Result, WallpaperError};
use crate::io::image::export_png;
use crate::io::params::{AlphaMode, GenerationParams};
use crate::io::progress::ProgressManager;
use crate::render::alpha::{AlphaSource, attach_alpha, derive_alpha};
use crate::render::compositor::Canvas;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

#[derive(Parser, Debug, Default)]
#[command(name = "dettile")]
#[command(
    author,
    version,
    about = "Render wallpapers from extremal-determinant matrices"
)]
/// Command-line arguments for wallpaper generation
///
/// Every override left unset keeps the value from `--config`, or the built-in
/// default when no config file is given.
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Output PNG path
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// JSON parameter file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Canvas width in pixels
    #[arg(short = 'W', long)]
    pub width: Option<usize>,

    /// Canvas height in pixels
    #[arg(short = 'H', long)]
    pub height: Option<usize>,

    /// Pixels per matrix cell
    #[arg(long)]
    pub cell_size: Option<usize>,

    /// Smallest matrix entry
    #[arg(long, allow_negative_numbers = true)]
    pub low: Option<i64>,

    /// Largest matrix entry
    #[arg(long, allow_negative_numbers = true)]
    pub high: Option<i64>,

    /// Blend toward mid-gray in [0, 1]
    #[arg(long)]
    pub normalizer: Option<f64>,

    /// Palette hue
    #[arg(long)]
    pub hue: Option<String>,

    /// Disable determinant shading
    #[arg(long)]
    pub flat: bool,

    /// Search minimum determinants instead of maximum
    #[arg(long)]
    pub min: bool,

    /// Largest placement edge in cells
    #[arg(short = 'n', long)]
    pub max_matrix_size: Option<usize>,

    /// Size pattern: mixed, uniform or gradient
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// Blur inside each block
    #[arg(short, long)]
    pub blur: Option<f64>,

    /// Vignette strength
    #[arg(long)]
    pub vignette: Option<f64>,

    /// Empty cells between placements
    #[arg(short, long)]
    pub gap: Option<usize>,

    /// Edge feathering in [0, 1]
    #[arg(long)]
    pub feather: Option<f64>,

    /// Matrix variant: baseline, kronecker or top-k
    #[arg(long)]
    pub variant: Option<String>,

    /// Slice length for the top-k variant
    #[arg(long)]
    pub top_k: Option<usize>,

    /// Rendering strategy
    #[arg(long, value_enum)]
    pub strategy: Option<RenderStrategy>,

    /// Tile edge for tiled rendering
    #[arg(long)]
    pub tile_size: Option<usize>,

    /// Alpha channel origin
    #[arg(short, long, value_enum)]
    pub alpha: Option<AlphaMode>,

    /// Reference image for reference alpha
    #[arg(short, long, value_name = "IMAGE")]
    pub reference: Option<PathBuf>,

    /// Fixed intensity scale for reference alpha
    #[arg(long)]
    pub alpha_scale: Option<f64>,

    /// Also write the render spec as JSON next to the output
    #[arg(short = 's', long)]
    pub render_spec: bool,

    /// Print the effective parameters as JSON and exit
    #[arg(long)]
    pub print_params: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Effective parameters: config file first, then flag overrides
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub fn params(&self) -> Result<GenerationParams> {
        let mut params = match &self.config {
            Some(path) => GenerationParams::from_json_file(path)?,
            None => GenerationParams::default(),
        };

        override_with(&mut params.canvas_width, self.width);
        override_with(&mut params.canvas_height, self.height);
        override_with(&mut params.cell_size, self.cell_size);
        override_with(&mut params.low, self.low);
        override_with(&mut params.high, self.high);
        override_with(&mut params.normalizer, self.normalizer);
        override_with(&mut params.hue, self.hue.clone());
        override_with(&mut params.max_matrix_size, self.max_matrix_size);
        override_with(&mut params.pattern, self.pattern.clone());
        override_with(&mut params.blur_sigma, self.blur);
        override_with(&mut params.vignette_strength, self.vignette);
        override_with(&mut params.gap_cells, self.gap);
        override_with(&mut params.feather_strength, self.feather);
        override_with(&mut params.variant, self.variant.clone());
        override_with(&mut params.top_k, self.top_k);
        override_with(&mut params.strategy, self.strategy);
        override_with(&mut params.tile_size, self.tile_size);
        override_with(&mut params.alpha_mode, self.alpha);

        if self.flat {
            params.use_determinant = false;
        }
        if self.min {
            params.use_max = false;
        }
        if let Some(reference) = &self.reference {
            params.reference_image = Some(reference.clone());
            if self.alpha.is_none() {
                params.alpha_mode = AlphaMode::Reference;
            }
        }
        if self.alpha_scale.is_some() {
            params.alpha_scale = self.alpha_scale;
        }

        Ok(params)
    }
}

fn override_with<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// Runs one CLI invocation end to end
pub struct WallpaperCommand {
    cli: Cli,
    cache: MatrixCache,
}

impl WallpaperCommand {
    /// Wrap parsed arguments
    pub fn new(cli: Cli) -> Self {
        Self {
            cli,
            cache: MatrixCache::new(),
        }
    }

    /// Resolve parameters, render and write the outputs
    ///
    /// # Errors
    ///
    /// Returns an error if parameters are invalid, rendering fails or an
    /// output cannot be written
    // Allow print for the requested parameter dump
    #[allow(clippy::print_stdout)]
    pub fn run(&self) -> Result<()> {
        let params = self.cli.params()?;

        if self.cli.print_params {
            println!("{}", params.to_json()?);
            return Ok(());
        }

        let start_time = Instant::now();
        let generator = WallpaperGenerator::new(&params, &self.cache)?;
        let canvas = self.render_with_progress(&generator)?;

        let source = params.alpha_source();
        let alpha = derive_alpha(&source, params.alpha_scale(), &canvas);
        let pixels = match (&source, &alpha) {
            (AlphaSource::None, _) | (_, None) => canvas,
            (_, Some(map)) => attach_alpha(&canvas, map)?,
        };

        export_png(&pixels, &self.cli.output)?;

        if self.cli.render_spec {
            let spec_path = Self::render_spec_path(&self.cli.output);
            generator.render_spec(alpha.as_ref()).write_json(&spec_path)?;
            info!(path = %spec_path.display(), "render spec written");
        }

        let stats = self.cache.stats();
        info!(
            path = %self.cli.output.display(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            cache_hits = stats.hits,
            cache_misses = stats.misses,
            "wallpaper written"
        );
        Ok(())
    }

    fn render_with_progress(&self, generator: &WallpaperGenerator) -> Result<Canvas> {
        if !generator.uses_tiling() {
            let progress = if self.cli.should_show_progress() {
                ProgressManager::for_canvas()
            } else {
                ProgressManager::hidden()
            };
            let canvas = generator.render_monolithic();
            progress.finish();
            return canvas;
        }

        let mut renderer = generator.tiled_renderer();
        let progress = if self.cli.should_show_progress() {
            ProgressManager::for_tiles(renderer.tile_count())
        } else {
            ProgressManager::hidden()
        };

        loop {
            let should_continue = renderer.render_next_tile()?;
            progress.update(renderer.completed());
            if !should_continue {
                break;
            }
        }
        let reported = progress.position();
        progress.finish();

        if reported != renderer.tile_count() as u64 {
            return Err(WallpaperError::Computation {
                operation: "tiled render",
                reason: format!("{reported} of {} tiles rendered", renderer.tile_count()),
            });
        }
        Ok(renderer.finish())
    }

    /// `<stem>-map.json` beside the output image
    pub fn render_spec_path(output: &Path) -> PathBuf {
        let stem = output.file_stem().unwrap_or_default();
        let spec_name = format!("{}{}.json", stem.to_string_lossy(), OUTPUT_SUFFIX);

        if let Some(parent) = output.parent() {
            parent.join(spec_name)
        } else {
            PathBuf::from(spec_name)
        }
    }
}
