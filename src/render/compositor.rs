//! Canvas compositing: block placement, gap filling and vignette
//!
//! All three stages operate on an arbitrary sub-region of the final canvas
//! addressed in global pixel coordinates. The monolithic path renders the full
//! canvas as one region; the tiled path renders expanded tiles and keeps their
//! cores. Both run exactly the same code per pixel.

use crate::io::error::Result;
use crate::math::gaussian::gaussian_filter;
use crate::render::block::{BlockStyle, render_block};
use crate::spatial::layout::Placement;
use crate::spatial::tiles::PixelRegion;
use ndarray::{Array3, Axis, s};
use std::collections::HashMap;
use std::sync::Arc;

/// RGB pixel buffer indexed `[y, x, channel]`
pub type Canvas = Array3<u8>;

/// Global compositing parameters
#[derive(Debug, Clone, Copy)]
pub struct CompositeSettings {
    /// Block painting parameters
    pub style: BlockStyle,
    /// Full canvas width in pixels
    pub canvas_width: usize,
    /// Full canvas height in pixels
    pub canvas_height: usize,
    /// Smooth over unpainted pixels, used when placements touch
    pub fill_gaps: bool,
    /// Sigma of the gap-filling blur
    pub fill_sigma: f64,
    /// Radial darkening strength, zero to disable
    pub vignette_strength: f64,
}

/// Paint every placement intersecting `region` into a fresh buffer
///
/// Blocks overrunning the region are clipped. Pixels not covered stay black.
///
/// # Errors
///
/// Returns `InvalidValue` if a placement's matrix has an entry outside the
/// color range
pub fn render_region(
    region: PixelRegion,
    placements: &[Placement],
    style: &BlockStyle,
) -> Result<Canvas> {
    let mut canvas = Canvas::zeros((region.height, region.width, 3));
    let mut blocks: HashMap<(usize, i64, usize), Array3<u8>> = HashMap::new();

    for placement in placements {
        let footprint = placement.region();
        let Some(overlap) = footprint.intersection(&region) else {
            continue;
        };

        let key = (
            Arc::as_ptr(&placement.matrix) as usize,
            placement.determinant,
            placement.extent_px,
        );
        let block = match blocks.entry(key) {
            std::collections::hash_map::Entry::Occupied(entry) => entry.into_mut(),
            std::collections::hash_map::Entry::Vacant(entry) => entry.insert(render_block(
                &placement.matrix,
                placement.determinant,
                placement.extent_px,
                style,
            )?),
        };

        let src_x = overlap.x - footprint.x;
        let src_y = overlap.y - footprint.y;
        let dst_x = overlap.x - region.x;
        let dst_y = overlap.y - region.y;

        let source = block.slice(s![
            src_y..src_y + overlap.height,
            src_x..src_x + overlap.width,
            ..
        ]);
        canvas
            .slice_mut(s![
                dst_y..dst_y + overlap.height,
                dst_x..dst_x + overlap.width,
                ..
            ])
            .assign(&source);
    }

    Ok(canvas)
}

/// Replace pure-black pixels with a blurred average of their surroundings
pub fn fill_empty_with_average(canvas: &mut Canvas, sigma: f64) {
    let empty = canvas
        .lanes(Axis(2))
        .into_iter()
        .map(|px| px.iter().all(|&c| c == 0))
        .collect::<Vec<bool>>();
    if !empty.iter().any(|&e| e) {
        return;
    }

    let width = canvas.dim().1;
    for mut channel in canvas.axis_iter_mut(Axis(2)) {
        let blurred = gaussian_filter(&channel.mapv(f64::from), sigma);
        for ((y, x), px) in channel.indexed_iter_mut() {
            if empty.get(y * width + x).copied().unwrap_or(false) {
                *px = blurred.get([y, x]).copied().unwrap_or(0.0) as u8;
            }
        }
    }
}

/// Radial darkening measured from the full canvas centre
///
/// `origin` is the global position of `canvas`'s top-left pixel, so a tile
/// receives exactly the attenuation its pixels would get in the full canvas.
pub fn apply_vignette(
    canvas: &mut Canvas,
    origin: (usize, usize),
    canvas_width: usize,
    canvas_height: usize,
    strength: f64,
) {
    if strength <= 0.0 {
        return;
    }

    let cx = canvas_width as f64 / 2.0;
    let cy = canvas_height as f64 / 2.0;
    let max_dist = cx.hypot(cy);
    if max_dist <= 0.0 {
        return;
    }

    for ((y, x, _), px) in canvas.indexed_iter_mut() {
        let dx = (origin.0 + x) as f64 - cx;
        let dy = (origin.1 + y) as f64 - cy;
        let dist = dx.hypot(dy);
        let attenuation = (1.0 - (dist / max_dist) * strength).clamp(0.0, 1.0);
        *px = (f64::from(*px) * attenuation) as u8;
    }
}

/// Render, fill and vignette one region of the canvas
///
/// # Errors
///
/// Propagates block rendering failures
pub fn composite_region(
    region: PixelRegion,
    placements: &[Placement],
    settings: &CompositeSettings,
) -> Result<Canvas> {
    let mut canvas = render_region(region, placements, &settings.style)?;

    if settings.fill_gaps && !canvas.is_empty() {
        fill_empty_with_average(&mut canvas, settings.fill_sigma);
    }

    apply_vignette(
        &mut canvas,
        (region.x, region.y),
        settings.canvas_width,
        settings.canvas_height,
        settings.vignette_strength,
    );

    Ok(canvas)
}
