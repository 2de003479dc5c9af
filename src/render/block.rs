//! Colored pixel blocks for individual placements

use crate::algorithm::search::Matrix;
use crate::io::configuration::NEUTRAL_GRAY;
use crate::io::error::Result;
use crate::math::gaussian::gaussian_filter;
use crate::render::color::{ColorMapper, DeterminantRange, brightness_factor, shade_channel};
use ndarray::{Array2, Array3, Axis};
use std::f64::consts::PI;

/// Everything that affects how a block is painted, shared by all placements
#[derive(Debug, Clone, Copy)]
pub struct BlockStyle {
    /// Entry to color mapping
    pub mapper: ColorMapper,
    /// Modulate brightness by determinant
    pub use_determinant: bool,
    /// Shading direction: brighter for larger determinants when set
    pub use_max: bool,
    /// Global determinant span
    pub range: DeterminantRange,
    /// Blur applied inside the block, zero to disable
    pub blur_sigma: f64,
    /// Edge feathering strength in `[0, 1]`, zero to disable
    pub feather_strength: f64,
}

/// Paint `matrix` into an `extent`×`extent` RGB block
///
/// Each pixel takes the color of the matrix cell it falls in, so a matrix whose
/// dimension differs from the placement footprint is resampled nearest-cell.
/// The block is then shaded, blurred and feathered in that order.
///
/// # Errors
///
/// Returns `InvalidValue` if any entry lies outside the mapper's range
pub fn render_block(
    matrix: &Matrix,
    determinant: i64,
    extent: usize,
    style: &BlockStyle,
) -> Result<Array3<u8>> {
    let dim = matrix.size();
    let mut block = Array3::<u8>::zeros((extent, extent, 3));
    if extent == 0 || dim == 0 {
        return Ok(block);
    }

    let factor = brightness_factor(determinant, style.range, style.use_determinant, style.use_max);

    let mut cell_colors = Array2::<[u8; 3]>::from_elem((dim, dim), [0; 3]);
    for ((row, col), slot) in cell_colors.indexed_iter_mut() {
        let base = style.mapper.color(matrix.get(row, col).unwrap_or_default())?;
        *slot = base.map(|c| shade_channel(c, factor));
    }

    for ((y, x, c), px) in block.indexed_iter_mut() {
        let cell = cell_colors.get([y * dim / extent, x * dim / extent]);
        *px = cell.and_then(|rgb| rgb.get(c)).copied().unwrap_or(0);
    }

    if style.blur_sigma > 0.0 {
        blur_channels(&mut block, style.blur_sigma);
    }

    if style.feather_strength > 0.0 {
        feather_edges(&mut block, style.feather_strength);
    }

    Ok(block)
}

/// Gaussian blur each channel independently, truncating back to `u8`
pub fn blur_channels(block: &mut Array3<u8>, sigma: f64) {
    for mut channel in block.axis_iter_mut(Axis(2)) {
        let field = channel.mapv(f64::from);
        let blurred = gaussian_filter(&field, sigma);
        channel.zip_mut_with(&blurred, |px, &v| *px = v as u8);
    }
}

/// Cosine-ramped fade toward neutral gray near the block border
///
/// The ramp spans `min(h, w) * strength / 2` pixels from the nearest edge.
pub fn feather_edges(block: &mut Array3<u8>, strength: f64) {
    let (h, w, _) = block.dim();
    if strength <= 0.0 || h == 0 || w == 0 {
        return;
    }

    let max_feather = h.min(w) as f64 * strength * 0.5;
    if max_feather <= 0.0 {
        return;
    }

    let background = f64::from(NEUTRAL_GRAY);
    for ((y, x, _), px) in block.indexed_iter_mut() {
        let edge_x = x.min(w - 1 - x);
        let edge_y = y.min(h - 1 - y);
        let dist = edge_x.min(edge_y) as f64;

        let ramp = (dist / max_feather).clamp(0.0, 1.0);
        let mask = 0.5 * (1.0 - (PI * ramp).cos());
        *px = f64::from(*px).mul_add(mask, background * (1.0 - mask)) as u8;
    }
}
