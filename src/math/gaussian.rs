//! Separable Gaussian smoothing with mirrored boundaries
//!
//! Boundaries reflect about the array edge (`d c b a | a b c d | d c b a`) and
//! the kernel is truncated at [`GAUSSIAN_TRUNCATE`] standard deviations. A pixel
//! further than [`kernel_radius`] from every edge of the array is unaffected by
//! the boundary rule, which is what lets tiles with a wide enough margin agree
//! with a full-canvas pass.

use crate::io::configuration::GAUSSIAN_TRUNCATE;
use ndarray::{Array2, ArrayView1, ArrayViewMut1, Axis};

/// Number of samples on each side of the kernel centre
pub fn kernel_radius(sigma: f64) -> usize {
    if sigma <= 0.0 {
        return 0;
    }
    GAUSSIAN_TRUNCATE.mul_add(sigma, 0.5).floor() as usize
}

/// Normalized 1D Gaussian kernel of length `2 * radius + 1`
pub fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    let radius = kernel_radius(sigma) as i64;
    if radius == 0 {
        return vec![1.0];
    }

    let inv_two_var = 0.5 / (sigma * sigma);
    let raw: Vec<f64> = (-radius..=radius)
        .map(|x| (-(x * x) as f64 * inv_two_var).exp())
        .collect();
    let total: f64 = raw.iter().sum();
    raw.into_iter().map(|w| w / total).collect()
}

/// Blur a 2D field along both axes
///
/// Axis 0 is filtered first, then axis 1. Non-positive sigma returns a copy.
pub fn gaussian_filter(input: &Array2<f64>, sigma: f64) -> Array2<f64> {
    if sigma <= 0.0 || input.is_empty() {
        return input.clone();
    }

    let kernel = gaussian_kernel(sigma);
    let mut first = input.clone();
    filter_axis(input, &mut first, Axis(0), &kernel);

    let mut second = first.clone();
    filter_axis(&first, &mut second, Axis(1), &kernel);
    second
}

fn filter_axis(input: &Array2<f64>, output: &mut Array2<f64>, axis: Axis, kernel: &[f64]) {
    for (lane_in, lane_out) in input.lanes(axis).into_iter().zip(output.lanes_mut(axis)) {
        convolve_lane(lane_in, lane_out, kernel);
    }
}

fn convolve_lane(input: ArrayView1<'_, f64>, mut output: ArrayViewMut1<'_, f64>, kernel: &[f64]) {
    let len = input.len();
    let radius = kernel.len() / 2;

    for (i, out) in output.iter_mut().enumerate() {
        let mut acc = 0.0;
        for (k, weight) in kernel.iter().enumerate() {
            let offset = i as i64 + k as i64 - radius as i64;
            let source = reflect_index(offset, len);
            acc = weight.mul_add(input.get(source).copied().unwrap_or(0.0), acc);
        }
        *out = acc;
    }
}

/// Map an out-of-range index back into `0..len` by half-sample reflection
pub fn reflect_index(index: i64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let period = 2 * len as i64;
    let folded = index.rem_euclid(period);
    if folded >= len as i64 {
        (period - 1 - folded) as usize
    } else {
        folded as usize
    }
}
