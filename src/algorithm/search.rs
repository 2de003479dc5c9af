//! Exhaustive search for extremal-determinant matrices over a two-value alphabet
//!
//! Every `n`×`n` matrix with entries in `{low, high}` is visited exactly once.
//! Enumeration follows a binary counter read most-significant bit first across
//! the row-major entries: the last entry varies fastest and each position takes
//! `low` before `high`. Ties keep the first matrix encountered in this order.

use crate::io::configuration::MAX_SEARCH_DIMENSION;
use crate::io::error::{Result, invalid_parameter};
use crate::math::determinant::{determinant, lu_determinant_in_place, round_determinant};
use bitvec::order::Msb0;
use bitvec::view::BitView;
use ndarray::Array2;
use std::sync::Arc;

/// Square integer matrix, stored as `ndarray` rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    entries: Array2<i64>,
}

impl Matrix {
    /// Wrap a square array
    ///
    /// # Errors
    ///
    /// Returns an error if the array is not square
    pub fn from_array(entries: Array2<i64>) -> Result<Self> {
        let (rows, cols) = entries.dim();
        if rows != cols {
            return Err(invalid_parameter(
                "matrix",
                &format!("{rows}x{cols}"),
                &"matrix must be square",
            ));
        }
        Ok(Self { entries })
    }

    /// Build from nested rows
    ///
    /// # Errors
    ///
    /// Returns an error if the rows are ragged or do not form a square
    pub fn from_rows(rows: &[Vec<i64>]) -> Result<Self> {
        let n = rows.len();
        let flat: Vec<i64> = rows.iter().flatten().copied().collect();
        if rows.iter().any(|row| row.len() != n) {
            return Err(invalid_parameter(
                "matrix",
                &format!("{n} rows"),
                &"every row must have as many entries as there are rows",
            ));
        }
        let entries = Array2::from_shape_vec((n, n), flat).map_err(|e| {
            invalid_parameter("matrix", &format!("{n} rows"), &e)
        })?;
        Ok(Self { entries })
    }

    /// Identity matrix of dimension `n`
    pub fn identity(n: usize) -> Self {
        Self {
            entries: Array2::eye(n),
        }
    }

    /// Matrix dimension
    pub fn size(&self) -> usize {
        self.entries.nrows()
    }

    /// Entry at `(row, col)`
    pub fn get(&self, row: usize, col: usize) -> Option<i64> {
        self.entries.get([row, col]).copied()
    }

    /// Underlying array
    pub const fn entries(&self) -> &Array2<i64> {
        &self.entries
    }

    /// Rounded determinant
    pub fn determinant(&self) -> i64 {
        determinant(&self.entries).unwrap_or_default()
    }

    /// Nested row representation
    pub fn to_rows(&self) -> Vec<Vec<i64>> {
        self.entries.rows().into_iter().map(|row| row.to_vec()).collect()
    }

    /// Whether every entry is `low` or `high`
    pub fn uses_only(&self, low: i64, high: i64) -> bool {
        self.entries.iter().all(|&v| v == low || v == high)
    }
}

/// Identifies one search: matrix dimension and the two-value alphabet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchKey {
    /// Matrix dimension
    pub size: usize,
    /// Entry used for cleared bits
    pub low: i64,
    /// Entry used for set bits
    pub high: i64,
}

impl SearchKey {
    /// Create a search key
    pub const fn new(size: usize, low: i64, high: i64) -> Self {
        Self { size, low, high }
    }

    /// Number of matrices in the search space
    pub const fn candidate_count(&self) -> u64 {
        1u64 << (self.size * self.size)
    }

    fn validate(&self) -> Result<()> {
        if self.size == 0 || self.size > MAX_SEARCH_DIMENSION {
            return Err(invalid_parameter(
                "matrix size",
                &self.size,
                &format!("must be between 1 and {MAX_SEARCH_DIMENSION}"),
            ));
        }
        Ok(())
    }

    fn fill(&self, mask: u64, buffer: &mut [f64]) {
        let cells = self.size * self.size;
        let bits = mask.view_bits::<Msb0>();
        if let Some(tail) = bits.get(64 - cells..) {
            for (slot, bit) in buffer.iter_mut().zip(tail.iter().by_vals()) {
                let value = if bit { self.high } else { self.low };
                *slot = value as f64;
            }
        }
    }

    /// Matrix at position `mask` of the enumeration order
    pub fn matrix_at(&self, mask: u64) -> Matrix {
        let n = self.size;
        let mut buffer = vec![0.0; n * n];
        self.fill(mask, &mut buffer);
        let entries = Array2::from_shape_fn((n, n), |(row, col)| {
            buffer.get(row * n + col).copied().unwrap_or_default() as i64
        });
        Matrix { entries }
    }
}

/// Largest and smallest determinants for one search key
#[derive(Debug, Clone)]
pub struct ExtremalResult {
    /// Maximum determinant found
    pub max_determinant: i64,
    /// Minimum determinant found
    pub min_determinant: i64,
    /// First matrix achieving the maximum
    pub max_matrix: Arc<Matrix>,
    /// First matrix achieving the minimum
    pub min_matrix: Arc<Matrix>,
}

impl ExtremalResult {
    /// Matrix and determinant for the requested extremum
    pub fn pick(&self, use_max: bool) -> (Arc<Matrix>, i64) {
        if use_max {
            (Arc::clone(&self.max_matrix), self.max_determinant)
        } else {
            (Arc::clone(&self.min_matrix), self.min_determinant)
        }
    }
}

/// Visit every candidate in enumeration order with its rounded determinant
///
/// # Errors
///
/// Returns an error if the matrix size is zero or too large to enumerate
pub fn for_each_determinant<F>(key: SearchKey, mut visit: F) -> Result<()>
where
    F: FnMut(u64, i64),
{
    key.validate()?;
    let n = key.size;
    let mut work = vec![0.0; n * n];

    for mask in 0..key.candidate_count() {
        key.fill(mask, &mut work);
        visit(mask, round_determinant(lu_determinant_in_place(&mut work, n)));
    }
    Ok(())
}

/// Brute-force the extremal matrices for `key`
///
/// # Errors
///
/// Returns an error if the matrix size is zero or too large to enumerate
pub fn extremal_search(key: SearchKey) -> Result<ExtremalResult> {
    let mut best_max: Option<(i64, u64)> = None;
    let mut best_min: Option<(i64, u64)> = None;

    for_each_determinant(key, |mask, det| {
        if best_max.is_none_or(|(d, _)| det > d) {
            best_max = Some((det, mask));
        }
        if best_min.is_none_or(|(d, _)| det < d) {
            best_min = Some((det, mask));
        }
    })?;

    let (max_determinant, max_mask) = best_max.unwrap_or_default();
    let (min_determinant, min_mask) = best_min.unwrap_or_default();

    Ok(ExtremalResult {
        max_determinant,
        min_determinant,
        max_matrix: Arc::new(key.matrix_at(max_mask)),
        min_matrix: Arc::new(key.matrix_at(min_mask)),
    })
}
