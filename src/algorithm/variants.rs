//! Alternative matrix candidates layered over the baseline extremal pick
//!
//! Each strategy returns a `(matrix, determinant)` pair that is at least as
//! extreme as the baseline in the requested direction, or the baseline itself.

use crate::algorithm::cache::MatrixCache;
use crate::algorithm::search::{Matrix, SearchKey, for_each_determinant};
use crate::io::error::{Result, WallpaperError, invalid_parameter};
use ndarray::Array2;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::str::FromStr;
use std::sync::Arc;

/// How a placement's matrix is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatrixVariant {
    /// Extremal matrix of the placement size
    #[default]
    Baseline,
    /// Best of `A⊗A`, `A⊗I`, `I⊗A` when it beats the baseline
    Kronecker,
    /// Most extreme member of the top or bottom `k` ranked candidates
    TopK {
        /// Slice length
        k: usize,
    },
}

impl FromStr for MatrixVariant {
    type Err = WallpaperError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "baseline" | "none" => Ok(Self::Baseline),
            "kronecker" => Ok(Self::Kronecker),
            "top-k" | "topk" | "top_k" => Ok(Self::TopK {
                k: crate::io::configuration::DEFAULT_TOP_K,
            }),
            other => Err(invalid_parameter(
                "variant",
                &other,
                &"expected baseline, kronecker or top-k",
            )),
        }
    }
}

/// One enumerated matrix with its determinant
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Rounded determinant
    pub determinant: i64,
    /// The matrix itself
    pub matrix: Arc<Matrix>,
}

/// Candidates sorted ascending by determinant, cut to both ends
#[derive(Debug, Clone, Default)]
pub struct RankedCandidates {
    /// The `k` smallest determinants, ascending
    pub bottom: Vec<Candidate>,
    /// The `k` largest determinants, ascending
    pub top: Vec<Candidate>,
}

impl RankedCandidates {
    /// Most extreme member of the slice matching the direction
    ///
    /// Ties resolve to the earliest candidate in enumeration order.
    pub fn most_extreme(&self, use_max: bool) -> Option<&Candidate> {
        let slice = if use_max { &self.top } else { &self.bottom };
        let target = if use_max {
            slice.iter().map(|c| c.determinant).max()
        } else {
            slice.iter().map(|c| c.determinant).min()
        }?;
        slice.iter().find(|c| c.determinant == target)
    }
}

/// Enumerate every candidate for `key` and keep both `k`-length ends
///
/// Candidates are ordered by determinant, then by enumeration order, so equal
/// determinants keep the order they were visited in. Only `2k` candidates are
/// held at any time.
///
/// # Errors
///
/// Returns an error if the matrix size is zero or too large to enumerate
pub fn rank_candidates(key: SearchKey, k: usize) -> Result<RankedCandidates> {
    // Max-heap holding the k smallest, min-heap holding the k largest
    let mut bottom: BinaryHeap<(i64, u64)> = BinaryHeap::new();
    let mut top: BinaryHeap<Reverse<(i64, u64)>> = BinaryHeap::new();

    for_each_determinant(key, |mask, det| {
        bottom.push((det, mask));
        if bottom.len() > k {
            bottom.pop();
        }
        top.push(Reverse((det, mask)));
        if top.len() > k {
            top.pop();
        }
    })?;

    let to_candidate = |(determinant, mask): (i64, u64)| Candidate {
        determinant,
        matrix: Arc::new(key.matrix_at(mask)),
    };

    Ok(RankedCandidates {
        bottom: bottom.into_sorted_vec().into_iter().map(to_candidate).collect(),
        top: top
            .into_sorted_vec()
            .into_iter()
            .rev()
            .map(|Reverse(entry)| to_candidate(entry))
            .collect(),
    })
}

/// Kronecker product `a ⊗ b`, or `None` if an entry overflows `i64`
pub fn kronecker_product(a: &Matrix, b: &Matrix) -> Option<Matrix> {
    let (na, nb) = (a.size(), b.size());
    let n = na * nb;
    let mut entries = Vec::with_capacity(n * n);
    for row in 0..n {
        for col in 0..n {
            let outer = a.get(row / nb, col / nb)?;
            let inner = b.get(row % nb, col % nb)?;
            entries.push(outer.checked_mul(inner)?);
        }
    }
    Array2::from_shape_vec((n, n), entries)
        .ok()
        .and_then(|array| Matrix::from_array(array).ok())
}

/// The three structured expansions `A⊗A`, `A⊗I`, `I⊗A`
///
/// An expansion whose entries overflow is `None`.
pub fn kronecker_variants(a: &Matrix) -> [Option<Matrix>; 3] {
    let identity = Matrix::identity(a.size());
    [
        kronecker_product(a, a),
        kronecker_product(a, &identity),
        kronecker_product(&identity, a),
    ]
}

/// Replace `base` by a Kronecker expansion when one is strictly more extreme
///
/// Expansions containing entries outside `{low, high}` are not eligible, and
/// neither are expansions whose products overflow.
pub fn kronecker_refine(
    base: Arc<Matrix>,
    base_determinant: i64,
    use_max: bool,
    low: i64,
    high: i64,
) -> (Arc<Matrix>, i64) {
    let mut best = (base, base_determinant);

    for variant in kronecker_variants(&best.0).into_iter().flatten() {
        if !variant.uses_only(low, high) {
            continue;
        }
        let det = variant.determinant();
        let improves = if use_max { det > best.1 } else { det < best.1 };
        if improves {
            best = (Arc::new(variant), det);
        }
    }

    best
}

/// Select the matrix for one placement size
///
/// # Errors
///
/// Returns an error if the underlying search fails
pub fn choose_matrix(
    cache: &MatrixCache,
    key: SearchKey,
    use_max: bool,
    variant: MatrixVariant,
) -> Result<(Arc<Matrix>, i64)> {
    let (matrix, det) = cache.extremal(key)?.pick(use_max);

    match variant {
        MatrixVariant::Baseline => Ok((matrix, det)),
        MatrixVariant::Kronecker => Ok(kronecker_refine(
            matrix, det, use_max, key.low, key.high,
        )),
        MatrixVariant::TopK { k } => {
            let ranked = cache.ranked(key, k)?;
            Ok(ranked
                .most_extreme(use_max)
                .map_or((matrix, det), |c| (Arc::clone(&c.matrix), c.determinant)))
        }
    }
}
