//! Numeric primitives used by search and compositing

/// Integer determinant via LU decomposition
pub mod determinant;
/// Separable Gaussian filtering with reflected edges
pub mod gaussian;
