//! Wallpaper generator built from extremal-determinant matrices
//!
//! Exhaustive search finds the two-valued matrices with the largest or
//! smallest determinant for each size. A seeded layout scatters them over a
//! cell grid, each entry becomes a colored cell, and the compositor adds
//! blur, feathering, gap filling and vignette before an optional alpha
//! channel is derived from color intensity.

#![deny(unsafe_code)]

/// Matrix search, caching and generation orchestration
pub mod algorithm;
/// Input/output operations, parameters and error handling
pub mod io;
/// Determinants and Gaussian filtering
pub mod math;
/// Coloring, compositing and alpha mapping
pub mod render;
/// Layout planning and tile geometry
pub mod spatial;

pub use io::error::{Result, WallpaperError};
