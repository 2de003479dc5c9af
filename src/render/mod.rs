//! Turning matrices into pixels

/// Alpha channels from color intensity
pub mod alpha;
/// Single-block painting with blur and feathering
pub mod block;
/// Value-to-color mapping and determinant shading
pub mod color;
/// Canvas compositing, gap filling and vignette
pub mod compositor;
