//! Spatial planning for the wallpaper canvas
//!
//! This module contains:
//! - Seeded placement of square blocks on the cell grid
//! - Pixel regions and overlapping tile plans

/// Seeded block layout over the cell grid
pub mod layout;
/// Pixel regions and tile planning
pub mod tiles;

pub use layout::{Placement, plan_layout};
