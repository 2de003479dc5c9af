//! Tile progress display for long renders

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::LazyLock;

static TILE_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {msg} [{bar:30.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static SPINNER_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_spinner()
        .template("{spinner} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
});

/// Progress for one wallpaper
///
/// Tiled renders get a bar with one step per tile; monolithic renders get a
/// spinner. A hidden manager swallows every update.
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Bar over `tile_count` tiles
    pub fn for_tiles(tile_count: usize) -> Self {
        let bar = ProgressBar::new(tile_count as u64);
        bar.set_style(TILE_STYLE.clone());
        bar.set_message("tiles");
        Self { bar }
    }

    /// Spinner for a single-buffer render
    pub fn for_canvas() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(SPINNER_STYLE.clone());
        bar.set_message("rendering canvas");
        Self { bar }
    }

    /// Manager that draws nothing
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Record `completed` finished tiles
    pub fn update(&self, completed: usize) {
        self.bar.set_position(completed as u64);
    }

    /// Position reported so far
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Clear the display
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
