//! Matrix entry to RGB mapping and determinant-based shading

use crate::io::configuration::NEUTRAL_GRAY;
use crate::io::error::{Result, WallpaperError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Fixed hue palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hue {
    /// R = G = B
    Gray,
    /// Red fixed at full
    Red,
    /// Red full, green scaled by 165/255
    Orange,
    /// Red and green full
    Yellow,
    /// Green full
    Green,
    /// Blue full
    Blue,
    /// Blue full, red scaled by 150/255, no green
    Purple,
    /// Red full, blue fixed at 200
    Pink,
    /// Constant teal, independent of brightness
    Teal,
}

impl Hue {
    /// Palette names in display order
    pub const NAMES: [&'static str; 9] = [
        "gray", "red", "orange", "yellow", "green", "blue", "purple", "pink", "teal",
    ];

    /// Every palette entry, in the order of [`Hue::NAMES`]
    pub const ALL: [Self; 9] = [
        Self::Gray,
        Self::Red,
        Self::Orange,
        Self::Yellow,
        Self::Green,
        Self::Blue,
        Self::Purple,
        Self::Pink,
        Self::Teal,
    ];

    /// Lowercase palette name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gray => "gray",
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Purple => "purple",
            Self::Pink => "pink",
            Self::Teal => "teal",
        }
    }

    /// Expand one brightness level into RGB
    pub const fn apply(self, gray: u8) -> [u8; 3] {
        let g = gray as u32;
        match self {
            Self::Gray => [gray, gray, gray],
            Self::Red => [255, gray, gray],
            Self::Orange => [255, (165 * g / 255) as u8, gray],
            Self::Yellow => [255, 255, gray],
            Self::Green => [gray, 255, gray],
            Self::Blue => [gray, gray, 255],
            Self::Purple => [(150 * g / 255) as u8, 0, 255],
            Self::Pink => [255, gray, 200],
            Self::Teal => [0, 255, 200],
        }
    }
}

impl FromStr for Hue {
    type Err = WallpaperError;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|hue| hue.name() == lowered)
            .ok_or_else(|| WallpaperError::InvalidHue {
                name: s.to_string(),
            })
    }
}

/// Maps matrix entries in `[low, high]` to palette colors
#[derive(Debug, Clone, Copy)]
pub struct ColorMapper {
    /// Lower bound of valid entries
    pub low: i64,
    /// Upper bound of valid entries
    pub high: i64,
    /// Blend toward neutral gray, in `[0, 1]`
    pub normalizer: f64,
    /// Palette hue
    pub hue: Hue,
}

impl ColorMapper {
    /// Brightness before hue expansion
    ///
    /// The binary range is inverted on purpose: `0` is white and `1` black.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` when `value` is outside `[low, high]`
    pub fn gray_level(&self, value: i64) -> Result<u8> {
        if value < self.low || value > self.high {
            return Err(WallpaperError::InvalidValue {
                value,
                low: self.low,
                high: self.high,
            });
        }

        let base: i64 = if self.low == 0 && self.high == 1 {
            if value == 0 { 255 } else { 0 }
        } else if self.high == self.low {
            255
        } else {
            // Widened so spans like `i64::MIN..=i64::MAX` cannot overflow
            let t = (i128::from(value) - i128::from(self.low)) as f64
                / (i128::from(self.high) - i128::from(self.low)) as f64;
            (255.0 * (1.0 - t)) as i64
        };

        let blended = (1.0 - self.normalizer)
            .mul_add(base as f64, self.normalizer * f64::from(NEUTRAL_GRAY))
            as i64;
        Ok(blended.clamp(0, 255) as u8)
    }

    /// RGB for one matrix entry
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` when `value` is outside `[low, high]`
    pub fn color(&self, value: i64) -> Result<[u8; 3]> {
        Ok(self.hue.apply(self.gray_level(value)?))
    }
}

/// Span of determinants used to normalize shading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeterminantRange {
    /// Smallest determinant
    pub min: i64,
    /// Largest determinant
    pub max: i64,
}

impl DeterminantRange {
    /// Range spanned by `dets`, or `0..0` when empty
    pub fn from_determinants(dets: impl IntoIterator<Item = i64>) -> Self {
        dets.into_iter()
            .fold(None, |acc: Option<Self>, d| {
                Some(acc.map_or(Self { min: d, max: d }, |r| Self {
                    min: r.min.min(d),
                    max: r.max.max(d),
                }))
            })
            .unwrap_or_default()
    }

    /// Whether the range has no width
    pub const fn is_degenerate(&self) -> bool {
        self.max <= self.min
    }
}

/// Block brightness multiplier from a determinant's place in the range
///
/// Returns `1.0` when shading is disabled or the range is degenerate.
pub fn brightness_factor(
    determinant: i64,
    range: DeterminantRange,
    use_determinant: bool,
    use_max: bool,
) -> f64 {
    if !use_determinant || range.is_degenerate() {
        return 1.0;
    }
    let normalized = (i128::from(determinant) - i128::from(range.min)) as f64
        / (i128::from(range.max) - i128::from(range.min)) as f64;
    if use_max {
        0.5f64.mul_add(normalized, 0.5)
    } else {
        0.5f64.mul_add(1.0 - normalized, 0.5)
    }
}

/// Scale one channel, truncating and saturating at 255
pub fn shade_channel(channel: u8, factor: f64) -> u8 {
    ((f64::from(channel) * factor) as i64).clamp(0, 255) as u8
}
