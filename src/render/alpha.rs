//! Alpha channels derived from color intensity
//!
//! Intensity is the Euclidean distance of a pixel from its own gray point
//! (Rec. 709 luminance), so saturated pixels become opaque and near-gray
//! pixels transparent.

use crate::io::error::{Result, WallpaperError, invalid_dimensions};
use image::RgbImage;
use image::imageops::FilterType;
use ndarray::{Array2, Array3, Axis, s};
use std::path::PathBuf;
use tracing::warn;

/// 8-bit alpha channel indexed `[y, x]`
pub type AlphaMap = Array2<u8>;

/// Where the alpha channel comes from
#[derive(Debug, Clone, Default)]
pub enum AlphaSource {
    /// RGB output, no alpha
    None,
    /// Intensity of the generated canvas itself
    #[default]
    Procedural,
    /// Intensity of a reference image on disk
    ReferencePath(PathBuf),
    /// Intensity of an encoded reference image held in memory
    ReferenceBytes(Vec<u8>),
}

/// How reference intensity is scaled to `0..=255`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AlphaScale {
    /// Divide by the image's own maximum intensity
    #[default]
    SelfMax,
    /// Divide by a fixed intensity; non-positive values behave like `SelfMax`
    Fixed(f64),
}

/// Distance of `(r, g, b)` from its luminance gray point
pub fn color_intensity(rgb: [u8; 3]) -> f64 {
    let [r, g, b] = rgb.map(f64::from);
    let luminance = 0.0722f64.mul_add(b, 0.2126f64.mul_add(r, 0.7152 * g));
    let (dr, dg, db) = (r - luminance, g - luminance, b - luminance);
    db.mul_add(db, dr.mul_add(dr, dg * dg)).sqrt()
}

/// Per-pixel intensity of an RGB buffer
pub fn intensity_field(rgb: &Array3<u8>) -> Array2<f64> {
    let (h, w, _) = rgb.dim();
    let values: Vec<f64> = rgb
        .lanes(Axis(2))
        .into_iter()
        .map(|px| {
            color_intensity([
                px.get(0).copied().unwrap_or(0),
                px.get(1).copied().unwrap_or(0),
                px.get(2).copied().unwrap_or(0),
            ])
        })
        .collect();
    Array2::from_shape_vec((h, w), values).unwrap_or_else(|_| Array2::zeros((h, w)))
}

/// Scale an intensity field into alpha
///
/// A field with zero maximum maps to `flat_alpha` everywhere under `SelfMax`.
pub fn scale_intensity(intensity: &Array2<f64>, scale: AlphaScale, flat_alpha: u8) -> AlphaMap {
    let divisor = match scale {
        AlphaScale::Fixed(fixed) if fixed > 0.0 => fixed,
        _ => intensity.iter().copied().fold(0.0, f64::max),
    };
    if divisor <= 0.0 {
        return AlphaMap::from_elem(intensity.dim(), flat_alpha);
    }
    intensity.mapv(|v| (v / divisor * 255.0).clamp(0.0, 255.0) as u8)
}

/// Alpha from the generated canvas, normalized by its own maximum
///
/// A fully gray canvas is fully opaque.
pub fn procedural_alpha(canvas: &Array3<u8>) -> AlphaMap {
    scale_intensity(&intensity_field(canvas), AlphaScale::SelfMax, 255)
}

/// Alpha from a reference image already resized to the canvas
///
/// A fully gray reference is fully transparent.
pub fn reference_alpha(reference: &Array3<u8>, scale: AlphaScale) -> AlphaMap {
    scale_intensity(&intensity_field(reference), scale, 0)
}

/// Decode the reference and resize it (Lanczos3) to `width`×`height`
///
/// # Errors
///
/// Returns `AlphaSourceUnavailable` when the reference is missing or cannot be
/// decoded, or when the source carries no reference at all
pub fn load_reference(source: &AlphaSource, width: usize, height: usize) -> Result<Array3<u8>> {
    let (description, decoded) = match source {
        AlphaSource::ReferencePath(path) => (path.display().to_string(), image::open(path)),
        AlphaSource::ReferenceBytes(bytes) => {
            (format!("<{} bytes>", bytes.len()), image::load_from_memory(bytes))
        }
        AlphaSource::None | AlphaSource::Procedural => {
            return Err(WallpaperError::AlphaSourceUnavailable {
                source_description: "<none>".to_string(),
                reason: "no reference image configured".to_string(),
            });
        }
    };

    let image = decoded.map_err(|e| WallpaperError::AlphaSourceUnavailable {
        source_description: description,
        reason: e.to_string(),
    })?;

    let mut rgb: RgbImage = image.to_rgb8();
    let (w, h) = (width as u32, height as u32);
    if rgb.dimensions() != (w, h) && w > 0 && h > 0 {
        rgb = image::imageops::resize(&rgb, w, h, FilterType::Lanczos3);
    }

    let (rw, rh) = rgb.dimensions();
    Array3::from_shape_vec((rh as usize, rw as usize, 3), rgb.into_raw())
        .map_err(|e| invalid_dimensions(&e))
}

/// Alpha channel for `canvas` according to `source`
///
/// Reference failures are logged and recovered by procedural alpha; `None`
/// yields no channel.
pub fn derive_alpha(source: &AlphaSource, scale: AlphaScale, canvas: &Array3<u8>) -> Option<AlphaMap> {
    let (h, w, _) = canvas.dim();
    match source {
        AlphaSource::None => None,
        AlphaSource::Procedural => Some(procedural_alpha(canvas)),
        AlphaSource::ReferencePath(_) | AlphaSource::ReferenceBytes(_) => {
            match load_reference(source, w, h) {
                Ok(reference) if reference.dim() == canvas.dim() => {
                    Some(reference_alpha(&reference, scale))
                }
                Ok(_) => {
                    warn!("reference image has no pixels, using procedural alpha");
                    Some(procedural_alpha(canvas))
                }
                Err(err) => {
                    warn!(%err, "falling back to procedural alpha");
                    Some(procedural_alpha(canvas))
                }
            }
        }
    }
}

/// Stack RGB and alpha into an RGBA buffer
///
/// # Errors
///
/// Returns `InvalidDimensions` if the alpha map does not match the canvas
pub fn attach_alpha(canvas: &Array3<u8>, alpha: &AlphaMap) -> Result<Array3<u8>> {
    let (h, w, _) = canvas.dim();
    if alpha.dim() != (h, w) {
        return Err(invalid_dimensions(&format!(
            "alpha map {}x{} does not match canvas {w}x{h}",
            alpha.dim().1,
            alpha.dim().0
        )));
    }

    let mut rgba = Array3::<u8>::zeros((h, w, 4));
    rgba.slice_mut(s![.., .., 0..3]).assign(canvas);
    rgba.slice_mut(s![.., .., 3]).assign(alpha);
    Ok(rgba)
}
