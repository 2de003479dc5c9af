//! PNG export for RGB and RGBA canvases

use crate::io::error::{Result, WallpaperError, invalid_dimensions};
use image::{ImageBuffer, Rgb, Rgba};
use ndarray::Array3;
use std::path::Path;

/// Save a `[y, x, channel]` buffer as PNG
///
/// Three channels are written as RGB, four as RGBA.
///
/// # Errors
///
/// Returns an error if:
/// - The buffer has a channel count other than 3 or 4
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_png(pixels: &Array3<u8>, output_path: &Path) -> Result<()> {
    let (height, width, channels) = pixels.dim();
    let (w, h) = (
        u32::try_from(width).map_err(|e| invalid_dimensions(&e))?,
        u32::try_from(height).map_err(|e| invalid_dimensions(&e))?,
    );
    let raw: Vec<u8> = pixels.iter().copied().collect();

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| WallpaperError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    let saved = match channels {
        3 => ImageBuffer::<Rgb<u8>, _>::from_raw(w, h, raw)
            .ok_or_else(|| invalid_dimensions(&"RGB buffer does not match its shape"))?
            .save(output_path),
        4 => ImageBuffer::<Rgba<u8>, _>::from_raw(w, h, raw)
            .ok_or_else(|| invalid_dimensions(&"RGBA buffer does not match its shape"))?
            .save(output_path),
        other => {
            return Err(invalid_dimensions(&format!(
                "expected 3 or 4 channels, got {other}"
            )));
        }
    };

    saved.map_err(|e| WallpaperError::ImageExport {
        path: output_path.to_path_buf(),
        source: e,
    })
}

/// Decode a PNG (or any supported format) into an RGBA buffer
///
/// # Errors
///
/// Returns `ImageLoad` if the file cannot be decoded
pub fn load_rgba(path: &Path) -> Result<Array3<u8>> {
    let image = image::open(path).map_err(|e| WallpaperError::ImageLoad {
        path: path.to_path_buf(),
        source: e,
    })?;
    let rgba = image.to_rgba8();
    let (w, h) = rgba.dimensions();
    Array3::from_shape_vec((h as usize, w as usize, 4), rgba.into_raw())
        .map_err(|e| invalid_dimensions(&e))
}
