//! Error types for wallpaper generation

use std::fmt;
use std::path::PathBuf;

/// Main error type for all generation operations
#[derive(Debug)]
pub enum WallpaperError {
    /// Matrix entry lies outside the configured value range
    InvalidValue {
        /// Offending entry
        value: i64,
        /// Lower bound of the range
        low: i64,
        /// Upper bound of the range
        high: i64,
    },

    /// Hue name is not part of the fixed palette
    InvalidHue {
        /// Name as supplied by the caller
        name: String,
    },

    /// Canvas, cell or matrix-size parameters cannot produce a layout
    InvalidDimensions {
        /// Description of the offending dimension
        reason: String,
    },

    /// Reference image for alpha mapping could not be used
    ///
    /// Recovered inside the alpha mapper by falling back to procedural alpha.
    AlphaSourceUnavailable {
        /// Path or description of the reference
        source_description: String,
        /// Why the reference was rejected
        reason: String,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Failed to decode an image
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to save generated image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// JSON encoding or decoding failed
    Serialization {
        /// What was being encoded or decoded
        context: &'static str,
        /// Underlying serde error
        source: serde_json::Error,
    },

    /// Numerical computation or shared state produced an invalid result
    Computation {
        /// Name of the computation that failed
        operation: &'static str,
        /// Description of the failure
        reason: String,
    },
}

impl fmt::Display for WallpaperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { value, low, high } => {
                write!(f, "Value n={value} is not within range [{low}, {high}]")
            }
            Self::InvalidHue { name } => {
                write!(
                    f,
                    "Unknown hue '{name}'. Options: {}",
                    crate::render::color::Hue::NAMES.join(", ")
                )
            }
            Self::InvalidDimensions { reason } => {
                write!(f, "Invalid dimensions: {reason}")
            }
            Self::AlphaSourceUnavailable {
                source_description,
                reason,
            } => {
                write!(
                    f,
                    "Alpha source '{source_description}' unavailable: {reason}"
                )
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::Serialization { context, source } => {
                write!(f, "Serialization error in {context}: {source}")
            }
            Self::Computation { operation, reason } => {
                write!(f, "Computation error in {operation}: {reason}")
            }
        }
    }
}

impl std::error::Error for WallpaperError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            Self::Serialization { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for generation results
pub type Result<T> = std::result::Result<T, WallpaperError>;

impl From<image::ImageError> for WallpaperError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from("<memory>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for WallpaperError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

impl From<serde_json::Error> for WallpaperError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            context: "json",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> WallpaperError {
    WallpaperError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create an invalid dimensions error
pub fn invalid_dimensions(reason: &impl ToString) -> WallpaperError {
    WallpaperError::InvalidDimensions {
        reason: reason.to_string(),
    }
}

/// Create a computation error
pub fn computation_error(operation: &'static str, reason: &impl ToString) -> WallpaperError {
    WallpaperError::Computation {
        operation,
        reason: reason.to_string(),
    }
}

