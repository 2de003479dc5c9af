/// Command-line front end
pub mod cli;
/// Fixed constants and defaults
pub mod configuration;
/// Error types
pub mod error;
/// PNG export
pub mod image;
/// Run-time parameters
pub mod params;
/// Tile progress display
pub mod progress;
/// Serializable wallpaper description
pub mod render_spec;
