//! CLI entry point for the extremal-determinant wallpaper generator

use clap::Parser;
use dettile::io::cli::{Cli, WallpaperCommand};
use tracing_subscriber::EnvFilter;

fn main() -> dettile::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    WallpaperCommand::new(cli).run()
}
