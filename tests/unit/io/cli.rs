//! Tests for argument parsing and the end-to-end command

#[cfg(test)]
mod tests {
    use clap::Parser;
    use dettile::algorithm::executor::RenderStrategy;
    use dettile::io::cli::{Cli, WallpaperCommand};
    use dettile::io::params::{AlphaMode, GenerationParams};
    use dettile::io::render_spec::RenderSpec;
    use std::path::{Path, PathBuf};

    fn parse(args: &[&str]) -> Cli {
        let Ok(cli) = Cli::try_parse_from(std::iter::once("dettile").chain(args.iter().copied()))
        else {
            panic!("arguments rejected: {args:?}");
        };
        cli
    }

    // Tests flags override defaults and unset flags keep them
    #[test]
    fn test_flag_overrides() {
        let cli = parse(&[
            "out.png", "-W", "320", "-H", "200", "--low", "-1", "--high", "1", "--hue", "teal",
            "--min", "--flat", "--strategy", "tiled", "-n", "3",
        ]);
        let Ok(params) = cli.params() else {
            panic!("params failed");
        };

        assert_eq!((params.canvas_width, params.canvas_height), (320, 200));
        assert_eq!((params.low, params.high), (-1, 1));
        assert_eq!(params.hue, "teal");
        assert!(!params.use_max);
        assert!(!params.use_determinant);
        assert_eq!(params.strategy, RenderStrategy::Tiled);
        assert_eq!(params.max_matrix_size, 3);
        assert_eq!(params.cell_size, GenerationParams::default().cell_size);
        assert!(cli.should_show_progress());
    }

    // Tests a reference image selects reference alpha unless alpha is explicit
    #[test]
    fn test_reference_selects_alpha_mode() {
        let Ok(implicit) = parse(&["out.png", "-r", "ref.png"]).params() else {
            panic!("params failed");
        };
        assert_eq!(implicit.alpha_mode, AlphaMode::Reference);
        assert_eq!(implicit.reference_image, Some(PathBuf::from("ref.png")));

        let Ok(explicit) = parse(&["out.png", "-r", "ref.png", "--alpha", "none"]).params() else {
            panic!("params failed");
        };
        assert_eq!(explicit.alpha_mode, AlphaMode::None);
    }

    // Tests flags win over values loaded from the config file
    #[test]
    fn test_config_file_merge() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir failed");
        };
        let config = dir.path().join("params.json");
        assert!(std::fs::write(&config, r#"{"canvas_width": 64, "hue": "red", "gap_cells": 0}"#).is_ok());

        let Some(config_arg) = config.to_str() else {
            panic!("non-utf8 temp path");
        };
        let Ok(params) = parse(&["out.png", "-c", config_arg, "--hue", "blue"]).params() else {
            panic!("params failed");
        };
        assert_eq!(params.canvas_width, 64);
        assert_eq!(params.gap_cells, 0);
        assert_eq!(params.hue, "blue");
    }

    #[test]
    fn test_missing_config_file() {
        assert!(parse(&["out.png", "-c", "/nonexistent/params.json"]).params().is_err());
    }

    #[test]
    fn test_render_spec_path() {
        assert_eq!(
            WallpaperCommand::render_spec_path(Path::new("renders/wall.png")),
            PathBuf::from("renders/wall-map.json")
        );
        assert_eq!(
            WallpaperCommand::render_spec_path(Path::new("wall.png")),
            PathBuf::from("wall-map.json")
        );
    }

    // Tests a full run writes an RGBA image and a matching render spec
    #[test]
    fn test_command_writes_outputs() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir failed");
        };
        let output = dir.path().join("walls").join("small.png");
        let Some(output_arg) = output.to_str() else {
            panic!("non-utf8 temp path");
        };
        let cli = parse(&[output_arg, "-W", "96", "-H", "64", "--cell-size", "8", "-s", "-q"]);
        assert!(!cli.should_show_progress());
        assert!(WallpaperCommand::new(cli).run().is_ok());

        let Ok(written) = image::open(&output) else {
            panic!("output image missing");
        };
        assert_eq!((written.width(), written.height()), (96, 64));
        assert!(written.color().has_alpha());

        let spec = std::fs::read_to_string(dir.path().join("walls").join("small-map.json"))
            .ok()
            .and_then(|text| RenderSpec::from_json(&text).ok());
        let Some(spec) = spec else {
            panic!("render spec missing");
        };
        assert_eq!((spec.canvas.width, spec.canvas.height), (96, 64));
        assert!(spec.alpha_map.is_some());
        assert!(!spec.blocks.is_empty());
    }

    // Tests the tiled path produces the same pixels as the monolithic path
    #[test]
    fn test_command_tiled_matches_monolithic() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir failed");
        };
        let render = |name: &str, strategy: &str| {
            let path = dir.path().join(name);
            let Some(arg) = path.to_str() else {
                panic!("non-utf8 temp path");
            };
            let cli = parse(&[
                arg, "-W", "150", "-H", "100", "--cell-size", "5", "--strategy", strategy,
                "--tile-size", "64", "--alpha", "none", "-q",
            ]);
            assert!(WallpaperCommand::new(cli).run().is_ok());
            image::open(&path).ok().map(|img| img.to_rgb8().into_raw())
        };

        let monolithic = render("mono.png", "monolithic");
        assert!(monolithic.is_some());
        assert_eq!(monolithic, render("tiled.png", "tiled"));
    }

    #[test]
    fn test_command_rejects_invalid_params() {
        let cli = parse(&["out.png", "-W", "0", "-q"]);
        assert!(WallpaperCommand::new(cli).run().is_err());
    }
}
