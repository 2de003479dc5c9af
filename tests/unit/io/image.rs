//! Tests for PNG export and loading

#[cfg(test)]
mod tests {
    use dettile::WallpaperError;
    use dettile::io::image::{export_png, load_rgba};
    use ndarray::Array3;

    // Tests RGB export writes the right dimensions and pixels
    #[test]
    fn test_export_rgb() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir failed");
        };
        let path = dir.path().join("out").join("wall.png");
        let pixels = Array3::from_shape_fn((3, 5, 3), |(y, x, c)| (y * 50 + x * 10 + c) as u8);

        assert!(export_png(&pixels, &path).is_ok());
        let Ok(decoded) = image::open(&path) else {
            panic!("exported file unreadable");
        };
        assert_eq!((decoded.width(), decoded.height()), (5, 3));
        assert_eq!(decoded.to_rgb8().get_pixel(4, 2).0, [140, 141, 142]);
    }

    // Tests RGBA export keeps alpha through a load round trip
    #[test]
    fn test_export_rgba_and_load() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir failed");
        };
        let path = dir.path().join("wall.png");
        let pixels = Array3::from_shape_fn((2, 2, 4), |(_, _, c)| if c == 3 { 17 } else { 200 });

        assert!(export_png(&pixels, &path).is_ok());
        assert_eq!(load_rgba(&path).ok(), Some(pixels));
    }

    #[test]
    fn test_export_rejects_channel_count() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir failed");
        };
        let pixels = Array3::<u8>::zeros((2, 2, 2));
        assert!(matches!(
            export_png(&pixels, &dir.path().join("bad.png")),
            Err(WallpaperError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir failed");
        };
        assert!(matches!(
            load_rgba(&dir.path().join("absent.png")),
            Err(WallpaperError::ImageLoad { .. })
        ));
    }
}
