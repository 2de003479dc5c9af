//! Tests for block painting, nearest-cell resampling, blur and feathering

#[cfg(test)]
mod tests {
    use dettile::WallpaperError;
    use dettile::algorithm::search::Matrix;
    use dettile::render::block::{BlockStyle, blur_channels, feather_edges, render_block};
    use dettile::render::color::{ColorMapper, DeterminantRange, Hue};
    use ndarray::Array3;

    fn flat_style() -> BlockStyle {
        BlockStyle {
            mapper: ColorMapper {
                low: 0,
                high: 1,
                normalizer: 0.0,
                hue: Hue::Gray,
            },
            use_determinant: false,
            use_max: true,
            range: DeterminantRange { min: 0, max: 2 },
            blur_sigma: 0.0,
            feather_strength: 0.0,
        }
    }

    fn pixel(block: &Array3<u8>, y: usize, x: usize) -> u8 {
        block.get([y, x, 0]).copied().unwrap_or_default()
    }

    // Tests each cell covers cell_size × cell_size pixels
    #[test]
    fn test_cells_fill_block() {
        let Ok(block) = render_block(&Matrix::identity(2), 1, 4, &flat_style()) else {
            panic!("render failed");
        };
        assert_eq!(block.dim(), (4, 4, 3));
        assert_eq!(pixel(&block, 0, 0), 0);
        assert_eq!(pixel(&block, 1, 1), 0);
        assert_eq!(pixel(&block, 0, 2), 255);
        assert_eq!(pixel(&block, 3, 0), 255);
        assert_eq!(pixel(&block, 3, 3), 0);
    }

    // Tests a matrix larger or smaller than the footprint is resampled nearest-cell
    // Verified by rounding the cell index instead of flooring
    #[test]
    fn test_nearest_cell_resampling() {
        let Ok(block) = render_block(&Matrix::identity(2), 1, 3, &flat_style()) else {
            panic!("render failed");
        };
        assert_eq!(pixel(&block, 1, 1), 0);
        assert_eq!(pixel(&block, 1, 2), 255);
        assert_eq!(pixel(&block, 2, 2), 0);

        let Ok(shrunk) = render_block(&Matrix::identity(4), 1, 2, &flat_style()) else {
            panic!("render failed");
        };
        assert_eq!(pixel(&shrunk, 0, 0), 0);
        assert_eq!(pixel(&shrunk, 0, 1), 255);
    }

    #[test]
    fn test_determinant_shading() {
        let style = BlockStyle {
            use_determinant: true,
            ..flat_style()
        };
        let zeros = Matrix::from_rows(&[vec![0]]).unwrap_or_else(|_| Matrix::identity(1));

        let bright = render_block(&zeros, 2, 1, &style).map(|b| pixel(&b, 0, 0));
        let dim = render_block(&zeros, 0, 1, &style).map(|b| pixel(&b, 0, 0));
        assert_eq!(bright.ok(), Some(255));
        assert_eq!(dim.ok(), Some(127));
    }

    #[test]
    fn test_invalid_entry_rejected() {
        let Ok(matrix) = Matrix::from_rows(&[vec![2]]) else {
            panic!("matrix construction failed");
        };
        assert!(matches!(
            render_block(&matrix, 2, 4, &flat_style()),
            Err(WallpaperError::InvalidValue { value: 2, .. })
        ));
    }

    #[test]
    fn test_zero_extent() {
        let block = render_block(&Matrix::identity(2), 1, 0, &flat_style());
        assert_eq!(block.map(|b| b.dim()).ok(), Some((0, 0, 3)));
    }

    // Tests blur softens a hard edge within the block only
    #[test]
    fn test_blur_softens_edge() {
        let mut block = Array3::from_shape_fn((8, 8, 3), |(_, x, _)| if x < 4 { 0u8 } else { 255 });
        blur_channels(&mut block, 1.0);

        let left = pixel(&block, 4, 3);
        let right = pixel(&block, 4, 4);
        assert!(left > 0 && left < 128, "left of edge was {left}");
        assert!(right > 127 && right < 255, "right of edge was {right}");
        // Reflected edges keep the far columns near their original values
        assert!(pixel(&block, 4, 0) < 5);
    }

    // Tests feathering fades borders to gray 128 and leaves the centre close
    // Verified by fading toward black
    #[test]
    fn test_feather_edges() {
        let mut block = Array3::from_elem((10, 10, 3), 255u8);
        feather_edges(&mut block, 1.0);
        assert_eq!(pixel(&block, 0, 0), 128);
        assert_eq!(pixel(&block, 0, 5), 128);
        assert!(pixel(&block, 5, 5) > 230);

        let mut untouched = Array3::from_elem((4, 4, 3), 9u8);
        feather_edges(&mut untouched, 0.0);
        assert!(untouched.iter().all(|&v| v == 9));
    }
}
