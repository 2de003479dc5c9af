//! Tests for size patterns, seeded selection and row packing

#[cfg(test)]
mod tests {
    use dettile::algorithm::search::Matrix;
    use dettile::spatial::layout::{
        LayoutConfig, LayoutSlot, Placement, RandomSelector, SizePattern, plan_layout,
    };
    use std::sync::Arc;

    fn config(width: usize, height: usize, max: usize, pattern: SizePattern, gap: usize) -> LayoutConfig {
        LayoutConfig {
            width_cells: width,
            height_cells: height,
            max_matrix_size: max,
            pattern,
            gap_cells: gap,
            seed: 42,
        }
    }

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-12, "{actual:?} != {expected:?}");
        }
    }

    // Tests pattern weights are truncated then normalized
    // Verified by normalizing before truncation
    #[test]
    fn test_pattern_weights() {
        assert_close(
            &SizePattern::Mixed.weights(4),
            &[0.15 / 0.9, 0.25 / 0.9, 0.30 / 0.9, 0.20 / 0.9],
        );
        assert_close(&SizePattern::Uniform.weights(2), &[0.25, 0.75]);
        assert_eq!(SizePattern::Uniform.weights(6).len(), 4);
        assert_eq!(SizePattern::Mixed.weights(9).len(), 6);

        let total = 1.0 + 0.5 + 1.0 / 3.0;
        assert_close(
            &SizePattern::Gradient.weights(3),
            &[1.0 / total, 0.5 / total, (1.0 / 3.0) / total],
        );
        assert!(SizePattern::Mixed.weights(0).is_empty());
    }

    #[test]
    fn test_pattern_parsing_is_lenient() {
        assert_eq!(SizePattern::parse_lenient("Uniform"), SizePattern::Uniform);
        assert_eq!(SizePattern::parse_lenient("gradient"), SizePattern::Gradient);
        assert_eq!(SizePattern::parse_lenient("spiral"), SizePattern::Mixed);
        assert_eq!("".parse::<SizePattern>(), Ok(SizePattern::Mixed));
        assert_eq!(SizePattern::Gradient.name(), "gradient");
    }

    #[test]
    fn test_weighted_choice() {
        let mut selector = RandomSelector::new(7);
        for _ in 0..50 {
            assert_eq!(selector.weighted_choice(&[0.0, 1.0, 0.0]), 1);
        }
        assert_eq!(selector.weighted_choice(&[0.0, 0.0]), 0);
        assert_eq!(selector.weighted_choice(&[]), 0);
    }

    // Tests identical seeds give identical layouts
    // Verified by seeding from system entropy
    #[test]
    fn test_layout_deterministic() {
        let cfg = config(40, 25, 4, SizePattern::Mixed, 1);
        let first = plan_layout(&cfg);
        assert!(!first.is_empty());
        assert_eq!(first, plan_layout(&cfg));

        let reseeded = LayoutConfig { seed: 43, ..cfg };
        assert_ne!(first, plan_layout(&reseeded));
    }

    // Tests slots stay inside the grid, respect the maximum and never overlap
    #[test]
    fn test_layout_bounds_and_overlap() {
        for gap in [0, 1, 2] {
            let cfg = config(23, 17, 5, SizePattern::Gradient, gap);
            let slots = plan_layout(&cfg);
            for (i, a) in slots.iter().enumerate() {
                assert!(a.size >= 1 && a.size <= 5);
                assert!(a.x_cell + a.size <= 23);
                assert!(a.y_cell + a.size <= 17);
                for b in slots.iter().skip(i + 1) {
                    let disjoint = a.x_cell + a.size <= b.x_cell
                        || b.x_cell + b.size <= a.x_cell
                        || a.y_cell + a.size <= b.y_cell
                        || b.y_cell + b.size <= a.y_cell;
                    assert!(disjoint, "{a:?} overlaps {b:?}");
                }
            }
        }
    }

    // Tests a 2x2 grid with gap 1 holds exactly one slot at the origin
    #[test]
    fn test_small_grid_single_slot() {
        let slots = plan_layout(&config(2, 2, 2, SizePattern::Uniform, 1));
        assert_eq!(slots.len(), 1);
        assert_eq!(slots.first().map(|s| (s.x_cell, s.y_cell)), Some((0, 0)));
    }

    #[test]
    fn test_unit_sizes_tile_grid() {
        let slots = plan_layout(&config(5, 3, 1, SizePattern::Mixed, 0));
        assert_eq!(slots.len(), 15);
        assert!(slots.iter().all(|s| s.size == 1));

        let spaced = plan_layout(&config(5, 3, 1, SizePattern::Mixed, 1));
        assert_eq!(spaced.len(), 6);
    }

    #[test]
    fn test_empty_grids() {
        assert!(plan_layout(&config(0, 5, 3, SizePattern::Mixed, 1)).is_empty());
        assert!(plan_layout(&config(5, 0, 3, SizePattern::Mixed, 1)).is_empty());
        assert!(plan_layout(&config(5, 5, 0, SizePattern::Mixed, 1)).is_empty());
    }

    #[test]
    fn test_placement_pixels() {
        let slot = LayoutSlot {
            size: 3,
            x_cell: 2,
            y_cell: 5,
        };
        let placement = Placement::new(slot, Arc::new(Matrix::identity(3)), 1, 12);
        assert_eq!((placement.x_px, placement.y_px, placement.extent_px), (24, 60, 36));
        let region = placement.region();
        assert_eq!((region.right(), region.bottom()), (60, 96));
    }
}
