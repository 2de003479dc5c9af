//! Tests for pixel regions, tile plans and overlap sizing

#[cfg(test)]
mod tests {
    use dettile::spatial::tiles::{PixelRegion, TilePlan, required_overlap};

    #[test]
    fn test_intersection() {
        let a = PixelRegion {
            x: 0,
            y: 0,
            width: 10,
            height: 10,
        };
        let b = PixelRegion {
            x: 6,
            y: 8,
            width: 10,
            height: 10,
        };
        assert_eq!(
            a.intersection(&b),
            Some(PixelRegion {
                x: 6,
                y: 8,
                width: 4,
                height: 2
            })
        );

        let touching = PixelRegion {
            x: 10,
            y: 0,
            width: 3,
            height: 3,
        };
        assert_eq!(a.intersection(&touching), None);
    }

    // Tests expansion is clamped to the canvas on every side
    #[test]
    fn test_expand_within() {
        let core = PixelRegion {
            x: 5,
            y: 40,
            width: 10,
            height: 10,
        };
        assert_eq!(
            core.expand_within(8, 60, 55),
            PixelRegion {
                x: 0,
                y: 32,
                width: 23,
                height: 23
            }
        );
        assert!(PixelRegion::full(0, 4).is_empty());
    }

    // Tests regions at the far end of the address space clip instead of wrapping
    #[test]
    fn test_edges_saturate() {
        let far = PixelRegion {
            x: usize::MAX - 5,
            y: 0,
            width: 20,
            height: 4,
        };
        assert_eq!(far.right(), usize::MAX);
        assert_eq!(far.intersection(&PixelRegion::full(100, 100)), None);
        assert_eq!(far.expand_within(3, 100, 100).width, 0);
    }

    // Tests the grid rounds up and edge tiles shrink
    // Verified by using floor division for the tile count
    #[test]
    fn test_tile_grid() {
        let plan = TilePlan::new(1100, 600, 512, 32);
        assert_eq!(plan.grid(), (3, 2));
        assert_eq!(plan.len(), 6);

        let last = plan.tile(5);
        assert_eq!(
            last.map(|t| t.core),
            Some(PixelRegion {
                x: 1024,
                y: 512,
                width: 76,
                height: 88
            })
        );
        assert_eq!(
            last.map(|t| t.expanded),
            Some(PixelRegion {
                x: 992,
                y: 480,
                width: 108,
                height: 120
            })
        );
        assert!(plan.tile(6).is_none());
    }

    // Tests cores partition the canvas exactly
    #[test]
    fn test_cores_cover_canvas_once() {
        let plan = TilePlan::new(300, 130, 64, 40);
        let mut coverage = vec![0u8; 300 * 130];
        for tile in plan.tiles() {
            for y in tile.core.y..tile.core.bottom() {
                for x in tile.core.x..tile.core.right() {
                    if let Some(count) = coverage.get_mut(y * 300 + x) {
                        *count += 1;
                    }
                }
            }
            assert!(tile.expanded.intersection(&tile.core) == Some(tile.core));
        }
        assert!(coverage.iter().all(|&c| c == 1));
    }

    #[test]
    fn test_zero_tile_size_is_clamped() {
        let plan = TilePlan::new(3, 2, 0, 0);
        assert_eq!(plan.tile_size, 1);
        assert_eq!(plan.len(), 6);
        assert!(TilePlan::new(0, 0, 64, 0).is_empty());
    }

    // Tests overlap covers blur reach, placement size, fill kernel and the floor
    #[test]
    fn test_required_overlap() {
        assert_eq!(required_overlap(1.5, 48, None), 48);
        assert_eq!(required_overlap(0.0, 0, None), 32);
        assert_eq!(required_overlap(15.0, 10, None), 45);
        assert_eq!(required_overlap(20.0, 10, Some(20.0)), 80);
    }
}
