//! Tests for LU determinant evaluation and rounding

#[cfg(test)]
mod tests {
    use dettile::math::determinant::{determinant, lu_determinant_in_place, round_determinant};
    use ndarray::{Array2, array};

    // Tests the 2x2 closed form
    // Verified by swapping the sign of the off-diagonal product
    #[test]
    fn test_two_by_two() {
        assert_eq!(determinant(&array![[1i64, 2], [3, 4]]), Some(-2));
        assert_eq!(determinant(&array![[0i64, 1], [1, 0]]), Some(-1));
    }

    // Tests that a row swap during pivoting flips the sign
    // Verified by removing the sign flip on pivot swap
    #[test]
    fn test_pivoting_sign() {
        let permutation = array![[0i64, 1, 0], [1, 0, 0], [0, 0, 1]];
        assert_eq!(determinant(&permutation), Some(-1));

        let cycle = array![[0i64, 1, 0], [0, 0, 1], [1, 0, 0]];
        assert_eq!(determinant(&cycle), Some(1));
    }

    // Tests singular matrices round to exactly zero
    #[test]
    fn test_singular_rounds_to_zero() {
        assert_eq!(determinant(&array![[1i64, 2, 3], [4, 5, 6], [7, 8, 9]]), Some(0));
        assert_eq!(determinant(&Array2::<i64>::zeros((4, 4))), Some(0));
    }

    // Tests the 4x4 Sylvester-Hadamard matrix reaches 16
    // Verified by dropping the pivot from the running product
    #[test]
    fn test_hadamard_four() {
        let h4 = array![
            [1i64, 1, 1, 1],
            [1, -1, 1, -1],
            [1, 1, -1, -1],
            [1, -1, -1, 1]
        ];
        assert_eq!(determinant(&h4), Some(16));
    }

    #[test]
    fn test_identity_and_non_square() {
        assert_eq!(determinant(&Array2::<i64>::eye(6)), Some(1));
        assert_eq!(determinant(&Array2::<i64>::zeros((2, 3))), None);
    }

    // Tests the empty matrix convention and buffer length guard
    #[test]
    fn test_lu_edge_cases() {
        assert!((lu_determinant_in_place(&mut [], 0) - 1.0).abs() < f64::EPSILON);
        assert!(lu_determinant_in_place(&mut [1.0, 2.0], 2).abs() < f64::EPSILON);
        assert!((lu_determinant_in_place(&mut [7.0], 1) - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_round_determinant() {
        assert_eq!(round_determinant(2.999_999_9), 3);
        assert_eq!(round_determinant(-0.000_000_1), 0);
        assert_eq!(round_determinant(-1.5), -2);
    }
}
