//! Determinant evaluation by LU decomposition with partial pivoting

use ndarray::Array2;
use num_traits::ToPrimitive;

/// Determinant of a square matrix rounded to the nearest integer
///
/// Entries are converted to `f64` and eliminated in place. Non-square or
/// unconvertible input yields `None`.
pub fn determinant<T>(matrix: &Array2<T>) -> Option<i64>
where
    T: ToPrimitive + Copy,
{
    let (rows, cols) = matrix.dim();
    if rows != cols {
        return None;
    }

    let mut scratch = matrix
        .iter()
        .map(|value| value.to_f64())
        .collect::<Option<Vec<f64>>>()?;

    Some(round_determinant(lu_determinant_in_place(&mut scratch, rows)))
}

/// Round a floating determinant to the nearest integer
pub fn round_determinant(value: f64) -> i64 {
    value.round() as i64
}

/// Floating determinant of a row-major `n`×`n` buffer, destroying the buffer
///
/// Small sizes use closed forms; larger ones use Gaussian elimination with
/// partial pivoting. An empty matrix has determinant 1.
pub fn lu_determinant_in_place(values: &mut [f64], n: usize) -> f64 {
    if values.len() < n * n {
        return 0.0;
    }

    match n {
        0 => 1.0,
        1 => values.first().copied().unwrap_or(0.0),
        2 => {
            let [a, b, c, d] = [0, 1, 2, 3].map(|i| values.get(i).copied().unwrap_or(0.0));
            a.mul_add(d, -(b * c))
        }
        _ => eliminate(values, n),
    }
}

fn eliminate(values: &mut [f64], n: usize) -> f64 {
    let at = |row: usize, col: usize| row * n + col;
    let mut det = 1.0;

    for k in 0..n {
        // Largest magnitude pivot in column k
        let mut pivot_row = k;
        let mut pivot_abs = values.get(at(k, k)).map_or(0.0, |v| v.abs());
        for row in (k + 1)..n {
            let candidate = values.get(at(row, k)).map_or(0.0, |v| v.abs());
            if candidate > pivot_abs {
                pivot_abs = candidate;
                pivot_row = row;
            }
        }

        if pivot_abs == 0.0 {
            return 0.0;
        }

        if pivot_row != k {
            for col in 0..n {
                values.swap(at(k, col), at(pivot_row, col));
            }
            det = -det;
        }

        let pivot = values.get(at(k, k)).copied().unwrap_or(0.0);
        det *= pivot;

        for row in (k + 1)..n {
            let factor = values.get(at(row, k)).copied().unwrap_or(0.0) / pivot;
            if factor == 0.0 {
                continue;
            }
            for col in (k + 1)..n {
                let upper = values.get(at(k, col)).copied().unwrap_or(0.0);
                if let Some(cell) = values.get_mut(at(row, col)) {
                    *cell = factor.mul_add(-upper, *cell);
                }
            }
        }
    }

    det
}
