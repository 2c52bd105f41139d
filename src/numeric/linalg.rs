use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::error::{RadiationError, Result};

/// Dense linear-solve service: `A * X = B`.
///
/// Implementations carry no mutable state, so one instance can be shared
/// between threads.
pub trait LinearSolver: Sync {
    /// Solves for a matrix of right-hand sides (one column per system).
    fn solve(&self, a: &Array2<f64>, b: &Array2<f64>) -> Result<Array2<f64>>;

    /// Solves for a single right-hand side.
    fn solve_vector(&self, a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>> {
        let rhs = b.clone().insert_axis(Axis(1));
        let x = self.solve(a, &rhs)?;
        Ok(x.index_axis_move(Axis(1), 0))
    }
}

/// Gaussian elimination with partial pivoting.
///
/// Intended for small dense systems (enclosures of tens of surfaces).
#[derive(Debug, Clone, Copy)]
pub struct DenseLu {
    /// Smallest accepted pivot, relative to the largest entry of `A`.
    pub pivot_tolerance: f64,
    /// Largest accepted ratio between the largest and smallest pivot.
    pub max_condition: f64,
}

impl Default for DenseLu {
    fn default() -> Self {
        Self {
            pivot_tolerance: 1e-14,
            max_condition: 1e12,
        }
    }
}

impl DenseLu {
    pub fn new(pivot_tolerance: f64, max_condition: f64) -> Self {
        Self {
            pivot_tolerance,
            max_condition,
        }
    }
}

impl LinearSolver for DenseLu {
    fn solve(&self, a: &Array2<f64>, b: &Array2<f64>) -> Result<Array2<f64>> {
        let n = a.nrows();
        if a.ncols() != n {
            return Err(RadiationError::domain(format!(
                "A must be square, got {}x{}",
                n,
                a.ncols()
            )));
        }
        if b.nrows() != n {
            return Err(RadiationError::domain(format!(
                "B has {} rows, expected {n}",
                b.nrows()
            )));
        }
        if n == 0 {
            return Ok(Array2::zeros((0, b.ncols())));
        }

        let mut a = a.to_owned();
        let mut b = b.to_owned();
        let m = b.ncols();

        let scale = a.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
        if !scale.is_finite() || scale == 0.0 {
            return Err(RadiationError::singular(format!(
                "matrix has no finite nonzero entries (max |a| = {scale})"
            )));
        }
        let min_pivot = self.pivot_tolerance * scale;
        let mut largest_pivot = 0.0_f64;
        let mut smallest_pivot = f64::INFINITY;

        // Forward elimination
        for col in 0..n {
            // Pivot selection
            let mut pivot_row = col;
            let mut pivot_val = a[[col, col]].abs();
            for r in (col + 1)..n {
                let v = a[[r, col]].abs();
                if v > pivot_val {
                    pivot_val = v;
                    pivot_row = r;
                }
            }

            if pivot_val.is_nan() || pivot_val <= min_pivot {
                return Err(RadiationError::singular(format!(
                    "pivot {pivot_val:e} below {min_pivot:e} at column {col}"
                )));
            }
            largest_pivot = largest_pivot.max(pivot_val);
            smallest_pivot = smallest_pivot.min(pivot_val);

            if pivot_row != col {
                for c in 0..n {
                    a.swap([pivot_row, c], [col, c]);
                }
                for c in 0..m {
                    b.swap([pivot_row, c], [col, c]);
                }
            }

            let pivot = a[[col, col]];
            for r in (col + 1)..n {
                let factor = a[[r, col]] / pivot;
                if factor == 0.0 {
                    continue;
                }
                a[[r, col]] = 0.0;
                for c in (col + 1)..n {
                    a[[r, c]] -= factor * a[[col, c]];
                }
                for c in 0..m {
                    b[[r, c]] -= factor * b[[col, c]];
                }
            }
        }

        let condition = largest_pivot / smallest_pivot;
        if condition > self.max_condition {
            return Err(RadiationError::singular(format!(
                "pivot ratio {condition:e} exceeds {:e}",
                self.max_condition
            )));
        }

        // Back substitution
        let mut x = Array2::<f64>::zeros((n, m));
        for k in 0..m {
            for i in (0..n).rev() {
                let mut rhs = b[[i, k]];
                for j in (i + 1)..n {
                    rhs -= a[[i, j]] * x[[j, k]];
                }
                x[[i, k]] = rhs / a[[i, i]];
            }
        }

        // Basic sanity: reject NaNs/Infs early.
        if let Some(((i, k), xi)) = x.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(RadiationError::singular(format!(
                "non-finite solution at ({i}, {k}): {xi}"
            )));
        }

        Ok(x)
    }
}

/// Checks `|a - aᵀ| <= atol + rtol * |aᵀ|` element-wise.
pub fn is_symmetric(a: &ArrayView2<f64>, rtol: f64, atol: f64) -> bool {
    if a.nrows() != a.ncols() {
        return false;
    }
    a.indexed_iter()
        .all(|((i, j), &v)| (v - a[[j, i]]).abs() <= atol + rtol * a[[j, i]].abs())
}

/// Largest `|a_ij - a_ji|` and where it occurs.
///
/// `a` must be square.
pub fn max_asymmetry(a: &ArrayView2<f64>) -> (f64, (usize, usize)) {
    assert_eq!(a.nrows(), a.ncols(), "max_asymmetry() requires a square matrix");
    let mut worst = (0.0, (0, 0));
    for ((i, j), &v) in a.indexed_iter() {
        if j <= i {
            continue;
        }
        let d = (v - a[[j, i]]).abs();
        if d > worst.0 {
            worst = (d, (i, j));
        }
    }
    worst
}
