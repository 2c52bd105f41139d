//! Enclosure of diffuse-gray surfaces described by areas, view factors and
//! emissivities.
//!
//! Consistency rules for the view-factor matrix `F`:
//! - Summation rule (closed enclosure): `sum_j F_ij = 1`
//! - Reciprocity: `A_i * F_ij = A_j * F_ji`
//! - `F_ii` may be nonzero for concave surfaces

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use tracing::warn;

use crate::error::{RadiationError, Result};

/// Validated surface set of one enclosure.
#[derive(Debug, Clone, PartialEq)]
pub struct Enclosure {
    areas: Array1<f64>,
    view_factors: Array2<f64>,
    emissivity: Array1<f64>,
}

impl Enclosure {
    /// Builds an enclosure after checking shapes and value ranges.
    ///
    /// Areas must be finite and `> 0`, view factors in `[0, 1]` and
    /// emissivities in `(0, 1]`. Summation and reciprocity are not enforced
    /// here; see [`Enclosure::check_summation`] and
    /// [`Enclosure::check_reciprocity`].
    pub fn new(
        areas: Array1<f64>,
        view_factors: Array2<f64>,
        emissivity: Array1<f64>,
    ) -> Result<Self> {
        let n = areas.len();
        if n == 0 {
            return Err(RadiationError::domain("enclosure has no surfaces"));
        }
        if view_factors.dim() != (n, n) {
            return Err(RadiationError::domain(format!(
                "view-factor matrix is {:?}, expected ({n}, {n})",
                view_factors.dim()
            )));
        }
        if emissivity.len() != n {
            return Err(RadiationError::domain(format!(
                "{} emissivities for {n} surfaces",
                emissivity.len()
            )));
        }
        if let Some((i, a)) = areas
            .iter()
            .enumerate()
            .find(|(_, a)| !(a.is_finite() && **a > 0.0))
        {
            return Err(RadiationError::domain(format!(
                "area of surface {i} must be finite and positive, got {a}"
            )));
        }
        if let Some(((i, j), f)) = view_factors
            .indexed_iter()
            .find(|(_, f)| !(0.0..=1.0).contains(*f))
        {
            return Err(RadiationError::domain(format!(
                "view factor F[{i},{j}] = {f} outside [0, 1]"
            )));
        }
        if let Some((i, e)) = emissivity
            .iter()
            .enumerate()
            .find(|(_, e)| !(**e > 0.0 && **e <= 1.0))
        {
            return Err(RadiationError::domain(format!(
                "emissivity of surface {i} must be in (0, 1], got {e}"
            )));
        }

        Ok(Self {
            areas,
            view_factors,
            emissivity,
        })
    }

    /// Number of surfaces.
    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    pub fn areas(&self) -> ArrayView1<'_, f64> {
        self.areas.view()
    }

    pub fn view_factors(&self) -> ArrayView2<'_, f64> {
        self.view_factors.view()
    }

    pub fn emissivity(&self) -> ArrayView1<'_, f64> {
        self.emissivity.view()
    }

    /// Same geometry with another emissivity vector.
    pub fn with_emissivity(&self, emissivity: Array1<f64>) -> Result<Self> {
        Self::new(self.areas.clone(), self.view_factors.clone(), emissivity)
    }

    pub fn row_sums(&self) -> Array1<f64> {
        self.view_factors.sum_axis(Axis(1))
    }

    /// Fails unless every row of `F` sums to 1 within `tolerance`.
    pub fn check_summation(&self, tolerance: f64) -> Result<()> {
        for (i, sum) in self.row_sums().iter().enumerate() {
            if (sum - 1.0).abs() > tolerance {
                warn!(surface = i, row_sum = sum, "view-factor summation rule violated");
                return Err(RadiationError::domain(format!(
                    "view factors of surface {i} sum to {sum}, expected 1 (tolerance {tolerance})"
                )));
            }
        }
        Ok(())
    }

    /// Largest `|A_i F_ij − A_j F_ji|` and the pair where it occurs.
    pub fn reciprocity_residual(&self) -> (f64, (usize, usize)) {
        let n = self.len();
        let mut worst = (0.0, (0, 0));
        for i in 0..n {
            for j in (i + 1)..n {
                let r = (self.areas[i] * self.view_factors[[i, j]]
                    - self.areas[j] * self.view_factors[[j, i]])
                    .abs();
                if r > worst.0 {
                    worst = (r, (i, j));
                }
            }
        }
        worst
    }

    /// Fails unless reciprocity holds within `tolerance` (in m²).
    pub fn check_reciprocity(&self, tolerance: f64) -> Result<()> {
        let (residual, (i, j)) = self.reciprocity_residual();
        if residual > tolerance {
            warn!(i, j, residual, "view-factor reciprocity violated");
            return Err(RadiationError::domain(format!(
                "A[{i}] F[{i},{j}] and A[{j}] F[{j},{i}] differ by {residual:e} (tolerance {tolerance:e})"
            )));
        }
        Ok(())
    }

    /// Repairs a noisy view-factor matrix in place.
    ///
    /// Averages `A_i F_ij` and `A_j F_ji` for every pair, then rescales each
    /// row to sum to 1. Self-view factors are kept. Returns the largest
    /// absolute change applied to any entry.
    pub fn enforce_reciprocity_and_normalize(&mut self) -> f64 {
        let n = self.len();
        let before = self.view_factors.clone();
        let f = &mut self.view_factors;

        for i in 0..n {
            for j in (i + 1)..n {
                let ai = self.areas[i];
                let aj = self.areas[j];
                let avg = 0.5 * (ai * f[[i, j]] + aj * f[[j, i]]);
                f[[i, j]] = avg / ai;
                f[[j, i]] = avg / aj;
            }
        }

        for mut row in f.rows_mut() {
            let row_sum = row.sum();
            if row_sum > 1e-15 {
                row.mapv_inplace(|v| v / row_sum);
            }
        }

        let change = (&*f - &before)
            .iter()
            .fold(0.0_f64, |acc, d| acc.max(d.abs()));
        if change > 0.0 {
            warn!(max_change = change, "view factors adjusted for reciprocity and summation");
        }
        change
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn cube(eps: f64) -> Enclosure {
        let f = Array2::from_shape_fn((6, 6), |(i, j)| if i == j { 0.0 } else { 0.2 });
        Enclosure::new(Array1::ones(6), f, Array1::from_elem(6, eps)).unwrap()
    }

    #[test]
    fn test_cube_is_consistent() {
        let e = cube(0.9);
        assert_eq!(e.len(), 6);
        e.check_summation(1e-9).unwrap();
        e.check_reciprocity(1e-12).unwrap();
        for s in e.row_sums() {
            assert_relative_eq!(s, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_rejects_invalid_values() {
        let f = array![[0.0, 1.0], [1.0, 0.0]];
        let ok = Enclosure::new(array![1.0, 1.0], f.clone(), array![0.5, 1.0]);
        assert!(ok.is_ok());

        for (areas, eps) in [
            (array![0.0, 1.0], array![0.5, 0.5]),
            (array![1.0, -2.0], array![0.5, 0.5]),
            (array![1.0, 1.0], array![0.0, 0.5]),
            (array![1.0, 1.0], array![0.5, 1.1]),
            (array![1.0, f64::NAN], array![0.5, 0.5]),
        ] {
            let r = Enclosure::new(areas, f.clone(), eps);
            assert!(matches!(r, Err(RadiationError::Domain(_))));
        }

        let bad_f = array![[0.0, 1.5], [1.0, 0.0]];
        assert!(Enclosure::new(array![1.0, 1.0], bad_f, array![0.5, 0.5]).is_err());
    }

    #[test]
    fn test_rejects_shape_mismatch() {
        let f = Array2::zeros((2, 3));
        assert!(Enclosure::new(array![1.0, 1.0], f, array![0.5, 0.5]).is_err());
        let f = Array2::zeros((2, 2));
        assert!(Enclosure::new(array![1.0, 1.0], f, array![0.5]).is_err());
        assert!(Enclosure::new(Array1::zeros(0), Array2::zeros((0, 0)), Array1::zeros(0)).is_err());
    }

    #[test]
    fn test_summation_violation_detected() {
        let f = array![[0.0, 0.9], [1.0, 0.0]];
        let e = Enclosure::new(array![1.0, 1.0], f, array![0.5, 0.5]).unwrap();
        assert!(e.check_summation(1e-6).is_err());
        assert!(e.check_summation(0.2).is_ok());
    }

    #[test]
    fn test_reciprocity_violation_detected() {
        // Small disk seen by a large hemisphere: A1 F12 must equal A2 F21.
        let f = array![[0.0, 1.0], [0.6, 0.4]];
        let e = Enclosure::new(array![1.0, 2.0], f, array![0.5, 0.5]).unwrap();
        let (residual, pair) = e.reciprocity_residual();
        assert_relative_eq!(residual, 0.2, epsilon = 1e-12);
        assert_eq!(pair, (0, 1));
        assert!(e.check_reciprocity(1e-6).is_err());
    }

    #[test]
    fn test_enforce_reciprocity_and_normalize() {
        let f = array![[0.0, 0.5, 0.5], [0.45, 0.1, 0.5], [0.5, 0.55, 0.0]];
        let mut e = Enclosure::new(array![1.0, 1.0, 1.0], f, array![0.8, 0.8, 0.8]).unwrap();
        let change = e.enforce_reciprocity_and_normalize();
        assert!(change > 0.0);

        // Self-view of the concave surface survives.
        assert!(e.view_factors()[[1, 1]] > 0.0);
        for s in e.row_sums() {
            assert_relative_eq!(s, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_enforce_restores_reciprocity() {
        let f = array![[0.0, 0.6, 0.4], [0.4, 0.0, 0.6], [0.6, 0.4, 0.0]];
        let mut e = Enclosure::new(array![2.0, 2.0, 2.0], f, array![0.8, 0.8, 0.8]).unwrap();
        assert!(e.check_reciprocity(1e-6).is_err());
        e.enforce_reciprocity_and_normalize();
        e.check_reciprocity(1e-12).unwrap();
        e.check_summation(1e-12).unwrap();
        assert_relative_eq!(e.view_factors()[[0, 1]], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_enforce_is_noop_on_consistent_input() {
        let mut e = cube(0.5);
        let change = e.enforce_reciprocity_and_normalize();
        assert!(change < 1e-15);
    }
}
