//! Total exchange areas of the zonal method.
//!
//! `SS_ij` [m²] is the gray-body exchange area between surfaces `i` and `j`
//! including all interreflections, so that the net radiant flow between them
//! is `SS_ij σ (T_i⁴ − T_j⁴)`. It solves `T · SS = S` with
//!
//! - `T_ij = δ_ij / eps_i − (1 − eps_j) A_i F_ij / (eps_j A_j)`
//! - `S_ij = F_ij A_i eps_j`
//!
//! and is symmetric for a consistent enclosure, with `sum_j SS_ij = A_i eps_i`.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use tracing::{info, warn};

use super::config::ExchangeConfig;
use crate::error::{RadiationError, Result};
use crate::numeric::{DenseLu, LinearSolver, max_asymmetry};
use crate::sim::view_factors::Enclosure;

fn check_inputs(fij: &ArrayView2<f64>, eps: &ArrayView1<f64>, areas: &ArrayView1<f64>) -> Result<()> {
    let n = areas.len();
    if fij.dim() != (n, n) || eps.len() != n {
        return Err(RadiationError::domain(format!(
            "shape mismatch: F {:?}, {} emissivities, {n} areas",
            fij.dim(),
            eps.len()
        )));
    }
    if let Some(i) = (0..n).find(|&i| !(eps[i] > 0.0 && eps[i] <= 1.0)) {
        return Err(RadiationError::domain(format!(
            "emissivity of surface {i} must be in (0, 1], got {}",
            eps[i]
        )));
    }
    if let Some(i) = (0..n).find(|&i| !(areas[i].is_finite() && areas[i] > 0.0)) {
        return Err(RadiationError::domain(format!(
            "area of surface {i} must be finite and positive, got {}",
            areas[i]
        )));
    }
    Ok(())
}

/// Coefficient matrix `T` of the exchange-area system.
///
/// Note the column index selects the emissivity and area in the
/// off-diagonal term: `T` is not symmetric.
pub fn conductance_matrix(
    fij: ArrayView2<f64>,
    eps: ArrayView1<f64>,
    areas: ArrayView1<f64>,
) -> Result<Array2<f64>> {
    check_inputs(&fij, &eps, &areas)?;
    let n = areas.len();
    let mut t = Array2::from_shape_fn((n, n), |(i, j)| {
        -(1.0 - eps[j]) * areas[i] * fij[[i, j]] / (eps[j] * areas[j])
    });
    for i in 0..n {
        t[[i, i]] += 1.0 / eps[i];
    }
    Ok(t)
}

/// Right-hand side `S_ij = F_ij A_i eps_j` of the exchange-area system.
pub fn area_view_matrix(
    fij: ArrayView2<f64>,
    eps: ArrayView1<f64>,
    areas: ArrayView1<f64>,
) -> Result<Array2<f64>> {
    check_inputs(&fij, &eps, &areas)?;
    let n = areas.len();
    Ok(Array2::from_shape_fn((n, n), |(i, j)| {
        fij[[i, j]] * areas[i] * eps[j]
    }))
}

/// Solves `T · SS = S` for all columns at once and verifies the symmetry of
/// the result.
pub fn total_exchange_area<S>(
    t: &Array2<f64>,
    s: &Array2<f64>,
    solver: &S,
    tolerance: f64,
) -> Result<Array2<f64>>
where
    S: LinearSolver + ?Sized,
{
    let ss = solver.solve(t, s)?;
    let (asymmetry, (i, j)) = max_asymmetry(&ss.view());
    if asymmetry > tolerance {
        warn!(i, j, asymmetry, "total exchange areas are not symmetric");
        return Err(RadiationError::singular(format!(
            "SS[{i},{j}] = {} and SS[{j},{i}] = {} differ by {asymmetry:e} (tolerance {tolerance:e})",
            ss[[i, j]],
            ss[[j, i]]
        )));
    }
    Ok(ss)
}

/// Total exchange areas of an enclosure together with the surface areas.
///
/// Computed once per geometry and emissivity set and shared read-only by
/// every zonal run.
#[derive(Debug, Clone, PartialEq)]
pub struct TotalExchangeArea {
    ss: Array2<f64>,
    areas: Array1<f64>,
}

impl TotalExchangeArea {
    /// Wraps a precomputed `SS` matrix.
    ///
    /// `SS` must be finite and symmetric within the default
    /// [`ExchangeConfig::symmetry_tolerance`].
    pub fn new(ss: Array2<f64>, areas: Array1<f64>) -> Result<Self> {
        let n = areas.len();
        if n == 0 || ss.dim() != (n, n) {
            return Err(RadiationError::domain(format!(
                "exchange-area matrix is {:?} for {n} surfaces",
                ss.dim()
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
        if let Some(((i, j), v)) = ss.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(RadiationError::domain(format!(
                "exchange area SS[{i},{j}] = {v} is not finite"
            )));
        }
        let (asymmetry, (i, j)) = max_asymmetry(&ss.view());
        if asymmetry > ExchangeConfig::default().symmetry_tolerance {
            return Err(RadiationError::domain(format!(
                "SS[{i},{j}] = {} and SS[{j},{i}] = {} differ by {asymmetry:e}",
                ss[[i, j]],
                ss[[j, i]]
            )));
        }
        Ok(Self { ss, areas })
    }

    /// Checks the enclosure and computes `SS` with the dense LU solver.
    pub fn from_enclosure(enclosure: &Enclosure, config: &ExchangeConfig) -> Result<Self> {
        Self::from_enclosure_with(enclosure, config, &DenseLu::default())
    }

    /// Like [`Self::from_enclosure`] with a caller-provided linear solver.
    pub fn from_enclosure_with<S>(
        enclosure: &Enclosure,
        config: &ExchangeConfig,
        solver: &S,
    ) -> Result<Self>
    where
        S: LinearSolver + ?Sized,
    {
        enclosure.check_summation(config.summation_tolerance)?;
        enclosure.check_reciprocity(config.reciprocity_tolerance)?;

        let (fij, eps, areas) = (
            enclosure.view_factors(),
            enclosure.emissivity(),
            enclosure.areas(),
        );
        let t = conductance_matrix(fij, eps, areas)?;
        let s = area_view_matrix(fij, eps, areas)?;
        let ss = total_exchange_area(&t, &s, solver, config.symmetry_tolerance)?;
        info!(surfaces = enclosure.len(), "total exchange areas assembled");

        Ok(Self {
            ss,
            areas: areas.to_owned(),
        })
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    pub fn ss(&self) -> ArrayView2<'_, f64> {
        self.ss.view()
    }

    pub fn areas(&self) -> ArrayView1<'_, f64> {
        self.areas.view()
    }

    /// Net radiant heat flow leaving each surface [W],
    /// `Q_i = sum_j SS_ij (Eb_i − Eb_j)`.
    pub fn heat_flow(&self, emissive_power: ArrayView1<f64>) -> Result<Array1<f64>> {
        let n = self.len();
        if emissive_power.len() != n {
            return Err(RadiationError::domain(format!(
                "{} emissive powers for {n} surfaces",
                emissive_power.len()
            )));
        }
        Ok(Array1::from_shape_fn(n, |i| {
            (0..n)
                .map(|j| self.ss[[i, j]] * (emissive_power[i] - emissive_power[j]))
                .sum()
        }))
    }
}
