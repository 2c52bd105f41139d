//! JSON-describable zonal runs and their parallel evaluation.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::config::ZonalConfig;
use super::exchange::TotalExchangeArea;
use super::result::ZonalSolution;
use super::solver::{SurfaceBoundary, solve_zonal};
use crate::error::{RadiationError, Result};

/// A boundary value given once for all surfaces or once per surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PerSurface {
    Uniform(f64),
    Each(Vec<f64>),
}

impl PerSurface {
    /// One value per surface for an enclosure of `n` surfaces.
    pub fn expand(&self, n: usize) -> Result<Vec<f64>> {
        match self {
            Self::Uniform(v) => Ok(vec![*v; n]),
            Self::Each(values) if values.len() == n => Ok(values.clone()),
            Self::Each(values) => Err(RadiationError::domain(format!(
                "{} per-surface values for {n} surfaces",
                values.len()
            ))),
        }
    }
}

impl From<f64> for PerSurface {
    fn from(v: f64) -> Self {
        Self::Uniform(v)
    }
}

impl From<Vec<f64>> for PerSurface {
    fn from(values: Vec<f64>) -> Self {
        Self::Each(values)
    }
}

/// Boundary conditions and initial state of one zonal run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZonalScenario {
    #[serde(default)]
    pub name: String,
    /// [W/(m² K)]
    pub u_value: PerSurface,
    /// [W/(m² K)]
    pub h_conv: PerSurface,
    /// [W/m²]
    pub heat_flux: PerSurface,
    /// [K]
    pub back_temperature: PerSurface,
    /// [K]
    pub initial_temperature: PerSurface,
    #[serde(default)]
    pub config: ZonalConfig,
}

impl ZonalScenario {
    /// Per-surface boundaries for `n` surfaces.
    pub fn boundaries(&self, n: usize) -> Result<Vec<SurfaceBoundary>> {
        let u = self.u_value.expand(n)?;
        let h = self.h_conv.expand(n)?;
        let q = self.heat_flux.expand(n)?;
        let tb = self.back_temperature.expand(n)?;
        Ok((0..n)
            .map(|i| SurfaceBoundary::new(u[i], h[i], q[i], tb[i]))
            .collect())
    }

    pub fn solve(&self, exchange: &TotalExchangeArea) -> Result<ZonalSolution> {
        let n = exchange.len();
        let boundaries = self.boundaries(n)?;
        let initial = self.initial_temperature.expand(n)?;
        solve_zonal(exchange, &boundaries, &initial, self.config)
    }
}

/// Solves independent scenarios in parallel against shared exchange areas.
///
/// Results are returned in input order; one failing scenario does not stop
/// the others.
pub fn solve_scenarios(
    exchange: &TotalExchangeArea,
    scenarios: &[ZonalScenario],
) -> Vec<Result<ZonalSolution>> {
    scenarios.par_iter().map(|s| s.solve(exchange)).collect()
}
