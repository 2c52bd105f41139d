use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Stefan–Boltzmann constant used by the zonal iteration [W/(m² K⁴)].
pub const DEFAULT_STEFAN_BOLTZMANN: f64 = 5.67e-8;

/// Configuration for the nonlinear zonal iteration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZonalConfig {
    /// Convergence threshold on the RMS temperature change between
    /// iterations [K].
    pub tolerance: f64,
    /// Maximum number of iterations before failing.
    pub max_iterations: usize,
    /// Optional wall-clock budget in seconds.
    pub time_budget_secs: Option<f64>,
    /// Stefan–Boltzmann constant [W/(m² K⁴)].
    pub stefan_boltzmann: f64,
}

impl ZonalConfig {
    pub fn new() -> Self {
        Self {
            tolerance: 1e-6,
            max_iterations: 500,
            time_budget_secs: None,
            stefan_boltzmann: DEFAULT_STEFAN_BOLTZMANN,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget_secs = Some(budget.as_secs_f64());
        self
    }

    /// Wall-clock budget, if one is set and valid.
    ///
    /// Negative or non-finite seconds give `None`; the solver rejects such a
    /// configuration up front.
    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget_secs
            .and_then(|s| Duration::try_from_secs_f64(s).ok())
    }
}

impl Default for ZonalConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Tolerances used when assembling the total exchange areas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    /// Allowed deviation of view-factor row sums from 1.
    pub summation_tolerance: f64,
    /// Allowed `|A_i F_ij − A_j F_ji|` [m²].
    pub reciprocity_tolerance: f64,
    /// Allowed `|SS_ij − SS_ji|` [m²].
    pub symmetry_tolerance: f64,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            summation_tolerance: 1e-6,
            reciprocity_tolerance: 1e-6,
            symmetry_tolerance: 1e-6,
        }
    }
}
