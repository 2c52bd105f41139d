//! Nonlinear fixed-point iteration of the zonal heat balance.
//!
//! Radiative exchange is linearised around the current surface temperatures:
//!
//! - `UA_ij = SS_ij σ (T_i² + T_j²)(T_i + T_j)` so that `UA_ij (T_i − T_j) = SS_ij σ (T_i⁴ − T_j⁴)`
//!
//! Each iteration solves the linear balance of the N surfaces and one
//! well-mixed air node, then re-evaluates `UA` at the new temperatures:
//!
//! ```text
//! surface i:  sum_j UA_ij (T_j − T_i) + h_i A_i (T_air − T_i) + U_i A_i (T_back,i − T_i) = −q_i A_i
//! air:        sum_i h_i A_i (T_i − T_air) = 0
//! ```
//!
//! Without convective coupling (`sum_i h_i A_i = 0`) the air node is left out.

use std::time::Instant;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::config::ZonalConfig;
use super::exchange::TotalExchangeArea;
use super::result::ZonalSolution;
use crate::error::{ConvergenceLimit, RadiationError, Result, ensure_positive};
use crate::numeric::{DenseLu, LinearSolver};
use crate::vecutils::rms_difference;

/// Thermal boundary of one surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceBoundary {
    /// Conductance to the back side [W/(m² K)].
    pub u_value: f64,
    /// Convection coefficient to the air node [W/(m² K)].
    pub h_conv: f64,
    /// Imposed heat flux into the surface [W/m²].
    pub heat_flux: f64,
    /// Back-side temperature [K].
    pub back_temperature: f64,
}

impl SurfaceBoundary {
    pub fn new(u_value: f64, h_conv: f64, heat_flux: f64, back_temperature: f64) -> Self {
        Self {
            u_value,
            h_conv,
            heat_flux,
            back_temperature,
        }
    }

    fn validate(&self, surface: usize) -> Result<()> {
        let ok = self.u_value.is_finite()
            && self.u_value >= 0.0
            && self.h_conv.is_finite()
            && self.h_conv >= 0.0
            && self.heat_flux.is_finite()
            && self.back_temperature.is_finite()
            && self.back_temperature > 0.0;
        if ok {
            Ok(())
        } else {
            Err(RadiationError::domain(format!(
                "invalid boundary for surface {surface}: {self:?}"
            )))
        }
    }
}

/// Progress of a [`ZonalSolver`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SolverState {
    Initialized,
    Iterating { iteration: usize, rms: f64 },
    Converged { iterations: usize, rms: f64 },
    Failed,
}

/// Fixed-point solver for the coupled surface/air heat balance.
///
/// Owns its temperature vector; the exchange areas are borrowed read-only
/// so several solvers can share them.
#[derive(Debug)]
pub struct ZonalSolver<'a, S = DenseLu> {
    exchange: &'a TotalExchangeArea,
    boundaries: Vec<SurfaceBoundary>,
    temperatures: Vec<f64>,
    air_temperature: Option<f64>,
    config: ZonalConfig,
    solver: S,
    state: SolverState,
    started: Option<Instant>,
}

impl<'a> ZonalSolver<'a, DenseLu> {
    /// Create a solver using the dense LU linear solver.
    pub fn new(
        exchange: &'a TotalExchangeArea,
        boundaries: &[SurfaceBoundary],
        initial_temperatures: &[f64],
        config: ZonalConfig,
    ) -> Result<Self> {
        Self::with_solver(
            exchange,
            boundaries,
            initial_temperatures,
            config,
            DenseLu::default(),
        )
    }
}

impl<'a, S: LinearSolver> ZonalSolver<'a, S> {
    /// Create a solver with a caller-provided linear solver.
    pub fn with_solver(
        exchange: &'a TotalExchangeArea,
        boundaries: &[SurfaceBoundary],
        initial_temperatures: &[f64],
        config: ZonalConfig,
        solver: S,
    ) -> Result<Self> {
        let n = exchange.len();
        if boundaries.len() != n || initial_temperatures.len() != n {
            return Err(RadiationError::domain(format!(
                "{} boundaries and {} initial temperatures for {n} surfaces",
                boundaries.len(),
                initial_temperatures.len()
            )));
        }
        for (i, b) in boundaries.iter().enumerate() {
            b.validate(i)?;
        }
        for (i, &t) in initial_temperatures.iter().enumerate() {
            ensure_positive(&format!("initial temperature of surface {i}"), t)?;
        }
        ensure_positive("tolerance", config.tolerance)?;
        ensure_positive("Stefan-Boltzmann constant", config.stefan_boltzmann)?;
        if let Some(secs) = config.time_budget_secs
            && config.time_budget().is_none()
        {
            return Err(RadiationError::domain(format!(
                "time budget must be a finite, non-negative number of seconds, got {secs}"
            )));
        }

        Ok(Self {
            exchange,
            boundaries: boundaries.to_vec(),
            temperatures: initial_temperatures.to_vec(),
            air_temperature: None,
            config,
            solver,
            state: SolverState::Initialized,
            started: None,
        })
    }

    pub fn state(&self) -> SolverState {
        self.state
    }

    pub fn temperatures(&self) -> &[f64] {
        &self.temperatures
    }

    pub fn air_temperature(&self) -> Option<f64> {
        self.air_temperature
    }

    pub fn config(&self) -> &ZonalConfig {
        &self.config
    }

    /// Iterations completed so far.
    pub fn iterations(&self) -> usize {
        match self.state {
            SolverState::Initialized | SolverState::Failed => 0,
            SolverState::Iterating { iteration, .. } => iteration,
            SolverState::Converged { iterations, .. } => iterations,
        }
    }

    fn last_rms(&self) -> f64 {
        match self.state {
            SolverState::Iterating { rms, .. } | SolverState::Converged { rms, .. } => rms,
            _ => f64::INFINITY,
        }
    }

    fn total_convective_conductance(&self) -> f64 {
        self.boundaries
            .iter()
            .zip(self.exchange.areas())
            .map(|(b, a)| b.h_conv * a)
            .sum()
    }

    /// Linearised balance at the current temperatures.
    fn assemble(&self) -> (Array2<f64>, Array1<f64>) {
        let n = self.exchange.len();
        let ss = self.exchange.ss();
        let areas = self.exchange.areas();
        let t = &self.temperatures;
        let sigma = self.config.stefan_boltzmann;
        let total_ha = self.total_convective_conductance();
        let size = if total_ha > 0.0 { n + 1 } else { n };

        let mut m = Array2::zeros((size, size));
        let mut rhs = Array1::zeros(size);
        for (i, b) in self.boundaries.iter().enumerate() {
            let ha = b.h_conv * areas[i];
            let ua = b.u_value * areas[i];

            let mut radiative = 0.0;
            for j in (0..n).filter(|&j| j != i) {
                let ua_ij = ss[[i, j]] * sigma * (t[i] * t[i] + t[j] * t[j]) * (t[i] + t[j]);
                m[[i, j]] = ua_ij;
                radiative += ua_ij;
            }
            m[[i, i]] = -radiative - ha - ua;
            if size > n {
                m[[i, n]] = ha;
                m[[n, i]] = ha;
            }
            rhs[i] = -ua * b.back_temperature - b.heat_flux * areas[i];
        }
        if size > n {
            m[[n, n]] = -total_ha;
        }
        (m, rhs)
    }

    fn fail(&mut self, error: RadiationError) -> RadiationError {
        warn!(%error, "zonal iteration failed");
        self.state = SolverState::Failed;
        error
    }

    /// Perform one iteration and return the new state.
    ///
    /// A converged solver is left unchanged; a failed one cannot continue.
    pub fn step(&mut self) -> Result<SolverState> {
        let done = match self.state {
            SolverState::Converged { .. } => return Ok(self.state),
            SolverState::Failed => {
                return Err(RadiationError::domain("zonal solver has already failed"));
            }
            SolverState::Initialized => 0,
            SolverState::Iterating { iteration, .. } => iteration,
        };
        let rms = self.last_rms();

        if done >= self.config.max_iterations {
            return Err(self.fail(RadiationError::Convergence {
                iterations: done,
                rms,
                limit: ConvergenceLimit::MaxIterations(self.config.max_iterations),
            }));
        }
        let started = *self.started.get_or_insert_with(Instant::now);
        if let Some(budget) = self.config.time_budget()
            && started.elapsed() >= budget
        {
            return Err(self.fail(RadiationError::Convergence {
                iterations: done,
                rms,
                limit: ConvergenceLimit::TimeBudget(budget),
            }));
        }

        let iteration = done + 1;
        let (m, rhs) = self.assemble();
        let x = match self.solver.solve_vector(&m, &rhs) {
            Ok(x) => x,
            Err(e) => return Err(self.fail(e)),
        };

        let n = self.exchange.len();
        let new_temperatures: Vec<f64> = x.iter().take(n).copied().collect();
        if let Some((surface, &temperature)) = new_temperatures
            .iter()
            .enumerate()
            .find(|(_, t)| !(t.is_finite() && **t > 0.0))
        {
            return Err(self.fail(RadiationError::Divergence {
                iteration,
                surface,
                temperature,
            }));
        }

        let rms = rms_difference(&self.temperatures, &new_temperatures);
        self.temperatures = new_temperatures;
        self.air_temperature = (x.len() > n).then(|| x[n]);
        debug!(iteration, rms, "zonal iteration");

        self.state = if rms < self.config.tolerance {
            info!(iterations = iteration, rms, "zonal iteration converged");
            SolverState::Converged {
                iterations: iteration,
                rms,
            }
        } else {
            SolverState::Iterating { iteration, rms }
        };
        Ok(self.state)
    }

    /// Iterate until convergence and return the solution.
    pub fn run(&mut self) -> Result<ZonalSolution> {
        loop {
            if let SolverState::Converged { iterations, rms } = self.step()? {
                return Ok(ZonalSolution::new(
                    self.exchange,
                    &self.boundaries,
                    self.temperatures.clone(),
                    self.air_temperature,
                    iterations,
                    rms,
                    self.config.stefan_boltzmann,
                ));
            }
        }
    }
}

/// Runs one zonal computation with the dense LU solver.
pub fn solve_zonal(
    exchange: &TotalExchangeArea,
    boundaries: &[SurfaceBoundary],
    initial_temperatures: &[f64],
    config: ZonalConfig,
) -> Result<ZonalSolution> {
    ZonalSolver::new(exchange, boundaries, initial_temperatures, config)?.run()
}
