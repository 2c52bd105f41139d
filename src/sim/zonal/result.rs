use serde::{Deserialize, Serialize};

use super::exchange::TotalExchangeArea;
use super::solver::SurfaceBoundary;

/// Converged state of a zonal run with the per-surface heat balance.
///
/// Fluxes are in W/m² and positive when leaving the surface; at convergence
/// `radiative_flux + convective_flux + back_flux` equals the imposed
/// `heat_flux` of each surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZonalSolution {
    /// Surface temperatures in K.
    pub temperatures: Vec<f64>,
    /// Air-node temperature in K (`None` without convective coupling).
    pub air_temperature: Option<f64>,
    /// Number of iterations performed.
    pub iterations: usize,
    /// RMS temperature change of the last iteration in K.
    pub rms: f64,
    /// Net radiative exchange with the other surfaces.
    pub radiative_flux: Vec<f64>,
    /// Convection to the air node.
    pub convective_flux: Vec<f64>,
    /// Conduction through the surface to its back side.
    pub back_flux: Vec<f64>,
    /// Imposed heat flux.
    pub heat_flux: Vec<f64>,
}

impl ZonalSolution {
    pub(crate) fn new(
        exchange: &TotalExchangeArea,
        boundaries: &[SurfaceBoundary],
        temperatures: Vec<f64>,
        air_temperature: Option<f64>,
        iterations: usize,
        rms: f64,
        stefan_boltzmann: f64,
    ) -> Self {
        let ss = exchange.ss();
        let areas = exchange.areas();
        let t = &temperatures;
        let n = t.len();

        let radiative_flux = (0..n)
            .map(|i| {
                let t4 = t[i].powi(4);
                let q: f64 = (0..n)
                    .map(|j| ss[[i, j]] * stefan_boltzmann * (t4 - t[j].powi(4)))
                    .sum();
                q / areas[i]
            })
            .collect();
        let convective_flux = boundaries
            .iter()
            .zip(t)
            .map(|(b, &ti)| air_temperature.map_or(0.0, |ta| b.h_conv * (ti - ta)))
            .collect();
        let back_flux = boundaries
            .iter()
            .zip(t)
            .map(|(b, &ti)| b.u_value * (ti - b.back_temperature))
            .collect();

        Self {
            temperatures,
            air_temperature,
            iterations,
            rms,
            radiative_flux,
            convective_flux,
            back_flux,
            heat_flux: boundaries.iter().map(|b| b.heat_flux).collect(),
        }
    }

    /// Largest `|radiative + convective + back − imposed|` over all surfaces
    /// [W/m²].
    pub fn balance_residual(&self) -> f64 {
        (0..self.temperatures.len())
            .map(|i| {
                (self.radiative_flux[i] + self.convective_flux[i] + self.back_flux[i]
                    - self.heat_flux[i])
                    .abs()
            })
            .fold(0.0, f64::max)
    }

    /// Hottest surface as `(index, temperature)`.
    pub fn max_temperature(&self) -> Option<(usize, f64)> {
        self.temperatures
            .iter()
            .copied()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }
}
