//! Physical constants injected into the evaluators.

use serde::{Deserialize, Serialize};

/// Constants used by Planck's law and the Stefan–Boltzmann law.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalConstants {
    /// Speed of light in vacuum [m/s].
    pub speed_of_light: f64,
    /// Planck constant [J s].
    pub planck: f64,
    /// Boltzmann constant [J/K].
    pub boltzmann: f64,
    /// Stefan–Boltzmann constant [W/(m² K⁴)].
    pub stefan_boltzmann: f64,
}

impl PhysicalConstants {
    /// CODATA 2018 exact/recommended values.
    pub const fn codata() -> Self {
        Self {
            speed_of_light: 2.997_924_58e8,
            planck: 6.626_070_15e-34,
            boltzmann: 1.380_649e-23,
            stefan_boltzmann: 5.670_374_419e-8,
        }
    }

    /// Rounded textbook values (Çengel & Ghajar, ch. 12).
    pub const fn textbook() -> Self {
        Self {
            speed_of_light: 2.9979e8,
            planck: 6.626e-34,
            boltzmann: 1.38065e-23,
            stefan_boltzmann: 5.67e-8,
        }
    }

    /// First radiation constant `C1 = 2 pi h c0²` [W m²].
    pub fn c1(&self) -> f64 {
        2.0 * std::f64::consts::PI * self.planck * self.speed_of_light.powi(2)
    }

    /// Second radiation constant `C2 = h c0 / k` [m K].
    pub fn c2(&self) -> f64 {
        self.planck * self.speed_of_light / self.boltzmann
    }
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self::codata()
    }
}
