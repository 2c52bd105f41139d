use serde::{Deserialize, Serialize};

use crate::error::{RadiationError, Result};

/// Behaviour of a [`SpectralCurve`] queried outside its wavelength range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extrapolation {
    /// Out-of-range queries fail with a domain error.
    #[default]
    Fail,
    /// Hold the first/last tabulated value.
    Clamp,
    /// Extend the first/last segment linearly.
    Linear,
}

/// A spectral surface property (absorptivity, transmissivity, reflectivity)
/// evaluated at a wavelength in micrometres.
pub trait SpectralProperty {
    fn value_at(&self, wavelength_um: f64) -> Result<f64>;
}

impl<F> SpectralProperty for F
where
    F: Fn(f64) -> f64,
{
    fn value_at(&self, wavelength_um: f64) -> Result<f64> {
        Ok(self(wavelength_um))
    }
}

/// Piecewise-linear property curve over tabulated (wavelength, value) pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralCurve {
    wavelengths: Vec<f64>,
    values: Vec<f64>,
    extrapolation: Extrapolation,
}

impl SpectralCurve {
    /// Builds a curve from `(wavelength_um, value)` pairs.
    ///
    /// Wavelengths must be finite and strictly increasing; at least two points
    /// are required.
    pub fn new(points: &[(f64, f64)], extrapolation: Extrapolation) -> Result<Self> {
        if points.len() < 2 {
            return Err(RadiationError::domain(format!(
                "spectral curve needs at least 2 points, got {}",
                points.len()
            )));
        }
        for (i, &(w, v)) in points.iter().enumerate() {
            if !w.is_finite() || !v.is_finite() {
                return Err(RadiationError::domain(format!(
                    "spectral point {i} is not finite: ({w}, {v})"
                )));
            }
            if i > 0 && w <= points[i - 1].0 {
                return Err(RadiationError::domain(format!(
                    "wavelengths must be strictly increasing (point {i}: {w} after {})",
                    points[i - 1].0
                )));
            }
        }
        Ok(Self {
            wavelengths: points.iter().map(|p| p.0).collect(),
            values: points.iter().map(|p| p.1).collect(),
            extrapolation,
        })
    }

    pub fn extrapolation(&self) -> Extrapolation {
        self.extrapolation
    }

    pub fn with_extrapolation(mut self, extrapolation: Extrapolation) -> Self {
        self.extrapolation = extrapolation;
        self
    }

    /// Tabulated wavelength range `(min, max)`.
    pub fn domain(&self) -> (f64, f64) {
        (self.wavelengths[0], self.wavelengths[self.wavelengths.len() - 1])
    }

    pub fn len(&self) -> usize {
        self.wavelengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wavelengths.is_empty()
    }

    fn lerp(&self, lo: usize, wavelength_um: f64) -> f64 {
        let (x0, x1) = (self.wavelengths[lo], self.wavelengths[lo + 1]);
        let (y0, y1) = (self.values[lo], self.values[lo + 1]);
        y0 + (y1 - y0) * (wavelength_um - x0) / (x1 - x0)
    }
}

impl SpectralProperty for SpectralCurve {
    fn value_at(&self, wavelength_um: f64) -> Result<f64> {
        if wavelength_um.is_nan() {
            return Err(RadiationError::domain("wavelength is NaN"));
        }
        let (min, max) = self.domain();
        let last = self.wavelengths.len() - 1;

        if wavelength_um < min || wavelength_um > max {
            return match self.extrapolation {
                Extrapolation::Fail => Err(RadiationError::domain(format!(
                    "wavelength {wavelength_um} um outside tabulated range [{min}, {max}]"
                ))),
                Extrapolation::Clamp if wavelength_um < min => Ok(self.values[0]),
                Extrapolation::Clamp => Ok(self.values[last]),
                Extrapolation::Linear if wavelength_um < min => Ok(self.lerp(0, wavelength_um)),
                Extrapolation::Linear => Ok(self.lerp(last - 1, wavelength_um)),
            };
        }

        // Binary search for the segment [lo, lo + 1] containing the wavelength.
        let mut lo = 0;
        let mut hi = last;
        while hi - lo > 1 {
            let mid = (lo + hi) / 2;
            if self.wavelengths[mid] <= wavelength_um {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        Ok(self.lerp(lo, wavelength_um))
    }
}
