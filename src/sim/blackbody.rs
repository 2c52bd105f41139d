//! Blackbody spectral and total emissive power.
//!
//! Physics:
//! - Planck's law: `E_bλ(λ, T) = C1 / (λ⁵/n² · (exp(C2 / (n λ T)) − 1))`
//! - `E_b(T) = ∫₀^∞ E_bλ dλ = σ T⁴`
//! - Blackbody radiation function: `f_λ(λ, T) = E_b,0−λ / E_b`
//!
//! Wavelengths are in micrometres, spectral powers in W/(m² µm) and integrated
//! powers in W/m².

use ndarray::Array1;
use serde::Serialize;

use crate::constants::PhysicalConstants;
use crate::error::{RadiationError, Result, ensure_positive};
use crate::numeric::{
    AdaptiveGaussKronrod, BoundedBrent, Integrator, Minimizer, Quadrature, SpectralProperty,
};
use crate::vecutils::trapezoid;

/// Micrometres per metre.
const UM_PER_M: f64 = 1e6;

/// Above this value of `C2 / (n λ T)` the spectral power underflows; the
/// evaluator returns 0 instead of evaluating the exponential.
const MAX_EXPONENT: f64 = 700.0;

/// Root of `x = 5 (1 − e^−x)`; Wien's displacement constant is `C2 / x`.
const WIEN_ROOT: f64 = 4.965_114_231_744_276;

/// Upper bound on the number of wavelength samples in a band discretization.
const MAX_BAND_SAMPLES: usize = 10_000_000;

/// Result of [`Blackbody::effective_band_absorptivity`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandAbsorptivity {
    /// Weighted band integral divided by the total emissive power.
    pub effective: f64,
    /// Sampled wavelengths [µm].
    pub wavelengths: Vec<f64>,
    /// `E_bλ · property` at each sample [W/(m² µm)].
    pub weighted: Vec<f64>,
    /// `E_bλ` at each sample [W/(m² µm)].
    pub unweighted: Vec<f64>,
}

/// Spectral radiation evaluator with injected constants and numeric services.
#[derive(Debug, Clone)]
pub struct Blackbody<I = AdaptiveGaussKronrod, M = BoundedBrent> {
    constants: PhysicalConstants,
    integrator: I,
    minimizer: M,
}

impl Default for Blackbody {
    fn default() -> Self {
        Self::new(PhysicalConstants::default())
    }
}

impl Blackbody {
    /// Evaluator using the default integrator and minimizer.
    pub fn new(constants: PhysicalConstants) -> Self {
        Self::with_services(
            constants,
            AdaptiveGaussKronrod::default(),
            BoundedBrent::default(),
        )
    }
}

impl<I: Integrator, M: Minimizer> Blackbody<I, M> {
    pub fn with_services(constants: PhysicalConstants, integrator: I, minimizer: M) -> Self {
        Self {
            constants,
            integrator,
            minimizer,
        }
    }

    pub fn constants(&self) -> &PhysicalConstants {
        &self.constants
    }

    /// Planck's law for already validated inputs.
    fn planck(&self, wavelength_um: f64, temperature: f64, refractive_index: f64) -> f64 {
        if wavelength_um <= 0.0 {
            return 0.0;
        }
        let lambda_m = wavelength_um / UM_PER_M;
        let exponent = self.constants.c2() / (refractive_index * lambda_m * temperature);
        if exponent > MAX_EXPONENT {
            return 0.0;
        }
        let denominator =
            lambda_m.powi(5) / (refractive_index * refractive_index) * exponent.exp_m1();
        // Overflowing λ⁵ or an underflowing exponent: far Rayleigh–Jeans tail.
        if !(denominator.is_finite() && denominator > 0.0) {
            return 0.0;
        }
        self.constants.c1() / denominator / UM_PER_M
    }

    /// Wien wavelength `C2 / (4.965 T)` [µm] and the reference power `σ T⁴`
    /// used to make the integrands dimensionless.
    fn reduced_scales(&self, temperature: f64) -> (f64, f64) {
        let peak = self.constants.c2() / (WIEN_ROOT * temperature) * UM_PER_M;
        let power = self.constants.stefan_boltzmann * temperature.powi(4);
        (peak, if power.is_normal() { power } else { 1.0 })
    }

    /// Planck's law in the reduced variable `x = λ / λ_W`, divided by `σ T⁴`.
    ///
    /// The peak sits near `x = 1` and the integral over (0, ∞) is close to 1
    /// for every temperature.
    fn reduced_planck(&self, x: f64, temperature: f64, peak: f64, power: f64) -> f64 {
        if !x.is_finite() {
            return 0.0;
        }
        self.planck(x * peak, temperature, 1.0) * peak / power
    }

    fn rescale(q: Quadrature, power: f64) -> Quadrature {
        Quadrature {
            value: q.value * power,
            error: q.error * power,
        }
    }

    /// Spectral blackbody emissive power [W/(m² µm)] (Planck's law).
    ///
    /// Very small `λT` products saturate to 0 rather than overflowing.
    pub fn spectral_emissive_power(
        &self,
        wavelength_um: f64,
        temperature: f64,
        refractive_index: f64,
    ) -> Result<f64> {
        ensure_positive("wavelength", wavelength_um)?;
        ensure_positive("temperature", temperature)?;
        ensure_positive("refractive index", refractive_index)?;
        Ok(self.planck(wavelength_um, temperature, refractive_index))
    }

    /// Total emissive power [W/m²], integrated over (0, ∞).
    ///
    /// The integration runs in `λ / λ_W` and is normalised by `σ T⁴`, so the
    /// integrator's tolerances are relative to the result at any temperature.
    pub fn total_emissive_power(&self, temperature: f64) -> Result<Quadrature> {
        ensure_positive("temperature", temperature)?;
        let (peak, power) = self.reduced_scales(temperature);
        let q = self.integrator.integrate(
            |x| self.reduced_planck(x, temperature, peak, power),
            0.0,
            f64::INFINITY,
        )?;
        Ok(Self::rescale(q, power))
    }

    /// Emissive power in the band (0, λ) [W/m²].
    ///
    /// `λ = 0` gives 0 and `λ = ∞` gives the total emissive power. Bands
    /// reaching past the Wien peak are computed as total minus tail.
    pub fn band_emissive_power(&self, wavelength_um: f64, temperature: f64) -> Result<Quadrature> {
        ensure_positive("temperature", temperature)?;
        if wavelength_um.is_nan() || wavelength_um < 0.0 {
            return Err(RadiationError::domain(format!(
                "wavelength must be >= 0, got {wavelength_um}"
            )));
        }
        if wavelength_um == 0.0 {
            return Ok(Quadrature {
                value: 0.0,
                error: 0.0,
            });
        }
        if wavelength_um == f64::INFINITY {
            return self.total_emissive_power(temperature);
        }

        let (peak, power) = self.reduced_scales(temperature);
        let upper = wavelength_um / peak;
        if upper <= 1.0 {
            let q = self.integrator.integrate(
                |x| self.reduced_planck(x, temperature, peak, power),
                0.0,
                upper,
            )?;
            return Ok(Self::rescale(q, power));
        }

        // Past the peak: total minus the tail (upper, ∞), with the tail
        // integrated in `u = upper / x` so that any finite limit stays resolved.
        let total = self.total_emissive_power(temperature)?;
        let tail = self.integrator.integrate(
            |u| {
                let x = upper / u;
                let e = self.reduced_planck(x, temperature, peak, power);
                if e == 0.0 {
                    0.0
                } else {
                    e * x / u
                }
            },
            0.0,
            1.0,
        )?;
        let tail = Self::rescale(tail, power);
        Ok(Quadrature {
            value: (total.value - tail.value).max(0.0),
            error: total.error + tail.error,
        })
    }

    /// Fraction of the total emissive power emitted in (0, λ), in [0, 1].
    pub fn fraction_function(&self, wavelength_um: f64, temperature: f64) -> Result<f64> {
        let band = self.band_emissive_power(wavelength_um, temperature)?;
        if band.value == 0.0 {
            return Ok(0.0);
        }
        let total = self.total_emissive_power(temperature)?;
        Ok((band.value / total.value).clamp(0.0, 1.0))
    }

    /// Wavelength of maximum spectral emissive power [µm].
    ///
    /// The minimizer works on `λ / λ_W`, where `λ_W = C2 / (4.965 T)`, over
    /// `[0.2, 5]`, so the tolerance is relative to the peak position.
    pub fn peak_wavelength(&self, temperature: f64) -> Result<f64> {
        ensure_positive("temperature", temperature)?;
        let (estimate, _) = self.reduced_scales(temperature);
        let s = self.minimizer.minimize(
            |s| -self.planck(s * estimate, temperature, 1.0),
            0.2,
            5.0,
        )?;
        Ok(s * estimate)
    }

    /// Total emissive power of each temperature [W/m²].
    pub fn emissive_powers(&self, temperatures: &[f64]) -> Result<Array1<f64>> {
        temperatures
            .iter()
            .map(|&t| self.total_emissive_power(t).map(|q| q.value))
            .collect::<Result<Vec<_>>>()
            .map(Array1::from)
    }

    /// Effective (total) value of a spectral property over a wavelength band,
    /// weighted by blackbody emission at `temperature`.
    ///
    /// The band is sampled at `λ1 + k · step` over the half-open interval
    /// `[λ1, λ2)` (see [`band_samples`]); the weighted samples are integrated
    /// with the trapezoidal rule and divided by the total emissive power.
    pub fn effective_band_absorptivity<P>(
        &self,
        lambda1_um: f64,
        lambda2_um: f64,
        temperature: f64,
        property: &P,
        step_um: f64,
    ) -> Result<BandAbsorptivity>
    where
        P: SpectralProperty + ?Sized,
    {
        ensure_positive("temperature", temperature)?;
        let wavelengths = band_samples(lambda1_um, lambda2_um, step_um)?;

        let unweighted: Vec<f64> = wavelengths
            .iter()
            .map(|&w| self.planck(w, temperature, 1.0))
            .collect();
        let weighted = wavelengths
            .iter()
            .zip(&unweighted)
            .map(|(&w, &e)| property.value_at(w).map(|p| p * e))
            .collect::<Result<Vec<f64>>>()?;

        let total = self.total_emissive_power(temperature)?;
        let effective = trapezoid(&wavelengths, &weighted) / total.value;

        Ok(BandAbsorptivity {
            effective,
            wavelengths,
            weighted,
            unweighted,
        })
    }
}

/// Wavelength samples `λ1 + k · step` that lie in the half-open band `[λ1, λ2)`.
///
/// `λ2` is never sampled: the last sample is the last partition point strictly
/// below it, also when `step` divides the band exactly. A point within
/// `1e-9 · step` of `λ2` counts as reaching it.
pub fn band_samples(lambda1_um: f64, lambda2_um: f64, step_um: f64) -> Result<Vec<f64>> {
    ensure_positive("lower wavelength", lambda1_um)?;
    ensure_positive("step", step_um)?;
    if !lambda2_um.is_finite() || lambda2_um <= lambda1_um {
        return Err(RadiationError::domain(format!(
            "upper wavelength {lambda2_um} must be finite and above {lambda1_um}"
        )));
    }
    let count = ((lambda2_um - lambda1_um) / step_um).ceil();
    if count > MAX_BAND_SAMPLES as f64 {
        return Err(RadiationError::domain(format!(
            "step {step_um} um yields more than {MAX_BAND_SAMPLES} samples"
        )));
    }

    let limit = lambda2_um - 1e-9 * step_um;
    Ok((0..)
        .map(|k| lambda1_um + k as f64 * step_um)
        .take_while(|&w| w < limit)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::{Extrapolation, SpectralCurve};
    use approx::assert_relative_eq;

    #[test]
    fn test_planck_reference_values() {
        let bb = Blackbody::default();
        // Reference values from direct evaluation of Planck's law.
        let e = bb.spectral_emissive_power(10.0, 300.0, 1.0).unwrap();
        assert_relative_eq!(e, 31.177_27, max_relative = 1e-5);
        let e = bb.spectral_emissive_power(0.5, 5800.0, 1.0).unwrap();
        assert_relative_eq!(e, 8.445_292e7, max_relative = 1e-5);
    }

    #[test]
    fn test_refractive_index_scales_emission() {
        let bb = Blackbody::default();
        let vacuum = bb.spectral_emissive_power(4.0, 800.0, 1.0).unwrap();
        let medium = bb.spectral_emissive_power(2.0, 800.0, 2.0).unwrap();
        // λ⁵/n² with λ halved and n doubled: factor 2^5 * 2^2 = 128.
        assert_relative_eq!(medium, vacuum * 128.0, max_relative = 1e-12);
    }

    #[test]
    fn test_saturates_for_small_lambda_t() {
        let bb = Blackbody::default();
        let e = bb.spectral_emissive_power(0.01, 100.0, 1.0).unwrap();
        assert_eq!(e, 0.0);
        let e = bb.spectral_emissive_power(1e-6, 1.0, 1.0).unwrap();
        assert_eq!(e, 0.0);
    }

    #[test]
    fn test_domain_errors() {
        let bb = Blackbody::default();
        for (l, t, n) in [
            (0.0, 300.0, 1.0),
            (-1.0, 300.0, 1.0),
            (1.0, 0.0, 1.0),
            (1.0, -5.0, 1.0),
            (f64::NAN, 300.0, 1.0),
            (1.0, f64::INFINITY, 1.0),
            (1.0, 300.0, 0.0),
        ] {
            assert!(
                matches!(
                    bb.spectral_emissive_power(l, t, n),
                    Err(RadiationError::Domain(_))
                ),
                "expected domain error for ({l}, {t}, {n})"
            );
        }
        assert!(bb.total_emissive_power(0.0).is_err());
        assert!(bb.band_emissive_power(-1.0, 300.0).is_err());
        assert!(bb.fraction_function(1.0, -1.0).is_err());
    }

    #[test]
    fn test_total_matches_stefan_boltzmann() {
        let bb = Blackbody::default();
        let sigma = bb.constants().stefan_boltzmann;
        for t in [50.0, 300.0, 1000.0, 5800.0] {
            let q = bb.total_emissive_power(t).unwrap();
            assert_relative_eq!(q.value / t.powi(4), sigma, max_relative = 1e-6);
            assert!(q.error <= 1e-6 * q.value, "error estimate {} too large", q.error);
        }
    }

    #[test]
    fn test_textbook_constants() {
        let bb = Blackbody::new(PhysicalConstants::textbook());
        let q = bb.total_emissive_power(1000.0).unwrap();
        assert_relative_eq!(q.value / 1e12, 5.67e-8, max_relative = 1e-3);
    }

    #[test]
    fn test_fraction_function_table_values() {
        let bb = Blackbody::default();
        // λT = 2000 µm K and λT = 2898 µm K
        assert_relative_eq!(bb.fraction_function(0.4, 5000.0).unwrap(), 0.066_73, max_relative = 1e-3);
        assert_relative_eq!(bb.fraction_function(2.898, 1000.0).unwrap(), 0.250_1, max_relative = 1e-3);
    }

    #[test]
    fn test_fraction_function_limits_and_monotonicity() {
        let bb = Blackbody::default();
        let t = 1500.0;
        assert_eq!(bb.fraction_function(0.0, t).unwrap(), 0.0);
        assert_relative_eq!(bb.fraction_function(f64::INFINITY, t).unwrap(), 1.0, epsilon = 1e-9);
        assert!(bb.fraction_function(1000.0, t).unwrap() > 0.9999);

        let mut previous = 0.0;
        for lambda in [0.1, 0.5, 1.0, 1.5, 2.0, 3.0, 5.0, 10.0, 50.0, 200.0] {
            let f = bb.fraction_function(lambda, t).unwrap();
            assert!((0.0..=1.0).contains(&f));
            assert!(f >= previous, "f({lambda}) = {f} < {previous}");
            previous = f;
        }
    }

    #[test]
    fn test_band_plus_tail_is_total() {
        let bb = Blackbody::default();
        let t = 800.0;
        let lambda = 4.0;
        let total = bb.total_emissive_power(t).unwrap();
        let band = bb.band_emissive_power(lambda, t).unwrap();
        let all = bb.band_emissive_power(f64::INFINITY, t).unwrap();
        assert_relative_eq!(all.value, total.value, max_relative = 1e-12);

        let tail = AdaptiveGaussKronrod::default()
            .integrate(|l| bb.planck(l, t, 1.0), lambda, f64::INFINITY)
            .unwrap();
        let tolerance = band.error + tail.error + total.error + 1e-8 * total.value;
        assert!((band.value + tail.value - total.value).abs() <= tolerance);
    }

    #[test]
    fn test_peak_wavelength_follows_wien() {
        let bb = Blackbody::default();
        for t in [300.0, 1000.0, 5800.0] {
            let peak = bb.peak_wavelength(t).unwrap();
            assert_relative_eq!(peak * t, 2897.771_955, max_relative = 1e-4);
        }
    }

    #[test]
    fn test_band_samples_exclude_upper_bound() {
        let s = band_samples(1.0, 2.0, 0.3).unwrap();
        assert_eq!(s.len(), 4);
        assert_relative_eq!(*s.last().unwrap(), 1.9, epsilon = 1e-12);

        // Step lands exactly on λ2: λ2 is still excluded.
        let s = band_samples(1.0, 2.0, 0.25).unwrap();
        assert_eq!(s, vec![1.0, 1.25, 1.5, 1.75]);

        let s = band_samples(1.0, 2.0, 0.1).unwrap();
        assert_eq!(s.len(), 10);
        assert!(s.iter().all(|&w| w < 2.0));

        assert!(band_samples(2.0, 1.0, 0.1).is_err());
        assert!(band_samples(0.0, 1.0, 0.1).is_err());
        assert!(band_samples(1.0, 2.0, 0.0).is_err());
        assert!(band_samples(1.0, 2.0, 1e-12).is_err());
    }

    #[test]
    fn test_effective_band_unit_property_matches_fraction() {
        let bb = Blackbody::default();
        let t = 1000.0;
        let step = 0.001;
        let result = bb
            .effective_band_absorptivity(0.5, 20.0, t, &|_: f64| 1.0, step)
            .unwrap();
        let last = *result.wavelengths.last().unwrap();
        let expected = bb.fraction_function(last, t).unwrap() - bb.fraction_function(0.5, t).unwrap();
        assert_relative_eq!(result.effective, expected, max_relative = 1e-4);
        assert_eq!(result.weighted, result.unweighted);
        assert_eq!(result.wavelengths.len(), result.weighted.len());
    }

    #[test]
    fn test_effective_band_with_curve() {
        let bb = Blackbody::default();
        let curve = SpectralCurve::new(&[(1.0, 0.9), (3.0, 0.9)], Extrapolation::Fail).unwrap();
        let result = bb.effective_band_absorptivity(1.0, 3.0, 1200.0, &curve, 0.01).unwrap();
        let unit = bb
            .effective_band_absorptivity(1.0, 3.0, 1200.0, &|_: f64| 1.0, 0.01)
            .unwrap();
        assert_relative_eq!(result.effective, 0.9 * unit.effective, max_relative = 1e-12);

        // A curve that does not cover the band fails instead of extrapolating.
        let short = SpectralCurve::new(&[(1.0, 0.9), (2.0, 0.9)], Extrapolation::Fail).unwrap();
        assert!(bb.effective_band_absorptivity(1.0, 3.0, 1200.0, &short, 0.01).is_err());
    }
}
