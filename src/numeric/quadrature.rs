//! Adaptive Gauss–Kronrod quadrature.
//!
//! Globally adaptive bisection on the 15-point Kronrod rule with its embedded
//! 7-point Gauss rule. A semi-infinite range `[a, +inf)` is mapped onto
//! `[0, 1)` with `x = a + t / (1 - t)`.

use crate::error::{RadiationError, Result};

/// Value of a definite integral and its estimated absolute error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadrature {
    pub value: f64,
    pub error: f64,
}

/// Definite-integral service.
pub trait Integrator: Sync {
    /// Integrates `f` over `[lower, upper]`. `upper` may be `f64::INFINITY`.
    fn integrate<F>(&self, f: F, lower: f64, upper: f64) -> Result<Quadrature>
    where
        F: Fn(f64) -> f64;
}

/// Kronrod abscissae on [-1, 1] (positive half, descending, centre last).
const XGK: [f64; 8] = [
    0.991_455_371_120_812_639,
    0.949_107_912_342_758_525,
    0.864_864_423_359_769_073,
    0.741_531_185_599_394_440,
    0.586_087_235_467_691_130,
    0.405_845_151_377_397_167,
    0.207_784_955_007_898_468,
    0.0,
];

/// Kronrod weights matching `XGK`.
const WGK: [f64; 8] = [
    0.022_935_322_010_529_225,
    0.063_092_092_629_978_553,
    0.104_790_010_322_250_184,
    0.140_653_259_715_525_919,
    0.169_004_726_639_267_903,
    0.190_350_578_064_785_410,
    0.204_432_940_075_298_892,
    0.209_482_141_084_727_828,
];

/// Gauss weights for the abscissae `XGK[1]`, `XGK[3]`, `XGK[5]`, `XGK[7]`.
const WG: [f64; 4] = [
    0.129_484_966_168_869_693,
    0.279_705_391_489_276_668,
    0.381_830_050_505_118_945,
    0.417_959_183_673_469_388,
];

/// Globally adaptive 7/15-point Gauss–Kronrod integrator.
#[derive(Debug, Clone, Copy)]
pub struct AdaptiveGaussKronrod {
    /// Absolute error target.
    pub abs_tolerance: f64,
    /// Relative error target.
    pub rel_tolerance: f64,
    /// Maximum number of interval bisections.
    pub max_subdivisions: usize,
}

impl Default for AdaptiveGaussKronrod {
    fn default() -> Self {
        Self {
            abs_tolerance: 1.49e-8,
            rel_tolerance: 1.49e-8,
            max_subdivisions: 200,
        }
    }
}

struct Segment {
    lower: f64,
    upper: f64,
    value: f64,
    error: f64,
}

impl Segment {
    fn new<F: Fn(f64) -> f64>(f: &F, lower: f64, upper: f64) -> Self {
        let (value, error) = kronrod15(f, lower, upper);
        Self {
            lower,
            upper,
            value,
            error,
        }
    }
}

/// One 15-point Kronrod estimate with the |K15 - G7| error bound.
fn kronrod15<F: Fn(f64) -> f64>(f: &F, lower: f64, upper: f64) -> (f64, f64) {
    let centre = 0.5 * (lower + upper);
    let half = 0.5 * (upper - lower);

    let fc = f(centre);
    let mut kronrod = fc * WGK[7];
    let mut gauss = fc * WG[3];
    for j in 0..7 {
        let dx = half * XGK[j];
        let pair = f(centre - dx) + f(centre + dx);
        kronrod += WGK[j] * pair;
        if j % 2 == 1 {
            gauss += WG[j / 2] * pair;
        }
    }
    (kronrod * half, ((kronrod - gauss) * half).abs())
}

impl AdaptiveGaussKronrod {
    fn integrate_finite<F: Fn(f64) -> f64>(&self, f: F, lower: f64, upper: f64) -> Result<Quadrature> {
        let mut segments = vec![Segment::new(&f, lower, upper)];

        for _ in 0..=self.max_subdivisions {
            let value: f64 = segments.iter().map(|s| s.value).sum();
            let error: f64 = segments.iter().map(|s| s.error).sum();
            if !value.is_finite() || !error.is_finite() {
                return Err(RadiationError::Integration {
                    subdivisions: segments.len() - 1,
                    value,
                    error,
                });
            }
            if error <= self.abs_tolerance.max(self.rel_tolerance * value.abs()) {
                return Ok(Quadrature { value, error });
            }
            if segments.len() > self.max_subdivisions {
                return Err(RadiationError::Integration {
                    subdivisions: segments.len() - 1,
                    value,
                    error,
                });
            }

            // Bisect the segment with the largest error estimate.
            let worst = segments
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.error.total_cmp(&b.1.error))
                .map(|(i, _)| i)
                .unwrap_or(0);
            let seg = segments.swap_remove(worst);
            let mid = 0.5 * (seg.lower + seg.upper);
            segments.push(Segment::new(&f, seg.lower, mid));
            segments.push(Segment::new(&f, mid, seg.upper));
        }

        let value: f64 = segments.iter().map(|s| s.value).sum();
        let error: f64 = segments.iter().map(|s| s.error).sum();
        Err(RadiationError::Integration {
            subdivisions: segments.len() - 1,
            value,
            error,
        })
    }
}

impl Integrator for AdaptiveGaussKronrod {
    fn integrate<F>(&self, f: F, lower: f64, upper: f64) -> Result<Quadrature>
    where
        F: Fn(f64) -> f64,
    {
        if lower.is_nan() || upper.is_nan() || lower.is_infinite() {
            return Err(RadiationError::domain(format!(
                "unsupported integration range [{lower}, {upper}]"
            )));
        }
        if upper == f64::INFINITY {
            let mapped = |t: f64| {
                let s = 1.0 - t;
                f(lower + t / s) / (s * s)
            };
            return self.integrate_finite(mapped, 0.0, 1.0);
        }
        if upper == f64::NEG_INFINITY {
            return Err(RadiationError::domain("upper limit must not be -inf"));
        }
        if upper == lower {
            return Ok(Quadrature {
                value: 0.0,
                error: 0.0,
            });
        }
        if upper < lower {
            let q = self.integrate_finite(f, upper, lower)?;
            return Ok(Quadrature {
                value: -q.value,
                error: q.error,
            });
        }
        self.integrate_finite(f, lower, upper)
    }
}
