use crate::error::{RadiationError, Result};

/// Bounded scalar minimization service.
pub trait Minimizer: Sync {
    /// Returns the abscissa of the minimum of `f` on `[lower, upper]`.
    fn minimize<F>(&self, f: F, lower: f64, upper: f64) -> Result<f64>
    where
        F: Fn(f64) -> f64;
}

/// Brent's bounded minimization (golden section + parabolic interpolation).
#[derive(Debug, Clone, Copy)]
pub struct BoundedBrent {
    /// Absolute tolerance on the abscissa.
    pub x_tolerance: f64,
    /// Maximum number of function evaluations.
    pub max_evaluations: usize,
}

impl Default for BoundedBrent {
    fn default() -> Self {
        Self {
            x_tolerance: 1e-5,
            max_evaluations: 500,
        }
    }
}

/// Sign that treats zero as positive.
fn sign(v: f64) -> f64 {
    if v < 0.0 { -1.0 } else { 1.0 }
}

impl Minimizer for BoundedBrent {
    fn minimize<F>(&self, f: F, lower: f64, upper: f64) -> Result<f64>
    where
        F: Fn(f64) -> f64,
    {
        if !(lower.is_finite() && upper.is_finite()) || lower > upper {
            return Err(RadiationError::domain(format!(
                "invalid bracket [{lower}, {upper}]"
            )));
        }
        if lower == upper {
            return Ok(lower);
        }

        let golden = 0.5 * (3.0 - 5.0_f64.sqrt());
        let sqrt_eps = f64::EPSILON.sqrt();

        let (mut a, mut b) = (lower, upper);
        // x: best point, w: second best, v: previous w.
        let mut x = a + golden * (b - a);
        let mut w = x;
        let mut v = x;
        let mut fx = f(x);
        let mut fw = fx;
        let mut fv = fx;
        let mut evaluations = 1;

        let mut step = 0.0_f64;
        let mut prev_step = 0.0_f64;

        loop {
            let xm = 0.5 * (a + b);
            let tol1 = sqrt_eps * x.abs() + self.x_tolerance / 3.0;
            let tol2 = 2.0 * tol1;
            if (x - xm).abs() <= tol2 - 0.5 * (b - a) {
                return Ok(x);
            }
            if evaluations >= self.max_evaluations {
                return Err(RadiationError::Minimization {
                    evaluations,
                    best: x,
                });
            }

            let mut golden_step = true;
            if prev_step.abs() > tol1 {
                // Try a parabola through x, w and v.
                let r = (x - w) * (fx - fv);
                let mut q = (x - v) * (fx - fw);
                let mut p = (x - v) * q - (x - w) * r;
                q = 2.0 * (q - r);
                if q > 0.0 {
                    p = -p;
                }
                q = q.abs();
                let older = prev_step;
                prev_step = step;

                if p.abs() < (0.5 * q * older).abs() && p > q * (a - x) && p < q * (b - x) {
                    step = p / q;
                    let u = x + step;
                    if (u - a) < tol2 || (b - u) < tol2 {
                        step = tol1 * sign(xm - x);
                    }
                    golden_step = false;
                }
            }
            if golden_step {
                prev_step = if x >= xm { a - x } else { b - x };
                step = golden * prev_step;
            }

            let u = x + sign(step) * step.abs().max(tol1);
            let fu = f(u);
            evaluations += 1;

            if fu <= fx {
                if u >= x {
                    a = x;
                } else {
                    b = x;
                }
                v = w;
                fv = fw;
                w = x;
                fw = fx;
                x = u;
                fx = fu;
            } else {
                if u < x {
                    a = u;
                } else {
                    b = u;
                }
                if fu <= fw || w == x {
                    v = w;
                    fv = fw;
                    w = u;
                    fw = fu;
                } else if fu <= fv || v == x || v == w {
                    v = u;
                    fv = fu;
                }
            }
        }
    }
}
