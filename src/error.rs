//! Error taxonomy shared by every solver in the crate.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, RadiationError>;

/// Limit that stopped a zonal iteration before convergence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConvergenceLimit {
    /// Iteration count exceeded `max_iterations`.
    MaxIterations(usize),
    /// Wall-clock budget exhausted.
    TimeBudget(Duration),
}

impl fmt::Display for ConvergenceLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxIterations(n) => write!(f, "iteration cap of {n}"),
            Self::TimeBudget(d) => write!(f, "time budget of {:.3} s", d.as_secs_f64()),
        }
    }
}

/// Errors raised by the radiation solvers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RadiationError {
    /// Invalid physical input (non-positive temperature or wavelength,
    /// emissivity outside (0, 1], shape mismatch, ...).
    #[error("domain error: {0}")]
    Domain(String),

    /// A geometry/view-factor text source does not have the expected layout.
    #[error("malformed input at line {line}: {message}")]
    MalformedInput { line: usize, message: String },

    /// The linear system is singular or too badly conditioned to trust.
    #[error("singular system: {0}")]
    SingularSystem(String),

    /// Adaptive quadrature hit its subdivision limit before the tolerance.
    #[error(
        "integration did not converge after {subdivisions} subdivisions \
         (value {value:e}, error estimate {error:e})"
    )]
    Integration {
        subdivisions: usize,
        value: f64,
        error: f64,
    },

    /// The scalar minimizer ran out of function evaluations.
    #[error("minimization did not converge after {evaluations} evaluations (best x = {best})")]
    Minimization { evaluations: usize, best: f64 },

    /// The zonal iteration stopped at a configured limit.
    #[error("zonal iteration did not converge: reached {limit} after {iterations} iterations (last RMS change {rms:e} K)")]
    Convergence {
        iterations: usize,
        rms: f64,
        limit: ConvergenceLimit,
    },

    /// The zonal iteration produced a non-physical surface temperature.
    #[error("zonal iteration diverged at iteration {iteration}: surface {surface} reached {temperature} K")]
    Divergence {
        iteration: usize,
        surface: usize,
        temperature: f64,
    },
}

impl RadiationError {
    pub fn domain(message: impl Into<String>) -> Self {
        Self::Domain(message.into())
    }

    pub fn malformed(line: usize, message: impl Into<String>) -> Self {
        Self::MalformedInput {
            line,
            message: message.into(),
        }
    }

    pub fn singular(message: impl Into<String>) -> Self {
        Self::SingularSystem(message.into())
    }
}

/// Fails with [`RadiationError::Domain`] unless `value` is finite and `> 0`.
pub(crate) fn ensure_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(RadiationError::domain(format!(
            "{name} must be finite and positive, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_diagnostics() {
        let err = RadiationError::Convergence {
            iterations: 500,
            rms: 1.5e-3,
            limit: ConvergenceLimit::MaxIterations(500),
        };
        let msg = err.to_string();
        assert!(msg.contains("500"), "{msg}");
        assert!(msg.contains("1.5e-3"), "{msg}");

        let err = RadiationError::malformed(4, "expected 6 values, got 5");
        assert_eq!(
            err.to_string(),
            "malformed input at line 4: expected 6 values, got 5"
        );
    }

    #[test]
    fn test_ensure_positive() {
        assert!(ensure_positive("temperature", 300.0).is_ok());
        assert!(ensure_positive("temperature", 0.0).is_err());
        assert!(ensure_positive("temperature", -1.0).is_err());
        assert!(ensure_positive("temperature", f64::NAN).is_err());
        assert!(ensure_positive("temperature", f64::INFINITY).is_err());
    }
}
