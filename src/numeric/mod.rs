//! Numerical services used by the radiation solvers.
//!
//! Each service is a trait with one default implementation:
//!
//! ```text
//! Integrator    ── AdaptiveGaussKronrod   definite integrals, finite or [a, inf)
//! Minimizer     ── BoundedBrent           bounded scalar minimization
//! LinearSolver  ── DenseLu                A X = B with several right-hand sides
//! SpectralProperty ── SpectralCurve       piecewise-linear spectral data
//! ```
//!
//! Implementations hold configuration only, so they are `Sync` and can be
//! shared by concurrent solver runs.

pub mod interp;
pub mod linalg;
pub mod minimize;
pub mod quadrature;

pub use interp::{Extrapolation, SpectralCurve, SpectralProperty};
pub use linalg::{DenseLu, LinearSolver, is_symmetric, max_asymmetry};
pub use minimize::{BoundedBrent, Minimizer};
pub use quadrature::{AdaptiveGaussKronrod, Integrator, Quadrature};
