//! Zonal method: total exchange areas and the nonlinear surface/air balance.
//!
//! ```text
//! Enclosure ──> TotalExchangeArea (SS, computed once)
//!                    │  shared read-only
//!                    ▼
//!   SurfaceBoundary + initial T ──> ZonalSolver ──> ZonalSolution
//! ```

pub mod config;
pub mod exchange;
pub mod result;
pub mod scenario;
pub mod solver;

pub use config::{ExchangeConfig, ZonalConfig};
pub use exchange::{TotalExchangeArea, area_view_matrix, conductance_matrix, total_exchange_area};
pub use result::ZonalSolution;
pub use scenario::{PerSurface, ZonalScenario, solve_scenarios};
pub use solver::{SolverState, SurfaceBoundary, ZonalSolver, solve_zonal};
