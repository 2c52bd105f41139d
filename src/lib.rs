pub mod constants;
pub mod error;
pub mod io;
pub mod numeric;
pub mod sim;
pub mod vecutils;

// Prelude
pub use constants::PhysicalConstants;
pub use error::{ConvergenceLimit, RadiationError, Result};
pub use sim::blackbody::{BandAbsorptivity, Blackbody, band_samples};
pub use sim::enclosure::{
    EnclosureSolution, exchange_matrix, net_radiative_flux, solve_enclosure, solve_radiosity,
    surface_heat_flux,
};
pub use sim::view_factors::Enclosure;
pub use sim::zonal::{
    ExchangeConfig, PerSurface, SolverState, SurfaceBoundary, TotalExchangeArea, ZonalConfig,
    ZonalScenario, ZonalSolution, ZonalSolver,
};
