pub mod blackbody;
pub mod enclosure;
pub mod view_factors;
pub mod zonal;
