//! File I/O: View3D view-factor output, spectral property tables and JSON
//! result files.
//!
//! Parsers return [`crate::Result`] with typed errors; file-level functions
//! return `anyhow::Result` with the path attached.

pub mod results;
pub mod spectral;
pub mod view3d;

pub use results::{read_json, to_json_string, write_json};
pub use spectral::{parse_spectral_table, read_spectral_table};
pub use view3d::{Delimiter, parse_view3d, read_view3d};
