//! JSON files for scenarios and solver results.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Writes any serializable value as pretty JSON.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, value)
        .with_context(|| format!("Failed to serialize results to: {}", path.display()))?;

    Ok(())
}

/// Reads a JSON file into `T`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;
    let reader = BufReader::new(file);

    let value = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to deserialize: {}", path.display()))?;

    Ok(value)
}

pub fn to_json_string<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize results to string")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::zonal::{ExchangeConfig, TotalExchangeArea, ZonalScenario, ZonalSolution};
    use crate::sim::view_factors::Enclosure;
    use crate::vecutils::almost_equal;
    use ndarray::{Array1, Array2};
    use tempfile::tempdir;

    #[test]
    fn test_solution_round_trip() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("solution.json");

        let f = Array2::from_shape_fn((6, 6), |(i, j)| if i == j { 0.0 } else { 0.2 });
        let e = Enclosure::new(Array1::ones(6), f, Array1::from_elem(6, 0.9))?;
        let exchange = TotalExchangeArea::from_enclosure(&e, &ExchangeConfig::default())?;
        let scenario: ZonalScenario = serde_json::from_str(
            r#"{"u_value": 0.15, "h_conv": 10.0, "heat_flux": [200, 0, 0, 0, 0, 0],
                "back_temperature": 300.0, "initial_temperature": 300.0}"#,
        )?;
        let solution = scenario.solve(&exchange)?;

        write_json(&path, &solution)?;
        let loaded: ZonalSolution = read_json(&path)?;
        assert_eq!(loaded.iterations, solution.iterations);
        assert!(almost_equal(&loaded.temperatures, &solution.temperatures, 1e-9));
        assert!(almost_equal(&loaded.radiative_flux, &solution.radiative_flux, 1e-9));
        assert_eq!(loaded.heat_flux, solution.heat_flux);
        Ok(())
    }

    #[test]
    fn test_string_output() -> Result<()> {
        let json = to_json_string(&vec![1.0, 2.5])?;
        assert!(json.contains("2.5"));
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        let r: Result<Vec<f64>> = read_json(Path::new("/nonexistent/results.json"));
        assert!(r.is_err());
    }
}
