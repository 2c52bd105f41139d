//! Two-column spectral property tables: `wavelength_um value` per line.
//!
//! Columns may be separated by whitespace or a comma. `#` starts a comment.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::error::RadiationError;
use crate::numeric::{Extrapolation, SpectralCurve};

pub fn parse_spectral_table(text: &str, extrapolation: Extrapolation) -> crate::Result<SpectralCurve> {
    let mut points = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|f| !f.is_empty())
            .collect();
        if fields.len() != 2 {
            return Err(RadiationError::malformed(
                i + 1,
                format!("expected 2 columns, found {}", fields.len()),
            ));
        }
        let parse = |f: &str| {
            f.parse::<f64>()
                .map_err(|_| RadiationError::malformed(i + 1, format!("cannot parse {f:?}")))
        };
        points.push((parse(fields[0])?, parse(fields[1])?));
    }
    SpectralCurve::new(&points, extrapolation)
}

pub fn read_spectral_table(path: &Path, extrapolation: Extrapolation) -> Result<SpectralCurve> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to open spectral table: {}", path.display()))?;
    let curve = parse_spectral_table(&text, extrapolation)
        .with_context(|| format!("Invalid spectral table: {}", path.display()))?;
    Ok(curve)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::SpectralProperty;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_with_comments() {
        let text = "# glass transmissivity\n0.3, 0.0\n0.35 0.9  # cut-on\n\n2.5\t0.9\n3.0 0.0\n";
        let curve = parse_spectral_table(text, Extrapolation::Clamp).unwrap();
        assert_eq!(curve.len(), 4);
        assert_relative_eq!(curve.value_at(1.0).unwrap(), 0.9);
        assert_relative_eq!(curve.value_at(10.0).unwrap(), 0.0);
    }

    #[test]
    fn test_malformed_lines() {
        let err = parse_spectral_table("1.0 0.5\n2.0\n", Extrapolation::Fail).unwrap_err();
        assert!(matches!(err, RadiationError::MalformedInput { line: 2, .. }));
        let err = parse_spectral_table("1.0 0.5\n2.0 x\n", Extrapolation::Fail).unwrap_err();
        assert!(matches!(err, RadiationError::MalformedInput { line: 2, .. }));
        let err = parse_spectral_table("2.0 0.5\n1.0 0.4\n", Extrapolation::Fail).unwrap_err();
        assert!(matches!(err, RadiationError::Domain(_)));
    }
}
