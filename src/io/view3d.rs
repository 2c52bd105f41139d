//! Reader for View3D view-factor output.
//!
//! Layout after blank lines are dropped:
//!
//! ```text
//! <header>
//! A_1 ... A_N
//! F_11 ... F_1N
//! ...
//! F_N1 ... F_NN
//! eps_1 ... eps_N
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use ndarray::{Array1, Array2};

use crate::error::RadiationError;
use crate::sim::view_factors::Enclosure;

/// Field separator of a View3D text file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    /// Any run of whitespace.
    #[default]
    Whitespace,
    /// A single character; fields are trimmed.
    Char(char),
}

impl Delimiter {
    fn split<'a>(&self, line: &'a str) -> Vec<&'a str> {
        match *self {
            Self::Whitespace => line.split_whitespace().collect(),
            Self::Char(c) => line.trim().split(c).map(str::trim).collect(),
        }
    }
}

/// Parses one line of numbers; `line` is the 1-based source line number.
fn parse_row(text: &str, line: usize, delimiter: Delimiter) -> crate::Result<Vec<f64>> {
    delimiter
        .split(text)
        .into_iter()
        .enumerate()
        .map(|(col, field)| {
            field.parse::<f64>().map_err(|_| {
                RadiationError::malformed(line, format!("column {}: cannot parse {field:?}", col + 1))
            })
        })
        .collect()
}

/// Parses View3D output text into a validated [`Enclosure`].
///
/// Layout problems give [`RadiationError::MalformedInput`] with the 1-based
/// line number; out-of-range values give [`RadiationError::Domain`].
pub fn parse_view3d(text: &str, delimiter: Delimiter) -> crate::Result<Enclosure> {
    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(i, l)| (i + 1, l))
        .collect();
    if lines.len() < 4 {
        let last = lines.last().map_or(0, |l| l.0);
        return Err(RadiationError::malformed(
            last,
            format!("expected header, areas, view factors and emissivities; found {} lines", lines.len()),
        ));
    }

    let (areas_line, areas_text) = lines[1];
    let areas = parse_row(areas_text, areas_line, delimiter)?;
    let n = areas.len();

    let rows = &lines[2..lines.len() - 1];
    if rows.len() != n {
        let line = rows.first().map_or(areas_line, |r| r.0);
        return Err(RadiationError::malformed(
            line,
            format!("{n} areas but {} view-factor rows", rows.len()),
        ));
    }
    let mut view_factors = Array2::zeros((n, n));
    for (i, &(line, row_text)) in rows.iter().enumerate() {
        let row = parse_row(row_text, line, delimiter)?;
        if row.len() != n {
            return Err(RadiationError::malformed(
                line,
                format!("expected {n} view factors, found {}", row.len()),
            ));
        }
        view_factors.row_mut(i).assign(&Array1::from(row));
    }

    let (eps_line, eps_text) = lines[lines.len() - 1];
    let emissivity = parse_row(eps_text, eps_line, delimiter)?;
    if emissivity.len() != n {
        return Err(RadiationError::malformed(
            eps_line,
            format!("expected {n} emissivities, found {}", emissivity.len()),
        ));
    }

    Enclosure::new(Array1::from(areas), view_factors, Array1::from(emissivity))
}

/// Reads a View3D output file.
pub fn read_view3d(path: &Path, delimiter: Delimiter) -> Result<Enclosure> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to open view-factor file: {}", path.display()))?;
    let enclosure = parse_view3d(&text, delimiter)
        .with_context(|| format!("Invalid view-factor file: {}", path.display()))?;
    Ok(enclosure)
}
