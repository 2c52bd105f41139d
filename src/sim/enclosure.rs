//! Net-radiation (radiosity) method for enclosures of diffuse-gray surfaces.
//!
//! Physics:
//! - Radiosity balance: `J_i = eps_i Eb_i + (1 − eps_i) sum_j F_ij J_j`
//! - Surface resistance form: `q_i = (Eb_i − J_i) / ((1 − eps_i) / eps_i)`
//! - Space resistance form, valid for black surfaces: `q_i = J_i − sum_j F_ij J_j`

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Zip};
use serde::Serialize;
use tracing::debug;

use crate::error::{RadiationError, Result};
use crate::numeric::{Integrator, LinearSolver, Minimizer};
use crate::sim::blackbody::Blackbody;
use crate::sim::view_factors::Enclosure;

fn check_square(fij: &ArrayView2<f64>, n: usize) -> Result<()> {
    if fij.dim() != (n, n) {
        return Err(RadiationError::domain(format!(
            "view-factor matrix is {:?}, expected ({n}, {n})",
            fij.dim()
        )));
    }
    Ok(())
}

/// Coefficient matrix of the radiosity system `F J = Eb`.
///
/// `F[i][j] = Fij[i][j] (eps_i − 1) / eps_i`, plus `1 / eps_i` on the diagonal.
pub fn exchange_matrix(fij: ArrayView2<f64>, eps: ArrayView1<f64>) -> Result<Array2<f64>> {
    let n = eps.len();
    check_square(&fij, n)?;
    if let Some((i, e)) = eps
        .iter()
        .enumerate()
        .find(|(_, e)| !(**e > 0.0 && **e <= 1.0))
    {
        return Err(RadiationError::domain(format!(
            "emissivity of surface {i} must be in (0, 1], got {e}"
        )));
    }

    let mut f = Array2::zeros((n, n));
    for i in 0..n {
        let e = eps[i];
        for j in 0..n {
            f[[i, j]] = fij[[i, j]] * (e - 1.0) / e;
        }
        f[[i, i]] += 1.0 / e;
    }
    Ok(f)
}

/// Solves `F J = Eb` for the surface radiosities.
pub fn solve_radiosity<S>(
    f: &Array2<f64>,
    emissive_power: &Array1<f64>,
    solver: &S,
) -> Result<Array1<f64>>
where
    S: LinearSolver + ?Sized,
{
    if f.dim() != (emissive_power.len(), emissive_power.len()) {
        return Err(RadiationError::domain(format!(
            "exchange matrix is {:?} for {} emissive powers",
            f.dim(),
            emissive_power.len()
        )));
    }
    solver.solve_vector(f, emissive_power)
}

/// Net radiative flux leaving each gray surface [W/m²].
///
/// Black surfaces (`eps = 1`) have no surface resistance and are rejected;
/// use [`net_radiative_flux`] for them.
pub fn surface_heat_flux(
    radiosity: ArrayView1<f64>,
    emissive_power: ArrayView1<f64>,
    eps: ArrayView1<f64>,
) -> Result<Array1<f64>> {
    let n = eps.len();
    if radiosity.len() != n || emissive_power.len() != n {
        return Err(RadiationError::domain(format!(
            "length mismatch: {} radiosities, {} emissive powers, {n} emissivities",
            radiosity.len(),
            emissive_power.len()
        )));
    }
    let mut q = Array1::zeros(n);
    for i in 0..n {
        let e = eps[i];
        if !(e > 0.0 && e < 1.0) {
            return Err(RadiationError::domain(format!(
                "surface resistance undefined for emissivity {e} of surface {i}"
            )));
        }
        q[i] = (emissive_power[i] - radiosity[i]) / ((1.0 - e) / e);
    }
    Ok(q)
}

/// Net radiative flux from the radiosity balance, `q_i = J_i − sum_j F_ij J_j`.
pub fn net_radiative_flux(fij: ArrayView2<f64>, radiosity: ArrayView1<f64>) -> Result<Array1<f64>> {
    check_square(&fij, radiosity.len())?;
    Ok(&radiosity - &fij.dot(&radiosity))
}

/// Per-surface result of the net-radiation method.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnclosureSolution {
    /// Blackbody emissive power [W/m²].
    pub emissive_power: Vec<f64>,
    /// Radiosity [W/m²].
    pub radiosity: Vec<f64>,
    /// Net radiative flux leaving the surface [W/m²].
    pub heat_flux: Vec<f64>,
    /// Net radiative heat rate leaving the surface [W].
    pub heat_rate: Vec<f64>,
}

/// Radiosities and net fluxes of an enclosure at given surface temperatures.
///
/// Gray surfaces use the surface-resistance form; black surfaces fall back to
/// the radiosity balance.
pub fn solve_enclosure<I, M, S>(
    enclosure: &Enclosure,
    temperatures: &[f64],
    blackbody: &Blackbody<I, M>,
    solver: &S,
) -> Result<EnclosureSolution>
where
    I: Integrator,
    M: Minimizer,
    S: LinearSolver + ?Sized,
{
    let n = enclosure.len();
    if temperatures.len() != n {
        return Err(RadiationError::domain(format!(
            "{} temperatures for {n} surfaces",
            temperatures.len()
        )));
    }

    let eb = blackbody.emissive_powers(temperatures)?;
    let f = exchange_matrix(enclosure.view_factors(), enclosure.emissivity())?;
    let j = solve_radiosity(&f, &eb, solver)?;

    let eps = enclosure.emissivity();
    let balance = net_radiative_flux(enclosure.view_factors(), j.view())?;
    let mut q = Array1::zeros(n);
    Zip::indexed(&mut q).for_each(|i, q| {
        *q = if eps[i] < 1.0 {
            (eb[i] - j[i]) / ((1.0 - eps[i]) / eps[i])
        } else {
            balance[i]
        };
    });
    let heat_rate = &q * &enclosure.areas();
    debug!(surfaces = n, net = heat_rate.sum(), "enclosure solved");

    Ok(EnclosureSolution {
        emissive_power: eb.to_vec(),
        radiosity: j.to_vec(),
        heat_flux: q.to_vec(),
        heat_rate: heat_rate.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::DenseLu;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_exchange_matrix() {
        let fij = array![[0.0, 1.0], [1.0, 0.0]];
        let eps = array![0.5, 0.8];
        let f = exchange_matrix(fij.view(), eps.view()).unwrap();
        assert_relative_eq!(f[[0, 0]], 2.0);
        assert_relative_eq!(f[[0, 1]], -1.0);
        assert_relative_eq!(f[[1, 0]], -0.25, epsilon = 1e-12);
        assert_relative_eq!(f[[1, 1]], 1.25);
    }

    #[test]
    fn test_exchange_matrix_rejects_zero_emissivity() {
        let fij = array![[0.0, 1.0], [1.0, 0.0]];
        let r = exchange_matrix(fij.view(), array![0.0, 0.8].view());
        assert!(matches!(r, Err(RadiationError::Domain(_))));
        let r = exchange_matrix(fij.view(), array![0.5].view());
        assert!(matches!(r, Err(RadiationError::Domain(_))));
    }

    #[test]
    fn test_exchange_matrix_rejects_emissivity_outside_unit_interval() {
        let fij = array![[0.0, 1.0], [1.0, 0.0]];
        for eps in [array![1.5, 0.5], array![0.5, -0.5], array![f64::NAN, 0.5]] {
            let r = exchange_matrix(fij.view(), eps.view());
            assert!(matches!(r, Err(RadiationError::Domain(_))), "accepted {eps}");
        }
        assert!(exchange_matrix(fij.view(), array![1.0, 0.5].view()).is_ok());
    }

    #[test]
    fn test_black_surfaces_radiate_as_blackbodies() {
        let fij = array![[0.0, 0.5, 0.5], [0.5, 0.0, 0.5], [0.5, 0.5, 0.0]];
        let f = exchange_matrix(fij.view(), array![1.0, 1.0, 1.0].view()).unwrap();
        let eb = array![100.0, 200.0, 300.0];
        let j = solve_radiosity(&f, &eb, &DenseLu::default()).unwrap();
        for i in 0..3 {
            assert_relative_eq!(j[i], eb[i], max_relative = 1e-12);
        }
    }

    #[test]
    fn test_parallel_plates() {
        // q = (Eb1 − Eb2) / (1/eps1 + 1/eps2 − 1)
        let fij = array![[0.0, 1.0], [1.0, 0.0]];
        let eps = array![0.8, 0.5];
        let eb = array![1000.0, 200.0];
        let f = exchange_matrix(fij.view(), eps.view()).unwrap();
        let j = solve_radiosity(&f, &eb, &DenseLu::default()).unwrap();
        let q = surface_heat_flux(j.view(), eb.view(), eps.view()).unwrap();
        let expected = 800.0 / (1.0 / 0.8 + 1.0 / 0.5 - 1.0);
        assert_relative_eq!(q[0], expected, max_relative = 1e-10);
        assert_relative_eq!(q[1], -expected, max_relative = 1e-10);

        let q_balance = net_radiative_flux(fij.view(), j.view()).unwrap();
        assert_relative_eq!(q_balance[0], expected, max_relative = 1e-10);
    }

    #[test]
    fn test_surface_heat_flux_rejects_black_surface() {
        let r = surface_heat_flux(
            array![1.0, 2.0].view(),
            array![1.0, 2.0].view(),
            array![0.5, 1.0].view(),
        );
        assert!(matches!(r, Err(RadiationError::Domain(_))));
    }

    #[test]
    fn test_solve_enclosure_mixed_black_and_gray() {
        let fij = array![[0.0, 1.0], [1.0, 0.0]];
        let enclosure = Enclosure::new(array![1.0, 1.0], fij, array![1.0, 0.5]).unwrap();
        let bb = Blackbody::default();
        let s = solve_enclosure(&enclosure, &[600.0, 300.0], &bb, &DenseLu::default()).unwrap();

        let sigma = bb.constants().stefan_boltzmann;
        let expected = sigma * (600.0_f64.powi(4) - 300.0_f64.powi(4)) / (1.0 + 2.0 - 1.0);
        assert_relative_eq!(s.heat_flux[0], expected, max_relative = 1e-6);
        assert_relative_eq!(s.heat_flux[1], -expected, max_relative = 1e-6);
        assert_relative_eq!(s.heat_rate[0] + s.heat_rate[1], 0.0, epsilon = 1e-6);
        assert_relative_eq!(s.radiosity[0], s.emissive_power[0], max_relative = 1e-12);
    }

    #[test]
    fn test_solve_enclosure_length_mismatch() {
        let fij = array![[0.0, 1.0], [1.0, 0.0]];
        let enclosure = Enclosure::new(array![1.0, 1.0], fij, array![0.9, 0.5]).unwrap();
        let r = solve_enclosure(&enclosure, &[600.0], &Blackbody::default(), &DenseLu::default());
        assert!(r.is_err());
    }
}
