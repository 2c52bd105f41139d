use approx::assert_relative_eq;
use radiant::numeric::{AdaptiveGaussKronrod, BoundedBrent, Extrapolation, SpectralCurve};
use radiant::{Blackbody, PhysicalConstants, RadiationError};

#[test]
fn test_total_emissive_power_follows_t4() {
    let bb = Blackbody::default();
    let sigma = bb.constants().stefan_boltzmann;
    for t in [100.0, 273.15, 1500.0, 3000.0] {
        let q = bb.total_emissive_power(t).unwrap();
        assert_relative_eq!(q.value, sigma * t.powi(4), max_relative = 1e-2);
    }
}

#[test]
fn test_total_emissive_power_at_extreme_temperatures() {
    let bb = Blackbody::default();
    let sigma = bb.constants().stefan_boltzmann;
    for t in [0.5, 1.0, 5.0, 1e6] {
        let q = bb.total_emissive_power(t).unwrap();
        assert_relative_eq!(q.value / (sigma * t.powi(4)), 1.0, max_relative = 1e-2);
    }
}

#[test]
fn test_fraction_function_reaches_one_for_large_wavelengths() {
    let bb = Blackbody::default();
    let mut previous = 0.0;
    for lambda in [1.0, 3.0, 10.0, 1e2, 1e4, 1e6, 1e8, 1e12, 1e100, 1e300] {
        let f = bb.fraction_function(lambda, 1000.0).unwrap();
        assert!(f >= previous, "f({lambda}) = {f} < {previous}");
        previous = f;
    }
    for lambda in [1e4, 1e8, 1e12, 1e300] {
        let f = bb.fraction_function(lambda, 1000.0).unwrap();
        assert_relative_eq!(f, 1.0, epsilon = 1e-8);
    }
    // Low temperature: the band ends far below the peak.
    let f = bb.fraction_function(100.0, 1.0).unwrap();
    assert!(f < 1e-9, "f = {f}");
    assert_relative_eq!(bb.fraction_function(1e8, 1.0).unwrap(), 1.0, epsilon = 1e-8);
}

#[test]
fn test_fraction_function_is_a_function_of_lambda_t() {
    let bb = Blackbody::default();
    let a = bb.fraction_function(2.0, 1500.0).unwrap();
    let b = bb.fraction_function(1.0, 3000.0).unwrap();
    assert_relative_eq!(a, b, epsilon = 1e-7);
}

#[test]
fn test_band_tail_and_total() {
    let bb = Blackbody::default();
    let total = bb.total_emissive_power(1200.0).unwrap();
    let band = bb.band_emissive_power(3.0, 1200.0).unwrap();
    let f = bb.fraction_function(3.0, 1200.0).unwrap();
    assert_relative_eq!(band.value, f * total.value, max_relative = 1e-9);
    assert!(band.value < total.value);
}

#[test]
fn test_injected_services() {
    let integrator = AdaptiveGaussKronrod {
        max_subdivisions: 0,
        ..Default::default()
    };
    let bb = Blackbody::with_services(PhysicalConstants::codata(), integrator, BoundedBrent::default());
    assert!(matches!(
        bb.total_emissive_power(300.0),
        Err(RadiationError::Integration { .. })
    ));
}

#[test]
fn test_glass_greenhouse_effect() {
    // Glass passes most solar radiation but little from a 300 K room.
    let glass = SpectralCurve::new(
        &[(0.3, 0.0), (0.35, 0.92), (2.5, 0.92), (2.7, 0.0), (100.0, 0.0)],
        Extrapolation::Clamp,
    )
    .unwrap();
    let bb = Blackbody::default();
    let solar = bb.effective_band_absorptivity(0.2, 100.0, 5800.0, &glass, 0.005).unwrap();
    let room = bb.effective_band_absorptivity(0.2, 100.0, 300.0, &glass, 0.005).unwrap();
    assert!(solar.effective > 0.75, "solar {}", solar.effective);
    assert!(room.effective < 0.01, "room {}", room.effective);
}
