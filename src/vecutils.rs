//! Vector utility functions like max_abs(), rms_difference(), almost_equal()

/// Largest absolute value in `vec` (0 for an empty slice).
pub fn max_abs(vec: &[f64]) -> f64 {
    vec.iter().fold(0.0, |acc, x| acc.max(x.abs()))
}

/// Root-mean-square of the element-wise difference of two equally long slices.
///
/// Returns 0 for empty input.
pub fn rms_difference(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len(), "rms_difference() requires equal lengths");
    if a.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum();
    (sum_sq / a.len() as f64).sqrt()
}

/// Checks if two arrays or vectors are almost equal.
///
/// Elements in both containers must be in the same order.
pub fn almost_equal(a: &[f64], b: &[f64], eps: f64) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).all(|(&x, &y)| (x - y).abs() <= eps)
}

/// Composite trapezoidal rule over samples `y` taken at abscissae `x`.
pub fn trapezoid(x: &[f64], y: &[f64]) -> f64 {
    assert_eq!(x.len(), y.len(), "trapezoid() requires equal lengths");
    x.windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| 0.5 * (xs[1] - xs[0]) * (ys[0] + ys[1]))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_abs() {
        assert_eq!(max_abs(&[1.0, -3.0, 2.0]), 3.0);
        assert_eq!(max_abs(&[]), 0.0);
    }

    #[test]
    fn test_rms_difference() {
        assert_eq!(rms_difference(&[], &[]), 0.0);
        assert_eq!(rms_difference(&[1.0, 2.0], &[1.0, 2.0]), 0.0);
        // diffs 3 and 4 -> sqrt((9 + 16) / 2)
        let rms = rms_difference(&[3.0, 0.0], &[0.0, 4.0]);
        assert!((rms - 12.5_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_almost_equal() {
        assert!(almost_equal(&[1.0, 2.0], &[1.0, 2.0 + 1e-9], 1e-6));
        assert!(!almost_equal(&[1.0, 2.0], &[1.0, 2.1], 1e-6));
        assert!(!almost_equal(&[1.0], &[1.0, 2.0], 1e-6));
    }

    #[test]
    fn test_trapezoid() {
        // Exact for a linear function.
        let x = [0.0, 0.5, 1.5, 2.0];
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 1.0).collect();
        assert!((trapezoid(&x, &y) - 6.0).abs() < 1e-12);
        assert_eq!(trapezoid(&[1.0], &[5.0]), 0.0);
    }
}
