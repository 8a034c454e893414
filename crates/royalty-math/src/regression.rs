//! Ordinary least squares line fitting.
//!
//! Fits `y = intercept + slope * x` by minimising squared residuals. The fit
//! is computed on mean-centred data, which keeps the sums well conditioned
//! when `x` holds calendar years (values around 2000 with small spread).

use crate::error::{MathError, MathResult};

/// Threshold below which the spread of `x` is treated as zero.
const DEGENERATE_SXX: f64 = 1e-12;

/// A fitted straight line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    /// Value of the line at `x = 0`.
    pub intercept: f64,
    /// Change in `y` per unit of `x`.
    pub slope: f64,
}

impl LinearFit {
    /// Evaluates the fitted line at `x`.
    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Fits a least-squares line through `(x[i], y[i])`.
///
/// A single point, or points sharing one `x`, produce a flat line through
/// the mean of `y` (slope 0). This matches what a regression library returns
/// for a rank-deficient design.
///
/// # Errors
///
/// - [`MathError::LengthMismatch`] if the slices differ in length
/// - [`MathError::InsufficientData`] if no points are supplied
/// - [`MathError::InvalidInput`] if any value is not finite
///
/// # Example
///
/// ```rust
/// use royalty_math::regression::fit_linear;
///
/// let years = [2019.0, 2020.0, 2021.0];
/// let amounts = [1000.0, 1100.0, 1200.0];
///
/// let fit = fit_linear(&years, &amounts).unwrap();
/// assert!((fit.slope - 100.0).abs() < 1e-9);
/// assert!((fit.predict(2022.0) - 1300.0).abs() < 1e-6);
/// ```
pub fn fit_linear(x: &[f64], y: &[f64]) -> MathResult<LinearFit> {
    if x.len() != y.len() {
        return Err(MathError::LengthMismatch {
            x_len: x.len(),
            y_len: y.len(),
        });
    }
    if x.is_empty() {
        return Err(MathError::insufficient_data(1, 0));
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(MathError::invalid_input("regression input contains a non-finite value"));
    }

    let n = x.len() as f64;
    let x_mean = x.iter().sum::<f64>() / n;
    let y_mean = y.iter().sum::<f64>() / n;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - x_mean;
        sxy += dx * (yi - y_mean);
        sxx += dx * dx;
    }

    let slope = if sxx < DEGENERATE_SXX { 0.0 } else { sxy / sxx };

    Ok(LinearFit {
        intercept: y_mean - slope * x_mean,
        slope,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_exact_line() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [5.0, 7.0, 9.0, 11.0];

        let fit = fit_linear(&x, &y).unwrap();

        assert_relative_eq!(fit.slope, 2.0, epsilon = 1e-12);
        assert_relative_eq!(fit.intercept, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_calendar_years() {
        // Declining payouts, 500 per year
        let x = [2019.0, 2020.0, 2021.0, 2022.0];
        let y = [10_000.0, 9_500.0, 9_000.0, 8_500.0];

        let fit = fit_linear(&x, &y).unwrap();

        assert_relative_eq!(fit.slope, -500.0, epsilon = 1e-9);
        assert_relative_eq!(fit.predict(2023.0), 8_000.0, epsilon = 1e-6);
        assert_relative_eq!(fit.predict(2025.0), 7_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_noisy_fit() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 5.0, 4.0, 5.0];

        let fit = fit_linear(&x, &y).unwrap();

        assert_relative_eq!(fit.slope, 0.6, epsilon = 1e-12);
        assert_relative_eq!(fit.intercept, 2.2, epsilon = 1e-12);
    }

    #[test]
    fn test_single_point_is_flat() {
        let fit = fit_linear(&[3.0], &[42.0]).unwrap();

        assert_eq!(fit.slope, 0.0);
        assert_relative_eq!(fit.predict(10.0), 42.0);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            fit_linear(&[1.0, 2.0], &[1.0]),
            Err(MathError::LengthMismatch { x_len: 2, y_len: 1 })
        ));
        assert!(matches!(
            fit_linear(&[], &[]),
            Err(MathError::InsufficientData { .. })
        ));
        assert!(matches!(
            fit_linear(&[1.0, 2.0], &[1.0, f64::NAN]),
            Err(MathError::InvalidInput { .. })
        ));
    }
}
