//! Root-finding algorithms.
//!
//! - [`newton_raphson`]: Quadratic convergence when a derivative is available
//! - [`bisection`]: Slow but guaranteed on a valid bracket
//! - [`hybrid`]: Newton-Raphson first, bisection when Newton misbehaves
//!
//! # Example: Discount rate of an annuity
//!
//! ```rust
//! use royalty_math::solvers::{hybrid_numerical, SolverConfig};
//!
//! // Three payments of 1000 bought for 2500
//! let npv = |r: f64| (1..=3).map(|i| 1000.0 / (1.0 + r).powi(i)).sum::<f64>() - 2500.0;
//!
//! let result = hybrid_numerical(npv, 0.10, Some((-0.5, 1.0)), &SolverConfig::default()).unwrap();
//! assert!(npv(result.root).abs() < 1e-8);
//! assert!(result.root > 0.09 && result.root < 0.10);
//! ```

mod bisection;
mod hybrid;
mod newton;

pub use bisection::bisection;
pub use hybrid::{hybrid, hybrid_numerical};
pub use newton::{newton_raphson, newton_raphson_numerical};

/// Default tolerance for root-finding algorithms.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Default maximum iterations for root-finding algorithms.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Step used for central-difference derivatives.
pub(crate) const NUMERICAL_STEP: f64 = 1e-7;

/// Configuration for root-finding algorithms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Tolerance on both the residual and the step size.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Result of a successful root search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverResult {
    /// The root found.
    pub root: f64,
    /// Number of iterations used.
    pub iterations: u32,
    /// Function value at the root.
    pub residual: f64,
}

/// Central-difference derivative of `f` at `x`.
pub(crate) fn central_difference<F>(f: &F, x: f64) -> f64
where
    F: Fn(f64) -> f64,
{
    (f(x + NUMERICAL_STEP) - f(x - NUMERICAL_STEP)) / (2.0 * NUMERICAL_STEP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Present value of a level payment stream minus a price.
    fn annuity_npv(payment: f64, periods: i32, price: f64) -> impl Fn(f64) -> f64 {
        move |r: f64| (1..=periods).map(|i| payment / (1.0 + r).powi(i)).sum::<f64>() - price
    }

    #[test]
    fn test_solver_config() {
        let config = SolverConfig::default()
            .with_tolerance(1e-8)
            .with_max_iterations(50);

        assert!((config.tolerance - 1e-8).abs() < f64::EPSILON);
        assert_eq!(config.max_iterations, 50);
    }

    #[test]
    fn test_all_solvers_agree_on_discount_rate() {
        let f = annuity_npv(1_200.0, 5, 4_500.0);
        let config = SolverConfig::default();

        let newton = newton_raphson_numerical(&f, 0.10, &config).unwrap();
        let bisect = bisection(&f, 0.0, 0.5, &config).unwrap();
        let combined = hybrid_numerical(&f, 0.10, Some((0.0, 0.5)), &config).unwrap();

        assert_relative_eq!(newton.root, bisect.root, epsilon = 1e-8);
        assert_relative_eq!(newton.root, combined.root, epsilon = 1e-8);
    }

    #[test]
    fn test_price_at_par_of_undiscounted_sum() {
        // Paying exactly the undiscounted total implies a zero rate
        let f = annuity_npv(1_000.0, 4, 4_000.0);

        let result = hybrid_numerical(&f, 0.10, None, &SolverConfig::default()).unwrap();

        assert_relative_eq!(result.root, 0.0, epsilon = 1e-8);
    }

    #[test]
    fn test_central_difference() {
        let f = |x: f64| x * x * x;
        assert_relative_eq!(central_difference(&f, 2.0), 12.0, epsilon = 1e-5);
    }
}
