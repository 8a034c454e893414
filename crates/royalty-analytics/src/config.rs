//! Analysis configuration.
//!
//! Everything here has a default, so an empty TOML document is a valid
//! configuration:
//!
//! ```toml
//! discount_rates = [0.10, 0.125, 0.15]
//!
//! [solver]
//! initial_guess = 0.10
//! tolerance = 1e-10
//! max_iterations = 100
//! ```

use royalty_math::solvers::{SolverConfig, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::valuation::{discount_rates, DiscountRate, DEFAULT_DISCOUNT_RATES};

/// Settings for the implied return solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverSettings {
    /// Starting rate for Newton-Raphson.
    #[serde(default = "default_initial_guess")]
    pub initial_guess: f64,

    /// Convergence tolerance.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Iteration cap.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
}

fn default_initial_guess() -> f64 {
    0.10
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

fn default_max_iterations() -> u32 {
    DEFAULT_MAX_ITERATIONS
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            initial_guess: default_initial_guess(),
            tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
        }
    }
}

impl SolverSettings {
    /// Checks the settings are usable.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::InvalidSolverSettings`] for a non-positive
    /// tolerance, a zero iteration cap, or a guess at or below -100%.
    pub fn validate(&self) -> AnalyticsResult<()> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(AnalyticsError::solver_settings(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(AnalyticsError::solver_settings("max_iterations must be at least 1"));
        }
        if !(self.initial_guess.is_finite() && self.initial_guess > -1.0) {
            return Err(AnalyticsError::solver_settings(format!(
                "initial_guess must be above -1, got {}",
                self.initial_guess
            )));
        }
        Ok(())
    }

    /// The generic solver configuration these settings map to.
    #[must_use]
    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig::new(self.tolerance, self.max_iterations)
    }
}

/// Parameters of a deal analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Discount rates to value the forecast at, as decimal fractions.
    #[serde(default = "default_discount_rates")]
    pub discount_rates: Vec<f64>,

    /// Implied return solver settings.
    #[serde(default)]
    pub solver: SolverSettings,
}

fn default_discount_rates() -> Vec<f64> {
    DEFAULT_DISCOUNT_RATES.to_vec()
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            discount_rates: default_discount_rates(),
            solver: SolverSettings::default(),
        }
    }
}

impl AnalysisConfig {
    /// Parses a TOML document. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::InvalidConfig`] if the document is not valid
    /// TOML or has values of the wrong type.
    pub fn from_toml_str(content: &str) -> AnalyticsResult<Self> {
        toml::from_str(content).map_err(|e| AnalyticsError::InvalidConfig(e.to_string()))
    }

    /// Replaces the discount rates.
    #[must_use]
    pub fn with_discount_rates(mut self, rates: impl Into<Vec<f64>>) -> Self {
        self.discount_rates = rates.into();
        self
    }

    /// Validates the configuration and returns the deduplicated rates.
    ///
    /// # Errors
    ///
    /// Returns a config-kind [`AnalyticsError`] for an empty or invalid rate
    /// set or unusable solver settings.
    pub fn validate(&self) -> AnalyticsResult<Vec<DiscountRate>> {
        let rates = discount_rates(&self.discount_rates)?;
        self.solver.validate()?;
        Ok(rates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_empty_document_is_default() {
        let config = AnalysisConfig::from_toml_str("").unwrap();
        assert_eq!(config, AnalysisConfig::default());
        assert_eq!(config.discount_rates, vec![0.10, 0.125, 0.15]);
        assert_eq!(config.solver.max_iterations, 100);
    }

    #[test]
    fn test_partial_document() {
        let config = AnalysisConfig::from_toml_str(
            r#"
            discount_rates = [0.08]

            [solver]
            max_iterations = 50
            "#,
        )
        .unwrap();

        assert_eq!(config.discount_rates, vec![0.08]);
        assert_eq!(config.solver.max_iterations, 50);
        assert_eq!(config.solver.initial_guess, 0.10);
    }

    #[test]
    fn test_malformed_document() {
        let err = AnalysisConfig::from_toml_str("discount_rates = \"ten\"").unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidConfig(_)));
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_validate() {
        let rates = AnalysisConfig::default().validate().unwrap();
        let keys: Vec<String> = rates.iter().map(|r| r.key()).collect();
        assert_eq!(keys, ["10%", "12.5%", "15%"]);

        let empty = AnalysisConfig::default().with_discount_rates(Vec::new());
        assert_eq!(empty.validate(), Err(AnalyticsError::EmptyDiscountRates));

        let mut bad_solver = AnalysisConfig::default();
        bad_solver.solver.max_iterations = 0;
        assert_eq!(bad_solver.validate().unwrap_err().kind(), ErrorKind::Config);

        bad_solver.solver = SolverSettings {
            tolerance: -1.0,
            ..SolverSettings::default()
        };
        assert!(bad_solver.validate().is_err());
    }
}
