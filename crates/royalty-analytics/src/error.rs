//! Error types for the analytics engine.
//!
//! Every variant has an [`ErrorKind`]. Data and config errors are reported
//! to the caller before any forecasting happens. Convergence failures are
//! recovered internally: the implied return degrades to "not computable".
//! Numerical and export failures surface from the routines that raise them.

use thiserror::Error;

/// Broad classification of an [`AnalyticsError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The earnings history cannot support the analysis.
    Data,
    /// The analysis parameters are invalid.
    Config,
    /// An iterative solver did not converge.
    Convergence,
    /// A numerical routine rejected its input.
    Numerical,
    /// Writing the summary failed.
    Export,
}

/// Unified error type for all analytics operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    // ========== Data Errors ==========
    /// No earnings records were supplied.
    #[error("no earnings records supplied")]
    NoEarnings,

    /// Not enough distinct years to fit a trend.
    #[error("need at least {required} distinct years of earnings, got {actual}")]
    InsufficientYears {
        /// Minimum number of distinct years.
        required: usize,
        /// Distinct years found.
        actual: usize,
    },

    /// An earnings amount is NaN or infinite.
    #[error("earnings amount for {year} is not a finite number")]
    NonFiniteAmount {
        /// Year of the offending record.
        year: i32,
    },

    /// A zero annual total makes the following year-over-year change undefined.
    #[error("annual total for {year} is zero; year-over-year change into {next_year} is undefined")]
    ZeroPriorYear {
        /// Year with a zero total.
        year: i32,
        /// Year whose change could not be computed.
        next_year: i32,
    },

    /// The exponential model needs at least one positive annual total.
    #[error("exponential decay fit requires at least one positive annual total")]
    NoPositiveEarnings,

    // ========== Config Errors ==========
    /// Forecast horizon must be at least one year.
    #[error("years remaining must be positive")]
    ZeroYearsRemaining,

    /// At least one discount rate is required.
    #[error("discount rate set is empty")]
    EmptyDiscountRates,

    /// Discount rates must be finite and positive.
    #[error("invalid discount rate {0}: must be finite and positive")]
    InvalidDiscountRate(f64),

    /// Implied return solver settings are unusable.
    #[error("invalid solver settings: {0}")]
    InvalidSolverSettings(String),

    /// Configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ========== Convergence Errors ==========
    /// Implied return solver did not converge.
    #[error("implied return solver failed to converge: {0}")]
    ConvergenceFailed(String),

    // ========== General Errors ==========
    /// Numerical routine failed on otherwise valid input.
    #[error("math error: {0}")]
    MathError(String),

    /// Summary export failed.
    #[error("export failed: {0}")]
    Export(String),
}

/// Result type alias for analytics operations.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

impl AnalyticsError {
    /// Returns the kind of failure this error represents.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoEarnings
            | Self::InsufficientYears { .. }
            | Self::NonFiniteAmount { .. }
            | Self::ZeroPriorYear { .. }
            | Self::NoPositiveEarnings => ErrorKind::Data,
            Self::ZeroYearsRemaining
            | Self::EmptyDiscountRates
            | Self::InvalidDiscountRate(_)
            | Self::InvalidSolverSettings(_)
            | Self::InvalidConfig(_) => ErrorKind::Config,
            Self::ConvergenceFailed(_) => ErrorKind::Convergence,
            Self::MathError(_) => ErrorKind::Numerical,
            Self::Export(_) => ErrorKind::Export,
        }
    }

    /// Creates an invalid solver settings error.
    #[must_use]
    pub fn solver_settings(reason: impl Into<String>) -> Self {
        Self::InvalidSolverSettings(reason.into())
    }
}

impl From<royalty_math::MathError> for AnalyticsError {
    fn from(err: royalty_math::MathError) -> Self {
        if err.is_convergence_failure() {
            AnalyticsError::ConvergenceFailed(err.to_string())
        } else {
            AnalyticsError::MathError(err.to_string())
        }
    }
}

impl From<csv::Error> for AnalyticsError {
    fn from(err: csv::Error) -> Self {
        AnalyticsError::Export(err.to_string())
    }
}

impl From<std::io::Error> for AnalyticsError {
    fn from(err: std::io::Error) -> Self {
        AnalyticsError::Export(err.to_string())
    }
}
