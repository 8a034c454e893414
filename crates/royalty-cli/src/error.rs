//! CLI error types.

use std::path::PathBuf;

use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// A row of the earnings CSV could not be read.
    #[error("Invalid earnings row {row} in {path}: {reason}")]
    InvalidEarningsRow {
        /// Earnings file.
        path: PathBuf,
        /// 1-based data row number.
        row: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// Neither the listed earnings file nor an archived copy exists.
    #[error("Earnings file not found: {} (also tried {})", listed.display(), join_paths(tried))]
    EarningsNotFound {
        /// Path given in the listing file.
        listed: PathBuf,
        /// `<listing_id>_earnings.csv` candidates that were checked.
        tried: Vec<PathBuf>,
    },

    /// The listing-data file is malformed.
    #[error("Invalid listing file {path}, line {line}: {reason}")]
    InvalidListing {
        /// Listing file.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// Invalid price.
    #[error("Invalid {name}: {value}. Must be zero (unknown) or positive.")]
    InvalidPrice {
        /// Which price.
        name: &'static str,
        /// Value given.
        value: f64,
    },
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
