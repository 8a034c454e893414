//! Trend estimation over annual totals.
//!
//! - Linear least-squares fit of amount against calendar year
//! - Volatility: population standard deviation of year-over-year change,
//!   each change clipped to `[-1, 1]` so a single outlier year cannot dominate
//! - CAGR between the first and last observed totals

use log::debug;
use royalty_math::regression::{fit_linear, LinearFit};
use royalty_math::statistics::{clip, population_std_dev};
use serde::Serialize;

use crate::earnings::AnnualEarnings;
use crate::error::{AnalyticsError, AnalyticsResult};

/// Bound applied to each relative year-over-year change.
pub const CHANGE_CLIP: f64 = 1.0;

/// Summary of the historical earnings trend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendEstimate {
    /// Regression intercept (amount at year 0).
    pub intercept: f64,
    /// Regression slope, currency units per year.
    pub slope: f64,
    /// Population standard deviation of clipped year-over-year change.
    pub volatility: f64,
    /// Compound annual growth rate, first to last year.
    pub cagr: f64,
}

impl TrendEstimate {
    /// The fitted line.
    #[must_use]
    pub fn line(&self) -> LinearFit {
        LinearFit {
            intercept: self.intercept,
            slope: self.slope,
        }
    }
}

/// Fits the trend line and computes volatility and CAGR.
///
/// # Errors
///
/// Returns [`AnalyticsError::ZeroPriorYear`] if a year other than the last
/// has a zero total.
pub fn estimate_trend(annual: &AnnualEarnings) -> AnalyticsResult<TrendEstimate> {
    let line = fit_linear(&annual.years(), &annual.amounts())?;
    let volatility = volatility(annual)?;
    let cagr = cagr(annual);

    debug!(
        "trend fitted over {} years: slope={:.4}, volatility={:.4}, cagr={:.4}",
        annual.len(),
        line.slope,
        volatility,
        cagr
    );

    Ok(TrendEstimate {
        intercept: line.intercept,
        slope: line.slope,
        volatility,
        cagr,
    })
}

/// Relative change between adjacent annual totals, clipped to `[-1, 1]`.
///
/// Adjacent means adjacent in the aggregated sequence; missing calendar
/// years are not interpolated.
///
/// # Errors
///
/// Returns [`AnalyticsError::ZeroPriorYear`] when a prior total is zero.
pub fn year_over_year_changes(annual: &AnnualEarnings) -> AnalyticsResult<Vec<f64>> {
    annual
        .totals()
        .windows(2)
        .map(|pair| {
            let (prev, next) = (pair[0], pair[1]);
            if prev.amount == 0.0 {
                return Err(AnalyticsError::ZeroPriorYear {
                    year: prev.year,
                    next_year: next.year,
                });
            }
            let change = (next.amount - prev.amount) / prev.amount;
            Ok(clip(change, -CHANGE_CLIP, CHANGE_CLIP))
        })
        .collect()
}

/// Population standard deviation of the clipped year-over-year changes.
///
/// # Errors
///
/// Returns [`AnalyticsError::ZeroPriorYear`] when a prior total is zero.
pub fn volatility(annual: &AnnualEarnings) -> AnalyticsResult<f64> {
    let changes = year_over_year_changes(annual)?;
    // Aggregation guarantees two years, hence at least one change.
    Ok(population_std_dev(&changes).unwrap_or(0.0))
}

/// Compound annual growth rate from the first to the last total.
///
/// Defined as 0 when the first total is not positive.
#[must_use]
pub fn cagr(annual: &AnnualEarnings) -> f64 {
    let first = annual.first();
    let last = annual.last();
    if first.amount <= 0.0 {
        return 0.0;
    }
    let span = f64::from(annual.span_years());
    (last.amount / first.amount).powf(1.0 / span) - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::earnings::EarningsRecord;
    use approx::assert_relative_eq;

    fn annual(points: &[(i32, f64)]) -> AnnualEarnings {
        let records: Vec<_> = points
            .iter()
            .map(|&(y, a)| EarningsRecord::new(y, a))
            .collect();
        AnnualEarnings::aggregate(&records).unwrap()
    }

    #[test]
    fn test_linear_decline() {
        let a = annual(&[(2019, 10_000.0), (2020, 9_500.0), (2021, 9_000.0), (2022, 8_500.0)]);

        let trend = estimate_trend(&a).unwrap();

        assert_relative_eq!(trend.slope, -500.0, epsilon = 1e-9);
        assert_relative_eq!(trend.line().predict(2023.0), 8_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_volatility_of_constant_growth() {
        // Constant 10% growth has zero dispersion
        let a = annual(&[(2019, 1_000.0), (2020, 1_100.0), (2021, 1_210.0)]);

        assert_relative_eq!(volatility(&a).unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_changes_are_clipped() {
        // +300% then -50%: first change clips to +1
        let a = annual(&[(2019, 100.0), (2020, 400.0), (2021, 200.0)]);

        let changes = year_over_year_changes(&a).unwrap();
        assert_eq!(changes, vec![1.0, -0.5]);

        // Population sd of {1, -0.5} is 0.75
        assert_relative_eq!(volatility(&a).unwrap(), 0.75, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_prior_year() {
        let a = annual(&[(2019, 100.0), (2020, 0.0), (2021, 50.0)]);

        assert_eq!(
            volatility(&a),
            Err(AnalyticsError::ZeroPriorYear {
                year: 2020,
                next_year: 2021
            })
        );
    }

    #[test]
    fn test_zero_final_year_is_fine() {
        let a = annual(&[(2019, 100.0), (2020, 0.0)]);

        let changes = year_over_year_changes(&a).unwrap();
        assert_eq!(changes, vec![-1.0]);
        assert_relative_eq!(cagr(&a), -1.0);
    }

    #[test]
    fn test_cagr() {
        let a = annual(&[(2018, 1_000.0), (2019, 5.0), (2020, 1_210.0)]);

        assert_relative_eq!(cagr(&a), 0.10, epsilon = 1e-12);
    }

    #[test]
    fn test_cagr_with_gap() {
        let a = annual(&[(2010, 1_000.0), (2014, 2_000.0)]);

        assert_relative_eq!(cagr(&a), 2.0_f64.powf(0.25) - 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cagr_zero_start() {
        let a = annual(&[(2019, 0.0), (2020, 500.0)]);

        assert_eq!(cagr(&a), 0.0);
    }
}
