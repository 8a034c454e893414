//! Earnings forecast.
//!
//! Model selection is driven by the trend slope:
//!
//! | Slope | Model | Projection |
//! |-------|-------|------------|
//! | `< -100` | Exponential decay | `exp(a + b·t)` fitted on `ln(amount)`, positive years only |
//! | otherwise | Linear | trend line, floored at zero |
//!
//! The forecast always starts the year after the last observation and has
//! exactly `years_remaining` entries.

use std::fmt;

use log::debug;
use royalty_math::regression::fit_linear;
use serde::{Deserialize, Serialize};

use crate::earnings::AnnualEarnings;
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::trend::TrendEstimate;

/// Slopes below this (currency units per year) select the decay model.
pub const EXPONENTIAL_SLOPE_THRESHOLD: f64 = -100.0;

/// Projection model used for the forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForecastModel {
    /// Straight-line projection of the trend, floored at zero.
    Linear,
    /// Log-linear fit, for earnings in steep decline.
    ExponentialDecay,
}

impl ForecastModel {
    /// Chooses the model for a given trend slope.
    #[must_use]
    pub fn select(slope: f64) -> Self {
        if slope < EXPONENTIAL_SLOPE_THRESHOLD {
            Self::ExponentialDecay
        } else {
            Self::Linear
        }
    }

    /// Human-readable trend label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Linear => "Stable/Linear",
            Self::ExponentialDecay => "Declining (Exponential)",
        }
    }
}

impl fmt::Display for ForecastModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Projected annual earnings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    /// Model that produced the projection.
    pub model: ForecastModel,
    /// Calendar year of the first projected amount.
    pub first_year: i32,
    /// Projected amounts, one per remaining year.
    pub amounts: Vec<f64>,
}

impl Forecast {
    /// Number of projected years.
    #[must_use]
    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    /// True if nothing was projected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    /// Sum of projected amounts.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.amounts.iter().sum()
    }

    /// Mean projected amount (0 for an empty forecast).
    #[must_use]
    pub fn average(&self) -> f64 {
        if self.amounts.is_empty() {
            0.0
        } else {
            self.total() / self.amounts.len() as f64
        }
    }

    /// `(year, amount)` pairs.
    pub fn by_year(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.amounts
            .iter()
            .enumerate()
            .map(move |(i, &amount)| (self.first_year + i as i32, amount))
    }
}

/// Projects `years_remaining` annual amounts.
///
/// # Errors
///
/// - [`AnalyticsError::ZeroYearsRemaining`] if `years_remaining` is 0
/// - [`AnalyticsError::NoPositiveEarnings`] if the decay model is selected
///   but no annual total is positive
pub fn project(
    annual: &AnnualEarnings,
    trend: &TrendEstimate,
    years_remaining: u32,
) -> AnalyticsResult<Forecast> {
    if years_remaining == 0 {
        return Err(AnalyticsError::ZeroYearsRemaining);
    }

    let model = ForecastModel::select(trend.slope);
    let first_year = annual.last().year + 1;

    let amounts = match model {
        ForecastModel::Linear => project_linear(trend, first_year, years_remaining),
        ForecastModel::ExponentialDecay => project_exponential(annual, years_remaining)?,
    };

    debug!(
        "forecast {} from {}: {} years, total={:.2}",
        model,
        first_year,
        amounts.len(),
        amounts.iter().sum::<f64>()
    );

    Ok(Forecast {
        model,
        first_year,
        amounts,
    })
}

fn project_linear(trend: &TrendEstimate, first_year: i32, years: u32) -> Vec<f64> {
    let line = trend.line();
    (0..years)
        .map(|i| line.predict(f64::from(first_year) + f64::from(i)).max(0.0))
        .collect()
}

/// Fits `ln(amount) = a + b·t` with `t` counted from the first observed year.
fn project_exponential(annual: &AnnualEarnings, years: u32) -> AnalyticsResult<Vec<f64>> {
    let origin = annual.first().year;
    let (t, log_amounts): (Vec<f64>, Vec<f64>) = annual
        .iter()
        .filter(|total| total.amount > 0.0)
        .map(|total| (f64::from(total.year - origin), total.amount.ln()))
        .unzip();

    if t.is_empty() {
        return Err(AnalyticsError::NoPositiveEarnings);
    }

    let fit = fit_linear(&t, &log_amounts)?;
    // Horizon counts from the last observation, positive or not.
    let t_last = f64::from(annual.span_years());

    Ok((1..=years)
        .map(|i| fit.predict(t_last + f64::from(i)).exp())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::earnings::{AnnualEarnings, EarningsRecord};
    use crate::trend::estimate_trend;
    use approx::assert_relative_eq;

    fn annual(points: &[(i32, f64)]) -> AnnualEarnings {
        let records: Vec<_> = points
            .iter()
            .map(|&(y, a)| EarningsRecord::new(y, a))
            .collect();
        AnnualEarnings::aggregate(&records).unwrap()
    }

    fn forecast(points: &[(i32, f64)], years: u32) -> Forecast {
        let a = annual(points);
        let trend = estimate_trend(&a).unwrap();
        project(&a, &trend, years).unwrap()
    }

    #[test]
    fn test_model_selection() {
        assert_eq!(ForecastModel::select(-100.0), ForecastModel::Linear);
        assert_eq!(ForecastModel::select(-100.01), ForecastModel::ExponentialDecay);
        assert_eq!(ForecastModel::select(250.0), ForecastModel::Linear);
        assert_eq!(ForecastModel::Linear.to_string(), "Stable/Linear");
        assert_eq!(
            ForecastModel::ExponentialDecay.to_string(),
            "Declining (Exponential)"
        );
    }

    #[test]
    fn test_linear_projection() {
        // Slope -50: linear branch
        let f = forecast(&[(2019, 1_000.0), (2020, 950.0), (2021, 900.0)], 3);

        assert_eq!(f.model, ForecastModel::Linear);
        assert_eq!(f.first_year, 2022);
        assert_eq!(f.len(), 3);
        assert_relative_eq!(f.amounts[0], 850.0, epsilon = 1e-6);
        assert_relative_eq!(f.amounts[1], 800.0, epsilon = 1e-6);
        assert_relative_eq!(f.amounts[2], 750.0, epsilon = 1e-6);
        assert_relative_eq!(f.total(), 2_400.0, epsilon = 1e-6);
        assert_relative_eq!(f.average(), 800.0, epsilon = 1e-6);
    }

    #[test]
    fn test_linear_floor_at_zero() {
        // Slope -90 on small amounts runs out after a few years
        let f = forecast(&[(2019, 270.0), (2020, 180.0), (2021, 90.0)], 4);

        assert_eq!(f.model, ForecastModel::Linear);
        assert_relative_eq!(f.amounts[0], 0.0, epsilon = 1e-9);
        assert!(f.amounts.iter().all(|&a| a >= 0.0));
        assert_eq!(f.amounts[3], 0.0);
    }

    #[test]
    fn test_exponential_projection() {
        // Halving every year: ln-fit is exact
        let f = forecast(&[(2019, 8_000.0), (2020, 4_000.0), (2021, 2_000.0)], 3);

        assert_eq!(f.model, ForecastModel::ExponentialDecay);
        assert_relative_eq!(f.amounts[0], 1_000.0, epsilon = 1e-6);
        assert_relative_eq!(f.amounts[1], 500.0, epsilon = 1e-6);
        assert_relative_eq!(f.amounts[2], 250.0, epsilon = 1e-6);
    }

    #[test]
    fn test_exponential_skips_zero_years() {
        // The zero final year is excluded from the fit but still sets the horizon
        let a = annual(&[(2019, 8_000.0), (2020, 4_000.0), (2021, 0.0)]);
        let trend = TrendEstimate {
            intercept: 0.0,
            slope: -4_000.0,
            volatility: 0.0,
            cagr: -1.0,
        };

        let f = project(&a, &trend, 2).unwrap();

        assert_eq!(f.model, ForecastModel::ExponentialDecay);
        // Fit through (0, 8000), (1, 4000); t=3 -> 1000, t=4 -> 500
        assert_relative_eq!(f.amounts[0], 1_000.0, epsilon = 1e-6);
        assert_relative_eq!(f.amounts[1], 500.0, epsilon = 1e-6);
    }

    #[test]
    fn test_exponential_needs_positive_year() {
        let a = annual(&[(2019, 0.0), (2020, 0.0)]);
        let trend = TrendEstimate {
            intercept: 0.0,
            slope: -500.0,
            volatility: 0.0,
            cagr: 0.0,
        };

        assert_eq!(
            project(&a, &trend, 3),
            Err(AnalyticsError::NoPositiveEarnings)
        );
    }

    #[test]
    fn test_zero_years_remaining() {
        let a = annual(&[(2019, 100.0), (2020, 100.0)]);
        let trend = estimate_trend(&a).unwrap();

        assert_eq!(project(&a, &trend, 0), Err(AnalyticsError::ZeroYearsRemaining));
    }

    #[test]
    fn test_by_year() {
        let f = forecast(&[(2019, 100.0), (2020, 100.0)], 2);

        let years: Vec<i32> = f.by_year().map(|(y, _)| y).collect();
        assert_eq!(years, vec![2021, 2022]);
    }
}
