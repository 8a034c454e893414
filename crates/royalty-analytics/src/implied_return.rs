//! Implied annual return of buying at the listing price.
//!
//! Solves for the rate `r` at which the forecast's present value equals the
//! price. For a non-negative forecast with a positive total the present value
//! falls monotonically from +inf (as `r -> -1`) to 0, so a positive price has
//! exactly one such rate.

use std::fmt;

use log::{debug, warn};
use royalty_math::solvers::hybrid_numerical;
use serde::{Serialize, Serializer};

use crate::config::SolverSettings;
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::valuation::present_value;

/// Lowest rate the bracket search will consider.
const MIN_RATE: f64 = -0.9999;

/// Upper bracket guesses double from here until the NPV turns negative.
const FIRST_UPPER_RATE: f64 = 1.0;

/// Upper bracket search gives up past this rate.
const MAX_UPPER_RATE: f64 = 1.0e6;

/// Why an implied return could not be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NotComputableReason {
    /// No listing price to solve against.
    NoListingPrice,
    /// The forecast sums to zero.
    NoForecastCashFlow,
    /// The solver did not converge.
    NoConvergence,
}

impl fmt::Display for NotComputableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::NoListingPrice => "no listing price",
            Self::NoForecastCashFlow => "forecast has no cash flow",
            Self::NoConvergence => "solver did not converge",
        };
        f.write_str(text)
    }
}

/// Outcome of the implied return calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImpliedReturn {
    /// Annual rate as a decimal fraction.
    Rate(f64),
    /// No rate could be computed.
    NotComputable(NotComputableReason),
}

impl ImpliedReturn {
    /// Text used in place of a rate when none is available.
    pub const NOT_AVAILABLE: &'static str = "N/A";

    /// The rate, if one was computed.
    #[must_use]
    pub fn rate(&self) -> Option<f64> {
        match self {
            Self::Rate(r) => Some(*r),
            Self::NotComputable(_) => None,
        }
    }

    /// The rate as a percentage rounded to two decimals.
    #[must_use]
    pub fn as_percent(&self) -> Option<f64> {
        self.rate().map(|r| (r * 100.0 * 100.0).round() / 100.0)
    }
}

impl fmt::Display for ImpliedReturn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_percent() {
            Some(pct) => write!(f, "{pct:.2}"),
            None => f.write_str(Self::NOT_AVAILABLE),
        }
    }
}

impl Serialize for ImpliedReturn {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_percent() {
            Some(pct) => serializer.serialize_f64(pct),
            None => serializer.serialize_str(Self::NOT_AVAILABLE),
        }
    }
}

/// Solves for the implied return, reporting failure as an error.
///
/// # Errors
///
/// Returns [`AnalyticsError::ConvergenceFailed`] if neither Newton-Raphson
/// nor the bisection fallback finds the rate within the iteration cap.
pub fn solve_implied_return(
    cash_flows: &[f64],
    price: f64,
    settings: &SolverSettings,
) -> AnalyticsResult<f64> {
    let npv = |rate: f64| {
        if rate <= -1.0 {
            return f64::NAN;
        }
        present_value(cash_flows, rate) - price
    };

    let bracket = rate_bracket(&npv);
    let result = hybrid_numerical(&npv, settings.initial_guess, bracket, &settings.solver_config())?;

    if !result.root.is_finite() || result.root <= -1.0 {
        return Err(AnalyticsError::ConvergenceFailed(format!(
            "solver returned an unusable rate {}",
            result.root
        )));
    }

    debug!(
        "implied return {:.6} after {} iterations (residual {:.2e})",
        result.root, result.iterations, result.residual
    );
    Ok(result.root)
}

/// Implied return of paying `listing_price` for the forecast.
///
/// Never fails: missing inputs and solver failures become
/// [`ImpliedReturn::NotComputable`].
#[must_use]
pub fn implied_return(cash_flows: &[f64], listing_price: f64, settings: &SolverSettings) -> ImpliedReturn {
    if listing_price <= 0.0 {
        return ImpliedReturn::NotComputable(NotComputableReason::NoListingPrice);
    }
    if cash_flows.iter().sum::<f64>() <= 0.0 {
        return ImpliedReturn::NotComputable(NotComputableReason::NoForecastCashFlow);
    }

    match solve_implied_return(cash_flows, listing_price, settings) {
        Ok(rate) => ImpliedReturn::Rate(rate),
        Err(err) => {
            warn!("implied return not computable: {err}");
            ImpliedReturn::NotComputable(NotComputableReason::NoConvergence)
        }
    }
}

/// Finds `[MIN_RATE, upper]` with the NPV changing sign, if it exists.
fn rate_bracket<F>(npv: &F) -> Option<(f64, f64)>
where
    F: Fn(f64) -> f64,
{
    let at_min = npv(MIN_RATE);
    if at_min.is_nan() || at_min <= 0.0 {
        return None;
    }
    let mut upper = FIRST_UPPER_RATE;
    while upper <= MAX_UPPER_RATE {
        if npv(upper) < 0.0 {
            return Some((MIN_RATE, upper));
        }
        upper *= 2.0;
    }
    None
}
