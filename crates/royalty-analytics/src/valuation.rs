//! Discounted cash flow valuation of a forecast.
//!
//! Cash flows are discounted at year end: the first projected year is
//! divided by `(1 + r)`, the second by `(1 + r)^2`, and so on.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult};

/// Discount rates analysed when the caller does not ask for others.
pub const DEFAULT_DISCOUNT_RATES: [f64; 3] = [0.10, 0.125, 0.15];

/// Decimal places kept in a rate's percentage key.
const KEY_PRECISION: usize = 4;

/// A validated annual discount rate.
///
/// The key is derived from the exact percentage, so `0.125` is `"12.5%"` and
/// can never be confused with a literal 12% rate.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct DiscountRate(f64);

impl DiscountRate {
    /// Validates and wraps a rate given as a decimal fraction (`0.10` = 10%).
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::InvalidDiscountRate`] unless the rate is
    /// finite and strictly positive.
    pub fn new(rate: f64) -> AnalyticsResult<Self> {
        if rate.is_finite() && rate > 0.0 {
            Ok(Self(rate))
        } else {
            Err(AnalyticsError::InvalidDiscountRate(rate))
        }
    }

    /// The rate as a decimal fraction.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Percentage label, e.g. `"10%"` or `"12.5%"`.
    #[must_use]
    pub fn key(self) -> String {
        let pct = format!("{:.*}", KEY_PRECISION, self.0 * 100.0);
        let trimmed = pct.trim_end_matches('0').trim_end_matches('.');
        format!("{trimmed}%")
    }
}

impl TryFrom<f64> for DiscountRate {
    type Error = AnalyticsError;

    fn try_from(rate: f64) -> Result<Self, Self::Error> {
        Self::new(rate)
    }
}

impl From<DiscountRate> for f64 {
    fn from(rate: DiscountRate) -> Self {
        rate.0
    }
}

impl fmt::Display for DiscountRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// Validates a set of requested rates, dropping duplicates by key.
///
/// Order of first appearance is kept.
///
/// # Errors
///
/// - [`AnalyticsError::EmptyDiscountRates`] for an empty request
/// - [`AnalyticsError::InvalidDiscountRate`] for any non-positive or
///   non-finite rate
pub fn discount_rates(rates: &[f64]) -> AnalyticsResult<Vec<DiscountRate>> {
    if rates.is_empty() {
        return Err(AnalyticsError::EmptyDiscountRates);
    }

    let mut out: Vec<DiscountRate> = Vec::with_capacity(rates.len());
    for &rate in rates {
        let rate = DiscountRate::new(rate)?;
        if !out.iter().any(|r| r.key() == rate.key()) {
            out.push(rate);
        }
    }
    Ok(out)
}

/// Present value of end-of-year cash flows at `rate`.
///
/// `cash_flows[0]` is received one year from now. Zero flows contribute
/// nothing, even where the discount factor has overflowed.
#[must_use]
pub fn present_value(cash_flows: &[f64], rate: f64) -> f64 {
    let growth = 1.0 + rate;
    let mut factor = 1.0;
    cash_flows
        .iter()
        .map(|&cf| {
            factor /= growth;
            if cf == 0.0 {
                0.0
            } else {
                cf * factor
            }
        })
        .sum()
}

/// Present value at one discount rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Valuation {
    /// Discount rate used.
    pub rate: DiscountRate,
    /// Present value of the forecast.
    pub present_value: f64,
}

/// One valuation per requested discount rate, in request order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuationSet {
    valuations: Vec<Valuation>,
}

impl ValuationSet {
    /// Values `cash_flows` at each rate.
    #[must_use]
    pub fn compute(cash_flows: &[f64], rates: &[DiscountRate]) -> Self {
        let valuations = rates
            .iter()
            .map(|&rate| Valuation {
                rate,
                present_value: present_value(cash_flows, rate.value()),
            })
            .collect();
        Self { valuations }
    }

    /// Number of valuations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.valuations.len()
    }

    /// True if no rates were valued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.valuations.is_empty()
    }

    /// Iterates in request order.
    pub fn iter(&self) -> impl Iterator<Item = &Valuation> {
        self.valuations.iter()
    }

    /// Present value at the rate with the same key as `rate`.
    #[must_use]
    pub fn get(&self, rate: f64) -> Option<f64> {
        let key = DiscountRate::new(rate).ok()?.key();
        self.valuations
            .iter()
            .find(|v| v.rate.key() == key)
            .map(|v| v.present_value)
    }
}
