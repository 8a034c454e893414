//! Earnings records and their annual aggregation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult};

/// Minimum distinct years needed to fit a trend line.
pub const MIN_DISTINCT_YEARS: usize = 2;

/// A single payout record as reported by the payer.
///
/// Many records may share a year (monthly or quarterly statements).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EarningsRecord {
    /// Distribution year.
    pub year: i32,
    /// Amount paid out, in currency units.
    pub amount: f64,
}

impl EarningsRecord {
    /// Creates a new record.
    #[must_use]
    pub fn new(year: i32, amount: f64) -> Self {
        Self { year, amount }
    }
}

/// Total payout for one calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnnualTotal {
    /// Calendar year.
    pub year: i32,
    /// Sum of all records for the year.
    pub amount: f64,
}

/// Annual totals, strictly ascending by year.
///
/// Constructed only through [`AnnualEarnings::aggregate`], which guarantees
/// unique years, ascending order, and at least two entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnualEarnings {
    totals: Vec<AnnualTotal>,
}

impl AnnualEarnings {
    /// Groups records by year and sums them.
    ///
    /// The result does not depend on the order of `records`. Gaps between
    /// years are kept as gaps.
    ///
    /// # Errors
    ///
    /// - [`AnalyticsError::NoEarnings`] for an empty slice
    /// - [`AnalyticsError::NonFiniteAmount`] if any amount is NaN or infinite
    /// - [`AnalyticsError::InsufficientYears`] for fewer than two distinct years
    pub fn aggregate(records: &[EarningsRecord]) -> AnalyticsResult<Self> {
        if records.is_empty() {
            return Err(AnalyticsError::NoEarnings);
        }

        let mut by_year: BTreeMap<i32, f64> = BTreeMap::new();
        for record in records {
            if !record.amount.is_finite() {
                return Err(AnalyticsError::NonFiniteAmount { year: record.year });
            }
            *by_year.entry(record.year).or_insert(0.0) += record.amount;
        }

        if by_year.len() < MIN_DISTINCT_YEARS {
            return Err(AnalyticsError::InsufficientYears {
                required: MIN_DISTINCT_YEARS,
                actual: by_year.len(),
            });
        }

        let totals = by_year
            .into_iter()
            .map(|(year, amount)| AnnualTotal { year, amount })
            .collect();

        Ok(Self { totals })
    }

    /// Number of distinct years.
    #[must_use]
    pub fn len(&self) -> usize {
        self.totals.len()
    }

    /// Returns `true` if there are no annual totals.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Annual totals in ascending year order.
    #[must_use]
    pub fn totals(&self) -> &[AnnualTotal] {
        &self.totals
    }

    /// Iterates over annual totals in ascending year order.
    pub fn iter(&self) -> impl Iterator<Item = &AnnualTotal> {
        self.totals.iter()
    }

    /// Years as `f64`, ascending.
    #[must_use]
    pub fn years(&self) -> Vec<f64> {
        self.totals.iter().map(|t| f64::from(t.year)).collect()
    }

    /// Amounts in year order.
    #[must_use]
    pub fn amounts(&self) -> Vec<f64> {
        self.totals.iter().map(|t| t.amount).collect()
    }

    /// Earliest annual total.
    #[must_use]
    pub fn first(&self) -> AnnualTotal {
        self.totals[0]
    }

    /// Latest annual total.
    #[must_use]
    pub fn last(&self) -> AnnualTotal {
        self.totals[self.totals.len() - 1]
    }

    /// Years between first and last observation.
    #[must_use]
    pub fn span_years(&self) -> i32 {
        self.last().year - self.first().year
    }
}
