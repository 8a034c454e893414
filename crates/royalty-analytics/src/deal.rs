//! Deal analysis: the full pipeline from payout records to a rated deal.
//!
//! ```text
//! records -> annual totals -> trend -> forecast -> valuations
//!                                 \                    |
//!                                  +--> scores <-------+--> implied return
//! ```

use std::fmt;

use log::debug;
use serde::{Serialize, Serializer};

use crate::config::AnalysisConfig;
use crate::earnings::{AnnualEarnings, EarningsRecord};
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::forecast::{project, Forecast};
use crate::implied_return::{implied_return, ImpliedReturn};
use crate::scoring::{score_deal, ListingPrices, Rating, ReferenceValuations, ScoreSet};
use crate::trend::{estimate_trend, TrendEstimate};
use crate::valuation::ValuationSet;

/// Key of the implied return field in the flat record.
pub const IMPLIED_RETURN_KEY: &str = "Implied Return (if Buy It Now)";

/// Everything needed to analyse one listing.
#[derive(Debug, Clone, PartialEq)]
pub struct DealRequest {
    /// Raw payout records, any order, several per year allowed.
    pub records: Vec<EarningsRecord>,
    /// Years of payouts left on the contract.
    pub years_remaining: u32,
    /// Listing prices.
    pub prices: ListingPrices,
    /// Discount rates and solver settings.
    pub config: AnalysisConfig,
}

impl DealRequest {
    /// Creates a request with no prices and the default configuration.
    #[must_use]
    pub fn new(records: Vec<EarningsRecord>, years_remaining: u32) -> Self {
        Self {
            records,
            years_remaining,
            prices: ListingPrices::default(),
            config: AnalysisConfig::default(),
        }
    }

    /// Sets the listing prices.
    #[must_use]
    pub fn with_prices(mut self, prices: ListingPrices) -> Self {
        self.prices = prices;
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn with_config(mut self, config: AnalysisConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the discount rates.
    #[must_use]
    pub fn with_discount_rates(mut self, rates: impl Into<Vec<f64>>) -> Self {
        self.config = self.config.with_discount_rates(rates);
        self
    }
}

/// Result of a deal analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DealResult {
    /// Historical annual totals.
    pub annual: Vec<(i32, f64)>,
    /// Trend fit, volatility and CAGR.
    pub trend: TrendEstimate,
    /// Projected earnings.
    pub forecast: Forecast,
    /// One valuation per requested rate.
    pub valuations: ValuationSet,
    /// Prices the deal was scored against.
    pub prices: ListingPrices,
    /// Sub-scores.
    pub scores: ScoreSet,
    /// Weighted final score.
    pub final_score: f64,
    /// Letter rating.
    pub rating: Rating,
    /// Implied return of buying at the listing price.
    pub implied_return: ImpliedReturn,
    /// Forecast horizon.
    pub years_remaining: u32,
}

/// Runs the full analysis.
///
/// Configuration is checked first, then the earnings data. Solver failure
/// never fails the analysis; it shows up as
/// [`ImpliedReturn::NotComputable`].
///
/// # Errors
///
/// Returns a config-kind or data-kind [`AnalyticsError`] naming the failed
/// check.
pub fn analyze_deal(request: &DealRequest) -> AnalyticsResult<DealResult> {
    let rates = request.config.validate()?;
    if request.years_remaining == 0 {
        return Err(AnalyticsError::ZeroYearsRemaining);
    }

    let annual = AnnualEarnings::aggregate(&request.records)?;
    let trend = estimate_trend(&annual)?;
    let forecast = project(&annual, &trend, request.years_remaining)?;

    let valuations = ValuationSet::compute(&forecast.amounts, &rates);
    let reference = ReferenceValuations::from_forecast(&forecast.amounts);
    let scores = score_deal(&request.prices, &reference, &trend);
    let implied = implied_return(
        &forecast.amounts,
        request.prices.listing_price,
        &request.config.solver,
    );

    let result = DealResult {
        annual: annual.iter().map(|t| (t.year, t.amount)).collect(),
        trend,
        forecast,
        valuations,
        prices: request.prices,
        scores,
        final_score: scores.final_score(),
        rating: scores.rating(),
        implied_return: implied,
        years_remaining: request.years_remaining,
    };
    debug!(
        "deal rated {} (score {:.2}, implied return {})",
        result.rating, result.final_score, result.implied_return
    );
    Ok(result)
}

impl DealResult {
    /// Sum of the forecast.
    #[must_use]
    pub fn total_forecast(&self) -> f64 {
        self.forecast.total()
    }

    /// Mean forecast year.
    #[must_use]
    pub fn average_forecast(&self) -> f64 {
        self.forecast.average()
    }

    /// The result as ordered key/value pairs.
    #[must_use]
    pub fn to_record(&self) -> Vec<SummaryField> {
        let mut fields = vec![
            SummaryField::text("Earnings Trend", self.forecast.model.label()),
            SummaryField::number("CAGR", self.trend.cagr),
            SummaryField::number("Volatility", self.trend.volatility),
            SummaryField::number("Total Forecast", self.total_forecast()),
            SummaryField::number("Avg Annual Forecast", self.average_forecast()),
            SummaryField::integer("Years Remaining", i64::from(self.years_remaining)),
        ];

        fields.extend(
            self.valuations
                .iter()
                .map(|v| SummaryField::number(format!("Valuation {}", v.rate.key()), v.present_value)),
        );

        fields.extend([
            SummaryField::number("Listing Price", self.prices.listing_price),
            SummaryField::number("Min Bid", self.prices.min_bid),
            SummaryField::number("Last Transaction", self.prices.last_transaction),
            SummaryField::number("Marketplace Median", self.prices.marketplace_median),
            SummaryField::integer("Value Score", i64::from(self.scores.value_score)),
            SummaryField::integer("Market Score", i64::from(self.scores.market_score)),
            SummaryField::integer("Trend Score", i64::from(self.scores.trend_score)),
            SummaryField::integer("Auction Score", i64::from(self.scores.auction_score)),
            SummaryField::number("Final Score", self.final_score),
            SummaryField::text("Rating", self.rating.as_str()),
        ]);

        let implied = match self.implied_return.as_percent() {
            Some(pct) => FieldValue::Number(pct),
            None => FieldValue::Text(ImpliedReturn::NOT_AVAILABLE.to_string()),
        };
        fields.push(SummaryField {
            key: IMPLIED_RETURN_KEY.to_string(),
            value: implied,
        });

        fields
    }
}

/// A value in the flat record.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Label or sentinel.
    Text(String),
    /// Real number.
    Number(f64),
    /// Whole number.
    Integer(i64),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
            Self::Integer(i) => write!(f, "{i}"),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(s) => serializer.serialize_str(s),
            Self::Number(n) => serializer.serialize_f64(*n),
            Self::Integer(i) => serializer.serialize_i64(*i),
        }
    }
}

/// One entry of the flat record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryField {
    /// Column name.
    pub key: String,
    /// Column value.
    pub value: FieldValue,
}

impl SummaryField {
    fn text(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: FieldValue::Text(value.into()),
        }
    }

    fn number(key: impl Into<String>, value: f64) -> Self {
        Self {
            key: key.into(),
            value: FieldValue::Number(value),
        }
    }

    fn integer(key: impl Into<String>, value: i64) -> Self {
        Self {
            key: key.into(),
            value: FieldValue::Integer(value),
        }
    }
}
