//! # Royalty Analytics
//!
//! Analytics engine for royalty payout streams listed on a secondary market.
//!
//! - **Earnings**: aggregation of raw payout records into annual totals
//! - **Trend**: linear fit, clipped volatility, CAGR
//! - **Forecast**: linear or exponential-decay projection
//! - **Valuation**: DCF at a set of discount rates
//! - **Scoring**: value, market, trend and auction sub-scores, letter rating
//! - **Implied return**: rate at which the DCF equals the listing price
//! - **Export**: flat CSV summary
//!
//! ## Usage
//!
//! ```rust
//! use royalty_analytics::prelude::*;
//!
//! let records = vec![
//!     EarningsRecord::new(2020, 1_000.0),
//!     EarningsRecord::new(2021, 1_050.0),
//!     EarningsRecord::new(2022, 1_100.0),
//! ];
//! let request = DealRequest::new(records, 5).with_prices(ListingPrices {
//!     listing_price: 3_500.0,
//!     ..ListingPrices::default()
//! });
//!
//! let result = analyze_deal(&request)?;
//! println!("{} ({:.2})", result.rating, result.final_score);
//! # Ok::<(), royalty_analytics::AnalyticsError>(())
//! ```
//!
//! The crate does no I/O of its own; [`export::write_summary`] writes to any
//! [`std::io::Write`].

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod deal;
pub mod earnings;
pub mod error;
pub mod export;
pub mod forecast;
pub mod implied_return;
pub mod scoring;
pub mod trend;
pub mod valuation;

pub use error::{AnalyticsError, AnalyticsResult, ErrorKind};

/// Prelude module for convenient imports.
///
/// ```rust
/// use royalty_analytics::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{AnalyticsError, AnalyticsResult, ErrorKind};

    pub use crate::config::{AnalysisConfig, SolverSettings};
    pub use crate::deal::{analyze_deal, DealRequest, DealResult, FieldValue, SummaryField};
    pub use crate::earnings::{AnnualEarnings, AnnualTotal, EarningsRecord};
    pub use crate::export::{summary_file_name, write_summary};
    pub use crate::forecast::{project, Forecast, ForecastModel};
    pub use crate::implied_return::{implied_return, ImpliedReturn, NotComputableReason};
    pub use crate::scoring::{
        score_deal, ListingPrices, Rating, ReferenceValuations, ScoreSet, SCORE_WEIGHTS,
    };
    pub use crate::trend::{estimate_trend, TrendEstimate};
    pub use crate::valuation::{
        discount_rates, present_value, DiscountRate, Valuation, ValuationSet,
        DEFAULT_DISCOUNT_RATES,
    };
}
