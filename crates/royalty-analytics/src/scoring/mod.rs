//! Deal scoring.
//!
//! Four independent sub-scores, combined with fixed weights:
//!
//! | Sub-score | Weight | Looks at |
//! |-----------|--------|----------|
//! | Value | 40% | asking price against DCF valuations |
//! | Market | 25% | asking price against median and last sale |
//! | Trend | 20% | slope and volatility of earnings |
//! | Auction | 15% | min bid headroom, listing vs. last sale |
//!
//! The thresholds live in [`rules`] as ordered tables.

pub mod rating;
pub mod rules;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::trend::TrendEstimate;
use crate::valuation::present_value;

pub use rating::{Rating, RATING_BANDS};
use rules::{
    first_match, sum_matching, AuctionContext, MarketContext, TrendContext, ValueContext,
    AUCTION_ADJUSTMENTS, MARKET_DEFAULT, MARKET_RULES, TREND_DEFAULT, TREND_RULES,
    VALUE_DEFAULT, VALUE_RULES,
};

/// Prices describing the listing. Zero means "not available".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingPrices {
    /// Buy-it-now price.
    #[serde(default)]
    pub listing_price: f64,
    /// Minimum auction bid.
    #[serde(default)]
    pub min_bid: f64,
    /// Price at which this asset last changed hands.
    #[serde(default)]
    pub last_transaction: f64,
    /// Median price of comparable marketplace listings.
    #[serde(default)]
    pub marketplace_median: f64,
}

impl ListingPrices {
    /// Price used by the value score: the min bid if there is one,
    /// otherwise the listing price.
    #[must_use]
    pub fn base_price(&self) -> f64 {
        if self.min_bid > 0.0 {
            self.min_bid
        } else {
            self.listing_price
        }
    }

    /// Price used by the market score: the cheaper of min bid and listing
    /// price when the listing has a price, otherwise the base price.
    #[must_use]
    pub fn market_price(&self) -> f64 {
        if self.listing_price == 0.0 {
            return self.base_price();
        }
        let bid_or_list = if self.min_bid == 0.0 {
            self.listing_price
        } else {
            self.min_bid
        };
        bid_or_list.min(self.listing_price)
    }
}

/// Valuations at the three rates the scoring policy is written against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferenceValuations {
    /// Present value at 10%.
    pub at_10: f64,
    /// Present value at 12.5%.
    pub at_12_5: f64,
    /// Present value at 15%.
    pub at_15: f64,
}

impl ReferenceValuations {
    /// Values the forecast at 10%, 12.5% and 15%.
    #[must_use]
    pub fn from_forecast(cash_flows: &[f64]) -> Self {
        Self {
            at_10: present_value(cash_flows, 0.10),
            at_12_5: present_value(cash_flows, 0.125),
            at_15: present_value(cash_flows, 0.15),
        }
    }
}

/// Weights of each sub-score, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreWeights {
    /// Value score weight.
    pub value: i32,
    /// Market score weight.
    pub market: i32,
    /// Trend score weight.
    pub trend: i32,
    /// Auction score weight.
    pub auction: i32,
}

/// The fixed weighting: 40 / 25 / 20 / 15.
pub const SCORE_WEIGHTS: ScoreWeights = ScoreWeights {
    value: 40,
    market: 25,
    trend: 20,
    auction: 15,
};

/// The four sub-scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreSet {
    /// Price against intrinsic value, 0..=10.
    pub value_score: u8,
    /// Price against the market, 0..=10.
    pub market_score: u8,
    /// Earnings trend quality, 0..=10.
    pub trend_score: u8,
    /// Auction dynamics, signed and unbounded.
    pub auction_score: i32,
}

impl ScoreSet {
    /// Weighted score in hundredths of a point (exact integer arithmetic).
    #[must_use]
    pub fn weighted_hundredths(&self) -> i32 {
        let w = SCORE_WEIGHTS;
        w.value * i32::from(self.value_score)
            + w.market * i32::from(self.market_score)
            + w.trend * i32::from(self.trend_score)
            + w.auction * self.auction_score
    }

    /// Weighted final score.
    #[must_use]
    pub fn final_score(&self) -> f64 {
        f64::from(self.weighted_hundredths()) / 100.0
    }

    /// Rating band of the final score.
    #[must_use]
    pub fn rating(&self) -> Rating {
        Rating::from_score(self.final_score())
    }
}

/// Value sub-score.
#[must_use]
pub fn value_score(prices: &ListingPrices, valuations: &ReferenceValuations) -> u8 {
    let ctx = ValueContext {
        base_price: prices.base_price(),
        at_10: valuations.at_10,
        at_12_5: valuations.at_12_5,
        at_15: valuations.at_15,
    };
    first_match(VALUE_RULES, &ctx, VALUE_DEFAULT)
}

/// Market sub-score.
#[must_use]
pub fn market_score(prices: &ListingPrices) -> u8 {
    let ctx = MarketContext {
        market_price: prices.market_price(),
        marketplace_median: prices.marketplace_median,
        last_transaction: prices.last_transaction,
    };
    first_match(MARKET_RULES, &ctx, MARKET_DEFAULT)
}

/// Trend sub-score.
#[must_use]
pub fn trend_score(slope: f64, volatility: f64) -> u8 {
    first_match(TREND_RULES, &TrendContext { slope, volatility }, TREND_DEFAULT)
}

/// Auction sub-score.
#[must_use]
pub fn auction_score(prices: &ListingPrices, valuations: &ReferenceValuations, slope: f64) -> i32 {
    let ctx = AuctionContext {
        min_bid: prices.min_bid,
        listing_price: prices.listing_price,
        last_transaction: prices.last_transaction,
        slope,
        at_10: valuations.at_10,
        at_15: valuations.at_15,
    };
    sum_matching(AUCTION_ADJUSTMENTS, &ctx)
}

/// Computes all four sub-scores.
#[must_use]
pub fn score_deal(
    prices: &ListingPrices,
    valuations: &ReferenceValuations,
    trend: &TrendEstimate,
) -> ScoreSet {
    let scores = ScoreSet {
        value_score: value_score(prices, valuations),
        market_score: market_score(prices),
        trend_score: trend_score(trend.slope, trend.volatility),
        auction_score: auction_score(prices, valuations, trend.slope),
    };
    debug!(
        "scores: value={} market={} trend={} auction={} -> {:.2}",
        scores.value_score,
        scores.market_score,
        scores.trend_score,
        scores.auction_score,
        scores.final_score()
    );
    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn prices(listing_price: f64, min_bid: f64) -> ListingPrices {
        ListingPrices {
            listing_price,
            min_bid,
            ..ListingPrices::default()
        }
    }

    #[test]
    fn test_base_price() {
        assert_eq!(prices(10_000.0, 8_000.0).base_price(), 8_000.0);
        assert_eq!(prices(10_000.0, 0.0).base_price(), 10_000.0);
        assert_eq!(prices(0.0, 0.0).base_price(), 0.0);
    }

    #[test]
    fn test_market_price() {
        // No listing price: falls back to the base price (the bid)
        assert_eq!(prices(0.0, 8_000.0).market_price(), 8_000.0);
        // Bid below listing
        assert_eq!(prices(10_000.0, 8_000.0).market_price(), 8_000.0);
        // Bid above listing: listing wins
        assert_eq!(prices(10_000.0, 12_000.0).market_price(), 10_000.0);
        // No bid
        assert_eq!(prices(10_000.0, 0.0).market_price(), 10_000.0);
    }

    #[test]
    fn test_auction_example() {
        let valuations = ReferenceValuations {
            at_10: 7_500.0,
            at_12_5: 8_000.0,
            at_15: 9_000.0,
        };

        assert_eq!(auction_score(&prices(0.0, 8_000.0), &valuations, -10.0), 2);
    }

    #[test]
    fn test_no_prices_scores_zero() {
        let valuations = ReferenceValuations::from_forecast(&[8_000.0, 7_500.0, 7_000.0]);
        let p = prices(0.0, 0.0);

        assert_eq!(value_score(&p, &valuations), 0);
        assert_eq!(market_score(&p), 0);
        assert_eq!(auction_score(&p, &valuations, -500.0), 0);
    }

    #[test]
    fn test_weighted_score() {
        let scores = ScoreSet {
            value_score: 10,
            market_score: 10,
            trend_score: 8,
            auction_score: 0,
        };
        // 4.0 + 2.5 + 1.6 = 8.1
        assert_eq!(scores.weighted_hundredths(), 810);
        assert_relative_eq!(scores.final_score(), 8.1);
        assert_eq!(scores.rating(), Rating::A);
    }

    #[test]
    fn test_weighted_score_exact_boundary() {
        // 1.6 + 2.5 + 1.2 - 0.3 lands exactly on 5.0
        let scores = ScoreSet {
            value_score: 4,
            market_score: 10,
            trend_score: 6,
            auction_score: -2,
        };
        assert_eq!(scores.weighted_hundredths(), 500);
        assert_eq!(scores.final_score(), 5.0);
        assert_eq!(scores.rating(), Rating::C);

        // 4.0 + 2.5 + 2.0 + 0.45 = 8.95, one more auction point clears 9
        let mut scores = ScoreSet {
            value_score: 10,
            market_score: 10,
            trend_score: 10,
            auction_score: 3,
        };
        assert_eq!(scores.rating(), Rating::A);
        scores.auction_score = 4;
        assert_eq!(scores.rating(), Rating::APlus);
    }

    #[test]
    fn test_negative_auction_pulls_down() {
        let scores = ScoreSet {
            value_score: 4,
            market_score: 3,
            trend_score: 6,
            auction_score: -2,
        };
        // 1.6 + 0.75 + 1.2 - 0.3 = 3.25
        assert_eq!(scores.weighted_hundredths(), 325);
        assert_eq!(scores.rating(), Rating::D);
    }
}
