//! Ordered rule tables for the sub-scores.
//!
//! Each table is evaluated top to bottom; the first rule whose condition
//! holds supplies the score. The auction table is the exception: every
//! matching adjustment is applied.

/// A scoring rule: if `applies` holds, the sub-score is `score`.
#[derive(Clone, Copy)]
pub struct Rule<C> {
    /// Short description shown in debug output.
    pub label: &'static str,
    /// Condition over the scoring context.
    pub applies: fn(&C) -> bool,
    /// Score awarded when the condition holds.
    pub score: u8,
}

/// An additive adjustment: if `applies` holds, `delta` is added.
#[derive(Clone, Copy)]
pub struct Adjustment<C> {
    /// Short description shown in debug output.
    pub label: &'static str,
    /// Condition over the scoring context.
    pub applies: fn(&C) -> bool,
    /// Points added (or removed) when the condition holds.
    pub delta: i32,
}

/// Score of the first matching rule, or `default` when none match.
pub fn first_match<C>(rules: &[Rule<C>], ctx: &C, default: u8) -> u8 {
    rules
        .iter()
        .find(|rule| (rule.applies)(ctx))
        .map_or(default, |rule| {
            log::trace!("rule matched: {}", rule.label);
            rule.score
        })
}

/// Sum of all matching adjustments.
pub fn sum_matching<C>(adjustments: &[Adjustment<C>], ctx: &C) -> i32 {
    adjustments
        .iter()
        .filter(|adj| (adj.applies)(ctx))
        .inspect(|adj| log::trace!("adjustment applied: {} ({:+})", adj.label, adj.delta))
        .map(|adj| adj.delta)
        .sum()
}

// ============================================================================
// Value score
// ============================================================================

/// Inputs to the value score.
#[derive(Debug, Clone, Copy)]
pub struct ValueContext {
    /// Effective price: min bid if set, else listing price.
    pub base_price: f64,
    /// Valuation at 10%.
    pub at_10: f64,
    /// Valuation at 12.5%.
    pub at_12_5: f64,
    /// Valuation at 15%.
    pub at_15: f64,
}

/// Value score rules.
///
/// Valuations fall as the rate rises, so for a non-negative forecast any
/// price within the 12.5% or 15% valuation is already within the 10% one.
pub const VALUE_RULES: &[Rule<ValueContext>] = &[
    Rule {
        label: "no price to evaluate",
        applies: |c: &ValueContext| c.base_price <= 0.0,
        score: 0,
    },
    Rule {
        label: "price at or below 10% valuation",
        applies: |c: &ValueContext| c.base_price <= c.at_10,
        score: 10,
    },
    Rule {
        label: "price at or below 12.5% valuation",
        applies: |c: &ValueContext| c.base_price <= c.at_12_5,
        score: 8,
    },
    Rule {
        label: "price at or below 15% valuation",
        applies: |c: &ValueContext| c.base_price <= c.at_15,
        score: 6,
    },
];

/// Value score for a priced listing above every valuation.
pub const VALUE_DEFAULT: u8 = 4;

// ============================================================================
// Market score
// ============================================================================

/// Distance within which a price counts as "near" a reference price.
pub const MARKET_PROXIMITY: f64 = 500.0;

/// Inputs to the market score.
#[derive(Debug, Clone, Copy)]
pub struct MarketContext {
    /// Best available asking price.
    pub market_price: f64,
    /// Marketplace median for comparable listings (0 if unknown).
    pub marketplace_median: f64,
    /// Last transaction price for this asset (0 if unknown).
    pub last_transaction: f64,
}

impl MarketContext {
    fn below_median(&self) -> bool {
        self.market_price < self.marketplace_median
    }

    fn below_last(&self) -> bool {
        self.market_price < self.last_transaction
    }
}

/// Market score rules.
pub const MARKET_RULES: &[Rule<MarketContext>] = &[
    Rule {
        label: "no market price",
        applies: |c: &MarketContext| c.market_price <= 0.0,
        score: 0,
    },
    Rule {
        label: "below median and last transaction",
        applies: |c: &MarketContext| c.below_median() && c.below_last(),
        score: 10,
    },
    Rule {
        label: "below median or last transaction",
        applies: |c: &MarketContext| c.below_median() || c.below_last(),
        score: 7,
    },
    Rule {
        label: "near median or last transaction",
        applies: |c: &MarketContext| {
            (c.market_price - c.marketplace_median).abs() < MARKET_PROXIMITY
                || (c.market_price - c.last_transaction).abs() < MARKET_PROXIMITY
        },
        score: 5,
    },
];

/// Market score for a priced listing that is expensive against both references.
pub const MARKET_DEFAULT: u8 = 3;

// ============================================================================
// Trend score
// ============================================================================

/// Inputs to the trend score.
#[derive(Debug, Clone, Copy)]
pub struct TrendContext {
    /// Regression slope, currency units per year.
    pub slope: f64,
    /// Clipped year-over-year volatility.
    pub volatility: f64,
}

/// Trend score rules.
pub const TREND_RULES: &[Rule<TrendContext>] = &[
    Rule {
        label: "growing and steady",
        applies: |c: &TrendContext| c.slope > 100.0 && c.volatility < 0.3,
        score: 10,
    },
    Rule {
        label: "flat and steady",
        applies: |c: &TrendContext| c.slope.abs() < 50.0 && c.volatility < 0.3,
        score: 8,
    },
    Rule {
        label: "declining and erratic",
        applies: |c: &TrendContext| c.slope < -100.0 && c.volatility > 0.5,
        score: 4,
    },
    Rule {
        label: "very erratic",
        applies: |c: &TrendContext| c.volatility > 0.7,
        score: 3,
    },
];

/// Trend score when no rule matches.
pub const TREND_DEFAULT: u8 = 6;

// ============================================================================
// Auction score
// ============================================================================

/// Inputs to the auction score.
#[derive(Debug, Clone, Copy)]
pub struct AuctionContext {
    /// Minimum bid (0 if none).
    pub min_bid: f64,
    /// Listing (buy-it-now) price (0 if none).
    pub listing_price: f64,
    /// Last transaction price (0 if unknown).
    pub last_transaction: f64,
    /// Regression slope.
    pub slope: f64,
    /// Valuation at 10%.
    pub at_10: f64,
    /// Valuation at 15%.
    pub at_15: f64,
}

/// Auction adjustments, all applied independently.
pub const AUCTION_ADJUSTMENTS: &[Adjustment<AuctionContext>] = &[
    Adjustment {
        label: "min bid within 15% valuation",
        applies: |c: &AuctionContext| c.min_bid > 0.0 && c.min_bid <= c.at_15,
        delta: 2,
    },
    Adjustment {
        label: "min bid within 10% valuation",
        applies: |c: &AuctionContext| c.min_bid > 0.0 && c.min_bid <= c.at_10,
        delta: 1,
    },
    Adjustment {
        label: "declining asset listed above last sale",
        applies: |c: &AuctionContext| {
            c.slope < 0.0 && c.last_transaction > 0.0 && c.listing_price > c.last_transaction
        },
        delta: -2,
    },
    Adjustment {
        label: "listed below last sale",
        applies: |c: &AuctionContext| {
            c.listing_price > 0.0 && c.listing_price < c.last_transaction
        },
        delta: 2,
    },
];
