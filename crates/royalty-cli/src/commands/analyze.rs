//! Analyze command implementation.
//!
//! Rates a listing from an earnings CSV and prices given as flags.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use royalty_analytics::deal::DealRequest;
use royalty_analytics::scoring::ListingPrices;

use crate::cli::OutputFormat;
use crate::commands::{
    load_config, load_earnings, parse_years, run, validate_prices, SummaryOptions,
};

/// Arguments for the analyze command.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Earnings CSV with `distribution_year` and `payable_amount` columns
    #[arg(short, long)]
    pub earnings: PathBuf,

    /// Years of payouts remaining on the contract
    #[arg(short, long, value_parser = parse_years)]
    pub years: u32,

    /// Buy-it-now price (0 = not listed)
    #[arg(short, long, default_value = "0")]
    pub listing_price: f64,

    /// Minimum auction bid (0 = none)
    #[arg(short, long, default_value = "0")]
    pub min_bid: f64,

    /// Last price this asset sold for (0 = unknown)
    #[arg(long, default_value = "0")]
    pub last_transaction: f64,

    /// Median price of comparable listings (0 = unknown)
    #[arg(long, default_value = "0")]
    pub marketplace_median: f64,

    /// Discount rate as a decimal, e.g. 0.125. Repeat for several; replaces the configured set.
    #[arg(short, long = "rate")]
    pub rates: Vec<f64>,

    /// Listing id; enables writing the deal summary
    #[arg(long)]
    pub listing_id: Option<String>,

    /// Directory for the deal summary
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Rename the earnings file to `<listing-id>_earnings.csv` afterwards
    #[arg(long, requires = "listing_id")]
    pub archive: bool,

    /// TOML file with discount rates and solver settings
    #[arg(short, long, env = "ROYALTY_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Execute the analyze command.
pub fn execute(args: AnalyzeArgs, format: OutputFormat, quiet: bool) -> Result<()> {
    let prices = ListingPrices {
        listing_price: args.listing_price,
        min_bid: args.min_bid,
        last_transaction: args.last_transaction,
        marketplace_median: args.marketplace_median,
    };
    validate_prices(&prices)?;

    let mut config = load_config(args.config.as_deref())?;
    if !args.rates.is_empty() {
        config = config.with_discount_rates(args.rates);
    }

    let records = load_earnings(&args.earnings)?;
    let request = DealRequest::new(records, args.years)
        .with_prices(prices)
        .with_config(config);

    let options = SummaryOptions {
        listing_id: args.listing_id,
        output_dir: args.output_dir,
        archive: args.archive,
    };

    run(&request, &args.earnings, &options, format, quiet)
}
