//! Listing command implementation.
//!
//! Reads a listing-data file, one value per line:
//!
//! ```text
//! L1234              listing id
//! payouts.csv        earnings CSV (relative to this file)
//! 8                  years remaining
//! 12000              listing price
//! 9000               min bid
//! 11500              last transaction
//! 12500              marketplace median
//! ```
//!
//! If the earnings CSV does not exist, `<listing id>_earnings.csv` next to
//! the listing file is used instead.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use royalty_analytics::deal::DealRequest;
use royalty_analytics::scoring::ListingPrices;

use crate::cli::OutputFormat;
use crate::commands::{
    archived_earnings_path, load_config, load_earnings, parse_years, run, validate_prices,
    SummaryOptions,
};
use crate::error::{CliError, CliResult};
use crate::output::print_warning;

/// Number of values in a listing file.
const LISTING_LINES: usize = 7;

/// Arguments for the listing command.
#[derive(Args, Debug)]
pub struct ListingArgs {
    /// Listing-data file
    pub file: PathBuf,

    /// Directory for the deal summary
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Rename the earnings file to `<listing id>_earnings.csv` afterwards
    #[arg(long)]
    pub archive: bool,

    /// TOML file with discount rates and solver settings
    #[arg(short, long, env = "ROYALTY_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Parsed listing-data file.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingFile {
    /// Listing id.
    pub listing_id: String,
    /// Earnings CSV as written in the file, resolved against its directory.
    pub earnings: PathBuf,
    /// Years of payouts remaining.
    pub years_remaining: u32,
    /// Listing prices.
    pub prices: ListingPrices,
}

impl ListingFile {
    /// Parses the file contents. `path` is used for messages and to resolve
    /// a relative earnings path.
    pub fn parse(path: &Path, content: &str) -> CliResult<Self> {
        let lines: Vec<&str> = content.lines().map(str::trim).collect();
        if lines.len() < LISTING_LINES {
            return Err(CliError::InvalidListing {
                path: path.to_path_buf(),
                line: lines.len() + 1,
                reason: format!("expected {LISTING_LINES} lines, found {}", lines.len()),
            });
        }

        let listing_id = lines[0].to_string();
        if listing_id.is_empty() {
            return Err(invalid(path, 1, "listing id is empty"));
        }

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        let earnings = base.join(lines[1]);

        let prices = ListingPrices {
            listing_price: parse_line(path, &lines, 3)?,
            min_bid: parse_line(path, &lines, 4)?,
            last_transaction: parse_line(path, &lines, 5)?,
            marketplace_median: parse_line(path, &lines, 6)?,
        };

        let years_remaining =
            parse_years(lines[2]).map_err(|reason| invalid(path, 3, reason))?;

        Ok(Self {
            listing_id,
            earnings,
            years_remaining,
            prices,
        })
    }

    /// The earnings file to read: the listed one, or an archived copy.
    ///
    /// Archived copies are looked up next to the listed CSV first (where
    /// `--archive` puts them), then next to the listing file.
    pub fn resolve_earnings(&self, listing_path: &Path) -> CliResult<PathBuf> {
        if self.earnings.is_file() {
            return Ok(self.earnings.clone());
        }

        let mut tried = vec![archived_earnings_path(&self.earnings, &self.listing_id)];
        let beside_listing = archived_earnings_path(listing_path, &self.listing_id);
        if !tried.contains(&beside_listing) {
            tried.push(beside_listing);
        }

        if let Some(fallback) = tried.iter().find(|p| p.is_file()) {
            print_warning(&format!(
                "{} not found, using {}",
                self.earnings.display(),
                fallback.display()
            ));
            return Ok(fallback.clone());
        }

        Err(CliError::EarningsNotFound {
            listed: self.earnings.clone(),
            tried,
        })
    }
}

fn invalid(path: &Path, line: usize, reason: impl Into<String>) -> CliError {
    CliError::InvalidListing {
        path: path.to_path_buf(),
        line,
        reason: reason.into(),
    }
}

/// Parses the value on 0-based line `index`.
fn parse_line<T>(path: &Path, lines: &[&str], index: usize) -> CliResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lines[index]
        .parse()
        .map_err(|e: T::Err| invalid(path, index + 1, format!("'{}': {e}", lines[index])))
}

/// Execute the listing command.
pub fn execute(args: ListingArgs, format: OutputFormat, quiet: bool) -> Result<()> {
    let content = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read listing file {}", args.file.display()))?;
    let listing = ListingFile::parse(&args.file, &content)?;
    debug!(listing_id = %listing.listing_id, "parsed listing file");

    validate_prices(&listing.prices)?;
    let earnings_path = listing.resolve_earnings(&args.file)?;

    let config = load_config(args.config.as_deref())?;
    let records = load_earnings(&earnings_path)?;
    let request = DealRequest::new(records, listing.years_remaining)
        .with_prices(listing.prices)
        .with_config(config);

    let options = SummaryOptions {
        listing_id: Some(listing.listing_id),
        output_dir: args.output_dir,
        archive: args.archive,
    };

    run(&request, &earnings_path, &options, format, quiet)
}
