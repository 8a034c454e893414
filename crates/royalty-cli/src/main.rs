//! Royalty CLI - deal analysis for royalty listings.
//!
//! # Usage
//!
//! ```bash
//! # Analyze an earnings history against a listing
//! royalty analyze --earnings payouts.csv --years 8 --listing-price 12000 --min-bid 9000
//!
//! # Same, with the listing described in a seven-line file
//! royalty listing L1234.txt --output-dir summaries --archive
//!
//! # Machine-readable output
//! royalty --format json analyze --earnings payouts.csv --years 8
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod error;
mod output;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over --verbose
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose { "debug" } else { "warn" })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let format = cli.format;
    let quiet = cli.quiet;

    match cli.command {
        Commands::Analyze(args) => commands::analyze::execute(args, format, quiet)?,
        Commands::Listing(args) => commands::listing::execute(args, format, quiet)?,
    }

    Ok(())
}
