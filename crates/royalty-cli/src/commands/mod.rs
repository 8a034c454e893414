//! CLI command implementations.

pub mod analyze;
pub mod listing;

pub use analyze::AnalyzeArgs;
pub use listing::ListingArgs;

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use royalty_analytics::config::AnalysisConfig;
use royalty_analytics::deal::{analyze_deal, DealRequest, DealResult};
use royalty_analytics::earnings::EarningsRecord;
use royalty_analytics::export::{summary_file_name, write_summary};
use royalty_analytics::scoring::ListingPrices;

use crate::cli::OutputFormat;
use crate::error::{CliError, CliResult};
use crate::output::{
    print_header, print_json, print_success, print_table, ForecastRow, KeyValue,
};

/// One row of the earnings CSV. Other columns are ignored.
#[derive(Debug, Deserialize)]
struct EarningsRow {
    distribution_year: i32,
    payable_amount: f64,
}

/// Reads payout records from an earnings CSV.
pub fn load_earnings(path: &Path) -> Result<Vec<EarningsRecord>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open earnings file {}", path.display()))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut records = Vec::new();
    for (i, row) in reader.deserialize::<EarningsRow>().enumerate() {
        let row = row.map_err(|e| CliError::InvalidEarningsRow {
            path: path.to_path_buf(),
            row: i + 1,
            reason: e.to_string(),
        })?;
        records.push(EarningsRecord::new(row.distribution_year, row.payable_amount));
    }

    debug!(path = %path.display(), records = records.len(), "loaded earnings");
    Ok(records)
}

/// Loads the analysis configuration, or the defaults if no file is given.
pub fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    let Some(path) = path else {
        return Ok(AnalysisConfig::default());
    };

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config = AnalysisConfig::from_toml_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    Ok(config)
}

/// Parses a years-remaining value. Integral decimals such as `5.0` are
/// accepted; fractional and non-positive values are not.
pub fn parse_years(value: &str) -> Result<u32, String> {
    let value = value.trim();
    if let Ok(years) = value.parse::<u32>() {
        return if years > 0 {
            Ok(years)
        } else {
            Err("years remaining must be positive".to_string())
        };
    }

    let years: f64 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number of years"))?;
    if !years.is_finite() || years.fract() != 0.0 {
        return Err(format!("'{value}' is not a whole number of years"));
    }
    if years < 1.0 || years > f64::from(u32::MAX) {
        return Err(format!("'{value}' is out of range for years remaining"));
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let years = years as u32;
    Ok(years)
}

/// Checks that each price is zero or positive.
pub fn validate_prices(prices: &ListingPrices) -> CliResult<()> {
    let named = [
        ("listing price", prices.listing_price),
        ("min bid", prices.min_bid),
        ("last transaction", prices.last_transaction),
        ("marketplace median", prices.marketplace_median),
    ];
    for (name, value) in named {
        if !(value.is_finite() && value >= 0.0) {
            return Err(CliError::InvalidPrice { name, value });
        }
    }
    Ok(())
}

/// Where and whether to persist the summary.
#[derive(Debug, Clone)]
pub struct SummaryOptions {
    /// Listing id; nothing is written without one.
    pub listing_id: Option<String>,
    /// Directory for the summary CSV.
    pub output_dir: PathBuf,
    /// Rename the earnings file to `<listing_id>_earnings.csv`.
    pub archive: bool,
}

/// Runs the analysis and handles output, export and archiving.
pub fn run(
    request: &DealRequest,
    earnings_path: &Path,
    options: &SummaryOptions,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let result = analyze_deal(request).context("Deal analysis failed")?;
    info!(rating = %result.rating, score = result.final_score, "deal analysed");

    print_result(&result, format)?;

    let Some(listing_id) = options.listing_id.as_deref() else {
        return Ok(());
    };

    let summary_path = save_summary(&result, listing_id, &options.output_dir)?;
    if !quiet && format == OutputFormat::Table {
        print_success(&format!("Summary written to {}", summary_path.display()));
    }

    if options.archive {
        let archived = archive_earnings(earnings_path, listing_id)?;
        if !quiet && format == OutputFormat::Table {
            print_success(&format!("Earnings archived as {}", archived.display()));
        }
    }

    Ok(())
}

/// Writes `<output_dir>/<listing_id>_<rating>_deal_summary.csv`.
pub fn save_summary(result: &DealResult, listing_id: &str, output_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    let path = output_dir.join(summary_file_name(listing_id, result));
    let file = File::create(&path)
        .with_context(|| format!("Failed to create summary file {}", path.display()))?;
    write_summary(result, file)
        .with_context(|| format!("Failed to write summary file {}", path.display()))?;

    Ok(path)
}

/// Renames the earnings file to `<listing_id>_earnings.csv` in its directory.
pub fn archive_earnings(earnings_path: &Path, listing_id: &str) -> Result<PathBuf> {
    let target = archived_earnings_path(earnings_path, listing_id);
    if target == earnings_path {
        return Ok(target);
    }

    fs::rename(earnings_path, &target).with_context(|| {
        format!(
            "Failed to rename {} to {}",
            earnings_path.display(),
            target.display()
        )
    })?;
    Ok(target)
}

/// `<dir of earnings_path>/<listing_id>_earnings.csv`.
pub fn archived_earnings_path(earnings_path: &Path, listing_id: &str) -> PathBuf {
    let dir = earnings_path.parent().unwrap_or_else(|| Path::new(""));
    dir.join(format!("{listing_id}_earnings.csv"))
}

fn print_result(result: &DealResult, format: OutputFormat) -> Result<()> {
    let record = result.to_record();

    match format {
        OutputFormat::Table => {
            let rows: Vec<KeyValue> = record.iter().map(KeyValue::from_field).collect();
            print_header("Deal Analysis");
            print_table(&rows);

            let forecast: Vec<ForecastRow> = result
                .forecast
                .by_year()
                .map(|(year, amount)| ForecastRow {
                    year,
                    amount: format!("{amount:.2}"),
                })
                .collect();
            print_header(&format!("Forecast ({})", result.forecast.model));
            print_table(&forecast);
        }
        OutputFormat::Json => {
            let summary: serde_json::Map<String, serde_json::Value> = record
                .iter()
                .map(|field| serde_json::to_value(&field.value).map(|v| (field.key.clone(), v)))
                .collect::<Result<_, serde_json::Error>>()?;
            print_json(&summary)?;
        }
        OutputFormat::Csv => {
            write_summary(result, std::io::stdout())?;
        }
        OutputFormat::Minimal => {
            println!(
                "{} {:.2} {}",
                result.rating, result.final_score, result.implied_return
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_earnings_ignores_extra_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("e.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "source,distribution_year,payable_amount").unwrap();
        writeln!(file, "a,2020,100.5").unwrap();
        writeln!(file, "b,2021,200").unwrap();

        let records = load_earnings(&path).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0], EarningsRecord::new(2020, 100.5));
    }

    #[test]
    fn test_load_earnings_bad_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("e.csv");
        fs::write(&path, "distribution_year,payable_amount\n2020,abc\n").unwrap();

        let err = load_earnings(&path).unwrap_err();

        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_archived_path() {
        let path = Path::new("/data/raw/export.csv");
        assert_eq!(
            archived_earnings_path(path, "L7"),
            PathBuf::from("/data/raw/L7_earnings.csv")
        );
    }

    #[test]
    fn test_parse_years() {
        assert_eq!(parse_years("5"), Ok(5));
        assert_eq!(parse_years("5.0"), Ok(5));
        assert_eq!(parse_years(" 12.00 "), Ok(12));

        assert!(parse_years("5.5").is_err());
        assert!(parse_years("0").is_err());
        assert!(parse_years("0.0").is_err());
        assert!(parse_years("-3.0").is_err());
        assert!(parse_years("five").is_err());
        assert!(parse_years("inf").is_err());
    }

    #[test]
    fn test_validate_prices() {
        assert!(validate_prices(&ListingPrices::default()).is_ok());

        let bad = ListingPrices {
            min_bid: -5.0,
            ..ListingPrices::default()
        };
        assert!(matches!(
            validate_prices(&bad),
            Err(CliError::InvalidPrice { name: "min bid", .. })
        ));
    }
}
