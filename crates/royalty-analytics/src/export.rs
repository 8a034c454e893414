//! Flat CSV export of a deal result.

use std::io::Write;

use crate::deal::DealResult;
use crate::error::AnalyticsResult;

/// Writes the flat record as CSV: one header row, one data row.
///
/// # Errors
///
/// Returns [`crate::AnalyticsError::Export`] if the writer fails.
pub fn write_summary<W: Write>(result: &DealResult, writer: W) -> AnalyticsResult<()> {
    let record = result.to_record();
    let mut csv = csv::Writer::from_writer(writer);

    csv.write_record(record.iter().map(|field| field.key.as_str()))?;
    csv.write_record(record.iter().map(|field| field.value.to_string()))?;
    csv.flush()?;
    Ok(())
}

/// File name of the summary for a listing, e.g. `"L42_B+_deal_summary.csv"`.
#[must_use]
pub fn summary_file_name(listing_id: &str, result: &DealResult) -> String {
    format!("{listing_id}_{}_deal_summary.csv", result.rating)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deal::{analyze_deal, DealRequest};
    use crate::earnings::EarningsRecord;

    fn result() -> DealResult {
        let records = vec![
            EarningsRecord::new(2020, 1_000.0),
            EarningsRecord::new(2021, 1_050.0),
            EarningsRecord::new(2022, 1_100.0),
        ];
        analyze_deal(&DealRequest::new(records, 2)).unwrap()
    }

    #[test]
    fn test_two_rows() {
        let mut buf = Vec::new();
        write_summary(&result(), &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Earnings Trend,CAGR,Volatility"));
        assert!(lines[0].contains("Valuation 12.5%"));
        assert!(lines[1].starts_with("Stable/Linear,"));
        assert!(lines[1].ends_with(",N/A"));
    }

    #[test]
    fn test_summary_file_name() {
        let result = result();
        let name = summary_file_name("L42", &result);
        assert_eq!(name, format!("L42_{}_deal_summary.csv", result.rating));
    }
}
