//! Output formatting utilities.

use colored::Colorize;
use royalty_analytics::deal::{FieldValue, SummaryField};
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

/// Keys shown as percentages in tables.
const PERCENT_KEYS: [&str; 2] = ["CAGR", "Volatility"];

/// Prints rows as a formatted table.
pub fn print_table<T: Tabled>(data: &[T]) {
    if data.is_empty() {
        println!("No results.");
        return;
    }

    let table = Table::new(data)
        .with(Style::rounded())
        .with(Modify::new(Columns::first()).with(Alignment::left()))
        .to_string();

    println!("{table}");
}

/// Prints a value as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(data: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// Prints a success message.
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Prints a warning message.
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message);
}

/// Prints a header for a section.
pub fn print_header(title: &str) {
    println!("\n{}", title.bold().underline());
}

/// A key-value pair for display.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct KeyValue {
    #[tabled(rename = "Metric")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl KeyValue {
    /// Creates a new key-value pair.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Formats a summary field for a table: money to cents, rates as percent.
    pub fn from_field(field: &SummaryField) -> Self {
        let value = match &field.value {
            FieldValue::Number(n) if PERCENT_KEYS.contains(&field.key.as_str()) => {
                format!("{:.2}%", n * 100.0)
            }
            FieldValue::Number(n) => format!("{n:.2}"),
            other => other.to_string(),
        };
        Self::new(field.key.clone(), value)
    }
}

/// One projected year.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct ForecastRow {
    #[tabled(rename = "Year")]
    pub year: i32,
    #[tabled(rename = "Projected")]
    pub amount: String,
}
