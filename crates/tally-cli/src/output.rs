//! Output formatting utilities.

use colored::Colorize;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

use tally_core::report::{AggregateByDate, AggregateByEntity};
use tally_core::types::{Date, Direction};

use crate::cli::OutputFormat;

/// Date format used for display.
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// Formats and prints rows based on the specified format.
pub fn print_rows<T: Serialize + Tabled>(data: &[T], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => print_table(data),
        OutputFormat::Json => print_json(data),
        OutputFormat::Csv => print_csv(data),
    }
}

/// Prints a single result.
pub fn print_single<T: Serialize>(data: &T, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table | OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(data)?);
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            wtr.serialize(data)?;
            wtr.flush()?;
        }
    }
    Ok(())
}

/// Prints data as a formatted table.
fn print_table<T: Tabled>(data: &[T]) -> anyhow::Result<()> {
    if data.is_empty() {
        println!("No results.");
        return Ok(());
    }

    let table = Table::new(data)
        .with(Style::rounded())
        .with(Modify::new(Columns::first()).with(Alignment::left()))
        .to_string();

    println!("{}", table);
    Ok(())
}

/// Prints data as JSON.
fn print_json<T: Serialize>(data: &[T]) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// Prints data as CSV.
fn print_csv<T: Serialize>(data: &[T]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for item in data {
        wtr.serialize(item)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Formats a monetary total, e.g. `$30075.00`.
pub fn format_usd(value: Decimal) -> String {
    format!("${:.2}", value)
}

/// Formats a date as `dd/mm/yyyy`.
pub fn format_date(date: Date) -> String {
    date.format(DISPLAY_DATE_FORMAT)
}

/// Upper-case section label for a direction.
pub fn side_label(direction: Direction) -> &'static str {
    match direction {
        Direction::Buy => "BUY",
        Direction::Sell => "SELL",
    }
}

/// Prints a warning message.
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message);
}

/// Prints a header for a section.
pub fn print_header(title: &str) {
    println!("\n{}", title.bold().underline());
}

/// Prints a section title.
pub fn print_section(title: &str) {
    println!("\n{}", title.bold());
}

/// Prints a summary line under a section.
pub fn print_summary(total: Decimal, count: usize) {
    let noun = if count == 1 { "instruction" } else { "instructions" };
    println!("{}", format!("Total: {} ({count} {noun})", format_usd(total)).dimmed());
}

// =============================================================================
// ROWS
// =============================================================================

/// One line of a settlement totals section.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct DateTotalRow {
    #[tabled(skip)]
    pub side: &'static str,
    #[tabled(rename = "Date")]
    pub date: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl DateTotalRow {
    /// Creates a display row from an aggregate.
    pub fn new(direction: Direction, aggregate: &AggregateByDate) -> Self {
        Self {
            side: side_label(direction),
            date: format_date(aggregate.date),
            value: format_usd(aggregate.total_value),
        }
    }
}

/// One line of an entity ranking section.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct RankingRow {
    #[tabled(skip)]
    pub side: &'static str,
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[tabled(rename = "Entity")]
    pub entity: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl RankingRow {
    /// Numbers a ranking view from 1.
    pub fn ranked(direction: Direction, view: &[AggregateByEntity]) -> Vec<Self> {
        view.iter()
            .enumerate()
            .map(|(i, aggregate)| Self {
                side: side_label(direction),
                rank: i + 1,
                entity: aggregate.entity.clone(),
                value: format_usd(aggregate.total_value),
            })
            .collect()
    }
}

/// A key-value pair for display.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct KeyValue {
    #[tabled(rename = "Field")]
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
}
