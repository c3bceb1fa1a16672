//! Settle command implementation.
//!
//! Resolves the effective settlement date for one currency and date.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use tally_core::calendars::{Calendar, SettlementCalculator};
use tally_core::config::ReportConfig;

use crate::cli::OutputFormat;
use crate::commands::{parse_date, validate_currency};
use crate::output::{format_date, print_header, print_rows, print_single, KeyValue};

/// Arguments for the settle command.
#[derive(Args, Debug)]
pub struct SettleArgs {
    /// Instructed settlement date (YYYY-MM-DD)
    #[arg(short, long)]
    pub date: String,

    /// Settlement currency code
    #[arg(short, long)]
    pub currency: String,
}

/// Settle command result.
#[derive(Debug, Serialize)]
struct SettleResult {
    currency: String,
    calendar: &'static str,
    instructed_date: String,
    instructed_weekday: String,
    effective_date: String,
    effective_weekday: String,
    days_shifted: i64,
}

/// Execute the settle command.
pub fn execute(args: SettleArgs, config: &ReportConfig, format: OutputFormat) -> Result<()> {
    let date = parse_date(&args.date)?;
    let currency = validate_currency(&args.currency)?;

    let calculator = SettlementCalculator::from_config(config);
    let calendar = calculator.calendar_for(&currency);
    let effective = calculator.resolve(date, &currency);

    let result = SettleResult {
        currency,
        calendar: calendar.name(),
        instructed_date: date.to_string(),
        instructed_weekday: date.weekday().to_string(),
        effective_date: effective.to_string(),
        effective_weekday: effective.weekday().to_string(),
        days_shifted: date.days_between(&effective),
    };

    match format {
        OutputFormat::Table => {
            print_header(&format!("Settlement: {}", result.currency));
            let rows = vec![
                KeyValue::new("Calendar", result.calendar),
                KeyValue::new(
                    "Instructed",
                    format!("{} ({})", format_date(date), result.instructed_weekday),
                ),
                KeyValue::new(
                    "Effective",
                    format!("{} ({})", format_date(effective), result.effective_weekday),
                ),
                KeyValue::new("Days Shifted", result.days_shifted.to_string()),
            ];
            print_rows(&rows, format)?;
        }
        OutputFormat::Json | OutputFormat::Csv => print_single(&result, format)?,
    }

    Ok(())
}
