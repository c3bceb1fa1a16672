//! CLI command implementations.

pub mod report;
pub mod settle;

pub use report::ReportArgs;
pub use settle::SettleArgs;

use tally_core::types::{is_currency_code, Date};

use crate::error::{CliError, CliResult};

/// Parses a date string in YYYY-MM-DD format.
pub fn parse_date(s: &str) -> CliResult<Date> {
    Date::parse(s.trim()).map_err(|_| CliError::InvalidDate(s.to_string()))
}

/// Validates a currency code, returning it upper-cased.
pub fn validate_currency(code: &str) -> CliResult<String> {
    let code = code.trim();
    if !is_currency_code(code) {
        return Err(CliError::InvalidCurrency(code.to_string()));
    }
    Ok(code.to_ascii_uppercase())
}
