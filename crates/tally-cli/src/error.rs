//! CLI error types.

use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid date format.
    #[error("Invalid date format: {0}. Use YYYY-MM-DD.")]
    InvalidDate(String),

    /// Invalid currency code.
    #[error("Invalid currency code: {0}. Use a three-letter code such as GBP.")]
    InvalidCurrency(String),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
