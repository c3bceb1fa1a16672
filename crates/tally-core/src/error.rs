//! Error types for the Tally library.
//!
//! Settlement resolution and aggregation are total over well-formed input,
//! so every variant here is raised while building or loading records and
//! configuration, never while computing a report.

use thiserror::Error;

/// A specialized Result type for Tally operations.
pub type TallyResult<T> = Result<T, TallyError>;

/// The main error type for Tally operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TallyError {
    /// Error in date construction or parsing.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// A raw field could not be coerced to its typed form.
    #[error("Malformed field '{field}': {value:?} ({reason})")]
    MalformedField {
        /// Name of the offending column.
        field: String,
        /// The raw value as read.
        value: String,
        /// Why coercion failed.
        reason: String,
    },

    /// A required field is absent or empty.
    #[error("Missing field: {field}")]
    MissingField {
        /// Name of the missing column.
        field: String,
    },

    /// A direction code that is neither buy nor sell.
    #[error("Invalid direction: {value:?} (expected 'B' or 'S')")]
    InvalidDirection {
        /// The rejected direction code.
        value: String,
    },

    /// A trade record failed construction-time validation.
    #[error("Invalid trade: {reason}")]
    InvalidTrade {
        /// Description of what's invalid.
        reason: String,
    },

    /// Configuration error.
    #[error("Configuration error: {reason}")]
    ConfigError {
        /// Description of the configuration error.
        reason: String,
    },

    /// Reading an input source failed.
    #[error("I/O error: {0}")]
    Io(String),
}

impl TallyError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates a malformed field error.
    #[must_use]
    pub fn malformed(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedField {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Creates a missing field error.
    #[must_use]
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Creates an invalid trade error.
    #[must_use]
    pub fn invalid_trade(reason: impl Into<String>) -> Self {
        Self::InvalidTrade {
            reason: reason.into(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(reason: impl Into<String>) -> Self {
        Self::ConfigError {
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for TallyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
