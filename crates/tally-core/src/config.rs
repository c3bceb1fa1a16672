//! Report configuration.
//!
//! Settings are read from TOML or JSON; every field has a default, so an
//! empty file is a valid configuration.
//!
//! ```toml
//! sunday_thursday_currencies = ["AED", "SAR"]
//! date_format = "%d-%b-%y"
//! invalid_rows = "skip"
//! parallel = false
//! ```

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::calendars::DEFAULT_SUNDAY_THURSDAY_CURRENCIES;
use crate::error::{TallyError, TallyResult};
use crate::types::is_currency_code;

// =============================================================================
// REPORT CONFIGURATION
// =============================================================================

/// What to do with an instruction row that fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidRowPolicy {
    /// Abort the load with the first row's error.
    #[default]
    Reject,
    /// Log the row at warn level and leave it out of the batch.
    Skip,
}

/// Configuration for a report run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Currencies settling on a Sunday-Thursday working week.
    pub sunday_thursday_currencies: Vec<String>,

    /// chrono format of the date columns in instruction files.
    pub date_format: String,

    /// Handling of rows that fail validation during ingestion.
    pub invalid_rows: InvalidRowPolicy,

    /// Run the independent aggregation folds in parallel
    /// (requires the `parallel` feature).
    pub parallel: bool,
}

/// Default date format of instruction files, e.g. `14-Jul-17`.
pub const DEFAULT_DATE_FORMAT: &str = "%d-%b-%y";

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            sunday_thursday_currencies: DEFAULT_SUNDAY_THURSDAY_CURRENCIES
                .iter()
                .map(|c| (*c).to_string())
                .collect(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            invalid_rows: InvalidRowPolicy::default(),
            parallel: false,
        }
    }
}

impl ReportConfig {
    /// Replaces the Sunday-Thursday currency set.
    #[must_use]
    pub fn with_sunday_thursday_currencies<I, S>(mut self, currencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sunday_thursday_currencies = currencies.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the instruction date format.
    #[must_use]
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Sets the invalid row policy.
    #[must_use]
    pub fn with_invalid_rows(mut self, policy: InvalidRowPolicy) -> Self {
        self.invalid_rows = policy;
        self
    }

    /// Enables or disables parallel aggregation.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Parses and validates a TOML configuration.
    pub fn from_toml_str(s: &str) -> TallyResult<Self> {
        let config: Self =
            toml::from_str(s).map_err(|e| TallyError::config(format!("invalid TOML: {e}")))?;
        config.validate_or_error()?;
        Ok(config)
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json_str(s: &str) -> TallyResult<Self> {
        let config: Self = serde_json::from_str(s)
            .map_err(|e| TallyError::config(format!("invalid JSON: {e}")))?;
        config.validate_or_error()?;
        Ok(config)
    }

    /// Loads a configuration file, choosing the parser by extension.
    ///
    /// `.json` files are parsed as JSON; anything else as TOML.
    pub fn load(path: impl AsRef<Path>) -> TallyResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            TallyError::config(format!("cannot read {}: {e}", path.display()))
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json_str(&contents)
        } else {
            Self::from_toml_str(&contents)
        }
    }
}

// =============================================================================
// VALIDATION
// =============================================================================

/// A single validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Field that failed validation.
    pub field: String,
    /// Validation error message.
    pub message: String,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Trait for validatable configurations.
pub trait Validate {
    /// Validates the configuration.
    ///
    /// Returns a list of validation errors, or an empty vector if valid.
    fn validate(&self) -> Vec<ValidationError>;

    /// Returns true if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Validates and returns an error if invalid.
    fn validate_or_error(&self) -> TallyResult<()> {
        let errors = self.validate();
        if errors.is_empty() {
            return Ok(());
        }
        let joined = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Err(TallyError::config(joined))
    }
}

impl Validate for ReportConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        for code in &self.sunday_thursday_currencies {
            if !is_currency_code(code.trim()) {
                errors.push(ValidationError::new(
                    "sunday_thursday_currencies",
                    format!("{code:?} is not a three-letter currency code"),
                ));
            }
        }

        if self.date_format.trim().is_empty() {
            errors.push(ValidationError::new("date_format", "must not be empty"));
        } else {
            let has = |specs: &[&str]| specs.iter().any(|s| self.date_format.contains(s));
            let complete = has(&["%d", "%e"])
                && has(&["%m", "%b", "%B", "%h"])
                && has(&["%y", "%Y"]);
            // %F and %D carry all three fields
            if !complete && !has(&["%F", "%D"]) {
                errors.push(ValidationError::new(
                    "date_format",
                    format!("{:?} must contain day, month and year", self.date_format),
                ));
            }
        }

        errors
    }
}
