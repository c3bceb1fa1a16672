//! Currency code newtype.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{TallyError, TallyResult};

/// A three-letter currency code, stored upper case.
///
/// Any three ASCII letters are accepted: instruction files carry codes that
/// are not strictly ISO 4217 (e.g. `SGP`), and an unrecognised code simply
/// settles on the standard working week.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Creates a currency code, normalising to upper case.
    ///
    /// # Errors
    ///
    /// Returns `TallyError::MalformedField` unless the trimmed input is
    /// exactly three ASCII letters.
    pub fn new(code: &str) -> TallyResult<Self> {
        let trimmed = code.trim();
        if is_currency_code(trimmed) {
            Ok(Self(trimmed.to_ascii_uppercase()))
        } else {
            Err(TallyError::malformed(
                "currency",
                code,
                "expected three ASCII letters",
            ))
        }
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Returns true if `code` is exactly three ASCII letters.
#[must_use]
pub fn is_currency_code(code: &str) -> bool {
    code.len() == 3 && code.bytes().all(|b| b.is_ascii_alphabetic())
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CurrencyCode {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = TallyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl AsRef<str> for CurrencyCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
