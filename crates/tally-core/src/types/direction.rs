//! Trade direction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TallyError;

/// Side of a settlement instruction.
///
/// A buy is money going out; a sell is money coming in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Buy instruction (outgoing).
    Buy,
    /// Sell instruction (incoming).
    Sell,
}

impl Direction {
    /// Parses the single-letter instruction code (`B` or `S`, any case).
    ///
    /// # Errors
    ///
    /// Returns `TallyError::InvalidDirection` for anything else.
    pub fn from_code(code: &str) -> Result<Self, TallyError> {
        match code.trim() {
            "B" | "b" => Ok(Direction::Buy),
            "S" | "s" => Ok(Direction::Sell),
            other => Err(TallyError::InvalidDirection {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Buy => "Buy",
            Direction::Sell => "Sell",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Direction {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s)
    }
}
