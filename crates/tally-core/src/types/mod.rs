//! Domain types for settlement reporting.
//!
//! - [`Date`]: Calendar date for settlement calculations
//! - [`CurrencyCode`]: Three-letter currency code
//! - [`Direction`]: Buy (outgoing) or sell (incoming)
//! - [`TradeRecord`]: A validated settlement instruction

mod currency;
mod date;
mod direction;
mod trade;

pub use currency::{is_currency_code, CurrencyCode};
pub use date::Date;
pub use direction::Direction;
pub use trade::{TradeRecord, TradeRecordBuilder, MAX_TRADE_VALUE};
