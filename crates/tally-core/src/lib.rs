//! # Tally Core
//!
//! Core types, calendars, and aggregation for trade settlement reporting.
//!
//! This crate provides the building blocks used throughout Tally:
//!
//! - **Types**: `Date`, `CurrencyCode`, `Direction`, `TradeRecord`
//! - **Calendars**: Monday-Friday and Sunday-Thursday working weeks, and the
//!   `SettlementCalculator` that rolls weekend settlement dates forward
//! - **Report**: partitioning by direction and grouped totals by effective
//!   settlement date and by counterparty entity
//! - **Config**: the currency set and ingestion settings for a report run
//!
//! ## Example
//!
//! ```rust
//! use tally_core::prelude::*;
//! use rust_decimal_macros::dec;
//!
//! let trade = TradeRecord::builder()
//!     .entity("test")
//!     .direction(Direction::Buy)
//!     .agreed_fx(dec!(1.5))
//!     .currency("AED")
//!     .settlement_date(Date::from_ymd(2017, 7, 14).unwrap())
//!     .units(100)
//!     .price_per_unit(dec!(200.50))
//!     .build()
//!     .unwrap();
//!
//! let report = build_report(&[trade]);
//! assert_eq!(report.by_date.outgoing[0].date, Date::from_ymd(2017, 7, 16).unwrap());
//! assert_eq!(report.by_date.outgoing[0].total_value, dec!(30075));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::trivially_copy_pass_by_ref)]

pub mod calendars;
pub mod config;
pub mod error;
pub mod report;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::calendars::{
        resolve_effective_settlement_date, Calendar, SettlementCalculator, WeekendType,
        WorkingWeekCalendar,
    };
    pub use crate::config::{InvalidRowPolicy, ReportConfig, Validate};
    pub use crate::error::{TallyError, TallyResult};
    pub use crate::report::{
        build_report, partition, AggregateByDate, AggregateByEntity, AggregationEngine,
        DirectionSplit, SettlementReport,
    };
    pub use crate::types::{CurrencyCode, Date, Direction, TradeRecord};
}

// Re-export commonly used types at crate root
pub use error::{TallyError, TallyResult};
pub use types::{Date, Direction, TradeRecord};
