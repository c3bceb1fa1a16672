//! Settlement report aggregation.
//!
//! A batch of [`TradeRecord`](crate::types::TradeRecord)s is partitioned into outgoing (buy) and
//! incoming (sell) buckets. Each bucket yields two independent views:
//!
//! - value by effective settlement date, ascending by date
//! - value by counterparty entity, descending by value
//!
//! ```rust
//! use tally_core::prelude::*;
//! use rust_decimal_macros::dec;
//!
//! let trade = |entity: &str, ppu| {
//!     TradeRecord::builder()
//!         .entity(entity)
//!         .direction(Direction::Buy)
//!         .agreed_fx(dec!(1))
//!         .currency("USD")
//!         .settlement_date(Date::from_ymd(2017, 7, 10).unwrap())
//!         .units(1)
//!         .price_per_unit(ppu)
//!         .build()
//!         .unwrap()
//! };
//!
//! let report = build_report(&[trade("A", dec!(100)), trade("B", dec!(200))]);
//! let ranking: Vec<_> = report
//!     .by_entity
//!     .outgoing
//!     .iter()
//!     .map(|a| a.entity.as_str())
//!     .collect();
//! assert_eq!(ranking, vec!["B", "A"]);
//! ```

mod engine;
mod grouping;

pub use engine::{build_report, partition, AggregationEngine};
pub use grouping::{grouped_sum, GroupOrder};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Date, Direction};

/// Total trade value settling on one effective date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateByDate {
    /// Effective settlement date.
    pub date: Date,
    /// Sum of trade values settling on `date`.
    pub total_value: Decimal,
}

/// Total trade value for one counterparty entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateByEntity {
    /// Counterparty entity.
    pub entity: String,
    /// Sum of trade values for `entity`.
    pub total_value: Decimal,
}

/// A keyed total produced by the aggregation engine.
pub trait Aggregate {
    /// Summed trade value of the group.
    fn total_value(&self) -> Decimal;
}

impl Aggregate for AggregateByDate {
    fn total_value(&self) -> Decimal {
        self.total_value
    }
}

impl Aggregate for AggregateByEntity {
    fn total_value(&self) -> Decimal {
        self.total_value
    }
}

/// Sums the totals of a sequence of aggregates, saturating at `Decimal::MAX`.
pub fn sum_totals<A: Aggregate>(aggregates: &[A]) -> Decimal {
    aggregates
        .iter()
        .map(Aggregate::total_value)
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// A pair of values, one per direction bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionSplit<T> {
    /// Buy side.
    pub outgoing: T,
    /// Sell side.
    pub incoming: T,
}

impl<T> DirectionSplit<T> {
    /// Creates a split from its two halves.
    pub fn new(outgoing: T, incoming: T) -> Self {
        Self { outgoing, incoming }
    }

    /// Returns the half for `direction`.
    pub fn get(&self, direction: Direction) -> &T {
        match direction {
            Direction::Buy => &self.outgoing,
            Direction::Sell => &self.incoming,
        }
    }

    /// Applies `f` to both halves.
    pub fn map<U, F: FnMut(T) -> U>(self, mut f: F) -> DirectionSplit<U> {
        DirectionSplit {
            outgoing: f(self.outgoing),
            incoming: f(self.incoming),
        }
    }
}

/// The two report views for both direction buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementReport {
    /// Totals per effective settlement date, ascending by date.
    pub by_date: DirectionSplit<Vec<AggregateByDate>>,
    /// Totals per entity, descending by value.
    pub by_entity: DirectionSplit<Vec<AggregateByEntity>>,
    /// Number of records in each bucket.
    pub record_counts: DirectionSplit<usize>,
}

impl SettlementReport {
    /// Total trade value of a bucket.
    #[must_use]
    pub fn total(&self, direction: Direction) -> Decimal {
        sum_totals(self.by_date.get(direction))
    }

    /// Number of records in a bucket.
    #[must_use]
    pub fn record_count(&self, direction: Direction) -> usize {
        *self.record_counts.get(direction)
    }

    /// Returns true if neither bucket holds any record.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.record_counts.outgoing == 0 && self.record_counts.incoming == 0
    }
}
