//! Partitioning and report assembly.

use tracing::{debug, info};

use super::grouping::{grouped_sum, GroupOrder};
use super::{AggregateByDate, AggregateByEntity, DirectionSplit, SettlementReport};
use crate::calendars::SettlementCalculator;
use crate::config::ReportConfig;
use crate::types::{Direction, TradeRecord};

/// Splits a batch into outgoing (buy) and incoming (sell) buckets.
///
/// Input order is preserved within each bucket.
pub fn partition(records: &[TradeRecord]) -> DirectionSplit<Vec<&TradeRecord>> {
    let mut split = DirectionSplit::new(Vec::new(), Vec::new());
    for record in records {
        match record.direction() {
            Direction::Buy => split.outgoing.push(record),
            Direction::Sell => split.incoming.push(record),
        }
    }
    debug!(
        outgoing = split.outgoing.len(),
        incoming = split.incoming.len(),
        "partitioned trade batch"
    );
    split
}

/// Builds a report with the default Sunday-Thursday currency set.
#[must_use]
pub fn build_report(records: &[TradeRecord]) -> SettlementReport {
    AggregationEngine::default().build_report(records)
}

/// Folds trade batches into settlement reports.
#[derive(Debug, Clone, Default)]
pub struct AggregationEngine {
    calculator: SettlementCalculator,
    parallel: bool,
}

impl AggregationEngine {
    /// Creates an engine around a settlement calculator.
    #[must_use]
    pub fn new(calculator: SettlementCalculator) -> Self {
        Self {
            calculator,
            parallel: false,
        }
    }

    /// Creates an engine from report configuration.
    #[must_use]
    pub fn from_config(config: &ReportConfig) -> Self {
        Self {
            calculator: SettlementCalculator::from_config(config),
            parallel: config.parallel,
        }
    }

    /// Requests parallel folds. Ignored unless the `parallel` feature is enabled.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Returns the settlement calculator.
    #[must_use]
    pub fn calculator(&self) -> &SettlementCalculator {
        &self.calculator
    }

    /// Totals per effective settlement date, ascending by date.
    #[must_use]
    pub fn aggregate_by_date(&self, bucket: &[&TradeRecord]) -> Vec<AggregateByDate> {
        grouped_sum(
            bucket,
            |t| {
                self.calculator
                    .resolve(t.settlement_date(), t.currency().as_str())
            },
            |t| t.trade_value(),
            GroupOrder::KeyAscending,
        )
        .into_iter()
        .map(|(date, total_value)| AggregateByDate { date, total_value })
        .collect()
    }

    /// Totals per entity, descending by value.
    ///
    /// Entities with equal totals keep the order in which they first appear
    /// in the bucket.
    #[must_use]
    pub fn aggregate_by_entity(&self, bucket: &[&TradeRecord]) -> Vec<AggregateByEntity> {
        grouped_sum(
            bucket,
            |t| t.entity().to_string(),
            |t| t.trade_value(),
            GroupOrder::ValueDescending,
        )
        .into_iter()
        .map(|(entity, total_value)| AggregateByEntity {
            entity,
            total_value,
        })
        .collect()
    }

    /// Partitions the batch and computes both views for both buckets.
    #[must_use]
    pub fn build_report(&self, records: &[TradeRecord]) -> SettlementReport {
        let buckets = partition(records);

        let (by_date, by_entity) = if self.parallel {
            self.fold_parallel(&buckets)
        } else {
            self.fold_sequential(&buckets)
        };

        let report = SettlementReport {
            by_date,
            by_entity,
            record_counts: DirectionSplit::new(buckets.outgoing.len(), buckets.incoming.len()),
        };

        info!(
            records = records.len(),
            outgoing_dates = report.by_date.outgoing.len(),
            incoming_dates = report.by_date.incoming.len(),
            outgoing_entities = report.by_entity.outgoing.len(),
            incoming_entities = report.by_entity.incoming.len(),
            "settlement report built"
        );
        report
    }

    fn fold_sequential(
        &self,
        buckets: &DirectionSplit<Vec<&TradeRecord>>,
    ) -> (
        DirectionSplit<Vec<AggregateByDate>>,
        DirectionSplit<Vec<AggregateByEntity>>,
    ) {
        (
            DirectionSplit::new(
                self.aggregate_by_date(&buckets.outgoing),
                self.aggregate_by_date(&buckets.incoming),
            ),
            DirectionSplit::new(
                self.aggregate_by_entity(&buckets.outgoing),
                self.aggregate_by_entity(&buckets.incoming),
            ),
        )
    }

    #[cfg(feature = "parallel")]
    fn fold_parallel(
        &self,
        buckets: &DirectionSplit<Vec<&TradeRecord>>,
    ) -> (
        DirectionSplit<Vec<AggregateByDate>>,
        DirectionSplit<Vec<AggregateByEntity>>,
    ) {
        let ((out_dates, in_dates), (out_entities, in_entities)) = rayon::join(
            || {
                rayon::join(
                    || self.aggregate_by_date(&buckets.outgoing),
                    || self.aggregate_by_date(&buckets.incoming),
                )
            },
            || {
                rayon::join(
                    || self.aggregate_by_entity(&buckets.outgoing),
                    || self.aggregate_by_entity(&buckets.incoming),
                )
            },
        );
        (
            DirectionSplit::new(out_dates, in_dates),
            DirectionSplit::new(out_entities, in_entities),
        )
    }

    #[cfg(not(feature = "parallel"))]
    fn fold_parallel(
        &self,
        buckets: &DirectionSplit<Vec<&TradeRecord>>,
    ) -> (
        DirectionSplit<Vec<AggregateByDate>>,
        DirectionSplit<Vec<AggregateByEntity>>,
    ) {
        debug!("parallel aggregation requested but the `parallel` feature is disabled");
        self.fold_sequential(buckets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Date;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn trade(
        entity: &str,
        direction: Direction,
        currency: &str,
        date: Date,
        ppu: Decimal,
    ) -> TradeRecord {
        TradeRecord::builder()
            .entity(entity)
            .direction(direction)
            .agreed_fx(dec!(1))
            .currency(currency)
            .settlement_date(date)
            .units(1)
            .price_per_unit(ppu)
            .build()
            .unwrap()
    }

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_partition_preserves_order() {
        let batch = vec![
            trade("a", Direction::Buy, "USD", d(2017, 7, 10), dec!(1)),
            trade("b", Direction::Sell, "USD", d(2017, 7, 10), dec!(2)),
            trade("c", Direction::Buy, "USD", d(2017, 7, 10), dec!(3)),
        ];
        let split = partition(&batch);
        let out: Vec<_> = split.outgoing.iter().map(|t| t.entity()).collect();
        let inc: Vec<_> = split.incoming.iter().map(|t| t.entity()).collect();
        assert_eq!(out, vec!["a", "c"]);
        assert_eq!(inc, vec!["b"]);
    }

    #[test]
    fn test_by_date_groups_on_effective_date() {
        let engine = AggregationEngine::default();
        let batch = vec![
            // Saturday and Sunday both roll to Monday 17 Jul
            trade("a", Direction::Buy, "GBP", d(2017, 7, 15), dec!(10)),
            trade("b", Direction::Buy, "GBP", d(2017, 7, 16), dec!(5)),
            trade("c", Direction::Buy, "GBP", d(2017, 7, 17), dec!(1)),
            // Friday AED rolls to Sunday 16 Jul
            trade("d", Direction::Buy, "AED", d(2017, 7, 14), dec!(7)),
        ];
        let split = partition(&batch);
        let by_date = engine.aggregate_by_date(&split.outgoing);

        assert_eq!(
            by_date,
            vec![
                AggregateByDate {
                    date: d(2017, 7, 16),
                    total_value: dec!(7)
                },
                AggregateByDate {
                    date: d(2017, 7, 17),
                    total_value: dec!(16)
                },
            ]
        );
    }

    #[test]
    fn test_by_entity_ranks_descending() {
        let engine = AggregationEngine::default();
        let batch = vec![
            trade("A", Direction::Buy, "USD", d(2017, 7, 10), dec!(100)),
            trade("B", Direction::Buy, "USD", d(2017, 7, 11), dec!(200)),
        ];
        let split = partition(&batch);
        let ranking = engine.aggregate_by_entity(&split.outgoing);
        assert_eq!(
            ranking,
            vec![
                AggregateByEntity {
                    entity: "B".into(),
                    total_value: dec!(200)
                },
                AggregateByEntity {
                    entity: "A".into(),
                    total_value: dec!(100)
                },
            ]
        );
    }

    #[test]
    fn test_trades_at_value_cap_aggregate_exactly() {
        use crate::types::MAX_TRADE_VALUE;

        let date = d(2017, 7, 10);
        let batch: Vec<_> = (0..5)
            .map(|i| trade(&format!("E{}", i % 2), Direction::Buy, "USD", date, MAX_TRADE_VALUE))
            .collect();
        let report = build_report(&batch);

        assert_eq!(report.by_date.outgoing[0].total_value, MAX_TRADE_VALUE * dec!(5));
        assert_eq!(report.by_entity.outgoing[0].entity, "E0");
        assert_eq!(report.by_entity.outgoing[0].total_value, MAX_TRADE_VALUE * dec!(3));
        assert_eq!(report.total(Direction::Buy), MAX_TRADE_VALUE * dec!(5));
    }

    #[test]
    fn test_empty_batch() {
        let report = build_report(&[]);
        assert!(report.is_empty());
        assert!(report.by_date.outgoing.is_empty());
        assert!(report.by_entity.incoming.is_empty());
    }

    #[test]
    fn test_engine_from_config_uses_configured_calendar() {
        let config = ReportConfig::default().with_sunday_thursday_currencies(["GBP"]);
        let engine = AggregationEngine::from_config(&config);
        let batch = vec![trade("a", Direction::Sell, "GBP", d(2017, 7, 14), dec!(1))];
        let report = engine.build_report(&batch);
        assert_eq!(report.by_date.incoming[0].date, d(2017, 7, 16));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut batch = Vec::new();
        for i in 0..40u32 {
            let direction = if i % 3 == 0 { Direction::Sell } else { Direction::Buy };
            let currency = if i % 4 == 0 { "SAR" } else { "EUR" };
            batch.push(trade(
                &format!("E{}", i % 7),
                direction,
                currency,
                d(2017, 7, 1 + (i % 28)),
                Decimal::from(i + 1),
            ));
        }

        let sequential = AggregationEngine::default().build_report(&batch);
        let parallel = AggregationEngine::default()
            .with_parallel(true)
            .build_report(&batch);
        assert_eq!(sequential, parallel);
    }
}
