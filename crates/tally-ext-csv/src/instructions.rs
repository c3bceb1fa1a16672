//! Instruction file reader.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use tally_core::config::{InvalidRowPolicy, ReportConfig};
use tally_core::types::{Date, Direction, TradeRecord};
use tally_core::{TallyError, TallyResult};

use crate::error::{IngestError, IngestResult, RowError};

/// Column names, in file order.
pub const COLUMNS: [&str; 8] = [
    "entity",
    "buy_sell",
    "agreed_fx",
    "currency",
    "instr_date",
    "settle_date",
    "units",
    "ppu",
];

// =============================================================================
// RAW ROWS
// =============================================================================

/// One instruction row as read, before any coercion.
///
/// A column that is absent from a short row is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInstruction {
    /// Counterparty entity.
    pub entity: Option<String>,
    /// Direction code, `B` or `S`.
    pub buy_sell: Option<String>,
    /// Agreed FX rate.
    pub agreed_fx: Option<String>,
    /// Currency code.
    pub currency: Option<String>,
    /// Instruction date.
    pub instr_date: Option<String>,
    /// Instructed settlement date.
    pub settle_date: Option<String>,
    /// Unit count.
    pub units: Option<String>,
    /// Price per unit.
    pub ppu: Option<String>,
}

impl RawInstruction {
    fn from_record(record: &StringRecord) -> Self {
        let col = |i: usize| record.get(i).map(str::to_string);
        Self {
            entity: col(0),
            buy_sell: col(1),
            agreed_fx: col(2),
            currency: col(3),
            instr_date: col(4),
            settle_date: col(5),
            units: col(6),
            ppu: col(7),
        }
    }

    /// Coerces the row into a validated trade record.
    ///
    /// # Errors
    ///
    /// - `MissingField` if a column is absent or empty
    /// - `MalformedField` if a number or date does not parse
    /// - `InvalidDirection` if `buy_sell` is not `B` or `S`
    /// - `InvalidTrade` if a value is out of range (e.g. zero units)
    pub fn into_trade(self, date_format: &str) -> TallyResult<TradeRecord> {
        let entity = required("entity", self.entity)?;
        let direction = Direction::from_code(&required("buy_sell", self.buy_sell)?)?;
        let agreed_fx = parse_decimal("agreed_fx", &required("agreed_fx", self.agreed_fx)?)?;
        let currency = required("currency", self.currency)?;
        let instr_date = parse_date("instr_date", &required("instr_date", self.instr_date)?, date_format)?;
        let settle_date =
            parse_date("settle_date", &required("settle_date", self.settle_date)?, date_format)?;
        let units = parse_units(&required("units", self.units)?)?;
        let ppu = parse_decimal("ppu", &required("ppu", self.ppu)?)?;

        TradeRecord::builder()
            .entity(entity)
            .direction(direction)
            .agreed_fx(agreed_fx)
            .currency(currency)
            .instructed_date(instr_date)
            .settlement_date(settle_date)
            .units(units)
            .price_per_unit(ppu)
            .build()
    }
}

fn required(field: &str, value: Option<String>) -> TallyResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(TallyError::missing(field)),
    }
}

fn parse_decimal(field: &str, raw: &str) -> TallyResult<Decimal> {
    Decimal::from_str(raw.trim()).map_err(|e| TallyError::malformed(field, raw, e.to_string()))
}

fn parse_units(raw: &str) -> TallyResult<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|e| TallyError::malformed("units", raw, e.to_string()))
}

fn parse_date(field: &str, raw: &str, format: &str) -> TallyResult<Date> {
    Date::parse_with_format(raw, format)
        .map_err(|_| TallyError::malformed(field, raw, format!("expected date as {format}")))
}

// =============================================================================
// READERS
// =============================================================================

/// Trade records loaded from a source, plus any rows that were skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstructionBatch {
    /// Valid records, in file order.
    pub records: Vec<TradeRecord>,
    /// Rows left out under the skip policy.
    pub skipped: Vec<RowError>,
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader)
}

/// Reads every row as raw strings, preserving order.
pub fn read_raw_instructions<R: Read>(reader: R) -> IngestResult<Vec<RawInstruction>> {
    let mut rdr = csv_reader(reader);
    let mut rows = Vec::new();
    for result in rdr.records() {
        rows.push(RawInstruction::from_record(&result?));
    }
    Ok(rows)
}

/// Reads and validates every row.
///
/// Under [`InvalidRowPolicy::Reject`] the first bad row aborts the load with
/// a [`RowError`]; under [`InvalidRowPolicy::Skip`] bad rows are logged and
/// collected in [`InstructionBatch::skipped`].
///
/// A row the CSV reader cannot decode (e.g. invalid UTF-8) counts as a bad
/// row under `Skip`. Under `Reject`, and for reader errors with no row
/// position, the load fails with [`IngestError::Csv`].
pub fn read_instructions<R: Read>(reader: R, config: &ReportConfig) -> IngestResult<InstructionBatch> {
    let mut rdr = csv_reader(reader);
    let mut batch = InstructionBatch::default();

    for (idx, result) in rdr.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                let position = err.position().map(csv::Position::line);
                match (config.invalid_rows, position) {
                    (InvalidRowPolicy::Skip, Some(line)) => {
                        let error = TallyError::malformed("record", "", err.to_string());
                        warn!(line, error = %error, "skipping unreadable instruction row");
                        batch.skipped.push(RowError { line, error });
                        continue;
                    }
                    _ => return Err(err.into()),
                }
            }
        };
        let line = record
            .position()
            .map_or(idx as u64 + 1, csv::Position::line);

        match RawInstruction::from_record(&record).into_trade(&config.date_format) {
            Ok(trade) => batch.records.push(trade),
            Err(error) => {
                let row_error = RowError { line, error };
                match config.invalid_rows {
                    InvalidRowPolicy::Reject => return Err(row_error.into()),
                    InvalidRowPolicy::Skip => {
                        warn!(line, error = %row_error.error, "skipping invalid instruction row");
                        batch.skipped.push(row_error);
                    }
                }
            }
        }
    }

    debug!(
        records = batch.records.len(),
        skipped = batch.skipped.len(),
        "instructions loaded"
    );
    Ok(batch)
}

/// Opens `path` and reads it with [`read_instructions`].
pub fn load_instructions(
    path: impl AsRef<Path>,
    config: &ReportConfig,
) -> IngestResult<InstructionBatch> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| IngestError::Open {
        path: path.display().to_string(),
        source,
    })?;
    read_instructions(file, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Cursor;

    const SAMPLE: &str = "test1,B,0.5,SGP,01-Jan-16,02-Jan-16,200,100.50\n\
                          test2,S,0.25,AED,02-Feb-16,03-Mar-16,300,250.25\n";

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_read_raw_instructions() {
        let rows = read_raw_instructions(Cursor::new(SAMPLE)).unwrap();
        assert_eq!(
            rows,
            vec![
                RawInstruction {
                    entity: some("test1"),
                    buy_sell: some("B"),
                    agreed_fx: some("0.5"),
                    currency: some("SGP"),
                    instr_date: some("01-Jan-16"),
                    settle_date: some("02-Jan-16"),
                    units: some("200"),
                    ppu: some("100.50"),
                },
                RawInstruction {
                    entity: some("test2"),
                    buy_sell: some("S"),
                    agreed_fx: some("0.25"),
                    currency: some("AED"),
                    instr_date: some("02-Feb-16"),
                    settle_date: some("03-Mar-16"),
                    units: some("300"),
                    ppu: some("250.25"),
                },
            ]
        );
    }

    #[test]
    fn test_read_instructions() {
        let batch = read_instructions(Cursor::new(SAMPLE), &ReportConfig::default()).unwrap();
        assert!(batch.skipped.is_empty());
        assert_eq!(batch.records.len(), 2);

        let first = &batch.records[0];
        assert_eq!(first.entity(), "test1");
        assert_eq!(first.direction(), Direction::Buy);
        assert_eq!(first.settlement_date(), Date::from_ymd(2016, 1, 2).unwrap());
        assert_eq!(first.trade_value(), dec!(10050));

        let second = &batch.records[1];
        assert_eq!(second.direction(), Direction::Sell);
        assert_eq!(second.currency().as_str(), "AED");
        assert_eq!(second.instructed_date(), Date::from_ymd(2016, 2, 2).unwrap());
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let input = " foo , b , 1 , gbp , 01-Jan-16 , 04-Jan-16 , 10 , 2.5 \n";
        let batch = read_instructions(Cursor::new(input), &ReportConfig::default()).unwrap();
        let trade = &batch.records[0];
        assert_eq!(trade.entity(), "foo");
        assert_eq!(trade.currency().as_str(), "GBP");
        assert_eq!(trade.trade_value(), dec!(25));
    }

    #[test]
    fn test_missing_column() {
        let raw = RawInstruction {
            entity: some("x"),
            buy_sell: some("B"),
            agreed_fx: some("1"),
            currency: some("USD"),
            instr_date: some("01-Jan-16"),
            settle_date: some("02-Jan-16"),
            units: some("1"),
            ppu: None,
        };
        assert_eq!(
            raw.into_trade("%d-%b-%y").unwrap_err(),
            TallyError::missing("ppu")
        );
    }

    #[test]
    fn test_empty_field_is_missing() {
        let input = ",B,1,USD,01-Jan-16,02-Jan-16,1,1\n";
        let err = read_instructions(Cursor::new(input), &ReportConfig::default()).unwrap_err();
        let row = err.row().unwrap();
        assert_eq!(row.line, 1);
        assert_eq!(row.error, TallyError::missing("entity"));
    }

    #[test]
    fn test_malformed_units() {
        let input = "x,B,1,USD,01-Jan-16,02-Jan-16,ten,1\n";
        let err = read_instructions(Cursor::new(input), &ReportConfig::default()).unwrap_err();
        assert!(matches!(
            err.row().unwrap().error,
            TallyError::MalformedField { ref field, .. } if field == "units"
        ));
    }

    #[test]
    fn test_malformed_date() {
        let input = "x,B,1,USD,01-Jan-16,2016-01-02,1,1\n";
        let err = read_instructions(Cursor::new(input), &ReportConfig::default()).unwrap_err();
        assert!(matches!(
            err.row().unwrap().error,
            TallyError::MalformedField { ref field, .. } if field == "settle_date"
        ));
    }

    #[test]
    fn test_configured_date_format() {
        let input = "x,S,1,USD,2016-01-01,2016-01-02,1,1\n";
        let config = ReportConfig::default().with_date_format("%Y-%m-%d");
        let batch = read_instructions(Cursor::new(input), &config).unwrap();
        assert_eq!(
            batch.records[0].settlement_date(),
            Date::from_ymd(2016, 1, 2).unwrap()
        );
    }

    #[test]
    fn test_invalid_direction_rejected() {
        let input = "ok,B,1,USD,01-Jan-16,04-Jan-16,1,1\n\
                     bad,X,1,USD,01-Jan-16,04-Jan-16,1,1\n";
        let err = read_instructions(Cursor::new(input), &ReportConfig::default()).unwrap_err();
        let row = err.row().unwrap();
        assert_eq!(row.line, 2);
        assert_eq!(
            row.error,
            TallyError::InvalidDirection {
                value: "X".to_string()
            }
        );
    }

    #[test]
    fn test_skip_policy_excludes_bad_rows() {
        let input = "ok,B,1,USD,01-Jan-16,04-Jan-16,1,1\n\
                     bad,X,1,USD,01-Jan-16,04-Jan-16,1,1\n\
                     short,S,1\n\
                     ok2,S,1,USD,01-Jan-16,04-Jan-16,2,1\n";
        let config = ReportConfig::default().with_invalid_rows(InvalidRowPolicy::Skip);
        let batch = read_instructions(Cursor::new(input), &config).unwrap();

        let names: Vec<_> = batch.records.iter().map(TradeRecord::entity).collect();
        assert_eq!(names, vec!["ok", "ok2"]);

        let lines: Vec<_> = batch.skipped.iter().map(|r| r.line).collect();
        assert_eq!(lines, vec![2, 3]);
        assert_eq!(batch.skipped[1].error, TallyError::missing("currency"));
    }

    fn with_unreadable_row() -> Vec<u8> {
        let mut input = b"ok,B,1,USD,01-Jan-16,04-Jan-16,1,1\n".to_vec();
        input.extend_from_slice(b"bad,B,1,US\xff\xfe,01-Jan-16,04-Jan-16,1,1\n");
        input.extend_from_slice(b"ok2,S,1,USD,01-Jan-16,04-Jan-16,2,1\n");
        input
    }

    #[test]
    fn test_skip_policy_excludes_unreadable_rows() {
        let config = ReportConfig::default().with_invalid_rows(InvalidRowPolicy::Skip);
        let batch = read_instructions(Cursor::new(with_unreadable_row()), &config).unwrap();

        let names: Vec<_> = batch.records.iter().map(TradeRecord::entity).collect();
        assert_eq!(names, vec!["ok", "ok2"]);
        assert_eq!(batch.skipped.len(), 1);
        assert_eq!(batch.skipped[0].line, 2);
        assert!(matches!(
            batch.skipped[0].error,
            TallyError::MalformedField { ref field, .. } if field == "record"
        ));
    }

    #[test]
    fn test_reject_policy_fails_on_unreadable_row() {
        let err = read_instructions(Cursor::new(with_unreadable_row()), &ReportConfig::default())
            .unwrap_err();
        assert!(matches!(err, IngestError::Csv(_)));
    }

    #[test]
    fn test_overflowing_trade_value_is_invalid_trade() {
        let input = "x,B,1,USD,01-Jan-16,04-Jan-16,18446744073709551615,100000000000\n";
        let err = read_instructions(Cursor::new(input), &ReportConfig::default()).unwrap_err();
        assert!(matches!(
            err.row().unwrap().error,
            TallyError::InvalidTrade { .. }
        ));
    }

    #[test]
    fn test_zero_units_is_invalid_trade() {
        let input = "x,B,1,USD,01-Jan-16,04-Jan-16,0,1\n";
        let err = read_instructions(Cursor::new(input), &ReportConfig::default()).unwrap_err();
        assert!(matches!(
            err.row().unwrap().error,
            TallyError::InvalidTrade { .. }
        ));
    }

    #[test]
    fn test_blank_lines_ignored() {
        let input = "a,B,1,USD,01-Jan-16,04-Jan-16,1,1\n\n\nb,S,1,USD,01-Jan-16,04-Jan-16,1,1\n";
        let batch = read_instructions(Cursor::new(input), &ReportConfig::default()).unwrap();
        assert_eq!(batch.records.len(), 2);
    }

    #[test]
    fn test_load_instructions_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("instructions.csv");
        std::fs::write(&path, SAMPLE).unwrap();

        let batch = load_instructions(&path, &ReportConfig::default()).unwrap();
        assert_eq!(batch.records.len(), 2);

        let missing = dir.path().join("nope.csv");
        assert!(matches!(
            load_instructions(&missing, &ReportConfig::default()),
            Err(IngestError::Open { .. })
        ));
    }
}
