//! Trade settlement instruction records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CurrencyCode, Date, Direction};
use crate::error::{TallyError, TallyResult};

/// A validated trade settlement instruction.
///
/// Records are immutable once built: every field is checked by
/// [`TradeRecordBuilder::build`], so downstream aggregation never fails.
///
/// # Example
///
/// ```rust
/// use tally_core::types::{Date, Direction, TradeRecord};
/// use rust_decimal_macros::dec;
///
/// let trade = TradeRecord::builder()
///     .entity("foo")
///     .direction(Direction::Buy)
///     .agreed_fx(dec!(0.50))
///     .currency("SGP")
///     .settlement_date(Date::from_ymd(2016, 1, 2).unwrap())
///     .units(200)
///     .price_per_unit(dec!(100.25))
///     .build()
///     .unwrap();
///
/// assert_eq!(trade.trade_value(), dec!(10025));
/// ```
///
/// Deserialization goes through the builder as well, so a record read from
/// JSON is checked the same way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TradeRecordData")]
pub struct TradeRecord {
    entity: String,
    direction: Direction,
    agreed_fx: Decimal,
    currency: CurrencyCode,
    instructed_date: Date,
    settlement_date: Date,
    units: u64,
    price_per_unit: Decimal,
    trade_value: Decimal,
}

/// Largest trade value a record may carry (10^18).
///
/// `Decimal::MAX` is about 7.9 * 10^28, so group totals cannot reach it
/// before a batch holds some 79 billion records.
pub const MAX_TRADE_VALUE: Decimal = Decimal::from_parts(0xA764_0000, 0x0DE0_B6B3, 0, false, 0);

impl TradeRecord {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> TradeRecordBuilder {
        TradeRecordBuilder::new()
    }

    /// Counterparty identifier.
    #[must_use]
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Buy or sell.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// FX rate applied to the trade value.
    #[must_use]
    pub fn agreed_fx(&self) -> Decimal {
        self.agreed_fx
    }

    /// Currency of the instruction; selects the working-week calendar.
    #[must_use]
    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    /// Date the instruction was sent. Informational only.
    #[must_use]
    pub fn instructed_date(&self) -> Date {
        self.instructed_date
    }

    /// Settlement date as instructed, before any business-day shift.
    #[must_use]
    pub fn settlement_date(&self) -> Date {
        self.settlement_date
    }

    /// Number of units traded.
    #[must_use]
    pub fn units(&self) -> u64 {
        self.units
    }

    /// Price of a single unit.
    #[must_use]
    pub fn price_per_unit(&self) -> Decimal {
        self.price_per_unit
    }

    /// Trade value: `units * price_per_unit * agreed_fx`.
    ///
    /// Computed once by the builder and never above [`MAX_TRADE_VALUE`].
    #[must_use]
    pub fn trade_value(&self) -> Decimal {
        self.trade_value
    }
}

/// Serialized shape of a [`TradeRecord`], validated through the builder.
#[derive(Deserialize)]
struct TradeRecordData {
    entity: String,
    direction: Direction,
    agreed_fx: Decimal,
    currency: String,
    instructed_date: Option<Date>,
    settlement_date: Date,
    units: u64,
    price_per_unit: Decimal,
}

impl TryFrom<TradeRecordData> for TradeRecord {
    type Error = TallyError;

    fn try_from(data: TradeRecordData) -> TallyResult<Self> {
        let builder = TradeRecord::builder()
            .entity(data.entity)
            .direction(data.direction)
            .agreed_fx(data.agreed_fx)
            .currency(data.currency)
            .settlement_date(data.settlement_date)
            .units(data.units)
            .price_per_unit(data.price_per_unit);
        match data.instructed_date {
            Some(date) => builder.instructed_date(date).build(),
            None => builder.build(),
        }
    }
}

/// Builder for [`TradeRecord`].
#[derive(Debug, Clone, Default)]
pub struct TradeRecordBuilder {
    entity: Option<String>,
    direction: Option<Direction>,
    agreed_fx: Option<Decimal>,
    currency: Option<String>,
    instructed_date: Option<Date>,
    settlement_date: Option<Date>,
    units: Option<u64>,
    price_per_unit: Option<Decimal>,
}

impl TradeRecordBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the counterparty entity.
    #[must_use]
    pub fn entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Sets the direction.
    #[must_use]
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Sets the agreed FX rate.
    #[must_use]
    pub fn agreed_fx(mut self, fx: Decimal) -> Self {
        self.agreed_fx = Some(fx);
        self
    }

    /// Sets the currency code.
    #[must_use]
    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Sets the instruction date. Defaults to the settlement date.
    #[must_use]
    pub fn instructed_date(mut self, date: Date) -> Self {
        self.instructed_date = Some(date);
        self
    }

    /// Sets the instructed settlement date.
    #[must_use]
    pub fn settlement_date(mut self, date: Date) -> Self {
        self.settlement_date = Some(date);
        self
    }

    /// Sets the unit count.
    #[must_use]
    pub fn units(mut self, units: u64) -> Self {
        self.units = Some(units);
        self
    }

    /// Sets the price per unit.
    #[must_use]
    pub fn price_per_unit(mut self, price: Decimal) -> Self {
        self.price_per_unit = Some(price);
        self
    }

    /// Builds the record.
    ///
    /// # Errors
    ///
    /// Returns `TallyError::MissingField` for any unset field except the
    /// instruction date, `TallyError::InvalidTrade` for an empty entity or a
    /// non-positive fx, unit count or price, or a trade value above
    /// [`MAX_TRADE_VALUE`], and `TallyError::MalformedField` for a bad
    /// currency code.
    pub fn build(self) -> TallyResult<TradeRecord> {
        let entity = self.entity.ok_or_else(|| TallyError::missing("entity"))?;
        let direction = self
            .direction
            .ok_or_else(|| TallyError::missing("buy_sell"))?;
        let agreed_fx = self
            .agreed_fx
            .ok_or_else(|| TallyError::missing("agreed_fx"))?;
        let currency = self
            .currency
            .ok_or_else(|| TallyError::missing("currency"))?;
        let settlement_date = self
            .settlement_date
            .ok_or_else(|| TallyError::missing("settle_date"))?;
        let units = self.units.ok_or_else(|| TallyError::missing("units"))?;
        let price_per_unit = self
            .price_per_unit
            .ok_or_else(|| TallyError::missing("ppu"))?;

        if entity.trim().is_empty() {
            return Err(TallyError::invalid_trade("entity must not be empty"));
        }
        if agreed_fx <= Decimal::ZERO {
            return Err(TallyError::invalid_trade(format!(
                "agreed_fx must be positive, got {agreed_fx}"
            )));
        }
        if units == 0 {
            return Err(TallyError::invalid_trade("units must be positive"));
        }
        if price_per_unit <= Decimal::ZERO {
            return Err(TallyError::invalid_trade(format!(
                "price_per_unit must be positive, got {price_per_unit}"
            )));
        }

        let trade_value = Decimal::from(units)
            .checked_mul(price_per_unit)
            .and_then(|v| v.checked_mul(agreed_fx))
            .filter(|v| *v <= MAX_TRADE_VALUE)
            .ok_or_else(|| {
                TallyError::invalid_trade(format!(
                    "trade value {units} x {price_per_unit} x {agreed_fx} exceeds {MAX_TRADE_VALUE}"
                ))
            })?;

        Ok(TradeRecord {
            entity,
            direction,
            agreed_fx,
            currency: CurrencyCode::new(&currency)?,
            instructed_date: self.instructed_date.unwrap_or(settlement_date),
            settlement_date,
            units,
            price_per_unit,
            trade_value,
        })
    }
}
