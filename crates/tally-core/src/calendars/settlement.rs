//! Effective settlement date resolution.
//!
//! A settlement date that falls on a weekend rolls forward to the next
//! working day of the calendar its currency settles on. Most currencies use
//! the Monday-Friday week; a small configurable set uses Sunday-Thursday.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use tracing::debug;

use super::{Calendar, WeekendType, WorkingWeekCalendar};
use crate::config::ReportConfig;
use crate::types::Date;

/// Currencies settling on a Sunday-Thursday working week unless configured otherwise.
pub const DEFAULT_SUNDAY_THURSDAY_CURRENCIES: &[&str] = &["AED", "SAR"];

static DEFAULT_CALCULATOR: Lazy<SettlementCalculator> = Lazy::new(SettlementCalculator::new);

/// Resolves the effective settlement date using the default currency set.
///
/// # Example
///
/// ```rust
/// use tally_core::calendars::resolve_effective_settlement_date;
/// use tally_core::types::Date;
///
/// let friday = Date::from_ymd(2017, 7, 14).unwrap();
/// let sunday = Date::from_ymd(2017, 7, 16).unwrap();
/// assert_eq!(resolve_effective_settlement_date(friday, "GBP"), friday);
/// assert_eq!(
///     resolve_effective_settlement_date(sunday, "GBP"),
///     Date::from_ymd(2017, 7, 17).unwrap()
/// );
/// assert_eq!(
///     resolve_effective_settlement_date(friday, "AED"),
///     Date::from_ymd(2017, 7, 16).unwrap()
/// );
/// ```
#[must_use]
pub fn resolve_effective_settlement_date(settlement_date: Date, currency: &str) -> Date {
    DEFAULT_CALCULATOR.resolve(settlement_date, currency)
}

/// Maps currencies to working-week calendars and rolls dates forward.
///
/// Membership is an O(1) set lookup on the upper-cased code. Any currency
/// outside the set, including codes nobody recognises, uses Monday-Friday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementCalculator {
    sunday_thursday: HashSet<String>,
}

impl Default for SettlementCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl SettlementCalculator {
    /// Creates a calculator with the default Sunday-Thursday currencies.
    #[must_use]
    pub fn new() -> Self {
        Self::with_sunday_thursday(DEFAULT_SUNDAY_THURSDAY_CURRENCIES.iter().copied())
    }

    /// Creates a calculator with an explicit Sunday-Thursday currency set.
    pub fn with_sunday_thursday<I, S>(currencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            sunday_thursday: currencies
                .into_iter()
                .map(|c| normalise(c.as_ref()))
                .collect(),
        }
    }

    /// Creates a calculator from report configuration.
    #[must_use]
    pub fn from_config(config: &ReportConfig) -> Self {
        Self::with_sunday_thursday(&config.sunday_thursday_currencies)
    }

    /// Returns true if `currency` settles on a Sunday-Thursday week.
    #[must_use]
    pub fn is_sunday_thursday(&self, currency: &str) -> bool {
        self.sunday_thursday.contains(&normalise(currency))
    }

    /// Returns the weekend that applies to `currency`.
    #[must_use]
    pub fn weekend_for(&self, currency: &str) -> WeekendType {
        if self.is_sunday_thursday(currency) {
            WeekendType::FridaySaturday
        } else {
            WeekendType::SaturdaySunday
        }
    }

    /// Returns the calendar that applies to `currency`.
    #[must_use]
    pub fn calendar_for(&self, currency: &str) -> WorkingWeekCalendar {
        WorkingWeekCalendar::new(self.weekend_for(currency))
    }

    /// Returns the Sunday-Thursday currencies, sorted.
    #[must_use]
    pub fn sunday_thursday_currencies(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.sunday_thursday.iter().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }

    /// Resolves the effective settlement date.
    ///
    /// Business days are returned unchanged. Weekend days roll forward by one
    /// or two days to the first working day of the currency's calendar, so
    /// the result is never earlier than `date`, never more than two days
    /// later, and resolving it again is a no-op.
    #[must_use]
    pub fn resolve(&self, date: Date, currency: &str) -> Date {
        let calendar = self.calendar_for(currency);
        let effective = calendar.next_business_day(date);
        if effective != date {
            debug!(
                %date,
                %effective,
                currency,
                calendar = calendar.name(),
                "settlement date rolled forward"
            );
        }
        effective
    }
}

fn normalise(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_weekday_unchanged() {
        let calc = SettlementCalculator::new();
        // Monday 2 Jan 2017
        assert_eq!(calc.resolve(d(2017, 1, 2), "GBP"), d(2017, 1, 2));
        // Friday 14 Jul 2017 is a business day on the standard week
        assert_eq!(calc.resolve(d(2017, 7, 14), "GBP"), d(2017, 7, 14));
    }

    #[test]
    fn test_standard_weekend_rolls_to_monday() {
        let calc = SettlementCalculator::new();
        assert_eq!(calc.resolve(d(2017, 7, 15), "USD"), d(2017, 7, 17));
        assert_eq!(calc.resolve(d(2017, 7, 16), "GBP"), d(2017, 7, 17));
    }

    #[test]
    fn test_sunday_thursday_rolls_to_sunday() {
        let calc = SettlementCalculator::new();
        assert_eq!(calc.resolve(d(2017, 7, 14), "AED"), d(2017, 7, 16));
        assert_eq!(calc.resolve(d(2017, 7, 15), "SAR"), d(2017, 7, 16));
        // Sunday is a working day on this calendar
        assert_eq!(calc.resolve(d(2017, 7, 16), "AED"), d(2017, 7, 16));
    }

    #[test]
    fn test_unknown_currency_uses_standard_week() {
        let calc = SettlementCalculator::new();
        assert_eq!(calc.weekend_for("XYZ"), WeekendType::SaturdaySunday);
        assert_eq!(calc.resolve(d(2017, 7, 15), "XYZ"), d(2017, 7, 17));
        assert_eq!(calc.resolve(d(2017, 7, 15), ""), d(2017, 7, 17));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let calc = SettlementCalculator::new();
        assert!(calc.is_sunday_thursday("aed"));
        assert!(calc.is_sunday_thursday(" SAR "));
        assert!(!calc.is_sunday_thursday("GBP"));
    }

    #[test]
    fn test_custom_set() {
        let calc = SettlementCalculator::with_sunday_thursday(["kwd"]);
        assert!(calc.is_sunday_thursday("KWD"));
        assert!(!calc.is_sunday_thursday("AED"));
        assert_eq!(calc.resolve(d(2017, 7, 14), "AED"), d(2017, 7, 14));
        assert_eq!(calc.resolve(d(2017, 7, 14), "KWD"), d(2017, 7, 16));
    }

    #[test]
    fn test_from_config() {
        let config = ReportConfig::default().with_sunday_thursday_currencies(["QAR", "AED"]);
        let calc = SettlementCalculator::from_config(&config);
        assert_eq!(calc.sunday_thursday_currencies(), vec!["AED", "QAR"]);
    }

    #[test]
    fn test_free_function_uses_defaults() {
        assert_eq!(
            resolve_effective_settlement_date(d(2017, 7, 14), "AED"),
            d(2017, 7, 16)
        );
        assert_eq!(
            resolve_effective_settlement_date(d(2017, 7, 14), "GBP"),
            d(2017, 7, 14)
        );
    }

    #[test]
    fn test_year_boundary() {
        let calc = SettlementCalculator::new();
        // Saturday 30 Dec 2017 -> Monday 1 Jan 2018
        assert_eq!(calc.resolve(d(2017, 12, 30), "EUR"), d(2018, 1, 1));
        // Friday 29 Dec 2017 -> Sunday 31 Dec 2017
        assert_eq!(calc.resolve(d(2017, 12, 29), "SAR"), d(2017, 12, 31));
    }
}
