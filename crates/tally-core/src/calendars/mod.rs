//! Business day calendars and settlement date resolution.
//!
//! This module provides:
//! - Working-week calendars (which weekdays are non-business days)
//! - The [`SettlementCalculator`] mapping a currency to its calendar
//! - Date rolling to the next business day

use chrono::Weekday;
use serde::{Deserialize, Serialize};

mod settlement;

pub use settlement::{
    resolve_effective_settlement_date, SettlementCalculator, DEFAULT_SUNDAY_THURSDAY_CURRENCIES,
};

use crate::types::Date;

/// Trait for business day calendars.
///
/// Calendars determine which days are business days for a specific
/// market or currency.
pub trait Calendar: Send + Sync {
    /// Returns the name of the calendar.
    fn name(&self) -> &'static str;

    /// Returns true if the date is a business day.
    fn is_business_day(&self, date: Date) -> bool;

    /// Returns true if the date is not a business day.
    fn is_holiday(&self, date: Date) -> bool {
        !self.is_business_day(date)
    }

    /// Returns the next business day on or after the given date.
    fn next_business_day(&self, date: Date) -> Date {
        let mut result = date;
        while !self.is_business_day(result) {
            result = result.add_days(1);
        }
        result
    }
}

/// Weekend types for different markets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekendType {
    /// Saturday and Sunday (Monday-Friday working week)
    #[default]
    SaturdaySunday,
    /// Friday and Saturday (Sunday-Thursday working week, Middle East markets)
    FridaySaturday,
}

impl WeekendType {
    /// Check if a weekday is a weekend day for this type.
    #[inline]
    pub fn is_weekend(&self, weekday: Weekday) -> bool {
        match self {
            WeekendType::SaturdaySunday => matches!(weekday, Weekday::Sat | Weekday::Sun),
            WeekendType::FridaySaturday => matches!(weekday, Weekday::Fri | Weekday::Sat),
        }
    }

    /// Days to add to `weekday` to reach the first working day on or after it.
    ///
    /// Always 0, 1 or 2: both weekends are two consecutive days.
    #[inline]
    pub fn days_to_business_day(&self, weekday: Weekday) -> i64 {
        let mut day = weekday;
        let mut offset = 0;
        while self.is_weekend(day) {
            day = day.succ();
            offset += 1;
        }
        offset
    }
}

impl std::fmt::Display for WeekendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            WeekendType::SaturdaySunday => "Monday-Friday",
            WeekendType::FridaySaturday => "Sunday-Thursday",
        };
        write!(f, "{name}")
    }
}

/// A weekend-only calendar (no holidays).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorkingWeekCalendar {
    weekend: WeekendType,
}

impl WorkingWeekCalendar {
    /// Monday to Friday working week.
    pub const STANDARD: Self = Self {
        weekend: WeekendType::SaturdaySunday,
    };

    /// Sunday to Thursday working week.
    pub const SUNDAY_THURSDAY: Self = Self {
        weekend: WeekendType::FridaySaturday,
    };

    /// Creates a calendar for the given weekend.
    #[must_use]
    pub fn new(weekend: WeekendType) -> Self {
        Self { weekend }
    }
}

impl Calendar for WorkingWeekCalendar {
    fn name(&self) -> &'static str {
        match self.weekend {
            WeekendType::SaturdaySunday => "Monday-Friday",
            WeekendType::FridaySaturday => "Sunday-Thursday",
        }
    }

    fn is_business_day(&self, date: Date) -> bool {
        !self.weekend.is_weekend(date.weekday())
    }

    fn next_business_day(&self, date: Date) -> Date {
        date.add_days(self.weekend.days_to_business_day(date.weekday()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_week() {
        let cal = WorkingWeekCalendar::STANDARD;

        // Monday
        assert!(cal.is_business_day(Date::from_ymd(2017, 7, 10).unwrap()));
        // Friday
        assert!(cal.is_business_day(Date::from_ymd(2017, 7, 14).unwrap()));
        // Saturday
        assert!(cal.is_holiday(Date::from_ymd(2017, 7, 15).unwrap()));
        // Sunday
        assert!(cal.is_holiday(Date::from_ymd(2017, 7, 16).unwrap()));
    }

    #[test]
    fn test_sunday_thursday_week() {
        let cal = WorkingWeekCalendar::SUNDAY_THURSDAY;

        // Thursday
        assert!(cal.is_business_day(Date::from_ymd(2017, 7, 13).unwrap()));
        // Friday
        assert!(cal.is_holiday(Date::from_ymd(2017, 7, 14).unwrap()));
        // Saturday
        assert!(cal.is_holiday(Date::from_ymd(2017, 7, 15).unwrap()));
        // Sunday
        assert!(cal.is_business_day(Date::from_ymd(2017, 7, 16).unwrap()));
    }

    #[test]
    fn test_days_to_business_day() {
        let std = WeekendType::SaturdaySunday;
        assert_eq!(std.days_to_business_day(Weekday::Fri), 0);
        assert_eq!(std.days_to_business_day(Weekday::Sat), 2);
        assert_eq!(std.days_to_business_day(Weekday::Sun), 1);

        let st = WeekendType::FridaySaturday;
        assert_eq!(st.days_to_business_day(Weekday::Thu), 0);
        assert_eq!(st.days_to_business_day(Weekday::Fri), 2);
        assert_eq!(st.days_to_business_day(Weekday::Sat), 1);
        assert_eq!(st.days_to_business_day(Weekday::Sun), 0);
    }

    #[test]
    fn test_next_business_day_matches_trait_default() {
        struct Looping(WeekendType);
        impl Calendar for Looping {
            fn name(&self) -> &'static str {
                "looping"
            }
            fn is_business_day(&self, date: Date) -> bool {
                !self.0.is_weekend(date.weekday())
            }
        }

        for weekend in [WeekendType::SaturdaySunday, WeekendType::FridaySaturday] {
            let fast = WorkingWeekCalendar::new(weekend);
            let slow = Looping(weekend);
            let start = Date::from_ymd(2017, 7, 10).unwrap();
            for i in 0..14 {
                let d = start.add_days(i);
                assert_eq!(fast.next_business_day(d), slow.next_business_day(d));
            }
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(WeekendType::FridaySaturday.to_string(), "Sunday-Thursday");
        assert_eq!(WorkingWeekCalendar::STANDARD.name(), "Monday-Friday");
    }
}
