//! Calendar arithmetic and time sources
//!
//! Installment schedules are expressed in whole calendar months anchored on
//! the first day of a month, and "today" is always evaluated in the
//! business timezone. The [`Clock`] trait lets services be driven by a
//! fixed time in tests.

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::RwLock;
use thiserror::Error;

/// Errors related to calendar arithmetic
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Date out of range: {date} plus {months} months")]
    OutOfRange {
        date: NaiveDate,
        months: u32,
    },
}

/// Timezone wrapper for the business calendar
///
/// Wraps chrono_tz::Tz with custom serialization support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(pub Tz);

impl Serialize for Timezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.name())
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Tz::from_str(&s)
            .map(Timezone)
            .map_err(|_| serde::de::Error::custom(format!("Invalid timezone: {}", s)))
    }
}

impl Timezone {
    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    /// Parses an IANA timezone name such as `Europe/Istanbul`
    pub fn parse(name: &str) -> Option<Self> {
        Tz::from_str(name).ok().map(Timezone)
    }

    /// Returns the calendar date of a UTC instant in this timezone
    pub fn local_date(&self, utc: DateTime<Utc>) -> NaiveDate {
        utc.with_timezone(&self.0).date_naive()
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(chrono_tz::UTC)
    }
}

/// Returns the first day of the month following `date`
pub fn first_of_next_month(date: NaiveDate) -> Result<NaiveDate, TemporalError> {
    let first = date.with_day(1).unwrap_or(date);
    add_months(first, 1)
}

/// Adds whole calendar months, clamping to the end of shorter months
pub fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate, TemporalError> {
    date.checked_add_months(Months::new(months))
        .ok_or(TemporalError::OutOfRange { date, months })
}

/// Source of the current time
pub trait Clock: Send + Sync + fmt::Debug {
    /// The current instant
    fn now(&self) -> DateTime<Utc>;

    /// The current business date
    fn today(&self) -> NaiveDate;
}

/// Wall-clock time, with dates evaluated in the business timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    timezone: Timezone,
}

impl SystemClock {
    pub fn new(timezone: Timezone) -> Self {
        Self { timezone }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        self.timezone.local_date(Utc::now())
    }
}

/// A settable clock for tests and replays
#[derive(Debug)]
pub struct FixedClock {
    now: RwLock<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: RwLock::new(now) }
    }

    /// A clock pinned to noon UTC on the given date
    pub fn on(date: NaiveDate) -> Self {
        Self::new(Utc.from_utc_datetime(&date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default())))
    }

    /// Moves the clock to a new instant
    pub fn set(&self, now: DateTime<Utc>) {
        match self.now.write() {
            Ok(mut guard) => *guard = now,
            Err(poisoned) => *poisoned.into_inner() = now,
        }
    }

    /// Moves the clock forward by whole calendar months
    pub fn advance_months(&self, months: u32) {
        let current = self.now();
        if let Some(next) = current.checked_add_months(Months::new(months)) {
            self.set(next);
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        match self.now.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_first_of_next_month_rolls_year() {
        assert_eq!(first_of_next_month(date(2024, 12, 17)).unwrap(), date(2025, 1, 1));
        assert_eq!(first_of_next_month(date(2024, 1, 31)).unwrap(), date(2024, 2, 1));
    }

    #[test]
    fn test_add_months_clamps_to_month_end() {
        assert_eq!(add_months(date(2024, 1, 31), 1).unwrap(), date(2024, 2, 29));
        assert_eq!(add_months(date(2024, 3, 1), 3).unwrap(), date(2024, 6, 1));
    }

    #[test]
    fn test_fixed_clock_advances() {
        let clock = FixedClock::on(date(2024, 1, 15));
        assert_eq!(clock.today(), date(2024, 1, 15));

        clock.advance_months(2);
        assert_eq!(clock.today(), date(2024, 3, 15));
    }

    #[test]
    fn test_timezone_local_date() {
        let tz = Timezone::parse("Asia/Tokyo").unwrap();
        let late_utc = Utc.with_ymd_and_hms(2024, 5, 31, 20, 0, 0).unwrap();
        assert_eq!(tz.local_date(late_utc), date(2024, 6, 1));
    }
}
