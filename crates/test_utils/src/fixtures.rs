//! Pre-built Test Fixtures
//!
//! Ready-to-use values for the lending domain. They are consistent and
//! predictable so expected schedules can be written out by hand.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use core_kernel::{FixedClock, Money, Rate};
use rust_decimal_macros::dec;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// A roomy credit limit
    pub fn credit_limit() -> Money {
        Money::new(dec!(10000.00))
    }

    /// A principal of 5000, which grows to 6000 at 20%
    pub fn principal() -> Money {
        Money::new(dec!(5000.00))
    }
}

/// Fixture for interest rates
pub struct RateFixtures;

impl RateFixtures {
    /// 20%, inside the default policy bounds
    pub fn standard() -> Rate {
        Rate::new(dec!(0.2))
    }
}

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Mid-month business date (May 17, 2024)
    pub fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 17).unwrap()
    }

    /// First installment due date for a loan taken out on [`Self::today`]
    pub fn first_due_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    /// Noon UTC on [`Self::today`]
    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 17, 12, 0, 0).unwrap()
    }

    /// A clock pinned to [`Self::today`]
    pub fn clock() -> FixedClock {
        FixedClock::on(Self::today())
    }
}
