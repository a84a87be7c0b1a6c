//! Money types with precise decimal arithmetic
//!
//! This module provides a type-safe representation of monetary values
//! using rust_decimal for precise calculations without floating-point errors.
//! The service books everything in a single currency, so `Money` carries no
//! currency code and always holds exactly two decimal places (minor units).

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use thiserror::Error;

/// Number of decimal places kept for every monetary amount
pub const MINOR_UNIT_SCALE: u32 = 2;

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Overflow during calculation")]
    Overflow,
}

/// A monetary amount rounded to minor units
///
/// Construction always rounds half away from zero to two decimal places, so
/// two `Money` values that print the same compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    /// Creates a new Money value, rounding to minor units
    pub fn new(amount: Decimal) -> Self {
        let mut rounded =
            amount.round_dp_with_strategy(MINOR_UNIT_SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(MINOR_UNIT_SCALE);
        Self(rounded)
    }

    /// Creates Money from an integer amount in minor units (e.g., cents)
    pub fn from_minor(minor_units: i64) -> Self {
        Self(Decimal::new(minor_units, MINOR_UNIT_SCALE))
    }

    /// Creates a zero amount
    pub fn zero() -> Self {
        Self::from_minor(0)
    }

    /// Returns the amount
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns the amount in minor units
    pub fn to_minor(&self) -> Result<i64, MoneyError> {
        let minor = self
            .0
            .checked_mul(dec!(100))
            .ok_or(MoneyError::Overflow)?
            .round()
            .mantissa();
        i64::try_from(minor).map_err(|_| MoneyError::Overflow)
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is positive
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Returns true if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Checked addition that reports overflow instead of panicking
    pub fn checked_add(&self, other: &Money) -> Result<Money, MoneyError> {
        self.0
            .checked_add(other.0)
            .map(Self::new)
            .ok_or(MoneyError::Overflow)
    }

    /// Checked subtraction that reports overflow instead of panicking
    pub fn checked_sub(&self, other: &Money) -> Result<Money, MoneyError> {
        self.0
            .checked_sub(other.0)
            .map(Self::new)
            .ok_or(MoneyError::Overflow)
    }

    /// Multiplies by a scalar and rounds back to minor units
    pub fn multiply(&self, factor: Decimal) -> Result<Money, MoneyError> {
        self.0
            .checked_mul(factor)
            .map(Self::new)
            .ok_or(MoneyError::Overflow)
    }

    /// Splits the amount into `parts` equal shares of whole minor units
    ///
    /// Every share receives `floor(total / parts)`; the final share absorbs
    /// the remainder so the shares always sum to the original amount.
    pub fn split_evenly(&self, parts: u32) -> Result<Vec<Money>, MoneyError> {
        if parts == 0 {
            return Err(MoneyError::DivisionByZero);
        }
        if self.is_negative() {
            return Err(MoneyError::InvalidAmount(format!(
                "Cannot split negative amount {}",
                self
            )));
        }

        let total_minor = self.to_minor()?;
        let parts_i64 = i64::from(parts);
        let base = total_minor / parts_i64;
        let remainder = total_minor - base * parts_i64;

        let mut shares = vec![Money::from_minor(base); parts as usize];
        if let Some(last) = shares.last_mut() {
            *last = Money::from_minor(base + remainder);
        }
        Ok(shares)
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self::new(amount)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Decimal {
        money.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.checked_add(&other)
            .expect("Overflow in Money::add")
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self.checked_sub(&other)
            .expect("Overflow in Money::sub")
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Represents a percentage rate (e.g., an interest rate)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rate {
    /// The rate as a decimal (e.g., 0.05 for 5%)
    value: Decimal,
}

impl Rate {
    /// Creates a rate from a decimal value (e.g., 0.05 for 5%)
    pub fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Creates a rate from a percentage (e.g., 5.0 for 5%)
    pub fn from_percentage(percentage: Decimal) -> Self {
        Self {
            value: percentage / dec!(100),
        }
    }

    /// Returns the rate as a decimal
    pub fn as_decimal(&self) -> Decimal {
        self.value
    }

    /// Returns the rate as a percentage, or `None` if it does not fit a `Decimal`
    pub fn as_percentage(&self) -> Option<Decimal> {
        self.value.checked_mul(dec!(100))
    }

    /// Applies this rate to a money amount
    pub fn apply(&self, money: &Money) -> Result<Money, MoneyError> {
        money.multiply(self.value)
    }

    /// Returns `amount × (1 + rate)`, i.e. principal plus simple interest
    pub fn grow(&self, money: &Money) -> Result<Money, MoneyError> {
        let factor = Decimal::ONE
            .checked_add(self.value)
            .ok_or(MoneyError::Overflow)?;
        money.multiply(factor)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_percentage() {
            Some(pct) => write!(f, "{}%", pct.round_dp(4).normalize()),
            None => write!(f, "{}", self.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_creation_rounds_to_minor_units() {
        let m = Money::new(dec!(100.505));
        assert_eq!(m.amount(), dec!(100.51));
        assert_eq!(m.to_string(), "100.51");
    }

    #[test]
    fn test_money_from_minor() {
        let m = Money::from_minor(10050);
        assert_eq!(m.amount(), dec!(100.50));
        assert_eq!(m.to_minor().unwrap(), 10050);
    }

    #[test]
    fn test_to_minor_overflow_is_an_error() {
        // beyond Decimal once scaled to cents
        let huge = Money::new(Decimal::from_i128_with_scale(10i128.pow(27), 0));
        assert_eq!(huge.to_minor(), Err(MoneyError::Overflow));

        // fits Decimal but not i64
        let large = Money::new(Decimal::from_i128_with_scale(10i128.pow(17), 0));
        assert_eq!(large.to_minor(), Err(MoneyError::Overflow));
    }

    #[test]
    fn test_money_arithmetic() {
        let a = Money::new(dec!(100.00));
        let b = Money::new(dec!(50.00));

        assert_eq!((a + b).amount(), dec!(150.00));
        assert_eq!((a - b).amount(), dec!(50.00));
    }

    #[test]
    fn test_split_evenly_puts_remainder_on_last_share() {
        let m = Money::new(dec!(1000.00));
        let parts = m.split_evenly(6).unwrap();

        assert_eq!(parts.len(), 6);
        assert_eq!(parts[0].amount(), dec!(166.66));
        assert_eq!(parts[5].amount(), dec!(166.70));
        assert_eq!(parts.into_iter().sum::<Money>(), m);
    }

    #[test]
    fn test_split_evenly_rejects_zero_parts() {
        let m = Money::new(dec!(10));
        assert_eq!(m.split_evenly(0), Err(MoneyError::DivisionByZero));
    }

    #[test]
    fn test_rate_growth() {
        let rate = Rate::new(dec!(0.2));
        let principal = Money::new(dec!(5000));

        assert_eq!(rate.grow(&principal).unwrap().amount(), dec!(6000.00));
        assert_eq!(rate.apply(&principal).unwrap().amount(), dec!(1000.00));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn split_evenly_sum_equals_original(
            amount in 0i64..1_000_000_000i64,
            parts in 1u32..100u32
        ) {
            let money = Money::from_minor(amount);
            let shares = money.split_evenly(parts).unwrap();

            prop_assert_eq!(shares.len(), parts as usize);
            prop_assert_eq!(shares.iter().copied().sum::<Money>(), money);
        }

        #[test]
        fn split_evenly_shares_differ_only_in_last(
            amount in 0i64..1_000_000_000i64,
            parts in 1u32..100u32
        ) {
            let shares = Money::from_minor(amount).split_evenly(parts).unwrap();
            let first = shares[0];

            for share in &shares[..shares.len() - 1] {
                prop_assert_eq!(*share, first);
            }
            prop_assert!(shares[shares.len() - 1] >= first);
        }
    }
}
