//! Customers and their credit limits

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{CustomerId, Money};

use crate::error::LendingError;

/// A borrower with a fixed credit limit
///
/// `used_credit_limit` is the sum of loan amounts booked against the
/// customer. It only ever grows and never exceeds `credit_limit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub credit_limit: Money,
    pub used_credit_limit: Money,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Creates a customer with no credit in use
    pub fn new(credit_limit: Money, created_at: DateTime<Utc>) -> Result<Self, LendingError> {
        if credit_limit.is_negative() {
            return Err(LendingError::invalid_amount(format!(
                "Credit limit cannot be negative: {}",
                credit_limit
            )));
        }

        Ok(Self {
            id: CustomerId::new_v7(),
            credit_limit,
            used_credit_limit: Money::zero(),
            created_at,
        })
    }

    /// Credit still available for new loans
    pub fn available_credit(&self) -> Money {
        self.credit_limit - self.used_credit_limit
    }

    /// Returns true if a loan of `amount` fits in the remaining credit
    pub fn can_afford(&self, amount: Money) -> bool {
        self.available_credit() >= amount
    }

    /// Books `amount` against the credit limit
    pub fn reserve_credit(&mut self, amount: Money) -> Result<(), LendingError> {
        if !self.can_afford(amount) {
            return Err(LendingError::InsufficientCredit {
                available: self.available_credit(),
                requested: amount,
            });
        }

        self.used_credit_limit = self.used_credit_limit.checked_add(&amount)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn customer(limit: rust_decimal::Decimal) -> Customer {
        Customer::new(Money::new(limit), Utc::now()).unwrap()
    }

    #[test]
    fn test_new_customer_has_full_credit() {
        let c = customer(dec!(10000));
        assert_eq!(c.available_credit(), Money::new(dec!(10000)));
        assert!(c.used_credit_limit.is_zero());
    }

    #[test]
    fn test_negative_limit_rejected() {
        let result = Customer::new(Money::new(dec!(-1)), Utc::now());
        assert!(matches!(result, Err(LendingError::InvalidAmount(_))));
    }

    #[test]
    fn test_reserve_credit_up_to_limit() {
        let mut c = customer(dec!(6000));
        c.reserve_credit(Money::new(dec!(6000))).unwrap();

        assert_eq!(c.used_credit_limit, c.credit_limit);
        assert!(c.available_credit().is_zero());
    }

    #[test]
    fn test_reserve_credit_beyond_limit_leaves_customer_unchanged() {
        let mut c = customer(dec!(1000));
        c.reserve_credit(Money::new(dec!(400))).unwrap();

        let err = c.reserve_credit(Money::new(dec!(600.01))).unwrap_err();
        match err {
            LendingError::InsufficientCredit { available, requested } => {
                assert_eq!(available, Money::new(dec!(600)));
                assert_eq!(requested, Money::new(dec!(600.01)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(c.used_credit_limit, Money::new(dec!(400)));
    }
}
