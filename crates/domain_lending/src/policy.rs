//! Lending policy
//!
//! The business parameters that bound loan terms and payments.

use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::Rate;

use crate::error::LendingError;

/// Bounds applied to loan origination and payment allocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LendingPolicy {
    /// Installment counts a loan may be split into
    pub allowed_installment_counts: Vec<u32>,
    /// Lowest accepted interest rate, inclusive
    pub min_interest_rate: Rate,
    /// Highest accepted interest rate, inclusive
    pub max_interest_rate: Rate,
    /// Installments due more than this many months after today cannot be paid yet
    pub payment_horizon_months: u32,
}

impl Default for LendingPolicy {
    fn default() -> Self {
        Self {
            allowed_installment_counts: vec![6, 9, 12, 24],
            min_interest_rate: Rate::new(dec!(0.1)),
            max_interest_rate: Rate::new(dec!(0.5)),
            payment_horizon_months: 3,
        }
    }
}

impl LendingPolicy {
    /// Sets the allowed installment counts
    pub fn with_installment_counts(mut self, counts: impl Into<Vec<u32>>) -> Self {
        self.allowed_installment_counts = counts.into();
        self
    }

    /// Sets the inclusive interest rate bounds
    pub fn with_interest_rate_bounds(mut self, min: Rate, max: Rate) -> Self {
        self.min_interest_rate = min;
        self.max_interest_rate = max;
        self
    }

    /// Sets the payment horizon in months
    pub fn with_payment_horizon(mut self, months: u32) -> Self {
        self.payment_horizon_months = months;
        self
    }

    pub fn check_installment_count(&self, count: u32) -> Result<(), LendingError> {
        if self.allowed_installment_counts.contains(&count) {
            Ok(())
        } else {
            Err(LendingError::InvalidInstallmentCount {
                count,
                allowed: self.allowed_installment_counts.clone(),
            })
        }
    }

    pub fn check_interest_rate(&self, rate: Rate) -> Result<(), LendingError> {
        if rate >= self.min_interest_rate && rate <= self.max_interest_rate {
            Ok(())
        } else {
            Err(LendingError::InvalidInterestRate {
                rate: rate.as_decimal(),
                min: self.min_interest_rate.as_decimal(),
                max: self.max_interest_rate.as_decimal(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_counts() {
        let policy = LendingPolicy::default();
        for count in [6, 9, 12, 24] {
            assert!(policy.check_installment_count(count).is_ok());
        }
        for count in [0, 1, 10, 36] {
            assert!(matches!(
                policy.check_installment_count(count),
                Err(LendingError::InvalidInstallmentCount { .. })
            ));
        }
    }

    #[test]
    fn test_rate_bounds_are_inclusive() {
        let policy = LendingPolicy::default();
        assert!(policy.check_interest_rate(Rate::new(dec!(0.1))).is_ok());
        assert!(policy.check_interest_rate(Rate::new(dec!(0.5))).is_ok());
        assert!(policy.check_interest_rate(Rate::new(dec!(0.09))).is_err());
        assert!(policy.check_interest_rate(Rate::new(dec!(0.51))).is_err());
    }

    #[test]
    fn test_builder_overrides() {
        let policy = LendingPolicy::default()
            .with_installment_counts([3])
            .with_payment_horizon(1);
        assert!(policy.check_installment_count(3).is_ok());
        assert!(policy.check_installment_count(6).is_err());
        assert_eq!(policy.payment_horizon_months, 1);
    }
}
