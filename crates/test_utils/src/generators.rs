//! Property-Based Test Generators
//!
//! Proptest strategies that produce values inside the default lending
//! policy, so generated applications pass validation.

use chrono::NaiveDate;
use core_kernel::{CustomerId, Money, Rate};
use domain_lending::{LendingPolicy, LoanApplication};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for positive amounts in minor units
pub fn positive_amount_minor_strategy() -> impl Strategy<Value = i64> {
    1i64..1_000_000_000i64
}

/// Strategy for positive Money values
pub fn positive_money_strategy() -> impl Strategy<Value = Money> {
    positive_amount_minor_strategy().prop_map(Money::from_minor)
}

/// Strategy for installment counts the default policy allows
pub fn installment_count_strategy() -> impl Strategy<Value = u32> {
    prop::sample::select(LendingPolicy::default().allowed_installment_counts)
}

/// Strategy for interest rates between 0.1 and 0.5 inclusive, in basis points
pub fn interest_rate_strategy() -> impl Strategy<Value = Rate> {
    (1000i64..=5000i64).prop_map(|bp| Rate::new(Decimal::new(bp, 4)))
}

/// Strategy for business dates between 2020 and 2030
pub fn business_date_strategy() -> impl Strategy<Value = NaiveDate> {
    (2020i32..2030i32, 1u32..=12u32, 1u32..=28u32)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default())
}

/// Strategy for valid loan applications of a given customer
pub fn loan_application_strategy(customer_id: CustomerId) -> impl Strategy<Value = LoanApplication> {
    (
        positive_amount_minor_strategy(),
        interest_rate_strategy(),
        installment_count_strategy(),
    )
        .prop_map(move |(principal, rate, count)| {
            // at least a cent per installment once interest is added
            let principal = Money::from_minor(principal.max(i64::from(count)));
            LoanApplication::new(customer_id, principal, rate, count)
        })
}
