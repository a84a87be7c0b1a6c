//! Custom Test Assertions
//!
//! Assertion helpers for lending types that give more meaningful failure
//! messages than standard assertions.

use chrono::Datelike;
use core_kernel::{add_months, Money};
use domain_lending::{Customer, Installment, Loan};

/// Asserts that a Money value equals an expected amount
pub fn assert_money_eq(actual: Money, expected: Money) {
    assert_eq!(actual, expected, "Money mismatch: actual={}, expected={}", actual, expected);
}

/// Asserts that money values sum to a total
pub fn assert_money_sum(parts: &[Money], total: Money) {
    let sum: Money = parts.iter().copied().sum();
    assert_eq!(sum, total, "Sum mismatch: sum={}, total={}", sum, total);
}

/// Asserts that a schedule is well formed for its loan
///
/// Checks the installment count, that every installment belongs to the
/// loan, that amounts sum to the loan amount, and that due dates fall on
/// the first of consecutive months.
pub fn assert_schedule_valid(loan: &Loan, installments: &[Installment]) {
    assert_eq!(
        installments.len(),
        loan.number_of_installments as usize,
        "Expected {} installments, got {}",
        loan.number_of_installments,
        installments.len()
    );

    for installment in installments {
        assert_eq!(installment.loan_id, loan.id, "Installment {} belongs to another loan", installment.id);
        assert_eq!(installment.due_date.day(), 1, "Installment {} is not due on the 1st", installment.id);
    }

    for pair in installments.windows(2) {
        let expected = add_months(pair[0].due_date, 1).expect("Due date out of range");
        assert_eq!(
            pair[1].due_date, expected,
            "Due dates are not consecutive: {} then {}",
            pair[0].due_date, pair[1].due_date
        );
    }

    let amounts: Vec<Money> = installments.iter().map(|i| i.amount).collect();
    assert_money_sum(&amounts, loan.loan_amount);
}

/// Asserts that an installment is settled in full
pub fn assert_installment_settled(installment: &Installment) {
    assert!(installment.is_paid, "Installment {} is not paid", installment.id);
    assert_eq!(
        installment.paid_amount, installment.amount,
        "Installment {} paid {} of {}",
        installment.id, installment.paid_amount, installment.amount
    );
    assert!(installment.payment_date.is_some(), "Installment {} has no payment date", installment.id);
}

/// Asserts that an installment is untouched
pub fn assert_installment_open(installment: &Installment) {
    assert!(!installment.is_paid, "Installment {} is paid", installment.id);
    assert!(installment.paid_amount.is_zero(), "Installment {} has paid amount {}", installment.id, installment.paid_amount);
    assert!(installment.payment_date.is_none(), "Installment {} has a payment date", installment.id);
}

/// Asserts that a customer's reserved credit stays within their limit
pub fn assert_credit_within_limit(customer: &Customer) {
    assert!(
        customer.used_credit_limit <= customer.credit_limit,
        "Customer {} uses {} of a {} limit",
        customer.id,
        customer.used_credit_limit,
        customer.credit_limit
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::{CustomerBuilder, LoanBuilder};
    use core_kernel::CustomerId;
    use rust_decimal_macros::dec;

    #[test]
    fn test_built_schedule_is_valid() {
        let (loan, installments) = LoanBuilder::new(CustomerId::new()).with_installments(24).build();
        assert_schedule_valid(&loan, &installments);
    }

    #[test]
    #[should_panic(expected = "Expected 6 installments")]
    fn test_truncated_schedule_is_invalid() {
        let (loan, installments) = LoanBuilder::new(CustomerId::new()).with_installments(6).build();
        assert_schedule_valid(&loan, &installments[..5]);
    }

    #[test]
    fn test_settled_and_open() {
        let (_, installments) = LoanBuilder::new(CustomerId::new())
            .with_installments(6)
            .with_paid_installments(1)
            .build();

        assert_installment_settled(&installments[0]);
        assert_installment_open(&installments[1]);
    }

    #[test]
    #[should_panic(expected = "uses")]
    fn test_over_limit_customer() {
        let customer = CustomerBuilder::new()
            .with_credit_limit(Money::new(dec!(100)))
            .with_used_credit(Money::new(dec!(101)))
            .build();
        assert_credit_within_limit(&customer);
    }
}
