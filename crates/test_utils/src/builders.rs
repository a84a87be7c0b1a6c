//! Test Data Builders
//!
//! Builder patterns for constructing lending test data with sensible
//! defaults. Tests specify only the fields they care about.

use chrono::{DateTime, NaiveDate, Utc};
use core_kernel::{CustomerId, Money, Rate};
use domain_lending::{build_schedule, Customer, Installment, Loan, LoanApplication};

use crate::fixtures::{MoneyFixtures, RateFixtures, TemporalFixtures};

/// Builder for customers
pub struct CustomerBuilder {
    id: Option<CustomerId>,
    credit_limit: Money,
    used_credit_limit: Money,
    created_at: DateTime<Utc>,
}

impl Default for CustomerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomerBuilder {
    pub fn new() -> Self {
        Self {
            id: None,
            credit_limit: MoneyFixtures::credit_limit(),
            used_credit_limit: Money::zero(),
            created_at: TemporalFixtures::now(),
        }
    }

    pub fn with_id(mut self, id: CustomerId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_credit_limit(mut self, limit: Money) -> Self {
        self.credit_limit = limit;
        self
    }

    /// Sets credit already reserved by earlier loans
    pub fn with_used_credit(mut self, used: Money) -> Self {
        self.used_credit_limit = used;
        self
    }

    pub fn build(self) -> Customer {
        Customer {
            id: self.id.unwrap_or_else(CustomerId::new_v7),
            credit_limit: self.credit_limit,
            used_credit_limit: self.used_credit_limit,
            created_at: self.created_at,
        }
    }
}

/// Builder for loan applications
pub struct LoanApplicationBuilder {
    customer_id: CustomerId,
    principal: Money,
    interest_rate: Rate,
    number_of_installments: u32,
}

impl LoanApplicationBuilder {
    pub fn new(customer_id: CustomerId) -> Self {
        Self {
            customer_id,
            principal: MoneyFixtures::principal(),
            interest_rate: RateFixtures::standard(),
            number_of_installments: 12,
        }
    }

    pub fn with_principal(mut self, principal: Money) -> Self {
        self.principal = principal;
        self
    }

    pub fn with_interest_rate(mut self, rate: Rate) -> Self {
        self.interest_rate = rate;
        self
    }

    pub fn with_installments(mut self, count: u32) -> Self {
        self.number_of_installments = count;
        self
    }

    pub fn build(self) -> LoanApplication {
        LoanApplication::new(
            self.customer_id,
            self.principal,
            self.interest_rate,
            self.number_of_installments,
        )
    }
}

/// Builder for a stored loan together with its installment schedule
///
/// Skips the credit checks of origination, so it can seed storage with
/// states that origination alone would take several steps to reach.
pub struct LoanBuilder {
    customer_id: CustomerId,
    loan_amount: Money,
    number_of_installments: u32,
    created_at: DateTime<Utc>,
    today: NaiveDate,
    paid_installments: usize,
}

impl LoanBuilder {
    pub fn new(customer_id: CustomerId) -> Self {
        Self {
            customer_id,
            loan_amount: Money::from_minor(600_000),
            number_of_installments: 12,
            created_at: TemporalFixtures::now(),
            today: TemporalFixtures::today(),
            paid_installments: 0,
        }
    }

    /// Sets the total repayable amount
    pub fn with_amount(mut self, amount: Money) -> Self {
        self.loan_amount = amount;
        self
    }

    pub fn with_installments(mut self, count: u32) -> Self {
        self.number_of_installments = count;
        self
    }

    /// Sets the creation instant and the business date the schedule starts from
    pub fn created_on(mut self, created_at: DateTime<Utc>, today: NaiveDate) -> Self {
        self.created_at = created_at;
        self.today = today;
        self
    }

    /// Marks the first `count` installments as settled
    pub fn with_paid_installments(mut self, count: usize) -> Self {
        self.paid_installments = count;
        self
    }

    /// Builds the loan and its schedule
    ///
    /// # Panics
    ///
    /// Panics if the amount cannot be split into the requested installments
    pub fn build(self) -> (Loan, Vec<Installment>) {
        let mut loan = Loan::new(
            self.customer_id,
            self.loan_amount,
            self.number_of_installments,
            self.created_at,
        );
        let mut installments = build_schedule(
            loan.id,
            self.loan_amount,
            self.number_of_installments,
            self.today,
        )
        .expect("Failed to build installment schedule");

        for installment in installments.iter_mut().take(self.paid_installments) {
            installment.settle(self.created_at);
        }
        loan.refresh_paid_status(&installments);

        (loan, installments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_customer_builder_defaults() {
        let customer = CustomerBuilder::new().build();

        assert_eq!(customer.credit_limit, MoneyFixtures::credit_limit());
        assert!(customer.used_credit_limit.is_zero());
    }

    #[test]
    fn test_customer_builder_used_credit() {
        let customer = CustomerBuilder::new()
            .with_credit_limit(Money::new(dec!(1000)))
            .with_used_credit(Money::new(dec!(400)))
            .build();

        assert_eq!(customer.available_credit(), Money::new(dec!(600)));
    }

    #[test]
    fn test_application_builder() {
        let customer_id = CustomerId::new();
        let application = LoanApplicationBuilder::new(customer_id)
            .with_installments(6)
            .build();

        assert_eq!(application.customer_id, customer_id);
        assert_eq!(application.number_of_installments, 6);
        assert_eq!(application.total_repayable().unwrap(), Money::new(dec!(6000)));
    }

    #[test]
    fn test_loan_builder_partially_paid() {
        let (loan, installments) = LoanBuilder::new(CustomerId::new())
            .with_installments(6)
            .with_paid_installments(2)
            .build();

        assert_eq!(installments.len(), 6);
        assert_eq!(installments.iter().filter(|i| i.is_paid).count(), 2);
        assert!(!loan.is_paid);
    }

    #[test]
    fn test_loan_builder_fully_paid() {
        let (loan, _) = LoanBuilder::new(CustomerId::new())
            .with_installments(6)
            .with_paid_installments(6)
            .build();

        assert!(loan.is_paid);
    }
}
