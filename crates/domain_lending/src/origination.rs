//! Loan origination
//!
//! Validation runs in a fixed order so each rejection reports a single,
//! predictable error kind:
//!
//! 1. installment count
//! 2. interest rate
//! 3. principal
//! 4. customer existence (checked by the service against storage)
//! 5. available credit

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{CustomerId, Money, Rate};

use crate::customer::Customer;
use crate::error::LendingError;
use crate::installment::Installment;
use crate::loan::Loan;
use crate::policy::LendingPolicy;
use crate::schedule::build_schedule;

/// A request to open a loan for a customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub customer_id: CustomerId,
    pub principal: Money,
    pub interest_rate: Rate,
    pub number_of_installments: u32,
}

impl LoanApplication {
    pub fn new(
        customer_id: CustomerId,
        principal: Money,
        interest_rate: Rate,
        number_of_installments: u32,
    ) -> Self {
        Self {
            customer_id,
            principal,
            interest_rate,
            number_of_installments,
        }
    }

    /// Principal plus simple interest, rounded to minor units
    pub fn total_repayable(&self) -> Result<Money, LendingError> {
        Ok(self.interest_rate.grow(&self.principal)?)
    }

    /// Checks the loan terms against `policy` and returns the total repayable
    pub fn validate(&self, policy: &LendingPolicy) -> Result<Money, LendingError> {
        policy.check_installment_count(self.number_of_installments)?;
        policy.check_interest_rate(self.interest_rate)?;

        if !self.principal.is_positive() {
            return Err(LendingError::invalid_amount(format!(
                "Loan amount must be positive, got {}",
                self.principal
            )));
        }

        let total = self.total_repayable()?;
        if total.to_minor()? < i64::from(self.number_of_installments) {
            return Err(LendingError::invalid_amount(format!(
                "Loan amount {} is too small for {} installments",
                total, self.number_of_installments
            )));
        }

        Ok(total)
    }
}

/// The entities produced by a successful origination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origination {
    pub loan: Loan,
    pub installments: Vec<Installment>,
}

/// Opens a loan for `customer`, reserving its total against the credit limit
///
/// The customer is only modified when the whole origination succeeds.
pub fn originate(
    policy: &LendingPolicy,
    application: &LoanApplication,
    customer: &mut Customer,
    now: DateTime<Utc>,
    today: NaiveDate,
) -> Result<Origination, LendingError> {
    let total = application.validate(policy)?;

    if customer.id != application.customer_id {
        return Err(LendingError::CustomerNotFound(application.customer_id));
    }
    if !customer.can_afford(total) {
        return Err(LendingError::InsufficientCredit {
            available: customer.available_credit(),
            requested: total,
        });
    }

    let loan = Loan::new(
        customer.id,
        total,
        application.number_of_installments,
        now,
    );
    let installments = build_schedule(loan.id, total, application.number_of_installments, today)?;

    customer.reserve_credit(total)?;

    Ok(Origination { loan, installments })
}
