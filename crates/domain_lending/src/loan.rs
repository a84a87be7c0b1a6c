//! Loans

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{CustomerId, LoanId, Money};

use crate::installment::Installment;

/// A loan booked against a customer
///
/// `loan_amount` is principal plus interest and is fixed at creation.
/// `is_paid` is derived from the installment set and only changes through
/// [`Loan::refresh_paid_status`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub customer_id: CustomerId,
    pub loan_amount: Money,
    pub number_of_installments: u32,
    pub create_date: DateTime<Utc>,
    pub is_paid: bool,
}

impl Loan {
    /// Creates an unpaid loan
    pub fn new(
        customer_id: CustomerId,
        loan_amount: Money,
        number_of_installments: u32,
        create_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: LoanId::new_v7(),
            customer_id,
            loan_amount,
            number_of_installments,
            create_date,
            is_paid: false,
        }
    }

    /// Returns true if the loan belongs to `customer_id`
    pub fn is_owned_by(&self, customer_id: CustomerId) -> bool {
        self.customer_id == customer_id
    }

    /// Recomputes `is_paid` from the loan's full installment set
    ///
    /// Returns true if the flag changed.
    pub fn refresh_paid_status(&mut self, installments: &[Installment]) -> bool {
        let all_paid = !installments.is_empty()
            && installments
                .iter()
                .filter(|i| i.loan_id == self.id)
                .all(|i| i.is_paid);

        let changed = self.is_paid != all_paid;
        self.is_paid = all_paid;
        changed
    }
}
