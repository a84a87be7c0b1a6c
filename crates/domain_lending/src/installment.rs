//! Installments of a loan's repayment schedule

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{InstallmentId, LoanId, Money};

/// One monthly repayment of a loan
///
/// `amount` and `due_date` are fixed at origination. Installments are only
/// ever paid in full, so `paid_amount` is either zero or `amount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    pub id: InstallmentId,
    pub loan_id: LoanId,
    pub amount: Money,
    pub paid_amount: Money,
    pub due_date: NaiveDate,
    pub payment_date: Option<DateTime<Utc>>,
    pub is_paid: bool,
}

impl Installment {
    /// Creates an unpaid installment
    pub fn new(loan_id: LoanId, amount: Money, due_date: NaiveDate) -> Self {
        Self {
            id: InstallmentId::new_v7(),
            loan_id,
            amount,
            paid_amount: Money::zero(),
            due_date,
            payment_date: None,
            is_paid: false,
        }
    }

    /// Amount still owed on this installment
    pub fn outstanding(&self) -> Money {
        self.amount - self.paid_amount
    }

    /// Marks the installment fully paid at `paid_at` and returns the amount applied
    pub fn settle(&mut self, paid_at: DateTime<Utc>) -> Money {
        let applied = self.outstanding();
        self.paid_amount = self.amount;
        self.payment_date = Some(paid_at);
        self.is_paid = true;
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_settle_pays_outstanding_in_full() {
        let due = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let mut installment = Installment::new(LoanId::new(), Money::new(dec!(500)), due);
        assert_eq!(installment.outstanding(), Money::new(dec!(500)));

        let now = Utc::now();
        let applied = installment.settle(now);

        assert_eq!(applied, Money::new(dec!(500)));
        assert!(installment.is_paid);
        assert!(installment.outstanding().is_zero());
        assert_eq!(installment.payment_date, Some(now));
    }
}
