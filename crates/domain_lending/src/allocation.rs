//! Payment allocation
//!
//! Cash is applied to installments in ascending due-date order. Each
//! installment is paid in full or not at all, and allocation stops at the
//! first installment the remaining cash cannot cover or that falls due
//! beyond the payment horizon. Money left over is not tracked.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{add_months, InstallmentId, Money};

use crate::error::LendingError;
use crate::installment::Installment;

/// Outcome of a payment as reported to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentResult {
    pub installments_paid: u32,
    pub amount_spent: Money,
    pub loan_fully_paid: bool,
}

/// Result of one allocation pass over a loan's installments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    pub installments_paid: u32,
    pub amount_spent: Money,
    /// Cash that could not be applied
    pub unspent: Money,
    /// Installments settled by this pass, in payment order
    pub settled: Vec<InstallmentId>,
}

impl Allocation {
    pub fn is_empty(&self) -> bool {
        self.settled.is_empty()
    }
}

/// Applies `cash` to `installments`, settling them in place
///
/// The slice is stably sorted by due date first, so installments sharing a
/// due date keep their relative order.
pub fn allocate_payment(
    installments: &mut [Installment],
    cash: Money,
    today: NaiveDate,
    paid_at: DateTime<Utc>,
    horizon_months: u32,
) -> Result<Allocation, LendingError> {
    if cash.is_negative() {
        return Err(LendingError::invalid_amount(format!(
            "Payment amount cannot be negative, got {}",
            cash
        )));
    }

    installments.sort_by_key(|i| i.due_date);
    let horizon = add_months(today, horizon_months)?;

    let mut remaining = cash;
    let mut amount_spent = Money::zero();
    let mut settled = Vec::new();

    for installment in installments.iter_mut() {
        if installment.due_date > horizon {
            break;
        }
        if installment.is_paid {
            continue;
        }

        let needed = installment.outstanding();
        if remaining < needed {
            break;
        }

        let applied = installment.settle(paid_at);
        remaining = remaining.checked_sub(&applied)?;
        amount_spent = amount_spent.checked_add(&applied)?;
        settled.push(installment.id);
    }

    Ok(Allocation {
        installments_paid: settled.len() as u32,
        amount_spent,
        unspent: remaining,
        settled,
    })
}
