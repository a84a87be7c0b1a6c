//! Installment schedule generation

use chrono::NaiveDate;

use core_kernel::{add_months, first_of_next_month, LoanId, Money};

use crate::error::LendingError;
use crate::installment::Installment;

/// Builds the monthly installment schedule for a loan
///
/// The total is split in whole minor units with the remainder on the final
/// installment. The first installment falls due on the first day of the
/// month after `today`, each later one a calendar month after the previous.
pub fn build_schedule(
    loan_id: LoanId,
    total: Money,
    count: u32,
    today: NaiveDate,
) -> Result<Vec<Installment>, LendingError> {
    let shares = total.split_evenly(count)?;
    let first_due = first_of_next_month(today)?;

    shares
        .into_iter()
        .zip(0u32..)
        .map(|(amount, offset)| {
            let due_date = add_months(first_due, offset)?;
            Ok(Installment::new(loan_id, amount, due_date))
        })
        .collect()
}
