//! Loan DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{CustomerId, InstallmentId, LoanId, Money};
use domain_lending::{Installment, Loan, PaymentResult};

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateLoanRequest {
    pub customer_id: CustomerId,
    /// Principal before interest
    pub amount: Decimal,
    /// Interest rate as a fraction, e.g. `0.2`
    pub interest_rate: Decimal,
    pub number_of_installments: u32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ListLoansQuery {
    pub customer_id: Option<CustomerId>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PayLoanRequest {
    pub amount: Decimal,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoanResponse {
    pub id: LoanId,
    pub customer_id: CustomerId,
    pub loan_amount: Money,
    pub number_of_installments: u32,
    pub create_date: DateTime<Utc>,
    pub is_paid: bool,
}

impl From<Loan> for LoanResponse {
    fn from(loan: Loan) -> Self {
        Self {
            id: loan.id,
            customer_id: loan.customer_id,
            loan_amount: loan.loan_amount,
            number_of_installments: loan.number_of_installments,
            create_date: loan.create_date,
            is_paid: loan.is_paid,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InstallmentResponse {
    pub id: InstallmentId,
    pub loan_id: LoanId,
    pub amount: Money,
    pub paid_amount: Money,
    pub due_date: NaiveDate,
    pub payment_date: Option<DateTime<Utc>>,
    pub is_paid: bool,
}

impl From<Installment> for InstallmentResponse {
    fn from(installment: Installment) -> Self {
        Self {
            id: installment.id,
            loan_id: installment.loan_id,
            amount: installment.amount,
            paid_amount: installment.paid_amount,
            due_date: installment.due_date,
            payment_date: installment.payment_date,
            is_paid: installment.is_paid,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub installments_paid: u32,
    pub amount_spent: Money,
    pub loan_fully_paid: bool,
}

impl From<PaymentResult> for PaymentResponse {
    fn from(result: PaymentResult) -> Self {
        Self {
            installments_paid: result.installments_paid,
            amount_spent: result.amount_spent,
            loan_fully_paid: result.loan_fully_paid,
        }
    }
}
