//! Lending domain errors
//!
//! Every rejected operation reports one of these kinds and leaves all
//! entities unchanged.

use rust_decimal::Decimal;
use thiserror::Error;

use core_kernel::{CustomerId, LoanId, Money, MoneyError, PortError, TemporalError};

/// Errors that can occur in the lending domain
#[derive(Debug, Error)]
pub enum LendingError {
    /// Requested installment count is not one of the allowed counts
    #[error("Invalid number of installments: {count} (allowed: {allowed:?})")]
    InvalidInstallmentCount {
        count: u32,
        allowed: Vec<u32>,
    },

    /// Interest rate is outside the allowed bounds
    #[error("Invalid interest rate: {rate} (must be between {min} and {max})")]
    InvalidInterestRate {
        rate: Decimal,
        min: Decimal,
        max: Decimal,
    },

    /// A principal or payment amount is unusable
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Customer with the given ID was not found
    #[error("Customer not found: {0}")]
    CustomerNotFound(CustomerId),

    /// Customer does not have enough unused credit
    #[error("Insufficient credit limit: available {available}, requested {requested}")]
    InsufficientCredit {
        available: Money,
        requested: Money,
    },

    /// Loan with the given ID was not found
    #[error("Loan not found: {0}")]
    LoanNotFound(LoanId),

    /// Loan has no outstanding installments
    #[error("Loan is already paid: {0}")]
    LoanAlreadyPaid(LoanId),

    #[error("Money error: {0}")]
    Money(#[from] MoneyError),

    #[error("Calendar error: {0}")]
    Calendar(#[from] TemporalError),

    #[error("Storage error: {0}")]
    Port(#[from] PortError),
}

impl LendingError {
    /// Creates an InvalidAmount error with a message
    pub fn invalid_amount(message: impl Into<String>) -> Self {
        LendingError::InvalidAmount(message.into())
    }

    /// Stable machine-readable code for this error kind
    pub fn code(&self) -> &'static str {
        match self {
            LendingError::InvalidInstallmentCount { .. } => "invalid_installment_count",
            LendingError::InvalidInterestRate { .. } => "invalid_interest_rate",
            LendingError::InvalidAmount(_) => "invalid_amount",
            LendingError::CustomerNotFound(_) => "customer_not_found",
            LendingError::InsufficientCredit { .. } => "insufficient_credit",
            LendingError::LoanNotFound(_) => "loan_not_found",
            LendingError::LoanAlreadyPaid(_) => "loan_already_paid",
            LendingError::Money(_) | LendingError::Calendar(_) => "calculation_error",
            LendingError::Port(_) => "storage_error",
        }
    }

    /// Returns true if the caller supplied unusable input
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LendingError::InvalidInstallmentCount { .. }
                | LendingError::InvalidInterestRate { .. }
                | LendingError::InvalidAmount(_)
        )
    }

    /// Returns true if a referenced entity does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LendingError::CustomerNotFound(_) | LendingError::LoanNotFound(_)
        )
    }
}
