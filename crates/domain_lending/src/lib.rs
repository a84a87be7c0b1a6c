//! Lending Domain
//!
//! This crate holds the business rules of the loan service:
//!
//! - **Origination**: validates loan terms, checks the customer's available
//!   credit, and produces a loan with its monthly installment schedule
//! - **Payment allocation**: applies cash to the earliest due installments,
//!   paying each one in full or not at all
//! - **Queries**: listing loans per customer and installments per loan
//!
//! Storage is reached only through the [`LendingPort`] and
//! [`LendingUnitOfWork`] traits, so every multi-write operation commits or
//! rolls back as one unit.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_lending::{LoanService, LoanApplication};
//!
//! let service = LoanService::new(port, clock);
//! let loan = service
//!     .create_loan(LoanApplication::new(customer_id, principal, rate, 12))
//!     .await?;
//! let result = service.pay_loan(loan.id, amount).await?;
//! ```

pub mod customer;
pub mod loan;
pub mod installment;
pub mod policy;
pub mod schedule;
pub mod origination;
pub mod allocation;
pub mod ports;
pub mod service;
pub mod error;

pub use customer::Customer;
pub use loan::Loan;
pub use installment::Installment;
pub use policy::LendingPolicy;
pub use schedule::build_schedule;
pub use origination::{LoanApplication, Origination, originate};
pub use allocation::{Allocation, PaymentResult, allocate_payment};
pub use ports::{LendingPort, LendingUnitOfWork};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockLendingPort;
pub use service::LoanService;
pub use error::LendingError;
