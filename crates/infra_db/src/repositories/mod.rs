//! Repository implementations for the lending tables
//!
//! Repositories encapsulate the SQL for one table each and work on plain
//! row types. Methods accept any PostgreSQL executor, so the same query runs
//! against the pool for reads or inside a transaction for units of work.

pub mod customer;
pub mod loan;
pub mod installment;

pub use customer::{CustomerRepository, CustomerRow};
pub use loan::{LoanRepository, LoanRow};
pub use installment::{InstallmentRepository, InstallmentRow};
