//! Domain Adapters
//!
//! Implementations of the domain ports on top of PostgreSQL.
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresLendingAdapter;
//! use domain_lending::LendingPort;
//!
//! let adapter = PostgresLendingAdapter::new(pool);
//! let loan = adapter.get_loan(loan_id).await?;
//! ```

pub mod lending;

pub use lending::{PgUnitOfWork, PostgresLendingAdapter};
