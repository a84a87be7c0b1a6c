//! Infrastructure Database Layer
//!
//! PostgreSQL persistence for the loan service using SQLx.
//!
//! # Architecture
//!
//! - [`repositories`] hold the SQL for each table and work on row types
//! - [`adapters`] implement the domain's lending ports, converting rows to
//!   domain entities and wrapping units of work in transactions
//! - [`pool`] creates the connection pool and applies migrations
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresLendingAdapter};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/loans")).await?;
//! run_migrations(&pool).await?;
//! let adapter = PostgresLendingAdapter::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{DatabasePool, DatabaseConfig, MIGRATOR, create_pool, run_migrations};
pub use error::DatabaseError;
pub use adapters::{PgUnitOfWork, PostgresLendingAdapter};
