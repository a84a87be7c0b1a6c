//! Core Kernel - Foundational types and utilities for the lending service
//!
//! This crate provides the fundamental building blocks used by the domain,
//! infrastructure and API layers:
//! - Money and rate types with precise decimal arithmetic
//! - Calendar arithmetic and an injectable clock
//! - Strongly-typed identifiers
//! - Port error and health-check abstractions

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod ports;

pub use money::{Money, Rate, MoneyError};
pub use temporal::{
    Clock, SystemClock, FixedClock, Timezone, TemporalError,
    first_of_next_month, add_months,
};
pub use identifiers::{CustomerId, LoanId, InstallmentId};
pub use ports::{PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth};
