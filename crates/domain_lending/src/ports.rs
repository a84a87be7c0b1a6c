//! Lending Domain Ports
//!
//! Storage for customers, loans and installments is reached through two
//! traits:
//!
//! - [`LendingPort`] serves single reads and opens units of work
//! - [`LendingUnitOfWork`] groups the reads and writes of one operation so
//!   they are applied atomically on [`LendingUnitOfWork::commit`]
//!
//! Dropping a unit of work without committing discards every write made
//! through it. Rows read through the `*_for_update` methods stay locked
//! against other units of work until the unit ends.
//!
//! # Adapters
//!
//! - **PostgreSQL**: `infra_db::PostgresLendingAdapter`
//! - **Mock**: [`mock::MockLendingPort`], an in-memory store for tests
//!
//! ```rust,ignore
//! let mut uow = port.begin().await?;
//! let customer = uow.customer_for_update(customer_id).await?;
//! uow.insert_loan(&loan).await?;
//! uow.commit().await?;
//! ```

use async_trait::async_trait;

use core_kernel::{CustomerId, DomainPort, HealthCheckable, LoanId, PortError};

use crate::customer::Customer;
use crate::installment::Installment;
use crate::loan::Loan;

/// Port for lending storage
#[async_trait]
pub trait LendingPort: DomainPort + HealthCheckable {
    /// Opens a unit of work
    async fn begin(&self) -> Result<Box<dyn LendingUnitOfWork>, PortError>;

    async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>, PortError>;

    async fn get_loan(&self, id: LoanId) -> Result<Option<Loan>, PortError>;

    /// Loans of a customer, oldest first
    async fn list_loans(&self, customer_id: CustomerId) -> Result<Vec<Loan>, PortError>;

    /// Installments of a loan, earliest due first
    async fn list_installments(&self, loan_id: LoanId) -> Result<Vec<Installment>, PortError>;
}

/// A set of reads and writes applied as one atomic change
#[async_trait]
pub trait LendingUnitOfWork: Send {
    /// Reads a customer and locks it until the unit of work ends
    async fn customer_for_update(&mut self, id: CustomerId) -> Result<Option<Customer>, PortError>;

    async fn insert_customer(&mut self, customer: &Customer) -> Result<(), PortError>;

    async fn save_customer(&mut self, customer: &Customer) -> Result<(), PortError>;

    /// Reads a loan and locks it until the unit of work ends
    async fn loan_for_update(&mut self, id: LoanId) -> Result<Option<Loan>, PortError>;

    async fn insert_loan(&mut self, loan: &Loan) -> Result<(), PortError>;

    async fn save_loan(&mut self, loan: &Loan) -> Result<(), PortError>;

    /// Installments of a loan, earliest due first
    async fn installments_for_loan(&mut self, loan_id: LoanId) -> Result<Vec<Installment>, PortError>;

    async fn insert_installments(&mut self, installments: &[Installment]) -> Result<(), PortError>;

    async fn save_installment(&mut self, installment: &Installment) -> Result<(), PortError>;

    /// Applies every write made through this unit of work
    async fn commit(self: Box<Self>) -> Result<(), PortError>;
}

/// In-memory implementation for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use chrono::Utc;
    use core_kernel::{AdapterHealth, HealthCheckResult};
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::{Mutex, OwnedMutexGuard};

    #[derive(Debug, Clone, Default)]
    struct LendingState {
        customers: HashMap<CustomerId, Customer>,
        // insertion order doubles as creation order
        loans: Vec<Loan>,
        installments: Vec<Installment>,
        committed_writes: usize,
        fail_next_commit: bool,
    }

    impl LendingState {
        fn loans_of(&self, customer_id: CustomerId) -> Vec<Loan> {
            let mut loans: Vec<_> = self
                .loans
                .iter()
                .filter(|l| l.customer_id == customer_id)
                .cloned()
                .collect();
            loans.sort_by_key(|l| l.create_date);
            loans
        }

        fn installments_of(&self, loan_id: LoanId) -> Vec<Installment> {
            let mut installments: Vec<_> = self
                .installments
                .iter()
                .filter(|i| i.loan_id == loan_id)
                .cloned()
                .collect();
            installments.sort_by_key(|i| i.due_date);
            installments
        }
    }

    /// In-memory mock implementation of LendingPort
    ///
    /// Units of work hold the store exclusively and operate on a private
    /// copy that replaces the store on commit.
    #[derive(Debug, Clone, Default)]
    pub struct MockLendingPort {
        state: Arc<Mutex<LendingState>>,
    }

    impl MockLendingPort {
        /// Creates an empty mock port
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with customers for testing
        pub async fn with_customers(customers: Vec<Customer>) -> Self {
            let port = Self::new();
            {
                let mut state = port.state.lock().await;
                for customer in customers {
                    state.customers.insert(customer.id, customer);
                }
            }
            port
        }

        /// Number of writes applied by committed units of work
        pub async fn write_count(&self) -> usize {
            self.state.lock().await.committed_writes
        }

        /// Makes the next commit fail, discarding its writes
        pub async fn fail_next_commit(&self) {
            self.state.lock().await.fail_next_commit = true;
        }
    }

    impl DomainPort for MockLendingPort {}

    #[async_trait]
    impl HealthCheckable for MockLendingPort {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult {
                adapter_id: "mock-lending-port".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms: 0,
                message: Some("Mock adapter always healthy".to_string()),
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl LendingPort for MockLendingPort {
        async fn begin(&self) -> Result<Box<dyn LendingUnitOfWork>, PortError> {
            let guard = Arc::clone(&self.state).lock_owned().await;
            let working = guard.clone();
            Ok(Box::new(MockUnitOfWork {
                guard,
                working,
                writes: 0,
            }))
        }

        async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>, PortError> {
            Ok(self.state.lock().await.customers.get(&id).cloned())
        }

        async fn get_loan(&self, id: LoanId) -> Result<Option<Loan>, PortError> {
            let state = self.state.lock().await;
            Ok(state.loans.iter().find(|l| l.id == id).cloned())
        }

        async fn list_loans(&self, customer_id: CustomerId) -> Result<Vec<Loan>, PortError> {
            Ok(self.state.lock().await.loans_of(customer_id))
        }

        async fn list_installments(&self, loan_id: LoanId) -> Result<Vec<Installment>, PortError> {
            Ok(self.state.lock().await.installments_of(loan_id))
        }
    }

    /// Unit of work over the in-memory store
    pub struct MockUnitOfWork {
        guard: OwnedMutexGuard<LendingState>,
        working: LendingState,
        writes: usize,
    }

    #[async_trait]
    impl LendingUnitOfWork for MockUnitOfWork {
        async fn customer_for_update(&mut self, id: CustomerId) -> Result<Option<Customer>, PortError> {
            Ok(self.working.customers.get(&id).cloned())
        }

        async fn insert_customer(&mut self, customer: &Customer) -> Result<(), PortError> {
            if self.working.customers.contains_key(&customer.id) {
                return Err(PortError::conflict(format!("Customer {} already exists", customer.id)));
            }
            self.working.customers.insert(customer.id, customer.clone());
            self.writes += 1;
            Ok(())
        }

        async fn save_customer(&mut self, customer: &Customer) -> Result<(), PortError> {
            let slot = self
                .working
                .customers
                .get_mut(&customer.id)
                .ok_or_else(|| PortError::not_found("Customer", customer.id))?;
            *slot = customer.clone();
            self.writes += 1;
            Ok(())
        }

        async fn loan_for_update(&mut self, id: LoanId) -> Result<Option<Loan>, PortError> {
            Ok(self.working.loans.iter().find(|l| l.id == id).cloned())
        }

        async fn insert_loan(&mut self, loan: &Loan) -> Result<(), PortError> {
            if !self.working.customers.contains_key(&loan.customer_id) {
                return Err(PortError::not_found("Customer", loan.customer_id));
            }
            if self.working.loans.iter().any(|l| l.id == loan.id) {
                return Err(PortError::conflict(format!("Loan {} already exists", loan.id)));
            }
            self.working.loans.push(loan.clone());
            self.writes += 1;
            Ok(())
        }

        async fn save_loan(&mut self, loan: &Loan) -> Result<(), PortError> {
            let slot = self
                .working
                .loans
                .iter_mut()
                .find(|l| l.id == loan.id)
                .ok_or_else(|| PortError::not_found("Loan", loan.id))?;
            *slot = loan.clone();
            self.writes += 1;
            Ok(())
        }

        async fn installments_for_loan(&mut self, loan_id: LoanId) -> Result<Vec<Installment>, PortError> {
            Ok(self.working.installments_of(loan_id))
        }

        async fn insert_installments(&mut self, installments: &[Installment]) -> Result<(), PortError> {
            for installment in installments {
                if !self.working.loans.iter().any(|l| l.id == installment.loan_id) {
                    return Err(PortError::not_found("Loan", installment.loan_id));
                }
                self.working.installments.push(installment.clone());
                self.writes += 1;
            }
            Ok(())
        }

        async fn save_installment(&mut self, installment: &Installment) -> Result<(), PortError> {
            let slot = self
                .working
                .installments
                .iter_mut()
                .find(|i| i.id == installment.id)
                .ok_or_else(|| PortError::not_found("Installment", installment.id))?;
            *slot = installment.clone();
            self.writes += 1;
            Ok(())
        }

        async fn commit(self: Box<Self>) -> Result<(), PortError> {
            let MockUnitOfWork { mut guard, mut working, writes } = *self;

            if guard.fail_next_commit {
                guard.fail_next_commit = false;
                return Err(PortError::connection("Simulated commit failure"));
            }

            working.committed_writes = guard.committed_writes + writes;
            working.fail_next_commit = false;
            *guard = working;
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use core_kernel::Money;
        use rust_decimal_macros::dec;

        fn customer() -> Customer {
            Customer::new(Money::new(dec!(1000)), Utc::now()).unwrap()
        }

        #[tokio::test]
        async fn test_dropped_unit_of_work_discards_writes() {
            let port = MockLendingPort::new();
            let c = customer();

            {
                let mut uow = port.begin().await.unwrap();
                uow.insert_customer(&c).await.unwrap();
            }

            assert!(port.get_customer(c.id).await.unwrap().is_none());
            assert_eq!(port.write_count().await, 0);
        }

        #[tokio::test]
        async fn test_commit_publishes_writes() {
            let port = MockLendingPort::new();
            let c = customer();

            let mut uow = port.begin().await.unwrap();
            uow.insert_customer(&c).await.unwrap();
            uow.commit().await.unwrap();

            assert_eq!(port.get_customer(c.id).await.unwrap(), Some(c));
            assert_eq!(port.write_count().await, 1);
        }

        #[tokio::test]
        async fn test_failed_commit_discards_writes() {
            let port = MockLendingPort::new();
            port.fail_next_commit().await;
            let c = customer();

            let mut uow = port.begin().await.unwrap();
            uow.insert_customer(&c).await.unwrap();
            assert!(uow.commit().await.unwrap_err().is_transient());

            assert!(port.get_customer(c.id).await.unwrap().is_none());
        }

        #[tokio::test]
        async fn test_loan_requires_existing_customer() {
            let port = MockLendingPort::new();
            let loan = Loan::new(CustomerId::new(), Money::new(dec!(100)), 6, Utc::now());

            let mut uow = port.begin().await.unwrap();
            let err = uow.insert_loan(&loan).await.unwrap_err();
            assert!(err.is_not_found());
        }
    }
}
