//! PostgreSQL Lending Adapter
//!
//! Implements the lending ports on top of the repositories:
//!
//! - Pool-level reads go straight to the pool
//! - Each unit of work wraps one database transaction; `*_for_update`
//!   reads take row locks with `SELECT ... FOR UPDATE`
//! - Dropping an uncommitted unit of work rolls the transaction back
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresLendingAdapter;
//! use domain_lending::LendingPort;
//! use std::sync::Arc;
//!
//! let port: Arc<dyn LendingPort> = Arc::new(PostgresLendingAdapter::new(pool));
//! let loans = port.list_loans(customer_id).await?;
//! ```

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, instrument};

use core_kernel::{
    AdapterHealth, CustomerId, DomainPort, HealthCheckResult, HealthCheckable, InstallmentId,
    LoanId, Money, PortError,
};
use domain_lending::{Customer, Installment, LendingPort, LendingUnitOfWork, Loan};

use crate::error::DatabaseError;
use crate::repositories::{
    CustomerRepository, CustomerRow, InstallmentRepository, InstallmentRow, LoanRepository, LoanRow,
};

const ADAPTER_ID: &str = "postgres-lending-adapter";

/// PostgreSQL-backed implementation of the LendingPort trait
#[derive(Debug, Clone)]
pub struct PostgresLendingAdapter {
    pool: PgPool,
}

impl PostgresLendingAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl DomainPort for PostgresLendingAdapter {}

#[async_trait]
impl HealthCheckable for PostgresLendingAdapter {
    /// Runs `SELECT 1` against the pool
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();

        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await;

        let latency_ms = start.elapsed().as_millis() as u64;

        let (status, message) = match result {
            Ok(_) => (AdapterHealth::Healthy, None),
            Err(e) => (AdapterHealth::Unhealthy, Some(format!("Database error: {}", e))),
        };

        HealthCheckResult {
            adapter_id: ADAPTER_ID.to_string(),
            status,
            latency_ms,
            message,
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl LendingPort for PostgresLendingAdapter {
    #[instrument(skip(self))]
    async fn begin(&self) -> Result<Box<dyn LendingUnitOfWork>, PortError> {
        let tx = self.pool.begin().await.map_err(DatabaseError::from)?;
        debug!("Transaction started");
        Ok(Box::new(PgUnitOfWork { tx }))
    }

    #[instrument(skip(self), fields(customer_id = %id))]
    async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>, PortError> {
        CustomerRepository::find(&self.pool, id.into())
            .await?
            .map(row_to_customer)
            .transpose()
    }

    #[instrument(skip(self), fields(loan_id = %id))]
    async fn get_loan(&self, id: LoanId) -> Result<Option<Loan>, PortError> {
        LoanRepository::find(&self.pool, id.into())
            .await?
            .map(row_to_loan)
            .transpose()
    }

    #[instrument(skip(self), fields(customer_id = %customer_id))]
    async fn list_loans(&self, customer_id: CustomerId) -> Result<Vec<Loan>, PortError> {
        LoanRepository::list_by_customer(&self.pool, customer_id.into())
            .await?
            .into_iter()
            .map(row_to_loan)
            .collect()
    }

    #[instrument(skip(self), fields(loan_id = %loan_id))]
    async fn list_installments(&self, loan_id: LoanId) -> Result<Vec<Installment>, PortError> {
        InstallmentRepository::list_by_loan(&self.pool, loan_id.into())
            .await?
            .into_iter()
            .map(row_to_installment)
            .collect()
    }
}

/// A unit of work backed by one PostgreSQL transaction
pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl LendingUnitOfWork for PgUnitOfWork {
    async fn customer_for_update(&mut self, id: CustomerId) -> Result<Option<Customer>, PortError> {
        CustomerRepository::find_for_update(&mut *self.tx, id.into())
            .await?
            .map(row_to_customer)
            .transpose()
    }

    async fn insert_customer(&mut self, customer: &Customer) -> Result<(), PortError> {
        CustomerRepository::insert(&mut *self.tx, &customer_to_row(customer)).await?;
        Ok(())
    }

    async fn save_customer(&mut self, customer: &Customer) -> Result<(), PortError> {
        CustomerRepository::update(&mut *self.tx, &customer_to_row(customer)).await?;
        Ok(())
    }

    async fn loan_for_update(&mut self, id: LoanId) -> Result<Option<Loan>, PortError> {
        LoanRepository::find_for_update(&mut *self.tx, id.into())
            .await?
            .map(row_to_loan)
            .transpose()
    }

    async fn insert_loan(&mut self, loan: &Loan) -> Result<(), PortError> {
        LoanRepository::insert(&mut *self.tx, &loan_to_row(loan)?).await?;
        Ok(())
    }

    async fn save_loan(&mut self, loan: &Loan) -> Result<(), PortError> {
        LoanRepository::update(&mut *self.tx, &loan_to_row(loan)?).await?;
        Ok(())
    }

    async fn installments_for_loan(&mut self, loan_id: LoanId) -> Result<Vec<Installment>, PortError> {
        InstallmentRepository::list_by_loan(&mut *self.tx, loan_id.into())
            .await?
            .into_iter()
            .map(row_to_installment)
            .collect()
    }

    async fn insert_installments(&mut self, installments: &[Installment]) -> Result<(), PortError> {
        let rows: Vec<_> = installments.iter().map(installment_to_row).collect();
        InstallmentRepository::insert_all(&mut *self.tx, &rows).await?;
        Ok(())
    }

    async fn save_installment(&mut self, installment: &Installment) -> Result<(), PortError> {
        InstallmentRepository::update_payment(&mut *self.tx, &installment_to_row(installment)).await?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), PortError> {
        self.tx
            .commit()
            .await
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;
        debug!("Transaction committed");
        Ok(())
    }
}

// ============================================================================
// Row conversions
// ============================================================================

fn row_to_customer(row: CustomerRow) -> Result<Customer, PortError> {
    Ok(Customer {
        id: CustomerId::from(row.customer_id),
        credit_limit: Money::new(row.credit_limit),
        used_credit_limit: Money::new(row.used_credit_limit),
        created_at: row.created_at,
    })
}

fn customer_to_row(customer: &Customer) -> CustomerRow {
    CustomerRow {
        customer_id: customer.id.into(),
        credit_limit: customer.credit_limit.amount(),
        used_credit_limit: customer.used_credit_limit.amount(),
        created_at: customer.created_at,
    }
}

fn row_to_loan(row: LoanRow) -> Result<Loan, PortError> {
    let number_of_installments = u32::try_from(row.number_of_installments).map_err(|_| {
        DatabaseError::InvalidData(format!(
            "Loan {} has a negative installment count",
            row.loan_id
        ))
    })?;

    Ok(Loan {
        id: LoanId::from(row.loan_id),
        customer_id: CustomerId::from(row.customer_id),
        loan_amount: Money::new(row.loan_amount),
        number_of_installments,
        create_date: row.create_date,
        is_paid: row.is_paid,
    })
}

fn loan_to_row(loan: &Loan) -> Result<LoanRow, PortError> {
    let number_of_installments = i32::try_from(loan.number_of_installments).map_err(|_| {
        PortError::transformation(format!(
            "Installment count {} does not fit the loans table",
            loan.number_of_installments
        ))
    })?;

    Ok(LoanRow {
        loan_id: loan.id.into(),
        customer_id: loan.customer_id.into(),
        loan_amount: loan.loan_amount.amount(),
        number_of_installments,
        create_date: loan.create_date,
        is_paid: loan.is_paid,
    })
}

fn row_to_installment(row: InstallmentRow) -> Result<Installment, PortError> {
    Ok(Installment {
        id: InstallmentId::from(row.installment_id),
        loan_id: LoanId::from(row.loan_id),
        amount: Money::new(row.amount),
        paid_amount: Money::new(row.paid_amount),
        due_date: row.due_date,
        payment_date: row.payment_date,
        is_paid: row.is_paid,
    })
}

fn installment_to_row(installment: &Installment) -> InstallmentRow {
    InstallmentRow {
        installment_id: installment.id.into(),
        loan_id: installment.loan_id.into(),
        amount: installment.amount.amount(),
        paid_amount: installment.paid_amount.amount(),
        due_date: installment.due_date,
        payment_date: installment.payment_date,
        is_paid: installment.is_paid,
    }
}
