//! Loan repository implementation

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::error::DatabaseError;

const LOAN_COLUMNS: &str =
    "loan_id, customer_id, loan_amount, number_of_installments, create_date, is_paid";

/// Database access for the `loans` table
#[derive(Debug, Clone, Copy, Default)]
pub struct LoanRepository;

impl LoanRepository {
    pub async fn find<'e, E: PgExecutor<'e>>(
        executor: E,
        loan_id: Uuid,
    ) -> Result<Option<LoanRow>, DatabaseError> {
        let query = format!("SELECT {LOAN_COLUMNS} FROM loans WHERE loan_id = $1");
        let row = sqlx::query_as::<_, LoanRow>(&query)
            .bind(loan_id)
            .fetch_optional(executor)
            .await?;
        Ok(row)
    }

    /// Reads a loan and locks the row for the rest of the transaction
    pub async fn find_for_update<'e, E: PgExecutor<'e>>(
        executor: E,
        loan_id: Uuid,
    ) -> Result<Option<LoanRow>, DatabaseError> {
        let query = format!("SELECT {LOAN_COLUMNS} FROM loans WHERE loan_id = $1 FOR UPDATE");
        let row = sqlx::query_as::<_, LoanRow>(&query)
            .bind(loan_id)
            .fetch_optional(executor)
            .await?;
        Ok(row)
    }

    /// Loans of a customer, oldest first
    pub async fn list_by_customer<'e, E: PgExecutor<'e>>(
        executor: E,
        customer_id: Uuid,
    ) -> Result<Vec<LoanRow>, DatabaseError> {
        let query = format!(
            "SELECT {LOAN_COLUMNS} FROM loans WHERE customer_id = $1 ORDER BY create_date, loan_id"
        );
        let rows = sqlx::query_as::<_, LoanRow>(&query)
            .bind(customer_id)
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }

    pub async fn insert<'e, E: PgExecutor<'e>>(executor: E, loan: &LoanRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO loans (
                loan_id, customer_id, loan_amount, number_of_installments, create_date, is_paid
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(loan.loan_id)
        .bind(loan.customer_id)
        .bind(loan.loan_amount)
        .bind(loan.number_of_installments)
        .bind(loan.create_date)
        .bind(loan.is_paid)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Updates the paid flag, the only column that changes after creation
    pub async fn update<'e, E: PgExecutor<'e>>(executor: E, loan: &LoanRow) -> Result<(), DatabaseError> {
        let result = sqlx::query("UPDATE loans SET is_paid = $2 WHERE loan_id = $1")
            .bind(loan.loan_id)
            .bind(loan.is_paid)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Loan", loan.loan_id));
        }
        Ok(())
    }
}

/// A row of the `loans` table
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct LoanRow {
    pub loan_id: Uuid,
    pub customer_id: Uuid,
    pub loan_amount: Decimal,
    pub number_of_installments: i32,
    pub create_date: DateTime<Utc>,
    pub is_paid: bool,
}
