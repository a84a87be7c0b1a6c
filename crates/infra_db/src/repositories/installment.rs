//! Installment repository implementation

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgExecutor};
use uuid::Uuid;

use crate::error::DatabaseError;

/// Database access for the `installments` table
#[derive(Debug, Clone, Copy, Default)]
pub struct InstallmentRepository;

impl InstallmentRepository {
    /// Installments of a loan, earliest due first
    pub async fn list_by_loan<'e, E: PgExecutor<'e>>(
        executor: E,
        loan_id: Uuid,
    ) -> Result<Vec<InstallmentRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, InstallmentRow>(
            r#"
            SELECT installment_id, loan_id, amount, paid_amount, due_date, payment_date, is_paid
            FROM installments
            WHERE loan_id = $1
            ORDER BY due_date, installment_id
            "#,
        )
        .bind(loan_id)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    /// Inserts a loan's schedule on one connection
    pub async fn insert_all(
        conn: &mut PgConnection,
        installments: &[InstallmentRow],
    ) -> Result<(), DatabaseError> {
        for installment in installments {
            sqlx::query(
                r#"
                INSERT INTO installments (
                    installment_id, loan_id, amount, paid_amount, due_date, payment_date, is_paid
                ) VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(installment.installment_id)
            .bind(installment.loan_id)
            .bind(installment.amount)
            .bind(installment.paid_amount)
            .bind(installment.due_date)
            .bind(installment.payment_date)
            .bind(installment.is_paid)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    /// Updates the payment columns of an installment
    pub async fn update_payment<'e, E: PgExecutor<'e>>(
        executor: E,
        installment: &InstallmentRow,
    ) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE installments
            SET paid_amount = $2, payment_date = $3, is_paid = $4
            WHERE installment_id = $1
            "#,
        )
        .bind(installment.installment_id)
        .bind(installment.paid_amount)
        .bind(installment.payment_date)
        .bind(installment.is_paid)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Installment", installment.installment_id));
        }
        Ok(())
    }
}

/// A row of the `installments` table
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct InstallmentRow {
    pub installment_id: Uuid,
    pub loan_id: Uuid,
    pub amount: Decimal,
    pub paid_amount: Decimal,
    pub due_date: NaiveDate,
    pub payment_date: Option<DateTime<Utc>>,
    pub is_paid: bool,
}
