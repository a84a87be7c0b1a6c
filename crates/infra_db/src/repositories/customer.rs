//! Customer repository implementation

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::error::DatabaseError;

const SELECT_CUSTOMER: &str = r#"
    SELECT customer_id, credit_limit, used_credit_limit, created_at
    FROM customers
    WHERE customer_id = $1
"#;

/// Database access for the `customers` table
///
/// Every method takes its executor, so calls run either directly on the
/// pool or inside an open transaction.
#[derive(Debug, Clone, Copy, Default)]
pub struct CustomerRepository;

impl CustomerRepository {
    pub async fn find<'e, E: PgExecutor<'e>>(
        executor: E,
        customer_id: Uuid,
    ) -> Result<Option<CustomerRow>, DatabaseError> {
        let row = sqlx::query_as::<_, CustomerRow>(SELECT_CUSTOMER)
            .bind(customer_id)
            .fetch_optional(executor)
            .await?;
        Ok(row)
    }

    /// Reads a customer and locks the row for the rest of the transaction
    pub async fn find_for_update<'e, E: PgExecutor<'e>>(
        executor: E,
        customer_id: Uuid,
    ) -> Result<Option<CustomerRow>, DatabaseError> {
        let query = format!("{SELECT_CUSTOMER} FOR UPDATE");
        let row = sqlx::query_as::<_, CustomerRow>(&query)
            .bind(customer_id)
            .fetch_optional(executor)
            .await?;
        Ok(row)
    }

    pub async fn insert<'e, E: PgExecutor<'e>>(
        executor: E,
        customer: &CustomerRow,
    ) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO customers (customer_id, credit_limit, used_credit_limit, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(customer.customer_id)
        .bind(customer.credit_limit)
        .bind(customer.used_credit_limit)
        .bind(customer.created_at)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Updates the mutable columns of an existing customer
    pub async fn update<'e, E: PgExecutor<'e>>(
        executor: E,
        customer: &CustomerRow,
    ) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE customers
            SET credit_limit = $2, used_credit_limit = $3
            WHERE customer_id = $1
            "#,
        )
        .bind(customer.customer_id)
        .bind(customer.credit_limit)
        .bind(customer.used_credit_limit)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Customer", customer.customer_id));
        }
        Ok(())
    }
}

/// A row of the `customers` table
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct CustomerRow {
    pub customer_id: Uuid,
    pub credit_limit: Decimal,
    pub used_credit_limit: Decimal,
    pub created_at: DateTime<Utc>,
}
