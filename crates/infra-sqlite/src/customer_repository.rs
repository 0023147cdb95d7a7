// SQLite CustomerRepository Implementation

use crate::error::map_sqlx_error;
use crate::queries;
use crate::rows::CustomerRow;
use async_trait::async_trait;
use crm_housekeeper_core::domain::{Customer, CustomerId, NewCustomer};
use crm_housekeeper_core::error::Result;
use crm_housekeeper_core::port::CustomerRepository;
use sqlx::SqlitePool;
use tracing::debug;

pub struct SqliteCustomerRepository {
    pool: SqlitePool,
}

impl SqliteCustomerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerRepository for SqliteCustomerRepository {
    async fn insert(&self, customer: &NewCustomer, created_at: i64) -> Result<Customer> {
        let mut conn = self.pool.acquire().await.map_err(map_sqlx_error)?;
        queries::insert_customer(&mut conn, customer, created_at).await
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>> {
        let row = sqlx::query_as::<_, CustomerRow>("SELECT * FROM customers WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(|r| r.into_customer()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>> {
        let row = sqlx::query_as::<_, CustomerRow>("SELECT * FROM customers WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(|r| r.into_customer()))
    }

    async fn count(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn count_inactive(&self, cutoff: i64) -> Result<i64> {
        sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM customers
            WHERE last_order_date IS NOT NULL
            AND last_order_date < ?
            "#,
        )
        .bind(cutoff)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }

    async fn delete_inactive(&self, cutoff: i64) -> Result<u64> {
        // Orders and order_products go with the customer (ON DELETE CASCADE)
        let result = sqlx::query(
            r#"
            DELETE FROM customers
            WHERE last_order_date IS NOT NULL
            AND last_order_date < ?
            "#,
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let deleted = result.rows_affected();
        debug!(cutoff = cutoff, deleted = deleted, "Inactive customers deleted");

        Ok(deleted)
    }
}
