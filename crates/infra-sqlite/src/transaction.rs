// SQLite Transaction Implementation (seeding)

use crate::error::map_sqlx_error;
use crate::queries;
use async_trait::async_trait;
use crm_housekeeper_core::domain::{Customer, NewCustomer, NewOrder, NewProduct, Order, Product};
use crm_housekeeper_core::error::Result;
use crm_housekeeper_core::port::{CrmTransaction, Transaction, TransactionalCrmStore};
use sqlx::{Sqlite, SqlitePool, Transaction as SqlxTransaction};

/// Opens CRM write transactions on a pool
pub struct SqliteCrmStore {
    pool: SqlitePool,
}

impl SqliteCrmStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionalCrmStore for SqliteCrmStore {
    async fn begin_transaction(&self) -> Result<Box<dyn CrmTransaction>> {
        let tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        Ok(Box::new(SqliteCrmTransaction::new(tx)))
    }
}

pub struct SqliteCrmTransaction<'a> {
    tx: SqlxTransaction<'a, Sqlite>,
}

impl<'a> SqliteCrmTransaction<'a> {
    pub fn new(tx: SqlxTransaction<'a, Sqlite>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl Transaction for SqliteCrmTransaction<'_> {
    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.tx.rollback().await.map_err(map_sqlx_error)?;
        Ok(())
    }
}

#[async_trait]
impl CrmTransaction for SqliteCrmTransaction<'_> {
    async fn clear_all(&mut self) -> Result<u64> {
        let mut removed = 0;
        // Children first so the counts are per table, not cascaded
        for table in ["order_products", "orders", "customers", "products"] {
            let result = sqlx::query(&format!("DELETE FROM {}", table))
                .execute(&mut *self.tx)
                .await
                .map_err(map_sqlx_error)?;
            removed += result.rows_affected();
        }
        Ok(removed)
    }

    async fn insert_customer(
        &mut self,
        customer: &NewCustomer,
        created_at: i64,
    ) -> Result<Customer> {
        queries::insert_customer(&mut self.tx, customer, created_at).await
    }

    async fn insert_product(&mut self, product: &NewProduct) -> Result<Product> {
        queries::insert_product(&mut self.tx, product).await
    }

    async fn insert_order(&mut self, order: &NewOrder) -> Result<Order> {
        queries::insert_order(&mut self.tx, order).await
    }
}
