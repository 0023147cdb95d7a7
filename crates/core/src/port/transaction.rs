// Transaction port for atomic multi-step operations (seeding)

use crate::domain::{Customer, NewCustomer, NewOrder, NewProduct, Order, Product};
use crate::error::Result;
use async_trait::async_trait;

/// Transaction trait for atomic multi-step operations
#[async_trait]
pub trait Transaction: Send {
    /// Commit the transaction
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Rollback the transaction
    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// Store able to open CRM write transactions
#[async_trait]
pub trait TransactionalCrmStore: Send + Sync {
    /// Begin a new transaction
    async fn begin_transaction(&self) -> Result<Box<dyn CrmTransaction>>;
}

/// CRM writes within a transaction
#[async_trait]
pub trait CrmTransaction: Transaction {
    /// Delete all orders, customers and products
    ///
    /// # Returns
    /// Number of rows removed across the three tables
    async fn clear_all(&mut self) -> Result<u64>;

    async fn insert_customer(&mut self, customer: &NewCustomer, created_at: i64)
        -> Result<Customer>;

    async fn insert_product(&mut self, product: &NewProduct) -> Result<Product>;

    async fn insert_order(&mut self, order: &NewOrder) -> Result<Order>;
}
