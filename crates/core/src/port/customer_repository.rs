// Customer Repository Port (Interface)

use crate::domain::{Customer, CustomerId, NewCustomer};
use crate::error::Result;
use async_trait::async_trait;

/// Repository interface for Customer persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Insert a validated customer
    async fn insert(&self, customer: &NewCustomer, created_at: i64) -> Result<Customer>;

    /// Find customer by ID
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>>;

    /// Find customer by email (emails are unique)
    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>>;

    /// Count all customers
    async fn count(&self) -> Result<i64>;

    /// Count customers whose last order is strictly before `cutoff`
    async fn count_inactive(&self, cutoff: i64) -> Result<i64>;

    /// Delete customers whose last order is strictly before `cutoff`
    ///
    /// # Returns
    /// Number of customers deleted
    async fn delete_inactive(&self, cutoff: i64) -> Result<u64>;
}
