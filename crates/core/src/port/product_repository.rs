// Product Repository Port (Interface)

use crate::domain::{NewProduct, Product, ProductId};
use crate::error::Result;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn insert(&self, product: &NewProduct) -> Result<Product>;

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>>;

    async fn count(&self) -> Result<i64>;

    /// Count products with stock strictly below `threshold`
    async fn count_low_stock(&self, threshold: i64) -> Result<i64>;

    /// Add `amount` to every product with stock below `threshold` (atomic)
    ///
    /// # Returns
    /// The products after restocking, ordered by ID
    async fn restock_below(&self, threshold: i64, amount: i64) -> Result<Vec<Product>>;
}
