// Order Repository Port (Interface)

use crate::domain::{Cents, NewOrder, Order, OrderReminder};
use crate::error::Result;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Insert an order, computing its total and bumping the customer's
    /// `last_order_date` in the same transaction
    async fn insert(&self, order: &NewOrder) -> Result<Order>;

    async fn count(&self) -> Result<i64>;

    /// Sum of all order totals
    async fn total_revenue(&self) -> Result<Cents>;

    /// Orders placed in `[from, to]` (inclusive), oldest first
    async fn find_placed_between(&self, from: i64, to: i64) -> Result<Vec<OrderReminder>>;
}
