// Order Domain Model

use super::customer::CustomerId;
use super::error::{DomainError, Result};
use super::money::Cents;
use super::product::ProductId;
use serde::{Deserialize, Serialize};

pub type OrderId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub product_ids: Vec<ProductId>,
    pub total_amount: Cents,
    pub order_date: i64,
}

/// Order input; the total is computed from product prices at insert time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub customer_id: CustomerId,
    pub product_ids: Vec<ProductId>,
    pub order_date: i64,
}

impl NewOrder {
    pub fn new(customer_id: CustomerId, product_ids: Vec<ProductId>, order_date: i64) -> Self {
        Self {
            customer_id,
            product_ids,
            order_date,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.product_ids.is_empty() {
            return Err(DomainError::EmptyOrder);
        }
        Ok(())
    }
}

/// Recent order joined with its customer's email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReminder {
    pub order_id: OrderId,
    pub customer_email: String,
    pub order_date: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_requires_products() {
        assert_eq!(
            NewOrder::new(1, vec![], 0).validate(),
            Err(DomainError::EmptyOrder)
        );
        assert!(NewOrder::new(1, vec![3], 0).validate().is_ok());
    }
}
