// Product Domain Model

use super::error::{DomainError, Result};
use super::money::Cents;
use serde::{Deserialize, Serialize};

pub type ProductId = i64;

/// Products with stock strictly below this are restocked
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Units added to each low-stock product per restock run
pub const RESTOCK_AMOUNT: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Cents,
    pub stock: i64,
}

impl Product {
    pub fn is_low_stock(&self) -> bool {
        self.stock < LOW_STOCK_THRESHOLD
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: Cents,
    pub stock: i64,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, price: Cents, stock: i64) -> Self {
        Self {
            name: name.into(),
            price,
            stock,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "Product name cannot be empty".to_string(),
            ));
        }
        if self.price.as_i64() <= 0 {
            return Err(DomainError::NonPositivePrice(self.price.as_i64()));
        }
        if self.stock < 0 {
            return Err(DomainError::NegativeStock(self.stock));
        }
        Ok(())
    }
}
