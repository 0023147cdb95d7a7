// Database seeding: clear + insert demo data in one transaction

pub mod dataset;

pub use dataset::{SeedDataset, SeedOrder};

use crate::domain::{DomainError, NewOrder, MILLIS_PER_DAY};
use crate::error::{AppError, Result};
use crate::port::{CrmTransaction, TimeProvider, TransactionalCrmStore};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub cleared_rows: u64,
    pub customers: usize,
    pub products: usize,
    pub orders: usize,
}

pub struct SeedService {
    store: Arc<dyn TransactionalCrmStore>,
    time_provider: Arc<dyn TimeProvider>,
}

impl SeedService {
    pub fn new(store: Arc<dyn TransactionalCrmStore>, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            store,
            time_provider,
        }
    }

    /// Replace all CRM data with `dataset`
    ///
    /// The dataset is validated up front; any insert failure rolls the whole
    /// seed back, leaving the previous data untouched.
    pub async fn execute(&self, dataset: &SeedDataset) -> Result<SeedSummary> {
        validate_dataset(dataset)?;

        let mut tx = self.store.begin_transaction().await?;

        match self.apply(tx.as_mut(), dataset).await {
            Ok(summary) => {
                tx.commit().await?;
                info!(
                    customers = summary.customers,
                    products = summary.products,
                    orders = summary.orders,
                    cleared_rows = summary.cleared_rows,
                    "Database seeding completed"
                );
                Ok(summary)
            }
            Err(e) => {
                warn!(error = %e, "Seeding failed, rolling back");
                tx.rollback().await?;
                Err(e)
            }
        }
    }

    async fn apply(&self, tx: &mut dyn CrmTransaction, dataset: &SeedDataset) -> Result<SeedSummary> {
        let now = self.time_provider.now_millis();

        let cleared_rows = tx.clear_all().await?;

        let mut customers = Vec::with_capacity(dataset.customers.len());
        for customer in &dataset.customers {
            customers.push(tx.insert_customer(customer, now).await?);
        }

        let mut products = Vec::with_capacity(dataset.products.len());
        for product in &dataset.products {
            products.push(tx.insert_product(product).await?);
        }

        for seed in &dataset.orders {
            let order = NewOrder::new(
                customers[seed.customer_idx].id,
                seed.product_indices.iter().map(|&i| products[i].id).collect(),
                now - seed.days_ago * MILLIS_PER_DAY,
            );
            tx.insert_order(&order).await?;
        }

        Ok(SeedSummary {
            cleared_rows,
            customers: customers.len(),
            products: products.len(),
            orders: dataset.orders.len(),
        })
    }
}

/// Check every entity and every index reference before touching the store
pub fn validate_dataset(dataset: &SeedDataset) -> Result<()> {
    for (idx, customer) in dataset.customers.iter().enumerate() {
        customer
            .validate()
            .map_err(|e| AppError::Validation(format!("Customer row {}: {}", idx + 1, e)))?;
    }

    let mut emails: Vec<&str> = dataset.customers.iter().map(|c| c.email.as_str()).collect();
    emails.sort_unstable();
    if let Some(dup) = emails.windows(2).find(|w| w[0] == w[1]) {
        return Err(AppError::Conflict(format!("Email '{}' already exists", dup[0])));
    }

    for (idx, product) in dataset.products.iter().enumerate() {
        product
            .validate()
            .map_err(|e| AppError::Validation(format!("Product row {}: {}", idx + 1, e)))?;
    }

    for (idx, order) in dataset.orders.iter().enumerate() {
        if order.product_indices.is_empty() {
            return Err(DomainError::EmptyOrder.into());
        }
        if order.customer_idx >= dataset.customers.len() {
            return Err(AppError::Validation(format!(
                "Order row {}: unknown customer index {}",
                idx + 1,
                order.customer_idx
            )));
        }
        if let Some(bad) = order
            .product_indices
            .iter()
            .find(|&&i| i >= dataset.products.len())
        {
            return Err(AppError::Validation(format!(
                "Order row {}: unknown product index {}",
                idx + 1,
                bad
            )));
        }
    }

    Ok(())
}
