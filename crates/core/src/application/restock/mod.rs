// Low-stock restock: stock < threshold gets +amount

use crate::application::constants::RESTOCK_TIMESTAMP_FORMAT;
use crate::application::task::ScheduledTask;
use crate::application::timestamp::format_local;
use crate::domain::{Product, LOW_STOCK_THRESHOLD, RESTOCK_AMOUNT};
use crate::error::Result;
use crate::port::{ProductRepository, RunLog, TimeProvider};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

pub struct LowStockRestockService {
    products: Arc<dyn ProductRepository>,
    run_log: Arc<dyn RunLog>,
    time_provider: Arc<dyn TimeProvider>,
    threshold: i64,
    amount: i64,
}

impl LowStockRestockService {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        run_log: Arc<dyn RunLog>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            products,
            run_log,
            time_provider,
            threshold: LOW_STOCK_THRESHOLD,
            amount: RESTOCK_AMOUNT,
        }
    }

    /// Restock and log a summary line followed by one line per product
    ///
    /// A failed restock is recorded in the log before the error is returned.
    pub async fn execute(&self) -> Result<Vec<Product>> {
        let now = format_local(self.time_provider.now_millis(), RESTOCK_TIMESTAMP_FORMAT);

        let restocked = match self.products.restock_below(self.threshold, self.amount).await {
            Ok(products) => products,
            Err(e) => {
                error!(error = %e, "Low-stock restock failed");
                self.run_log
                    .append_lines(&[format!("{} - Error restocking products: {}", now, e)])
                    .await?;
                return Err(e);
            }
        };

        let mut lines = Vec::with_capacity(restocked.len() + 1);
        lines.push(format!(
            "{} - {} products restocked successfully.",
            now,
            restocked.len()
        ));
        for product in &restocked {
            lines.push(format!(
                "{} - Product: {}, Stock: {}",
                now, product.name, product.stock
            ));
        }
        self.run_log.append_lines(&lines).await?;

        info!(restocked = restocked.len(), "Low-stock restock completed");

        Ok(restocked)
    }
}

#[async_trait]
impl ScheduledTask for LowStockRestockService {
    fn name(&self) -> &'static str {
        "restock"
    }

    async fn run_once(&self) -> Result<()> {
        self.execute().await.map(|_| ())
    }
}
