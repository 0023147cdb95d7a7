// CRM Report - customer/order counts and revenue, one line per run

use crate::application::constants::SUMMARY_TIMESTAMP_FORMAT;
use crate::application::task::ScheduledTask;
use crate::application::timestamp::format_local;
use crate::domain::Cents;
use crate::error::Result;
use crate::port::{CustomerRepository, OrderRepository, RunLog, TimeProvider};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrmReport {
    pub generated_at: i64,
    pub total_customers: i64,
    pub total_orders: i64,
    pub total_revenue: Cents,
}

impl CrmReport {
    pub fn to_log_line(&self) -> String {
        format!(
            "{} - Report: {} customers, {} orders, {} revenue",
            format_local(self.generated_at, SUMMARY_TIMESTAMP_FORMAT),
            self.total_customers,
            self.total_orders,
            self.total_revenue
        )
    }
}

pub struct CrmReportService {
    customers: Arc<dyn CustomerRepository>,
    orders: Arc<dyn OrderRepository>,
    run_log: Arc<dyn RunLog>,
    time_provider: Arc<dyn TimeProvider>,
}

impl CrmReportService {
    pub fn new(
        customers: Arc<dyn CustomerRepository>,
        orders: Arc<dyn OrderRepository>,
        run_log: Arc<dyn RunLog>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            customers,
            orders,
            run_log,
            time_provider,
        }
    }

    /// Gather totals without writing the report log
    pub async fn collect(&self) -> Result<CrmReport> {
        Ok(CrmReport {
            generated_at: self.time_provider.now_millis(),
            total_customers: self.customers.count().await?,
            total_orders: self.orders.count().await?,
            total_revenue: self.orders.total_revenue().await?,
        })
    }

    /// Gather totals and append the report line
    pub async fn execute(&self) -> Result<CrmReport> {
        let report = self.collect().await?;
        self.run_log.append_lines(&[report.to_log_line()]).await?;

        info!(
            customers = report.total_customers,
            orders = report.total_orders,
            revenue = %report.total_revenue,
            "CRM report generated"
        );

        Ok(report)
    }
}

#[async_trait]
impl ScheduledTask for CrmReportService {
    fn name(&self) -> &'static str {
        "report"
    }

    async fn run_once(&self) -> Result<()> {
        self.execute().await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::customer_repository::MockCustomerRepository;
    use crate::port::order_repository::MockOrderRepository;
    use crate::port::run_log::MockRunLog;
    use crate::port::time_provider::FixedTimeProvider;

    #[tokio::test]
    async fn test_report_line() {
        let mut customers = MockCustomerRepository::new();
        customers.expect_count().returning(|| Ok(10));

        let mut orders = MockOrderRepository::new();
        orders.expect_count().returning(|| Ok(4));
        orders.expect_total_revenue().returning(|| Ok(Cents(123_456)));

        let mut run_log = MockRunLog::new();
        run_log
            .expect_append_lines()
            .withf(|lines| {
                lines.len() == 1
                    && lines[0].ends_with(" - Report: 10 customers, 4 orders, 1234.56 revenue")
            })
            .times(1)
            .returning(|_| Ok(()));

        let service = CrmReportService::new(
            Arc::new(customers),
            Arc::new(orders),
            Arc::new(run_log),
            Arc::new(FixedTimeProvider(1_700_000_000_000)),
        );

        let report = service.execute().await.unwrap();
        assert_eq!(report.total_revenue, Cents(123_456));
    }
}
