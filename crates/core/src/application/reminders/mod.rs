// Order reminders for orders placed in the last week

use crate::application::constants::{REMINDER_TIMESTAMP_FORMAT, REMINDER_WINDOW_DAYS};
use crate::application::task::ScheduledTask;
use crate::application::timestamp::format_local;
use crate::domain::{OrderReminder, MILLIS_PER_DAY};
use crate::error::Result;
use crate::port::{OrderRepository, RunLog, TimeProvider};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

pub struct OrderReminderService {
    orders: Arc<dyn OrderRepository>,
    run_log: Arc<dyn RunLog>,
    time_provider: Arc<dyn TimeProvider>,
    window_days: i64,
}

impl OrderReminderService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        run_log: Arc<dyn RunLog>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            orders,
            run_log,
            time_provider,
            window_days: REMINDER_WINDOW_DAYS,
        }
    }

    pub async fn execute(&self) -> Result<Vec<OrderReminder>> {
        let now_ms = self.time_provider.now_millis();
        let now = format_local(now_ms, REMINDER_TIMESTAMP_FORMAT);
        let from = now_ms - self.window_days * MILLIS_PER_DAY;

        let reminders = match self.orders.find_placed_between(from, now_ms).await {
            Ok(reminders) => reminders,
            Err(e) => {
                error!(error = %e, "Order reminder query failed");
                self.run_log
                    .append_lines(&[format!(
                        "{} - Error processing order reminders: {}",
                        now, e
                    )])
                    .await?;
                return Err(e);
            }
        };

        let lines: Vec<String> = if reminders.is_empty() {
            vec![format!("{} - No recent orders found.", now)]
        } else {
            reminders
                .iter()
                .map(|r| {
                    format!(
                        "{} - Reminder sent for Order ID {} - Customer Email: {}",
                        now, r.order_id, r.customer_email
                    )
                })
                .collect()
        };
        self.run_log.append_lines(&lines).await?;

        info!(
            reminders = reminders.len(),
            window_days = self.window_days,
            "Order reminders processed"
        );

        Ok(reminders)
    }
}

#[async_trait]
impl ScheduledTask for OrderReminderService {
    fn name(&self) -> &'static str {
        "remind-orders"
    }

    async fn run_once(&self) -> Result<()> {
        self.execute().await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::order_repository::MockOrderRepository;
    use crate::port::run_log::MockRunLog;
    use crate::port::time_provider::FixedTimeProvider;
    use mockall::predicate::eq;

    const NOW: i64 = 1_700_000_000_000;

    #[tokio::test]
    async fn test_queries_last_seven_days() {
        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_placed_between()
            .with(eq(NOW - 7 * MILLIS_PER_DAY), eq(NOW))
            .returning(|_, _| {
                Ok(vec![OrderReminder {
                    order_id: 42,
                    customer_email: "alice@example.com".to_string(),
                    order_date: NOW - 1000,
                }])
            });

        let mut run_log = MockRunLog::new();
        run_log
            .expect_append_lines()
            .withf(|lines| {
                lines.len() == 1
                    && lines[0]
                        .ends_with(" - Reminder sent for Order ID 42 - Customer Email: alice@example.com")
            })
            .times(1)
            .returning(|_| Ok(()));

        let service = OrderReminderService::new(
            Arc::new(orders),
            Arc::new(run_log),
            Arc::new(FixedTimeProvider(NOW)),
        );

        assert_eq!(service.execute().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_no_recent_orders() {
        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_placed_between()
            .returning(|_, _| Ok(vec![]));

        let mut run_log = MockRunLog::new();
        run_log
            .expect_append_lines()
            .withf(|lines| lines.len() == 1 && lines[0].ends_with(" - No recent orders found."))
            .times(1)
            .returning(|_| Ok(()));

        let service = OrderReminderService::new(
            Arc::new(orders),
            Arc::new(run_log),
            Arc::new(FixedTimeProvider(NOW)),
        );

        assert!(service.execute().await.unwrap().is_empty());
    }
}
