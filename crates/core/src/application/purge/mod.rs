// Inactive Customer Purge
// cutoff = now - inactivity period; delete last_order_date < cutoff; append one summary line

use crate::application::constants::SUMMARY_TIMESTAMP_FORMAT;
use crate::application::task::ScheduledTask;
use crate::application::timestamp::format_local;
use crate::domain::RetentionPolicy;
use crate::error::Result;
use crate::port::{CustomerRepository, RunLog, TimeProvider};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Result of one purge invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurgeOutcome {
    /// "now" used for the run (millis since epoch)
    pub ran_at: i64,
    /// Customers with a last order strictly before this were eligible
    pub cutoff: i64,
    /// Rows deleted, or rows that would be deleted on a dry run
    pub deleted: u64,
    pub dry_run: bool,
}

/// Summary line appended to the purge log
pub fn format_purge_line(ran_at: i64, deleted: u64) -> String {
    format!(
        "{} - Deleted {} inactive customers",
        format_local(ran_at, SUMMARY_TIMESTAMP_FORMAT),
        deleted
    )
}

/// Deletes customers that have not ordered within the retention period
pub struct PurgeInactiveCustomers {
    customers: Arc<dyn CustomerRepository>,
    run_log: Arc<dyn RunLog>,
    time_provider: Arc<dyn TimeProvider>,
    policy: RetentionPolicy,
}

impl PurgeInactiveCustomers {
    /// Create a new purge service
    ///
    /// # Arguments
    /// * `customers` - Customer repository
    /// * `run_log` - Append-only purge log
    /// * `time_provider` - Source of "now"
    /// * `policy` - Inactivity period (365 days by default)
    pub fn new(
        customers: Arc<dyn CustomerRepository>,
        run_log: Arc<dyn RunLog>,
        time_provider: Arc<dyn TimeProvider>,
        policy: RetentionPolicy,
    ) -> Self {
        Self {
            customers,
            run_log,
            time_provider,
            policy,
        }
    }

    pub fn policy(&self) -> RetentionPolicy {
        self.policy
    }

    /// Delete inactive customers and append the summary line
    ///
    /// Nothing is written to the log when the delete fails. If the delete
    /// succeeds but the append fails, the error is returned and the rows stay
    /// deleted.
    pub async fn execute(&self) -> Result<PurgeOutcome> {
        let ran_at = self.time_provider.now_millis();
        let cutoff = self.policy.cutoff(ran_at);

        info!(
            inactivity_days = self.policy.inactivity_days(),
            cutoff = cutoff,
            "Purging inactive customers"
        );

        let deleted = self.customers.delete_inactive(cutoff).await?;

        self.run_log
            .append_lines(&[format_purge_line(ran_at, deleted)])
            .await?;

        info!(
            deleted_customers = deleted,
            log = %self.run_log.location(),
            "Inactive customer purge completed"
        );

        Ok(PurgeOutcome {
            ran_at,
            cutoff,
            deleted,
            dry_run: false,
        })
    }

    /// Count eligible customers without deleting or logging
    pub async fn preview(&self) -> Result<PurgeOutcome> {
        let ran_at = self.time_provider.now_millis();
        let cutoff = self.policy.cutoff(ran_at);

        let eligible = self.customers.count_inactive(cutoff).await?;

        info!(
            eligible_customers = eligible,
            cutoff = cutoff,
            "Inactive customer purge dry run"
        );

        Ok(PurgeOutcome {
            ran_at,
            cutoff,
            deleted: eligible.max(0) as u64,
            dry_run: true,
        })
    }
}

#[async_trait]
impl ScheduledTask for PurgeInactiveCustomers {
    fn name(&self) -> &'static str {
        "purge-inactive"
    }

    async fn run_once(&self) -> Result<()> {
        self.execute().await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MILLIS_PER_DAY;
    use crate::error::AppError;
    use crate::port::customer_repository::MockCustomerRepository;
    use crate::port::run_log::MockRunLog;
    use crate::port::time_provider::FixedTimeProvider;
    use mockall::predicate::eq;

    const NOW: i64 = 1_760_000_000_000;

    fn run_log_expecting(line: String) -> MockRunLog {
        let mut run_log = MockRunLog::new();
        run_log
            .expect_append_lines()
            .withf(move |lines| lines.len() == 1 && lines[0] == line)
            .times(1)
            .returning(|_| Ok(()));
        run_log
            .expect_location()
            .returning(|| "/tmp/test.log".to_string());
        run_log
    }

    #[tokio::test]
    async fn test_execute_deletes_before_cutoff_and_logs_count() {
        let mut customers = MockCustomerRepository::new();
        customers
            .expect_delete_inactive()
            .with(eq(NOW - 365 * MILLIS_PER_DAY))
            .times(1)
            .returning(|_| Ok(3));

        let service = PurgeInactiveCustomers::new(
            Arc::new(customers),
            Arc::new(run_log_expecting(format_purge_line(NOW, 3))),
            Arc::new(FixedTimeProvider(NOW)),
            RetentionPolicy::default(),
        );

        let outcome = service.execute().await.unwrap();
        assert_eq!(outcome.deleted, 3);
        assert_eq!(outcome.cutoff, NOW - 365 * MILLIS_PER_DAY);
        assert!(!outcome.dry_run);
    }

    #[tokio::test]
    async fn test_zero_eligible_still_logs_zero() {
        let mut customers = MockCustomerRepository::new();
        customers.expect_delete_inactive().returning(|_| Ok(0));

        let service = PurgeInactiveCustomers::new(
            Arc::new(customers),
            Arc::new(run_log_expecting(format_purge_line(NOW, 0))),
            Arc::new(FixedTimeProvider(NOW)),
            RetentionPolicy::default(),
        );

        assert_eq!(service.execute().await.unwrap().deleted, 0);
    }

    #[tokio::test]
    async fn test_failed_delete_writes_nothing() {
        let mut customers = MockCustomerRepository::new();
        customers
            .expect_delete_inactive()
            .returning(|_| Err(AppError::Database("disk I/O error".to_string())));

        let mut run_log = MockRunLog::new();
        run_log.expect_append_lines().never();

        let service = PurgeInactiveCustomers::new(
            Arc::new(customers),
            Arc::new(run_log),
            Arc::new(FixedTimeProvider(NOW)),
            RetentionPolicy::default(),
        );

        assert!(matches!(
            service.execute().await,
            Err(AppError::Database(_))
        ));
    }

    #[tokio::test]
    async fn test_preview_counts_without_side_effects() {
        let mut customers = MockCustomerRepository::new();
        customers.expect_count_inactive().returning(|_| Ok(4));
        customers.expect_delete_inactive().never();

        let mut run_log = MockRunLog::new();
        run_log.expect_append_lines().never();

        let service = PurgeInactiveCustomers::new(
            Arc::new(customers),
            Arc::new(run_log),
            Arc::new(FixedTimeProvider(NOW)),
            RetentionPolicy::new(30).unwrap(),
        );

        let outcome = service.preview().await.unwrap();
        assert_eq!(outcome.deleted, 4);
        assert_eq!(outcome.cutoff, NOW - 30 * MILLIS_PER_DAY);
        assert!(outcome.dry_run);
    }

    #[test]
    fn test_log_line_shape() {
        let line = format_purge_line(NOW, 12);
        assert!(line.ends_with(" - Deleted 12 inactive customers"));
    }
}
