//! Inactive customer purge against a real SQLite schema and log file
//!
//! "now" is fixed so the cutoff is exact.

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDateTime;
use crm_housekeeper_core::application::constants::SUMMARY_TIMESTAMP_FORMAT;
use crm_housekeeper_core::application::PurgeInactiveCustomers;
use crm_housekeeper_core::domain::{
    Cents, CustomerId, NewCustomer, NewOrder, NewProduct, RetentionPolicy, MILLIS_PER_DAY,
};
use crm_housekeeper_core::port::{
    CustomerRepository, FixedTimeProvider, OrderRepository, ProductRepository,
};
use crm_housekeeper_infra_sqlite::{
    create_pool, run_migrations, SqliteCustomerRepository, SqliteOrderRepository, SqlitePool,
    SqliteProductRepository,
};
use crm_housekeeper_infra_system::FileRunLog;

const NOW: i64 = 1_735_689_600_000; // 2025-01-01T00:00:00Z
const CUTOFF: i64 = NOW - 365 * MILLIS_PER_DAY;

struct Fixture {
    pool: SqlitePool,
    customers: Arc<SqliteCustomerRepository>,
    orders: Arc<SqliteOrderRepository>,
    product_id: i64,
    _dir: tempfile::TempDir,
    log_path: std::path::PathBuf,
}

async fn fixture() -> Fixture {
    let pool = create_pool("sqlite::memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();

    let products = SqliteProductRepository::new(pool.clone());
    let product = products
        .insert(&NewProduct::new("Mouse", Cents(2_999), 100))
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("customer_cleanup_log.txt");

    Fixture {
        customers: Arc::new(SqliteCustomerRepository::new(pool.clone())),
        orders: Arc::new(SqliteOrderRepository::new(pool.clone())),
        pool,
        product_id: product.id,
        _dir: dir,
        log_path,
    }
}

impl Fixture {
    /// Customer whose last order is at `last_order_date` (None = never ordered)
    async fn customer(&self, email: &str, last_order_date: Option<i64>) -> CustomerId {
        let customer = self
            .customers
            .insert(&NewCustomer::new(email, email), NOW - 1000 * MILLIS_PER_DAY)
            .await
            .unwrap();
        if let Some(at) = last_order_date {
            self.orders
                .insert(&NewOrder::new(customer.id, vec![self.product_id], at))
                .await
                .unwrap();
        }
        customer.id
    }

    fn service(&self) -> PurgeInactiveCustomers {
        PurgeInactiveCustomers::new(
            self.customers.clone(),
            Arc::new(FileRunLog::new(&self.log_path)),
            Arc::new(FixedTimeProvider(NOW)),
            RetentionPolicy::default(),
        )
    }

    async fn exists(&self, id: CustomerId) -> bool {
        self.customers.find_by_id(id).await.unwrap().is_some()
    }
}

fn log_lines(path: &Path) -> Vec<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => content.lines().map(str::to_string).collect(),
        Err(_) => Vec::new(),
    }
}

/// Split "<timestamp> - Deleted <count> inactive customers"
fn parse_line(line: &str) -> (NaiveDateTime, u64) {
    let (ts, rest) = line.split_once(" - ").unwrap();
    let count = rest
        .strip_prefix("Deleted ")
        .and_then(|r| r.strip_suffix(" inactive customers"))
        .unwrap();
    (
        NaiveDateTime::parse_from_str(ts, SUMMARY_TIMESTAMP_FORMAT).unwrap(),
        count.parse().unwrap(),
    )
}

#[tokio::test]
async fn test_deletes_only_strictly_before_cutoff() {
    let f = fixture().await;
    let stale = f.customer("stale@example.com", Some(CUTOFF - 1)).await;
    let very_stale = f.customer("old@example.com", Some(NOW - 730 * MILLIS_PER_DAY)).await;
    let at_cutoff = f.customer("edge@example.com", Some(CUTOFF)).await;
    let recent = f.customer("recent@example.com", Some(NOW - MILLIS_PER_DAY)).await;

    let outcome = f.service().execute().await.unwrap();

    assert_eq!(outcome.deleted, 2);
    assert_eq!(outcome.cutoff, CUTOFF);
    assert!(!outcome.dry_run);
    assert!(!f.exists(stale).await);
    assert!(!f.exists(very_stale).await);
    assert!(f.exists(at_cutoff).await, "cutoff itself is not inactive");
    assert!(f.exists(recent).await);
}

#[tokio::test]
async fn test_customers_without_orders_are_kept() {
    let f = fixture().await;
    let never_ordered = f.customer("new@example.com", None).await;

    let outcome = f.service().execute().await.unwrap();

    assert_eq!(outcome.deleted, 0);
    assert!(f.exists(never_ordered).await);
}

#[tokio::test]
async fn test_one_log_line_per_run_with_count() {
    let f = fixture().await;
    f.customer("stale@example.com", Some(CUTOFF - MILLIS_PER_DAY)).await;
    f.customer("recent@example.com", Some(NOW)).await;

    let service = f.service();
    service.execute().await.unwrap();
    assert_eq!(log_lines(&f.log_path).len(), 1);

    // Second run finds nothing left to delete
    service.execute().await.unwrap();

    let lines = log_lines(&f.log_path);
    assert_eq!(lines.len(), 2);
    assert_eq!(parse_line(&lines[0]).1, 1);
    assert_eq!(parse_line(&lines[1]).1, 0);
    assert_eq!(f.customers.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_log_count_matches_rows_deleted() {
    let f = fixture().await;
    for i in 0..5 {
        f.customer(&format!("stale{}@example.com", i), Some(CUTOFF - (i + 1) * MILLIS_PER_DAY))
            .await;
    }
    for i in 0..3 {
        f.customer(&format!("active{}@example.com", i), Some(NOW - i * MILLIS_PER_DAY))
            .await;
    }

    let before = f.customers.count().await.unwrap();
    let outcome = f.service().execute().await.unwrap();
    let after = f.customers.count().await.unwrap();

    let lines = log_lines(&f.log_path);
    let (_, logged) = parse_line(&lines[0]);
    assert_eq!(logged, outcome.deleted);
    assert_eq!((before - after) as u64, logged);
    assert_eq!(logged, 5);
}

#[tokio::test]
async fn test_purge_removes_orders_of_deleted_customers() {
    let f = fixture().await;
    f.customer("stale@example.com", Some(CUTOFF - MILLIS_PER_DAY)).await;
    f.customer("recent@example.com", Some(NOW)).await;
    assert_eq!(f.orders.count().await.unwrap(), 2);

    f.service().execute().await.unwrap();

    assert_eq!(f.orders.count().await.unwrap(), 1);
    let links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_products")
        .fetch_one(&f.pool)
        .await
        .unwrap();
    assert_eq!(links, 1);
}

#[tokio::test]
async fn test_later_order_revives_customer() {
    let f = fixture().await;
    let id = f.customer("back@example.com", Some(CUTOFF - 10 * MILLIS_PER_DAY)).await;
    f.orders
        .insert(&NewOrder::new(id, vec![f.product_id], NOW - MILLIS_PER_DAY))
        .await
        .unwrap();

    let outcome = f.service().execute().await.unwrap();

    assert_eq!(outcome.deleted, 0);
    assert!(f.exists(id).await);
}

#[tokio::test]
async fn test_dry_run_changes_nothing() {
    let f = fixture().await;
    let stale = f.customer("stale@example.com", Some(CUTOFF - 1)).await;

    let outcome = f.service().preview().await.unwrap();

    assert!(outcome.dry_run);
    assert_eq!(outcome.deleted, 1);
    assert!(f.exists(stale).await);
    assert!(!f.log_path.exists());
}

#[tokio::test]
async fn test_shorter_retention_policy() {
    let f = fixture().await;
    let month_old = f.customer("month@example.com", Some(NOW - 45 * MILLIS_PER_DAY)).await;

    let service = PurgeInactiveCustomers::new(
        f.customers.clone(),
        Arc::new(FileRunLog::new(&f.log_path)),
        Arc::new(FixedTimeProvider(NOW)),
        RetentionPolicy::new(30).unwrap(),
    );

    assert_eq!(service.execute().await.unwrap().deleted, 1);
    assert!(!f.exists(month_old).await);
}
