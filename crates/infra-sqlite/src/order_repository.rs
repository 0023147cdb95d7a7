// SQLite OrderRepository Implementation

use crate::error::map_sqlx_error;
use crate::queries;
use async_trait::async_trait;
use crm_housekeeper_core::domain::{Cents, NewOrder, Order, OrderReminder};
use crm_housekeeper_core::error::Result;
use crm_housekeeper_core::port::OrderRepository;
use sqlx::SqlitePool;

#[derive(Debug, sqlx::FromRow)]
struct ReminderRow {
    order_id: i64,
    customer_email: String,
    order_date: i64,
}

pub struct SqliteOrderRepository {
    pool: SqlitePool,
}

impl SqliteOrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for SqliteOrderRepository {
    async fn insert(&self, order: &NewOrder) -> Result<Order> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        let created = queries::insert_order(&mut tx, order).await?;
        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(created)
    }

    async fn count(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn total_revenue(&self) -> Result<Cents> {
        let total: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(total_amount_cents), 0) FROM orders")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(Cents(total))
    }

    async fn find_placed_between(&self, from: i64, to: i64) -> Result<Vec<OrderReminder>> {
        let rows = sqlx::query_as::<_, ReminderRow>(
            r#"
            SELECT o.id AS order_id, c.email AS customer_email, o.order_date AS order_date
            FROM orders o
            JOIN customers c ON c.id = o.customer_id
            WHERE o.order_date >= ? AND o.order_date <= ?
            ORDER BY o.order_date ASC, o.id ASC
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows
            .into_iter()
            .map(|r| OrderReminder {
                order_id: r.order_id,
                customer_email: r.customer_email,
                order_date: r.order_date,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations, SqliteCustomerRepository, SqliteProductRepository};
    use crm_housekeeper_core::domain::{NewCustomer, NewProduct};
    use crm_housekeeper_core::error::AppError;
    use crm_housekeeper_core::port::{CustomerRepository, ProductRepository};

    struct Fixture {
        customers: SqliteCustomerRepository,
        products: SqliteProductRepository,
        orders: SqliteOrderRepository,
    }

    async fn fixture() -> Fixture {
        let pool = create_pool(":memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        Fixture {
            customers: SqliteCustomerRepository::new(pool.clone()),
            products: SqliteProductRepository::new(pool.clone()),
            orders: SqliteOrderRepository::new(pool),
        }
    }

    #[tokio::test]
    async fn test_insert_computes_total_and_last_order_date() {
        let f = fixture().await;
        let alice = f
            .customers
            .insert(&NewCustomer::new("Alice", "alice@example.com"), 0)
            .await
            .unwrap();
        let laptop = f.products.insert(&NewProduct::new("Laptop", Cents(99_999), 5)).await.unwrap();
        let mouse = f.products.insert(&NewProduct::new("Mouse", Cents(2_999), 5)).await.unwrap();

        let order = f
            .orders
            .insert(&NewOrder::new(alice.id, vec![laptop.id, mouse.id], 5_000))
            .await
            .unwrap();
        assert_eq!(order.total_amount, Cents(102_998));

        // An older order must not move last_order_date backwards
        f.orders
            .insert(&NewOrder::new(alice.id, vec![mouse.id], 1_000))
            .await
            .unwrap();

        let alice = f.customers.find_by_id(alice.id).await.unwrap().unwrap();
        assert_eq!(alice.last_order_date, Some(5_000));
        assert_eq!(f.orders.count().await.unwrap(), 2);
        assert_eq!(f.orders.total_revenue().await.unwrap(), Cents(105_997));
    }

    #[tokio::test]
    async fn test_insert_rejects_unknown_references() {
        let f = fixture().await;
        let bob = f
            .customers
            .insert(&NewCustomer::new("Bob", "bob@example.com"), 0)
            .await
            .unwrap();

        let err = f.orders.insert(&NewOrder::new(999, vec![1], 0)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = f.orders.insert(&NewOrder::new(bob.id, vec![42], 0)).await.unwrap_err();
        assert!(err.to_string().contains("Invalid product ID: 42"));

        // Failed inserts leave nothing behind
        assert_eq!(f.orders.count().await.unwrap(), 0);
        let bob = f.customers.find_by_id(bob.id).await.unwrap().unwrap();
        assert_eq!(bob.last_order_date, None);
    }

    #[tokio::test]
    async fn test_deleting_customer_cascades_to_orders() {
        let f = fixture().await;
        let carol = f
            .customers
            .insert(&NewCustomer::new("Carol", "carol@example.com"), 0)
            .await
            .unwrap();
        let webcam = f.products.insert(&NewProduct::new("Webcam", Cents(8_999), 5)).await.unwrap();
        f.orders
            .insert(&NewOrder::new(carol.id, vec![webcam.id], 100))
            .await
            .unwrap();

        assert_eq!(f.customers.delete_inactive(101).await.unwrap(), 1);
        assert_eq!(f.orders.count().await.unwrap(), 0);
        // Products survive
        assert_eq!(f.products.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_find_placed_between_is_inclusive() {
        let f = fixture().await;
        let dave = f
            .customers
            .insert(&NewCustomer::new("Dave", "dave@example.com"), 0)
            .await
            .unwrap();
        let pen = f.products.insert(&NewProduct::new("Pen", Cents(199), 5)).await.unwrap();

        for date in [99, 100, 150, 200, 201] {
            f.orders
                .insert(&NewOrder::new(dave.id, vec![pen.id], date))
                .await
                .unwrap();
        }

        let found = f.orders.find_placed_between(100, 200).await.unwrap();
        let dates: Vec<i64> = found.iter().map(|r| r.order_date).collect();
        assert_eq!(dates, vec![100, 150, 200]);
        assert!(found.iter().all(|r| r.customer_email == "dave@example.com"));
    }
}
