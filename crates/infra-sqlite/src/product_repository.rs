// SQLite ProductRepository Implementation

use crate::error::map_sqlx_error;
use crate::queries;
use crate::rows::ProductRow;
use async_trait::async_trait;
use crm_housekeeper_core::domain::{NewProduct, Product, ProductId};
use crm_housekeeper_core::error::Result;
use crm_housekeeper_core::port::ProductRepository;
use sqlx::SqlitePool;

pub struct SqliteProductRepository {
    pool: SqlitePool,
}

impl SqliteProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for SqliteProductRepository {
    async fn insert(&self, product: &NewProduct) -> Result<Product> {
        let mut conn = self.pool.acquire().await.map_err(map_sqlx_error)?;
        queries::insert_product(&mut conn, product).await
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, price_cents, stock FROM products WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(|r| r.into_product()))
    }

    async fn count(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn count_low_stock(&self, threshold: i64) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE stock < ?")
            .bind(threshold)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn restock_below(&self, threshold: i64, amount: i64) -> Result<Vec<Product>> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let ids: Vec<i64> =
            sqlx::query_scalar("SELECT id FROM products WHERE stock < ? ORDER BY id")
                .bind(threshold)
                .fetch_all(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;

        let mut restocked = Vec::with_capacity(ids.len());
        for id in ids {
            let row = sqlx::query_as::<_, ProductRow>(
                r#"
                UPDATE products
                SET stock = stock + ?
                WHERE id = ?
                RETURNING id, name, price_cents, stock
                "#,
            )
            .bind(amount)
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
            restocked.push(row.into_product());
        }

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(restocked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations};
    use crm_housekeeper_core::domain::Cents;

    #[tokio::test]
    async fn test_restock_only_low_stock() {
        let pool = create_pool(":memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        let repo = SqliteProductRepository::new(pool);

        let low = repo.insert(&NewProduct::new("Webcam", Cents(8999), 3)).await.unwrap();
        let edge = repo.insert(&NewProduct::new("Mouse", Cents(2999), 10)).await.unwrap();
        let empty = repo.insert(&NewProduct::new("Pen Set", Cents(1999), 0)).await.unwrap();

        assert_eq!(repo.count_low_stock(10).await.unwrap(), 2);

        let restocked = repo.restock_below(10, 10).await.unwrap();
        let stocks: Vec<(i64, i64)> = restocked.iter().map(|p| (p.id, p.stock)).collect();
        assert_eq!(stocks, vec![(low.id, 13), (empty.id, 10)]);

        assert_eq!(repo.find_by_id(edge.id).await.unwrap().unwrap().stock, 10);
        assert_eq!(repo.count_low_stock(10).await.unwrap(), 0);
    }
}
