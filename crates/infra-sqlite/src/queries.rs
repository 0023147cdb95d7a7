// Write queries shared by the repositories and the seed transaction
// All take a connection so they run inside whatever transaction the caller holds

use crate::error::map_sqlx_error;
use crate::rows::{CustomerRow, ProductRow};
use crm_housekeeper_core::domain::{
    Cents, Customer, NewCustomer, NewOrder, NewProduct, Order, Product,
};
use crm_housekeeper_core::error::{AppError, Result};
use sqlx::SqliteConnection;

pub(crate) async fn insert_customer(
    conn: &mut SqliteConnection,
    customer: &NewCustomer,
    created_at: i64,
) -> Result<Customer> {
    customer.validate()?;

    let phone = customer.phone.as_deref().filter(|p| !p.is_empty());

    let row = sqlx::query_as::<_, CustomerRow>(
        r#"
        INSERT INTO customers (name, email, phone, created_at, last_order_date)
        VALUES (?, ?, ?, ?, NULL)
        RETURNING id, name, email, phone, created_at, last_order_date
        "#,
    )
    .bind(&customer.name)
    .bind(&customer.email)
    .bind(phone)
    .bind(created_at)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| match map_sqlx_error(e) {
        AppError::Conflict(_) => {
            AppError::Conflict(format!("Email '{}' already exists", customer.email))
        }
        other => other,
    })?;

    Ok(row.into_customer())
}

pub(crate) async fn insert_product(
    conn: &mut SqliteConnection,
    product: &NewProduct,
) -> Result<Product> {
    product.validate()?;

    let row = sqlx::query_as::<_, ProductRow>(
        r#"
        INSERT INTO products (name, price_cents, stock)
        VALUES (?, ?, ?)
        RETURNING id, name, price_cents, stock
        "#,
    )
    .bind(&product.name)
    .bind(product.price.as_i64())
    .bind(product.stock)
    .fetch_one(&mut *conn)
    .await
    .map_err(map_sqlx_error)?;

    Ok(row.into_product())
}

/// Insert order + product links, total = sum of product prices,
/// customer.last_order_date = max(last_order_date, order_date)
pub(crate) async fn insert_order(conn: &mut SqliteConnection, order: &NewOrder) -> Result<Order> {
    order.validate()?;

    let customer_exists: Option<i64> = sqlx::query_scalar("SELECT id FROM customers WHERE id = ?")
        .bind(order.customer_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(map_sqlx_error)?;
    if customer_exists.is_none() {
        return Err(AppError::NotFound(format!(
            "Customer with ID {} does not exist",
            order.customer_id
        )));
    }

    let mut total = Cents::ZERO;
    for product_id in &order.product_ids {
        let price: Option<i64> = sqlx::query_scalar("SELECT price_cents FROM products WHERE id = ?")
            .bind(product_id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(map_sqlx_error)?;
        match price {
            Some(p) => total = total + Cents(p),
            None => {
                return Err(AppError::NotFound(format!(
                    "Invalid product ID: {}",
                    product_id
                )))
            }
        }
    }

    let order_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO orders (customer_id, total_amount_cents, order_date)
        VALUES (?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(order.customer_id)
    .bind(total.as_i64())
    .bind(order.order_date)
    .fetch_one(&mut *conn)
    .await
    .map_err(map_sqlx_error)?;

    for (position, product_id) in order.product_ids.iter().enumerate() {
        // Duplicate product IDs count toward the total but link once
        sqlx::query(
            "INSERT OR IGNORE INTO order_products (order_id, product_id, position) VALUES (?, ?, ?)",
        )
        .bind(order_id)
        .bind(product_id)
        .bind(position as i64)
        .execute(&mut *conn)
        .await
        .map_err(map_sqlx_error)?;
    }

    sqlx::query(
        r#"
        UPDATE customers
        SET last_order_date = MAX(COALESCE(last_order_date, ?), ?)
        WHERE id = ?
        "#,
    )
    .bind(order.order_date)
    .bind(order.order_date)
    .bind(order.customer_id)
    .execute(&mut *conn)
    .await
    .map_err(map_sqlx_error)?;

    Ok(Order {
        id: order_id,
        customer_id: order.customer_id,
        product_ids: order.product_ids.clone(),
        total_amount: total,
        order_date: order.order_date,
    })
}
