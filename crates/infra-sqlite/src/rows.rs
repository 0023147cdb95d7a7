// Row types for query_as mapping

use crm_housekeeper_core::domain::{Cents, Customer, Product};

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct CustomerRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: i64,
    pub last_order_date: Option<i64>,
}

impl CustomerRow {
    pub fn into_customer(self) -> Customer {
        Customer {
            id: self.id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            created_at: self.created_at,
            last_order_date: self.last_order_date,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProductRow {
    pub id: i64,
    pub name: String,
    pub price_cents: i64,
    pub stock: i64,
}

impl ProductRow {
    pub fn into_product(self) -> Product {
        Product {
            id: self.id,
            name: self.name,
            price: Cents(self.price_cents),
            stock: self.stock,
        }
    }
}
