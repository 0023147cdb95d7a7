// Demo dataset for seeding a fresh CRM database

use crate::domain::{Cents, NewCustomer, NewProduct};

/// Order referencing customers/products by position in the dataset
#[derive(Debug, Clone)]
pub struct SeedOrder {
    pub customer_idx: usize,
    pub product_indices: Vec<usize>,
    /// How long ago the order was placed
    pub days_ago: i64,
}

#[derive(Debug, Clone, Default)]
pub struct SeedDataset {
    pub customers: Vec<NewCustomer>,
    pub products: Vec<NewProduct>,
    pub orders: Vec<SeedOrder>,
}

fn order(customer_idx: usize, product_indices: &[usize], days_ago: i64) -> SeedOrder {
    SeedOrder {
        customer_idx,
        product_indices: product_indices.to_vec(),
        days_ago,
    }
}

impl SeedDataset {
    /// 10 customers, 12 products, 10 orders
    ///
    /// Two customers last ordered more than a year ago so a purge has
    /// something to do on demo data.
    pub fn demo() -> Self {
        let customers = vec![
            NewCustomer::new("Alice Johnson", "alice@example.com").with_phone("+1234567890"),
            NewCustomer::new("Bob Smith", "bob@example.com").with_phone("123-456-7890"),
            NewCustomer::new("Carol Williams", "carol@example.com").with_phone("+9876543210"),
            NewCustomer::new("David Brown", "david@example.com").with_phone("555-123-4567"),
            NewCustomer::new("Eve Davis", "eve@example.com").with_phone("+1122334455"),
            NewCustomer::new("Frank Miller", "frank@example.com"),
            NewCustomer::new("Grace Lee", "grace@example.com").with_phone("999-888-7777"),
            NewCustomer::new("Henry Wilson", "henry@example.com"),
            NewCustomer::new("Ivy Martinez", "ivy@example.com").with_phone("+5544332211"),
            NewCustomer::new("Jack Taylor", "jack@example.com").with_phone("111-222-3333"),
        ];

        let products = vec![
            NewProduct::new("Laptop", Cents(99_999), 50),
            NewProduct::new("Mouse", Cents(2_999), 200),
            NewProduct::new("Keyboard", Cents(7_999), 150),
            NewProduct::new("Monitor", Cents(29_999), 75),
            NewProduct::new("Headphones", Cents(14_999), 100),
            NewProduct::new("Webcam", Cents(8_999), 60),
            NewProduct::new("USB Cable", Cents(999), 500),
            NewProduct::new("External SSD", Cents(19_999), 80),
            NewProduct::new("Desk Lamp", Cents(3_999), 120),
            NewProduct::new("Office Chair", Cents(24_999), 40),
            NewProduct::new("Notebook", Cents(1_299), 300),
            NewProduct::new("Pen Set", Cents(1_999), 250),
        ];

        let orders = vec![
            order(0, &[0, 1, 2], 2),
            order(1, &[3, 4], 10),
            order(2, &[5], 30),
            order(3, &[0, 3, 4], 90),
            order(4, &[6, 7], 5),
            order(5, &[8, 9], 180),
            order(6, &[10, 11], 1),
            order(7, &[1, 2, 6], 400),
            order(8, &[4, 5], 730),
            order(9, &[0, 1, 2, 3, 4], 14),
        ];

        Self {
            customers,
            products,
            orders,
        }
    }
}
