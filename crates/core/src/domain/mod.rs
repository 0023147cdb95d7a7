// Domain Layer - CRM entities and the inactivity rule

pub mod customer;
pub mod error;
pub mod money;
pub mod order;
pub mod product;
pub mod retention;

// Re-exports
pub use customer::{Customer, CustomerId, NewCustomer};
pub use error::DomainError;
pub use money::Cents;
pub use order::{NewOrder, Order, OrderId, OrderReminder};
pub use product::{NewProduct, Product, ProductId, LOW_STOCK_THRESHOLD, RESTOCK_AMOUNT};
pub use retention::{RetentionPolicy, DEFAULT_INACTIVITY_DAYS, MAX_INACTIVITY_DAYS, MILLIS_PER_DAY};
