// CRM Housekeeper Infrastructure - SQLite Adapter
// Implements: CustomerRepository, ProductRepository, OrderRepository, TransactionalCrmStore

mod connection;
mod customer_repository;
mod error;
mod migration;
mod order_repository;
mod product_repository;
mod queries;
mod rows;
mod transaction;

pub use connection::create_pool;
pub use customer_repository::SqliteCustomerRepository;
pub use migration::{run_migrations, schema_version};
pub use order_repository::SqliteOrderRepository;
pub use product_repository::SqliteProductRepository;
pub use transaction::{SqliteCrmStore, SqliteCrmTransaction};

// Pool type handed to every adapter
pub use sqlx::SqlitePool;
