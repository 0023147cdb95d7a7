// Port Layer - Interfaces for external dependencies

pub mod customer_repository;
pub mod health_probe;
pub mod id_provider; // For deterministic testing
pub mod order_repository;
pub mod product_repository;
pub mod run_log;
pub mod time_provider;
pub mod transaction;

// Re-exports
pub use customer_repository::CustomerRepository;
pub use health_probe::HealthProbe;
pub use id_provider::{IdProvider, UuidProvider};
pub use order_repository::OrderRepository;
pub use product_repository::ProductRepository;
pub use run_log::RunLog;
pub use time_provider::{FixedTimeProvider, SystemTimeProvider, TimeProvider};
pub use transaction::{CrmTransaction, Transaction, TransactionalCrmStore};
