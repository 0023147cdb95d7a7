// CRM Housekeeper Core - Domain Logic, Ports & Maintenance Services
// NO infrastructure dependencies: SQLite, files and HTTP live behind ports

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use error::{AppError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
