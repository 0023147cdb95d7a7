// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Invalid phone format: {0}. Use +1234567890 or 123-456-7890")]
    InvalidPhone(String),

    #[error("Price must be positive, got {0} cents")]
    NonPositivePrice(i64),

    #[error("Stock cannot be negative, got {0}")]
    NegativeStock(i64),

    #[error("At least one product must be provided")]
    EmptyOrder,

    #[error("Invalid retention period: {0} days")]
    InvalidRetention(i64),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
