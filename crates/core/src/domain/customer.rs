// Customer Domain Model

use super::error::{DomainError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Customer ID (SQLite rowid)
pub type CustomerId = i64;

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\+?\d{10,15}|\d{3}-\d{3}-\d{4})$").expect("phone pattern is valid")
    })
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
    })
}

/// Persisted customer record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: i64,
    /// Millis since epoch of the most recent order, None if never ordered
    pub last_order_date: Option<i64>,
}

/// Customer input, validated before insert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl NewCustomer {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: None,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Validate name, email and optional phone
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "Customer name cannot be empty".to_string(),
            ));
        }

        if !email_pattern().is_match(&self.email) {
            return Err(DomainError::InvalidEmail(self.email.clone()));
        }

        if let Some(phone) = &self.phone {
            if !phone.is_empty() && !phone_pattern().is_match(phone) {
                return Err(DomainError::InvalidPhone(phone.clone()));
            }
        }

        Ok(())
    }
}
