// Inactivity retention rule

use super::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

/// Customers without an order for this many days are purged
pub const DEFAULT_INACTIVITY_DAYS: i64 = 365;

pub const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Upper bound for the inactivity period (100 years)
pub const MAX_INACTIVITY_DAYS: i64 = 36_500;

/// Retention policy for customer records
///
/// A customer is inactive when its `last_order_date` is strictly before
/// `now - inactivity_days`. Customers that never ordered are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionPolicy {
    inactivity_days: i64,
}

impl RetentionPolicy {
    pub fn new(inactivity_days: i64) -> Result<Self> {
        if !(1..=MAX_INACTIVITY_DAYS).contains(&inactivity_days) {
            return Err(DomainError::InvalidRetention(inactivity_days));
        }
        Ok(Self { inactivity_days })
    }

    pub fn inactivity_days(&self) -> i64 {
        self.inactivity_days
    }

    /// Cutoff timestamp (millis since epoch) for the given "now"
    ///
    /// Saturates instead of wrapping, so an out-of-range period can only move
    /// the cutoff into the past.
    pub fn cutoff(&self, now_millis: i64) -> i64 {
        now_millis.saturating_sub(self.inactivity_days.saturating_mul(MILLIS_PER_DAY))
    }

    /// Check whether a last order timestamp falls before the cutoff
    pub fn is_inactive(&self, last_order_date: Option<i64>, now_millis: i64) -> bool {
        match last_order_date {
            Some(ts) => ts < self.cutoff(now_millis),
            None => false,
        }
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            inactivity_days: DEFAULT_INACTIVITY_DAYS,
        }
    }
}
