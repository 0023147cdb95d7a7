// Maintenance constants (no magic values)
use std::time::Duration;

/// Purge summary log (one line per run)
pub const DEFAULT_PURGE_LOG_PATH: &str = "/tmp/customer_cleanup_log.txt";

pub const DEFAULT_REPORT_LOG_PATH: &str = "/tmp/crm_report_log.txt";

pub const DEFAULT_HEARTBEAT_LOG_PATH: &str = "/tmp/crm_heartbeat_log.txt";

pub const DEFAULT_LOW_STOCK_LOG_PATH: &str = "/tmp/low_stock_updates_log.txt";

pub const DEFAULT_REMINDERS_LOG_PATH: &str = "/tmp/order_reminders_log.txt";

/// Orders placed within this many days get a reminder
pub const REMINDER_WINDOW_DAYS: i64 = 7;

/// `2025-01-31 23:59:59`
pub const SUMMARY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `31/01/2025-23:59:59`
pub const HEARTBEAT_TIMESTAMP_FORMAT: &str = "%d/%m/%Y-%H:%M:%S";

/// `31/01/2025-23:59:59`, shared with the heartbeat log
pub const RESTOCK_TIMESTAMP_FORMAT: &str = "%d/%m/%Y-%H:%M:%S";

/// `2025-01-31 23:59:59,123`
pub const REMINDER_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Weekly purge
pub const DEFAULT_PURGE_INTERVAL: Duration = Duration::from_secs(7 * 24 * 3600);

/// Weekly report
pub const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_secs(7 * 24 * 3600);

/// Heartbeat every 5 minutes
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Restock every 12 hours
pub const DEFAULT_RESTOCK_INTERVAL: Duration = Duration::from_secs(12 * 3600);

/// Reminders once a day
pub const DEFAULT_REMINDERS_INTERVAL: Duration = Duration::from_secs(24 * 3600);
