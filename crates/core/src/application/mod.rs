// Application Layer - Maintenance use cases

pub mod constants;
pub mod heartbeat;
pub mod purge;
pub mod reminders;
pub mod report;
pub mod restock;
pub mod scheduler;
pub mod seed;
pub mod task;
pub mod timestamp;

// Re-exports
pub use heartbeat::{HeartbeatService, ProbeStatus};
pub use purge::{format_purge_line, PurgeInactiveCustomers, PurgeOutcome};
pub use reminders::OrderReminderService;
pub use report::{CrmReport, CrmReportService};
pub use restock::LowStockRestockService;
pub use scheduler::{shutdown_channel, ShutdownSender, ShutdownToken, TaskScheduler};
pub use seed::{SeedDataset, SeedService, SeedSummary};
pub use task::ScheduledTask;
