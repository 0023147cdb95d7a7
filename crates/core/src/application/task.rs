// Scheduled task abstraction shared by the CLI and the daemon

use crate::error::Result;
use async_trait::async_trait;

/// A maintenance task that can run once per invocation
#[async_trait]
pub trait ScheduledTask: Send + Sync {
    /// Stable task name (used in logs and CLI)
    fn name(&self) -> &'static str;

    /// Run the task once
    async fn run_once(&self) -> Result<()>;
}
