// Health Probe Port - liveness check of the CRM web endpoint

use crate::error::Result;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Endpoint being probed
    fn endpoint(&self) -> String;

    /// Run the probe query and return the response body
    async fn check(&self) -> Result<String>;
}
