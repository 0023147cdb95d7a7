// CRM Heartbeat - liveness line plus optional endpoint probe

use crate::application::constants::HEARTBEAT_TIMESTAMP_FORMAT;
use crate::application::task::ScheduledTask;
use crate::application::timestamp::format_local;
use crate::error::Result;
use crate::port::{HealthProbe, RunLog, TimeProvider};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// What the probe reported, if one is configured
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeStatus {
    Skipped,
    Responded(String),
    Failed(String),
}

pub struct HeartbeatService {
    run_log: Arc<dyn RunLog>,
    time_provider: Arc<dyn TimeProvider>,
    probe: Option<Arc<dyn HealthProbe>>,
}

impl HeartbeatService {
    pub fn new(run_log: Arc<dyn RunLog>, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            run_log,
            time_provider,
            probe: None,
        }
    }

    pub fn with_probe(mut self, probe: Arc<dyn HealthProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Append the alive line, then the probe result
    ///
    /// A failing probe is recorded in the log and does not fail the heartbeat.
    pub async fn execute(&self) -> Result<ProbeStatus> {
        let now = format_local(self.time_provider.now_millis(), HEARTBEAT_TIMESTAMP_FORMAT);

        self.run_log
            .append_lines(&[format!("{} CRM is alive", now)])
            .await?;

        let Some(probe) = &self.probe else {
            return Ok(ProbeStatus::Skipped);
        };

        let (line, status) = match probe.check().await {
            Ok(body) => {
                info!(endpoint = %probe.endpoint(), "Heartbeat probe responded");
                (
                    format!("{} GraphQL response: {}", now, body),
                    ProbeStatus::Responded(body),
                )
            }
            Err(e) => {
                warn!(endpoint = %probe.endpoint(), error = %e, "Heartbeat probe failed");
                (
                    format!("{} GraphQL query failed: {}", now, e),
                    ProbeStatus::Failed(e.to_string()),
                )
            }
        };

        self.run_log.append_lines(&[line]).await?;

        Ok(status)
    }
}

#[async_trait]
impl ScheduledTask for HeartbeatService {
    fn name(&self) -> &'static str {
        "heartbeat"
    }

    async fn run_once(&self) -> Result<()> {
        self.execute().await.map(|_| ())
    }
}
