// Task Scheduler
// Runs each maintenance task on its own interval until shutdown

pub mod shutdown;

pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};

use crate::application::task::ScheduledTask;
use crate::error::{AppError, Result};
use crate::port::IdProvider;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, info_span, Instrument};

struct ScheduleEntry {
    task: Arc<dyn ScheduledTask>,
    every: Duration,
}

/// Interval scheduler for maintenance tasks
///
/// Every task runs once at startup and then on its interval. A failed run is
/// logged and the loop keeps going.
pub struct TaskScheduler {
    entries: Vec<ScheduleEntry>,
    id_provider: Arc<dyn IdProvider>,
}

impl TaskScheduler {
    pub fn new(id_provider: Arc<dyn IdProvider>) -> Self {
        Self {
            entries: Vec::new(),
            id_provider,
        }
    }

    /// Register a task; zero intervals disable it
    pub fn every(mut self, every: Duration, task: Arc<dyn ScheduledTask>) -> Self {
        if every.is_zero() {
            info!(task = task.name(), "Task disabled (interval 0)");
            return self;
        }
        self.entries.push(ScheduleEntry { task, every });
        self
    }

    pub fn task_names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.task.name()).collect()
    }

    /// Run one registered task immediately (for manual trigger)
    pub async fn run_now(&self, name: &str) -> Result<()> {
        let entry = self
            .entries
            .iter()
            .find(|e| e.task.name() == name)
            .ok_or_else(|| AppError::NotFound(format!("task '{}'", name)))?;

        run_task(entry.task.as_ref(), self.id_provider.as_ref()).await
    }

    /// Run all task loops until the shutdown token fires
    pub async fn run(self, shutdown: ShutdownToken) {
        info!(tasks = ?self.task_names(), "Task scheduler started");

        let loops = self.entries.into_iter().map(|entry| {
            let id_provider = self.id_provider.clone();
            let mut shutdown = shutdown.clone();

            tokio::spawn(async move {
                let mut tick = interval(entry.every);
                tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

                loop {
                    tokio::select! {
                        _ = shutdown.wait() => break,
                        _ = tick.tick() => {}
                    }

                    if shutdown.is_shutdown() {
                        break;
                    }

                    // Errors are already logged inside run_task
                    let _ = run_task(entry.task.as_ref(), id_provider.as_ref()).await;
                }

                info!(task = entry.task.name(), "Task loop stopped");
            })
        });

        for result in join_all(loops.collect::<Vec<_>>()).await {
            if let Err(e) = result {
                error!(error = %e, "Task loop panicked");
            }
        }

        info!("Task scheduler stopped");
    }
}

async fn run_task(task: &dyn ScheduledTask, id_provider: &dyn IdProvider) -> Result<()> {
    let span = info_span!("task", name = task.name(), run_id = %id_provider.generate_id());

    async {
        info!("Running scheduled task...");
        match task.run_once().await {
            Ok(()) => {
                info!("Scheduled task completed successfully");
                Ok(())
            }
            Err(e) => {
                error!(error = ?e, "Scheduled task failed");
                Err(e)
            }
        }
    }
    .instrument(span)
    .await
}
