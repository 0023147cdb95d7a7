//! CRM Housekeeper Daemon - runs every maintenance task on its interval

mod telemetry;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crm_housekeeper_core::application::{
    shutdown_channel, CrmReportService, HeartbeatService, LowStockRestockService,
    OrderReminderService, PurgeInactiveCustomers, TaskScheduler,
};
use crm_housekeeper_core::port::{SystemTimeProvider, TimeProvider, UuidProvider};
use crm_housekeeper_infra_sqlite::{
    create_pool, run_migrations, SqliteCustomerRepository, SqliteOrderRepository,
    SqliteProductRepository,
};
use crm_housekeeper_infra_system::{FileRunLog, GraphqlHealthProbe, Settings};
use telemetry::BoxedLayer;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const LOG_FILE_PREFIX: &str = "crm-housekeeperd.log";
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Install the global subscriber
///
/// The returned guard flushes the rolling file writer and must outlive main.
fn init_logging() -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("crm_housekeeper=info"))
        .context("Failed to create env filter")?;

    let log_format =
        std::env::var("CRM_HOUSEKEEPER_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let mut layers: Vec<BoxedLayer> = Vec::new();
    match log_format.as_str() {
        // Production: JSON structured logging
        "json" => layers.push(fmt::layer().json().boxed()),
        // Development: Pretty formatting with colors
        _ => layers.push(fmt::layer().pretty().boxed()),
    }

    let mut guard = None;
    if let Ok(dir) = std::env::var("CRM_HOUSEKEEPER_LOG_DIR") {
        let dir = PathBuf::from(shellexpand::tilde(&dir).into_owned());
        let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
        let (writer, file_guard) = tracing_appender::non_blocking(appender);
        layers.push(fmt::layer().json().with_ansi(false).with_writer(writer).boxed());
        guard = Some(file_guard);
    }

    let otel = telemetry::otel_layer().context("Failed to initialize OpenTelemetry")?;
    let otel_enabled = otel.is_some();
    layers.extend(otel);

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .init();

    if otel_enabled {
        info!("OpenTelemetry export enabled");
    } else if std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").is_ok() && !telemetry::enabled() {
        warn!("OpenTelemetry endpoint set but feature 'telemetry' not enabled");
    }

    Ok(guard)
}

fn load_settings() -> Result<Settings> {
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let explicit_root = std::env::var("CRM_HOUSEKEEPER_PROJECT_ROOT")
        .ok()
        .map(|root| PathBuf::from(shellexpand::tilde(&root).into_owned()));

    Settings::resolve(explicit_root.as_deref(), &cwd).context("Failed to load configuration")
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging
    let _log_guard = init_logging()?;

    info!("CRM Housekeeper daemon v{} starting...", VERSION);

    // 2. Load configuration
    let settings = load_settings()?;
    info!(
        project_root = %settings.project_root.display(),
        database_url = %settings.database_url,
        "Configuration loaded"
    );

    // 3. Initialize database
    if let Some(db_file) = settings.database_file() {
        ensure_parent_dir(&db_file)?;
    }
    let pool = create_pool(&settings.database_url)
        .await
        .context("DB pool creation failed")?;
    run_migrations(&pool).await.context("Migration failed")?;

    // 4. Setup dependencies (DI wiring)
    let time_provider: Arc<dyn TimeProvider> = Arc::new(SystemTimeProvider);
    let customers = Arc::new(SqliteCustomerRepository::new(pool.clone()));
    let products = Arc::new(SqliteProductRepository::new(pool.clone()));
    let orders = Arc::new(SqliteOrderRepository::new(pool.clone()));

    let purge = PurgeInactiveCustomers::new(
        customers.clone(),
        Arc::new(FileRunLog::new(&settings.logs.purge)),
        time_provider.clone(),
        settings.retention_policy()?,
    );
    let report = CrmReportService::new(
        customers,
        orders.clone(),
        Arc::new(FileRunLog::new(&settings.logs.report)),
        time_provider.clone(),
    );
    let mut heartbeat = HeartbeatService::new(
        Arc::new(FileRunLog::new(&settings.logs.heartbeat)),
        time_provider.clone(),
    );
    if let Some(url) = &settings.probe.graphql_url {
        let probe = GraphqlHealthProbe::new(
            url.clone(),
            settings.probe.timeout(),
            settings.probe.attempts,
        )?;
        heartbeat = heartbeat.with_probe(Arc::new(probe));
    }
    let restock = LowStockRestockService::new(
        products,
        Arc::new(FileRunLog::new(&settings.logs.low_stock)),
        time_provider.clone(),
    );
    let reminders = OrderReminderService::new(
        orders,
        Arc::new(FileRunLog::new(&settings.logs.reminders)),
        time_provider,
    );

    // 5. Start task scheduler
    let schedule = &settings.schedule;
    let scheduler = TaskScheduler::new(Arc::new(UuidProvider))
        .every(schedule.purge(), Arc::new(purge))
        .every(schedule.report(), Arc::new(report))
        .every(schedule.heartbeat(), Arc::new(heartbeat))
        .every(schedule.restock(), Arc::new(restock))
        .every(schedule.reminders(), Arc::new(reminders));

    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let scheduler_handle = tokio::spawn(scheduler.run(shutdown_rx));

    info!("System ready. Press Ctrl+C to shutdown");

    // 6. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 7. Graceful shutdown
    shutdown_tx.shutdown();
    if tokio::time::timeout(SHUTDOWN_GRACE, scheduler_handle)
        .await
        .is_err()
    {
        warn!("Task scheduler did not stop within {:?}", SHUTDOWN_GRACE);
    }
    pool.close().await;
    telemetry::shutdown();

    info!("Shutdown complete.");

    Ok(())
}
