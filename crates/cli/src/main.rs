//! CRM Housekeeper CLI - one-shot maintenance commands, meant to be run from cron

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use crm_housekeeper_core::application::{
    CrmReportService, HeartbeatService, LowStockRestockService, OrderReminderService, ProbeStatus,
    PurgeInactiveCustomers, SeedDataset, SeedService,
};
use crm_housekeeper_core::domain::{RetentionPolicy, LOW_STOCK_THRESHOLD};
use crm_housekeeper_core::port::{
    CustomerRepository, OrderRepository, ProductRepository, SystemTimeProvider, TimeProvider,
};
use crm_housekeeper_infra_sqlite::{
    create_pool, run_migrations, schema_version, SqliteCrmStore, SqliteCustomerRepository,
    SqliteOrderRepository, SqlitePool, SqliteProductRepository,
};
use crm_housekeeper_infra_system::{FileRunLog, GraphqlHealthProbe, Settings};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tabled::{Table, Tabled};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "crm-housekeeper")]
#[command(about = "CRM maintenance tasks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project root (default: nearest ancestor holding crm-housekeeper.toml)
    #[arg(long, global = true, env = "CRM_HOUSEKEEPER_PROJECT_ROOT")]
    project_root: Option<PathBuf>,

    /// Database URL, overrides configuration
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Delete customers with no order in the retention period
    PurgeInactive {
        /// Count eligible customers without deleting or logging
        #[arg(long)]
        dry_run: bool,

        /// Inactivity period in days
        #[arg(long)]
        days: Option<i64>,

        /// Purge log path
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// Append a customer/order/revenue summary to the report log
    Report,

    /// Append a liveness line, optionally probing the GraphQL endpoint
    Heartbeat {
        /// GraphQL endpoint to probe with `{ hello }`
        #[arg(long)]
        probe_url: Option<String>,
    },

    /// Add stock to products running low
    Restock,

    /// Log reminders for orders placed in the last week
    RemindOrders,

    /// Replace all data with the demo dataset
    Seed,

    /// Show database statistics
    Stats,
}

#[derive(Tabled)]
struct StatRow {
    metric: &'static str,
    value: String,
}

#[derive(Serialize)]
struct Stats {
    database_url: String,
    schema_version: i64,
    customers: i64,
    inactive_customers: i64,
    products: i64,
    low_stock_products: i64,
    orders: i64,
    revenue: String,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match std::env::var("CRM_HOUSEKEEPER_LOG_FORMAT").as_deref() {
        Ok("json") => builder.json().init(),
        _ => builder.with_target(false).init(),
    }
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let mut settings = Settings::resolve(cli.project_root.as_deref(), &cwd)
        .context("Failed to load configuration")?;

    if let Some(url) = &cli.database_url {
        settings.database_url = url.clone();
    }

    debug!(
        project_root = %settings.project_root.display(),
        database_url = %settings.database_url,
        "Configuration loaded"
    );

    Ok(settings)
}

async fn open_database(settings: &Settings) -> Result<SqlitePool> {
    if let Some(parent) = settings.database_file().as_deref().and_then(Path::parent) {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    let pool = create_pool(&settings.database_url)
        .await
        .with_context(|| format!("Failed to open database {}", settings.database_url))?;
    run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    Ok(pool)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let settings = load_settings(&cli)?;
    let pool = open_database(&settings).await?;
    let time: Arc<dyn TimeProvider> = Arc::new(SystemTimeProvider);

    match cli.command {
        Commands::PurgeInactive {
            dry_run,
            days,
            log_file,
        } => {
            let policy = match days {
                Some(days) => RetentionPolicy::new(days)?,
                None => settings.retention_policy()?,
            };
            let log_path = log_file.unwrap_or_else(|| settings.logs.purge.clone());
            let service = PurgeInactiveCustomers::new(
                Arc::new(SqliteCustomerRepository::new(pool.clone())),
                Arc::new(FileRunLog::new(&log_path)),
                time,
                policy,
            );

            let outcome = if dry_run {
                service.preview().await?
            } else {
                service
                    .execute()
                    .await
                    .context("Inactive customer purge failed")?
            };

            if cli.json {
                print_json(&outcome)?;
            } else if outcome.dry_run {
                println!(
                    "{}",
                    format!(
                        "○ {} inactive customers would be deleted (dry run)",
                        outcome.deleted
                    )
                    .yellow()
                );
            } else {
                println!(
                    "{}",
                    format!("✓ Deleted {} inactive customers", outcome.deleted)
                        .green()
                        .bold()
                );
                println!("  {} {}", "Log:".bold(), log_path.display());
            }
        }

        Commands::Report => {
            let service = CrmReportService::new(
                Arc::new(SqliteCustomerRepository::new(pool.clone())),
                Arc::new(SqliteOrderRepository::new(pool.clone())),
                Arc::new(FileRunLog::new(&settings.logs.report)),
                time,
            );
            let report = service.execute().await.context("CRM report failed")?;

            if cli.json {
                print_json(&report)?;
            } else {
                println!("{}", "✓ Report generated".green().bold());
                println!("  {} {}", "Customers:".bold(), report.total_customers);
                println!("  {} {}", "Orders:".bold(), report.total_orders);
                println!("  {} {}", "Revenue:".bold(), report.total_revenue);
            }
        }

        Commands::Heartbeat { probe_url } => {
            let mut service =
                HeartbeatService::new(Arc::new(FileRunLog::new(&settings.logs.heartbeat)), time);
            if let Some(url) = probe_url.or_else(|| settings.probe.graphql_url.clone()) {
                let probe =
                    GraphqlHealthProbe::new(url, settings.probe.timeout(), settings.probe.attempts)?;
                service = service.with_probe(Arc::new(probe));
            }

            match service.execute().await.context("Heartbeat failed")? {
                ProbeStatus::Skipped => println!("{}", "✓ CRM is alive".green().bold()),
                ProbeStatus::Responded(body) => {
                    println!("{}", "✓ CRM is alive".green().bold());
                    println!("  {} {}", "GraphQL:".bold(), body);
                }
                ProbeStatus::Failed(e) => {
                    println!("{}", "✓ CRM is alive".green().bold());
                    println!("  {} {}", "GraphQL:".bold(), e.red());
                }
            }
        }

        Commands::Restock => {
            let service = LowStockRestockService::new(
                Arc::new(SqliteProductRepository::new(pool.clone())),
                Arc::new(FileRunLog::new(&settings.logs.low_stock)),
                time,
            );
            let restocked = service.execute().await.context("Restock failed")?;

            if cli.json {
                print_json(&restocked)?;
            } else {
                println!(
                    "{}",
                    format!("✓ {} products restocked", restocked.len())
                        .green()
                        .bold()
                );
                for product in &restocked {
                    println!("  • {} → {}", product.name, product.stock);
                }
            }
        }

        Commands::RemindOrders => {
            let service = OrderReminderService::new(
                Arc::new(SqliteOrderRepository::new(pool.clone())),
                Arc::new(FileRunLog::new(&settings.logs.reminders)),
                time,
            );
            let reminders = service.execute().await.context("Order reminders failed")?;

            if cli.json {
                print_json(&reminders)?;
            } else if reminders.is_empty() {
                println!("{}", "○ No recent orders found".yellow());
            } else {
                println!(
                    "{}",
                    format!("✓ {} order reminders processed", reminders.len())
                        .green()
                        .bold()
                );
            }
        }

        Commands::Seed => {
            let service = SeedService::new(Arc::new(SqliteCrmStore::new(pool.clone())), time);
            let summary = service
                .execute(&SeedDataset::demo())
                .await
                .context("Seeding failed")?;

            if cli.json {
                print_json(&summary)?;
            } else {
                println!("{}", "✓ Database seeded".green().bold());
                println!("  {} {}", "Customers:".bold(), summary.customers);
                println!("  {} {}", "Products:".bold(), summary.products);
                println!("  {} {}", "Orders:".bold(), summary.orders);
            }
        }

        Commands::Stats => {
            let customers = SqliteCustomerRepository::new(pool.clone());
            let products = SqliteProductRepository::new(pool.clone());
            let orders = SqliteOrderRepository::new(pool.clone());
            let cutoff = settings.retention_policy()?.cutoff(time.now_millis());

            let stats = Stats {
                database_url: settings.database_url.clone(),
                schema_version: schema_version(&pool).await?,
                customers: customers.count().await?,
                inactive_customers: customers.count_inactive(cutoff).await?,
                products: products.count().await?,
                low_stock_products: products.count_low_stock(LOW_STOCK_THRESHOLD).await?,
                orders: orders.count().await?,
                revenue: orders.total_revenue().await?.to_string(),
            };

            if cli.json {
                print_json(&stats)?;
            } else {
                let rows = vec![
                    StatRow { metric: "Database", value: stats.database_url },
                    StatRow { metric: "Schema version", value: stats.schema_version.to_string() },
                    StatRow { metric: "Customers", value: stats.customers.to_string() },
                    StatRow {
                        metric: "Inactive customers",
                        value: stats.inactive_customers.to_string(),
                    },
                    StatRow { metric: "Products", value: stats.products.to_string() },
                    StatRow {
                        metric: "Low-stock products",
                        value: stats.low_stock_products.to_string(),
                    },
                    StatRow { metric: "Orders", value: stats.orders.to_string() },
                    StatRow { metric: "Revenue", value: stats.revenue },
                ];
                println!("{}", "CRM Statistics".cyan().bold());
                println!("{}", Table::new(rows));
            }
        }
    }

    pool.close().await;

    Ok(())
}
