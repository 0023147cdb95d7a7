// Layered configuration: defaults -> crm-housekeeper.toml -> CRM_HOUSEKEEPER_* env

use crate::project_root::{find_project_root, CONFIG_FILE_NAME};
use config::{Config, Environment, File};
use crm_housekeeper_core::application::constants::{
    DEFAULT_HEARTBEAT_INTERVAL, DEFAULT_HEARTBEAT_LOG_PATH, DEFAULT_LOW_STOCK_LOG_PATH,
    DEFAULT_PURGE_INTERVAL, DEFAULT_PURGE_LOG_PATH, DEFAULT_REMINDERS_INTERVAL,
    DEFAULT_REMINDERS_LOG_PATH, DEFAULT_REPORT_INTERVAL, DEFAULT_REPORT_LOG_PATH,
    DEFAULT_RESTOCK_INTERVAL,
};
use crm_housekeeper_core::domain::{RetentionPolicy, DEFAULT_INACTIVITY_DAYS};
use crm_housekeeper_core::error::{AppError, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::graphql_probe::{DEFAULT_PROBE_ATTEMPTS, DEFAULT_PROBE_TIMEOUT};

pub const ENV_PREFIX: &str = "CRM_HOUSEKEEPER";

/// Database file used when the project root is known
const PROJECT_DB_FILE: &str = "db.sqlite3";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub retention: RetentionSettings,
    pub logs: LogSettings,
    pub schedule: ScheduleSettings,
    pub probe: ProbeSettings,
    /// Root the settings were resolved against (not deserialized)
    #[serde(skip)]
    pub project_root: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetentionSettings {
    pub inactivity_days: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    pub purge: PathBuf,
    pub report: PathBuf,
    pub heartbeat: PathBuf,
    pub low_stock: PathBuf,
    pub reminders: PathBuf,
}

/// Intervals in seconds; 0 disables the task in the daemon
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleSettings {
    pub purge_secs: u64,
    pub report_secs: u64,
    pub heartbeat_secs: u64,
    pub restock_secs: u64,
    pub reminders_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProbeSettings {
    #[serde(default)]
    pub graphql_url: Option<String>,
    pub timeout_secs: u64,
    pub attempts: u32,
}

fn config_err(e: config::ConfigError) -> AppError {
    AppError::Config(e.to_string())
}

fn default_database_url(project_root: Option<&Path>) -> String {
    let path = match project_root {
        Some(root) => root.join(PROJECT_DB_FILE),
        None => match ProjectDirs::from("", "", "crm-housekeeper") {
            Some(dirs) => dirs.data_dir().join("crm.db"),
            None => PathBuf::from(PROJECT_DB_FILE),
        },
    };
    format!("sqlite://{}", path.display())
}

fn expand(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}

impl Settings {
    /// Resolve the project root from `start` and load settings for it
    ///
    /// Without a marker file the current directory acts as the root.
    pub fn discover(start: &Path) -> Result<Self> {
        let root = find_project_root(start);
        debug!(start = %start.display(), root = ?root, "Project root lookup");
        Self::load(root.as_deref(), start)
    }

    /// Settings for an explicit root if one is given, otherwise discovered from `cwd`
    ///
    /// An explicit root is used as-is even without a marker file, so every
    /// binary given the same root resolves the same database.
    pub fn resolve(explicit_root: Option<&Path>, cwd: &Path) -> Result<Self> {
        match explicit_root {
            Some(root) => Self::load(Some(root), cwd),
            None => Self::discover(cwd),
        }
    }

    /// Load settings for an explicit project root
    pub fn load(project_root: Option<&Path>, fallback_root: &Path) -> Result<Self> {
        let root = project_root.unwrap_or(fallback_root).to_path_buf();

        let mut builder = Config::builder()
            .set_default("database_url", default_database_url(project_root))
            .and_then(|b| b.set_default("retention.inactivity_days", DEFAULT_INACTIVITY_DAYS))
            .and_then(|b| b.set_default("logs.purge", DEFAULT_PURGE_LOG_PATH))
            .and_then(|b| b.set_default("logs.report", DEFAULT_REPORT_LOG_PATH))
            .and_then(|b| b.set_default("logs.heartbeat", DEFAULT_HEARTBEAT_LOG_PATH))
            .and_then(|b| b.set_default("logs.low_stock", DEFAULT_LOW_STOCK_LOG_PATH))
            .and_then(|b| b.set_default("logs.reminders", DEFAULT_REMINDERS_LOG_PATH))
            .and_then(|b| b.set_default("schedule.purge_secs", DEFAULT_PURGE_INTERVAL.as_secs() as i64))
            .and_then(|b| b.set_default("schedule.report_secs", DEFAULT_REPORT_INTERVAL.as_secs() as i64))
            .and_then(|b| {
                b.set_default("schedule.heartbeat_secs", DEFAULT_HEARTBEAT_INTERVAL.as_secs() as i64)
            })
            .and_then(|b| b.set_default("schedule.restock_secs", DEFAULT_RESTOCK_INTERVAL.as_secs() as i64))
            .and_then(|b| {
                b.set_default("schedule.reminders_secs", DEFAULT_REMINDERS_INTERVAL.as_secs() as i64)
            })
            .and_then(|b| b.set_default("probe.timeout_secs", DEFAULT_PROBE_TIMEOUT.as_secs() as i64))
            .and_then(|b| b.set_default("probe.attempts", i64::from(DEFAULT_PROBE_ATTEMPTS)))
            .map_err(config_err)?;

        builder = builder.add_source(File::from(root.join(CONFIG_FILE_NAME)).required(false));
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut settings: Settings = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(config_err)?;

        settings.project_root = root;
        settings.expand_paths();
        settings.retention_policy()?;

        Ok(settings)
    }

    fn expand_paths(&mut self) {
        for path in [
            &mut self.logs.purge,
            &mut self.logs.report,
            &mut self.logs.heartbeat,
            &mut self.logs.low_stock,
            &mut self.logs.reminders,
        ] {
            *path = expand(path);
        }
        if let Some(rest) = self.database_url.strip_prefix("sqlite://") {
            self.database_url = format!("sqlite://{}", shellexpand::tilde(rest));
        }
    }

    pub fn retention_policy(&self) -> Result<RetentionPolicy> {
        Ok(RetentionPolicy::new(self.retention.inactivity_days)?)
    }

    /// Local file behind `database_url`, if it is a file database
    pub fn database_file(&self) -> Option<PathBuf> {
        let rest = self
            .database_url
            .strip_prefix("sqlite://")
            .or_else(|| self.database_url.strip_prefix("sqlite:"))?;
        let path = rest.split('?').next().unwrap_or(rest);
        if path.is_empty() || path.contains(":memory:") || path.starts_with("file:") {
            return None;
        }
        Some(PathBuf::from(path))
    }
}

impl ScheduleSettings {
    pub fn purge(&self) -> Duration {
        Duration::from_secs(self.purge_secs)
    }

    pub fn report(&self) -> Duration {
        Duration::from_secs(self.report_secs)
    }

    pub fn heartbeat(&self) -> Duration {
        Duration::from_secs(self.heartbeat_secs)
    }

    pub fn restock(&self) -> Duration {
        Duration::from_secs(self.restock_secs)
    }

    pub fn reminders(&self) -> Duration {
        Duration::from_secs(self.reminders_secs)
    }
}

impl ProbeSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(Some(dir.path()), dir.path()).unwrap();

        assert_eq!(settings.retention.inactivity_days, 365);
        assert_eq!(settings.logs.purge, PathBuf::from("/tmp/customer_cleanup_log.txt"));
        assert_eq!(settings.schedule.heartbeat_secs, 300);
        assert!(settings.probe.graphql_url.is_none());
        assert_eq!(
            settings.database_file(),
            Some(dir.path().join("db.sqlite3"))
        );
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"
database_url = "sqlite::memory:"

[retention]
inactivity_days = 30

[logs]
purge = "~/crm/customer_cleanup_log.txt"

[probe]
graphql_url = "http://localhost:8000/graphql"
"#,
        )
        .unwrap();

        let settings = Settings::discover(dir.path()).unwrap();

        assert_eq!(settings.project_root, dir.path());
        assert_eq!(settings.retention_policy().unwrap().inactivity_days(), 30);
        assert!(!settings.logs.purge.to_string_lossy().starts_with('~'));
        assert_eq!(
            settings.probe.graphql_url.as_deref(),
            Some("http://localhost:8000/graphql")
        );
        assert_eq!(settings.database_file(), None);
        // Untouched keys keep their defaults
        assert_eq!(settings.logs.report, PathBuf::from("/tmp/crm_report_log.txt"));
    }

    #[test]
    fn test_explicit_root_without_marker_owns_database() {
        let root = tempfile::tempdir().unwrap();
        let cwd = tempfile::tempdir().unwrap();

        let settings = Settings::resolve(Some(root.path()), cwd.path()).unwrap();

        assert_eq!(settings.project_root, root.path());
        assert_eq!(
            settings.database_file(),
            Some(root.path().join("db.sqlite3"))
        );
    }

    #[test]
    fn test_resolve_without_root_falls_back_to_cwd() {
        let cwd = tempfile::tempdir().unwrap();

        let settings = Settings::resolve(None, cwd.path()).unwrap();

        assert_eq!(settings.project_root, cwd.path());
    }

    #[test]
    fn test_oversized_retention_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[retention]\ninactivity_days = 200000000000\n",
        )
        .unwrap();

        assert!(matches!(
            Settings::discover(dir.path()),
            Err(AppError::Domain(_))
        ));
    }

    #[test]
    fn test_invalid_retention_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[retention]\ninactivity_days = 0\n",
        )
        .unwrap();

        assert!(matches!(
            Settings::discover(dir.path()),
            Err(AppError::Domain(_))
        ));
    }
}
