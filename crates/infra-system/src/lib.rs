// CRM Housekeeper Infrastructure - System Adapters
// Implements: RunLog (files), HealthProbe (GraphQL over HTTP); plus configuration

pub mod file_run_log;
pub mod graphql_probe;
pub mod project_root;
pub mod settings;

pub use file_run_log::FileRunLog;
pub use graphql_probe::GraphqlHealthProbe;
pub use project_root::{find_project_root, CONFIG_FILE_NAME};
pub use settings::Settings;
