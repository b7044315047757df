//! Runtime configuration resolved from the environment.
//!
//! # Responsibility
//! - Resolve the database path, log directory and log level once at startup.
//!
//! # Invariants
//! - Blank environment values are treated as unset.
//! - `log_dir` is always absolute so logging init accepts it.

use employeedb_core::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "EMPLOYEEDB_PATH";
pub const LOG_DIR_ENV: &str = "EMPLOYEEDB_LOG_DIR";
pub const LOG_LEVEL_ENV: &str = "EMPLOYEEDB_LOG_LEVEL";

const DEFAULT_DB_FILE_NAME: &str = "employeedb.sqlite3";
const DEFAULT_LOG_DIR_NAME: &str = "employeedb-logs";

/// Startup settings for the CLI process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl CliConfig {
    /// Reads settings from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|trimmed| !trimmed.is_empty())
        };

        let db_path = value(DB_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE_NAME));

        let log_dir = value(LOG_DIR_ENV)
            .map(PathBuf::from)
            .filter(|path| path.is_absolute())
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME));

        let log_level = value(LOG_LEVEL_ENV).unwrap_or_else(|| default_log_level().to_string());

        Self {
            db_path,
            log_dir,
            log_level,
        }
    }
}
