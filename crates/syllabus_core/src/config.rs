//! Runtime configuration read from the environment.
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `SYLLABUS_DB_PATH` | SQLite database file | in-memory database |
//! | `SYLLABUS_LOG_LEVEL` | `trace|debug|info|warn|error` | `default_log_level()` |
//! | `SYLLABUS_LOG_DIR` | absolute directory for rolling logs | logging disabled |

use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::logging::{default_log_level, init_logging, LogLevel, LoggingError};
use rusqlite::Connection;
use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "SYLLABUS_DB_PATH";
pub const LOG_LEVEL_VAR: &str = "SYLLABUS_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "SYLLABUS_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: Option<PathBuf>,
    pub log_level: LogLevel,
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, LoggingError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds configuration from an arbitrary variable lookup.
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LoggingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let log_level = match read(LOG_LEVEL_VAR) {
            Some(value) => value.parse()?,
            None => default_log_level(),
        };

        Ok(Self {
            db_path: read(DB_PATH_VAR).map(PathBuf::from),
            log_level,
            log_dir: read(LOG_DIR_VAR).map(PathBuf::from),
        })
    }

    /// Starts file logging when a log directory is configured.
    ///
    /// Returns `false` when logging stays disabled.
    pub fn init_logging(&self) -> Result<bool, LoggingError> {
        let Some(dir) = self.log_dir.as_ref() else {
            return Ok(false);
        };
        let dir = dir.to_str().ok_or_else(|| {
            LoggingError::InvalidDirectory(format!(
                "log_dir `{}` is not valid UTF-8",
                dir.display()
            ))
        })?;
        init_logging(self.log_level.as_str(), dir)?;
        Ok(true)
    }

    /// Opens the configured database with migrations applied.
    pub fn open_db(&self) -> DbResult<Connection> {
        match self.db_path.as_ref() {
            Some(path) => open_db(path),
            None => open_db_in_memory(),
        }
    }
}
