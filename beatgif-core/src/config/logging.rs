//! Logging configuration module
//!
//! Defines the configuration structure for logging settings: level, log
//! directory, and how many archived days of logs to keep.

use std::path::PathBuf;

use log::LevelFilter;

use super::utils::{get_env_parsed, get_env_path};

pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Number of archived daily log files kept besides the active one.
pub const DEFAULT_BACKUP_COUNT: usize = 7;

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Minimum level written to console and file
    pub level: LevelFilter,

    /// Directory receiving `beatgif.log` and its archives
    pub log_dir: PathBuf,

    /// Archived days beyond this count are deleted when the log rolls
    pub backup_count: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL,
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            backup_count: DEFAULT_BACKUP_COUNT,
        }
    }
}

impl LoggingConfig {
    /// Applies `BEATGIF_LOG_LEVEL` and `BEATGIF_LOG_DIR`.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        self.level = get_env_parsed("BEATGIF_LOG_LEVEL", self.level);
        if let Some(dir) = get_env_path("BEATGIF_LOG_DIR") {
            self.log_dir = dir;
        }
        self
    }
}
