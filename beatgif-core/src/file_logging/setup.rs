use anyhow::{Context, Result};
use log4rs::{
    append::console::{ConsoleAppender, Target},
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
};
use std::path::PathBuf;

use super::{LOG_PATTERN, active_log_path, rolling_file_appender};
use crate::config::LoggingConfig;

/// Installs the global logger and returns the path of the active log file.
///
/// Can only succeed once per process.
pub fn setup_logging(config: &LoggingConfig) -> Result<PathBuf> {
    std::fs::create_dir_all(&config.log_dir).with_context(|| {
        format!("creating log directory {}", config.log_dir.display())
    })?;

    let console_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();
    let file_appender = rolling_file_appender(&config.log_dir, config.backup_count)?;

    let log_config = Config::builder()
        .appender(Appender::builder().build("console", Box::new(console_appender)))
        .appender(Appender::builder().build("file", Box::new(file_appender)))
        .build(
            Root::builder()
                .appender("console")
                .appender("file")
                .build(config.level),
        )?;

    log4rs::init_config(log_config)?;

    Ok(active_log_path(&config.log_dir))
}
