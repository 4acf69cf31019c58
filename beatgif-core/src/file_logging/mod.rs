//! File and console logging.
//!
//! Log records go to stderr and to `beatgif.log` inside the configured log
//! directory. On the first record of a new day the active file is rolled by
//! log4rs into `beatgif.1.log`, `beatgif.2.log`, ... keeping at most
//! `backup_count` archived days.

pub mod setup;

pub use setup::setup_logging;

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Local, NaiveDate};
use log4rs::append::rolling_file::LogFile;
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::append::rolling_file::policy::compound::CompoundPolicy;
use log4rs::append::rolling_file::policy::compound::roll::fixed_window::FixedWindowRoller;
use log4rs::append::rolling_file::policy::compound::trigger::Trigger;
use log4rs::encode::pattern::PatternEncoder;

/// time:module:level:message
pub(crate) const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)}:{M}:{l}:{m}{n}";

const ACTIVE_LOG_FILE: &str = "beatgif.log";
const ARCHIVE_PATTERN: &str = "beatgif.{}.log";

/// Path of the file currently being written in `log_dir`.
#[must_use]
pub fn active_log_path(log_dir: &Path) -> PathBuf {
    log_dir.join(ACTIVE_LOG_FILE)
}

/// Rolls the active file when the local date changes.
///
/// The first check looks at the file's modification time, so a log left over
/// from an earlier day is archived when the next run starts writing.
#[derive(Debug, Default)]
pub struct DayChangeTrigger {
    current_day: Mutex<Option<NaiveDate>>,
}

impl Trigger for DayChangeTrigger {
    fn trigger(&self, file: &LogFile) -> Result<bool> {
        let today = Local::now().date_naive();
        let mut current = self
            .current_day
            .lock()
            .map_err(|_| anyhow!("log day tracker poisoned"))?;
        let day = match *current {
            Some(day) => day,
            None => last_written_day(file.path(), file.len_estimate()).unwrap_or(today),
        };
        *current = Some(today);
        Ok(day < today)
    }

    fn is_pre_process(&self) -> bool {
        true
    }
}

fn last_written_day(path: &Path, len: u64) -> Option<NaiveDate> {
    if len == 0 {
        return None;
    }
    let modified = std::fs::metadata(path).ok()?.modified().ok()?;
    Some(DateTime::<Local>::from(modified).date_naive())
}

/// Daily rolling file appender for `log_dir`.
pub(crate) fn rolling_file_appender(
    log_dir: &Path,
    backup_count: usize,
) -> Result<RollingFileAppender> {
    let archive_pattern = log_dir.join(ARCHIVE_PATTERN);
    let roller = FixedWindowRoller::builder()
        .base(1)
        .build(
            &archive_pattern.to_string_lossy(),
            u32::try_from(backup_count).unwrap_or(u32::MAX),
        )
        .context("building log roller")?;
    let policy = CompoundPolicy::new(Box::new(DayChangeTrigger::default()), Box::new(roller));

    let active = active_log_path(log_dir);
    RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build(&active, Box::new(policy))
        .with_context(|| format!("opening log file {}", active.display()))
}
