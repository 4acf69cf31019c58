//! User-facing progress output.
//!
//! The core reports clip and encode milestones here without knowing how they
//! are rendered. A frontend installs one `ProgressReporter` at startup; until
//! then every call is a no-op.

pub mod ffmpeg_handler;

use std::path::Path;
use std::sync::{LazyLock, Mutex};
use std::time::Duration;

use crate::naming::ClipName;
use crate::utils::{display_name, format_bytes, format_duration};

/// Kind of a one-line message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputLevel {
    /// Heading for one clip
    Section,
    /// An encode has started
    Processing,
    Success,
    Warning,
    Error,
}

/// Renders core progress for the user.
pub trait ProgressReporter: Send + Sync {
    fn output(&self, level: OutputLevel, text: &str);

    /// `label: value` line; `highlight` marks the value the user cares most about.
    fn output_status(&self, label: &str, value: &str, highlight: bool);

    /// Encode progress, `percent` in `0..=100`.
    fn progress_bar(&self, percent: f32, elapsed_secs: f64, total_secs: f64);

    fn clear_progress_bar(&self);
}

static REPORTER: LazyLock<Mutex<Option<Box<dyn ProgressReporter>>>> =
    LazyLock::new(|| Mutex::new(None));

/// Installs `reporter`, replacing any earlier one.
pub fn set_progress_reporter(reporter: Box<dyn ProgressReporter>) {
    if let Ok(mut slot) = REPORTER.lock() {
        *slot = Some(reporter);
    }
}

fn with_reporter(f: impl FnOnce(&dyn ProgressReporter)) {
    if let Ok(slot) = REPORTER.lock() {
        if let Some(reporter) = slot.as_deref() {
            f(reporter);
        }
    }
}

fn emit(level: OutputLevel, text: &str) {
    with_reporter(|r| r.output(level, text));
}

fn status(label: &str, value: &str, highlight: bool) {
    with_reporter(|r| r.output_status(label, value, highlight));
}

pub fn progress(percent: f32, elapsed_secs: f64, total_secs: f64) {
    with_reporter(|r| r.progress_bar(percent, elapsed_secs, total_secs));
}

pub fn clear_progress() {
    with_reporter(|r| r.clear_progress_bar());
}

/// Heading and identity lines for a clip that passed the filename and input checks.
pub fn clip_started(input_path: &Path, clip: &ClipName) {
    emit(OutputLevel::Section, &format!("Clip {}", display_name(input_path)));
    status("Map", &clip.map_id, false);
    status("Label", &clip.label, false);
}

/// Overlay text in use. After a failed lookup the title is the failure message.
pub fn clip_metadata(song_title: &str, mapper: &str, lookup_error: Option<&str>) {
    if let Some(message) = lookup_error {
        emit(OutputLevel::Warning, message);
    }
    status("Title", song_title, true);
    status("Mapper", mapper, false);
}

pub fn encode_start(input_path: &Path) {
    emit(
        OutputLevel::Processing,
        &format!("Encoding: {}", display_name(input_path)),
    );
}

pub fn encode_summary(output_path: &Path, elapsed: Duration, output_size: u64) {
    emit(OutputLevel::Success, &format!("Wrote {}", output_path.display()));
    status("Time", &format_duration(elapsed), false);
    status("Size", &format_bytes(output_size), false);
}

pub fn encode_error(output_path: &Path, message: &str) {
    emit(
        OutputLevel::Error,
        &format!("Failed to write {}: {message}", output_path.display()),
    );
}
