//! `FFmpeg` progress handler
//!
//! Turns the event stream of a running GIF encode into progress updates and
//! collects ffmpeg's error output for the `Encode` error.

use crate::error::CoreResult;
use crate::utils::parse_ffmpeg_time;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel as FfmpegLogLevel};

/// Minimum percent change between two progress bar updates.
const PROGRESS_STEP: f64 = 5.0;

/// Handler for the events of one GIF encode
pub struct EncodeProgressHandler {
    duration_secs: f64,
    last_progress_percent: f64,
    stderr_buffer: String,
}

impl EncodeProgressHandler {
    /// `duration_secs` is the length of the cut, used as the 100% mark.
    #[must_use]
    pub fn new(duration_secs: u32) -> Self {
        Self {
            duration_secs: f64::from(duration_secs),
            last_progress_percent: -PROGRESS_STEP,
            stderr_buffer: String::new(),
        }
    }

    /// Handles one event.
    pub fn handle_event(&mut self, event: FfmpegEvent) -> CoreResult<()> {
        match event {
            FfmpegEvent::Progress(progress) => self.handle_progress(&progress.time),
            FfmpegEvent::Log(level, message) => self.handle_log(level, &message),
            // Sidecar-side failures, such as unparsable output or a closed pipe.
            FfmpegEvent::Error(error) => self.buffer_error(&error),
            _ => {}
        }
        Ok(())
    }

    #[must_use]
    pub fn stderr_buffer(&self) -> &str {
        &self.stderr_buffer
    }

    fn handle_progress(&mut self, time: &str) {
        let current_secs = parse_ffmpeg_time(time).unwrap_or(0.0);
        let percent = if self.duration_secs > 0.0 {
            (current_secs / self.duration_secs * 100.0).min(100.0)
        } else {
            0.0
        };

        if percent >= self.last_progress_percent + PROGRESS_STEP
            || (percent >= 100.0 && self.last_progress_percent < 100.0)
        {
            crate::progress_reporting::progress(percent as f32, current_secs, self.duration_secs);
            log::debug!(
                target: "beatgif::progress",
                "Encoding progress: {percent:.1}% ({current_secs:.1}s of {:.1}s)",
                self.duration_secs
            );
            self.last_progress_percent = percent;
        }
    }

    fn handle_log(&mut self, level: FfmpegLogLevel, message: &str) {
        match level {
            FfmpegLogLevel::Fatal | FfmpegLogLevel::Error => self.buffer_error(message),
            FfmpegLogLevel::Warning => log::warn!(target: "ffmpeg_log", "{message}"),
            FfmpegLogLevel::Info => log::debug!(target: "ffmpeg_log", "{message}"),
            _ => log::trace!(target: "ffmpeg_log", "{message}"),
        }
    }

    fn buffer_error(&mut self, message: &str) {
        if is_non_critical_ffmpeg_error(message) {
            log::debug!(target: "ffmpeg_log", "non-critical: {message}");
            return;
        }

        log::error!(target: "ffmpeg_log", "{message}");
        self.stderr_buffer.push_str(message);
        self.stderr_buffer.push('\n');
    }
}

/// Messages ffmpeg prints to stderr during palette GIF encodes that are not failures.
fn is_non_critical_ffmpeg_error(error: &str) -> bool {
    error.contains("deprecated pixel format")
        || error.contains("No accelerated colorspace conversion")
        || error.contains("automatically inserted filter")
        || error.contains("Timestamps are unset")
        || error.contains("Past duration")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn critical_stderr_is_collected() {
        let mut handler = EncodeProgressHandler::new(10);
        handler
            .handle_event(FfmpegEvent::Error("Invalid argument".to_string()))
            .unwrap();
        handler
            .handle_event(FfmpegEvent::Error("Past duration 0.999 too large".to_string()))
            .unwrap();
        assert_eq!(handler.stderr_buffer(), "Invalid argument\n");
    }

    #[test]
    fn error_and_fatal_log_lines_are_collected() {
        let mut handler = EncodeProgressHandler::new(10);
        let events = [
            FfmpegEvent::Log(FfmpegLogLevel::Info, "Stream mapping:".to_string()),
            FfmpegEvent::Log(FfmpegLogLevel::Warning, "frame rate very high".to_string()),
            FfmpegEvent::Log(FfmpegLogLevel::Error, "No such filter: 'palettegem'".to_string()),
            FfmpegEvent::Log(FfmpegLogLevel::Fatal, "Error opening output files".to_string()),
        ];
        for event in events {
            handler.handle_event(event).unwrap();
        }
        assert_eq!(
            handler.stderr_buffer(),
            "No such filter: 'palettegem'\nError opening output files\n"
        );
    }

    #[test]
    fn non_critical_messages_are_recognised() {
        assert!(is_non_critical_ffmpeg_error("Past duration 0.6 too large"));
        assert!(!is_non_critical_ffmpeg_error("No such file or directory"));
    }
}
