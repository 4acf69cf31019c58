// ============================================================================
// beatgif-cli/src/terminal.rs
// ============================================================================
//
// TERMINAL OUTPUT: UI Components and Styling
//
// Sections, status lines and the encode progress bar. The core library talks
// to this module only through its ProgressReporter trait, registered once in
// main.
//
// AI-ASSISTANT-INFO: Terminal UI components and styling for the CLI

use std::sync::Mutex;
use std::time::Duration;

use beatgif_core::progress_reporting::{OutputLevel, ProgressReporter};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Styling constants for terminal output
pub mod styling {
    pub const SUCCESS_SYMBOL: &str = "✓";
    pub const PROCESSING_SYMBOL: &str = "»";
    pub const WARNING_SYMBOL: &str = "!";
    pub const ERROR_SYMBOL: &str = "✗";

    pub const SECTION_PREFIX: &str = "===== ";
    pub const SECTION_SUFFIX: &str = " =====";

    pub const STATUS_INDENT: &str = "  ";
    pub const STATUS_LABEL_WIDTH: usize = 12;

    pub const PROGRESS_TEMPLATE: &str =
        "  {spinner:.green} [{bar:30.cyan/blue}] {percent:>3}% {msg}";
    pub const PROGRESS_CHARS: &str = "#>.";
}

// ============================================================================
// TERMINAL COMPONENTS
// ============================================================================

pub fn print_section(title: &str) {
    eprintln!();
    eprintln!(
        "{}",
        style(format!(
            "{}{}{}",
            styling::SECTION_PREFIX,
            title,
            styling::SECTION_SUFFIX
        ))
        .for_stderr()
        .bold()
        .cyan()
    );
}

pub fn print_processing(message: &str) {
    eprintln!(
        "{} {}",
        style(styling::PROCESSING_SYMBOL).for_stderr().cyan(),
        message
    );
}

pub fn print_status(label: &str, value: &str, highlight: bool) {
    let label = format!("{label}:");
    let value = if highlight {
        style(value).for_stderr().bold().green()
    } else {
        style(value).for_stderr()
    };
    eprintln!(
        "{}{:<width$} {}",
        styling::STATUS_INDENT,
        label,
        value,
        width = styling::STATUS_LABEL_WIDTH
    );
}

pub fn print_success(message: &str) {
    eprintln!(
        "{} {}",
        style(styling::SUCCESS_SYMBOL).for_stderr().green().bold(),
        message
    );
}

pub fn print_warning(message: &str) {
    eprintln!(
        "{} {}",
        style(styling::WARNING_SYMBOL).for_stderr().yellow().bold(),
        style(message).for_stderr().yellow()
    );
}

pub fn print_error(message: &str) {
    eprintln!(
        "{} {}",
        style(styling::ERROR_SYMBOL).for_stderr().red().bold(),
        style(message).for_stderr().red()
    );
}

// ============================================================================
// CLI PROGRESS REPORTER IMPLEMENTATION
// ============================================================================

/// `ProgressReporter` that renders core output on stderr.
#[derive(Default)]
pub struct CliProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliProgressReporter {
    fn new_bar() -> ProgressBar {
        let bar = ProgressBar::new(100);
        if let Ok(progress_style) = ProgressStyle::with_template(styling::PROGRESS_TEMPLATE) {
            bar.set_style(progress_style.progress_chars(styling::PROGRESS_CHARS));
        }
        bar.enable_steady_tick(Duration::from_millis(100));
        bar
    }
}

/// Register the CLI progress reporter with the core library
pub fn register_cli_reporter() {
    beatgif_core::progress_reporting::set_progress_reporter(Box::new(
        CliProgressReporter::default(),
    ));
}

impl ProgressReporter for CliProgressReporter {
    fn output(&self, level: OutputLevel, text: &str) {
        match level {
            OutputLevel::Section => print_section(text),
            OutputLevel::Processing => print_processing(text),
            OutputLevel::Success => print_success(text),
            OutputLevel::Warning => print_warning(text),
            OutputLevel::Error => print_error(text),
        }
    }

    fn output_status(&self, label: &str, value: &str, highlight: bool) {
        print_status(label, value, highlight);
    }

    fn progress_bar(&self, percent: f32, elapsed_secs: f64, total_secs: f64) {
        if let Ok(mut slot) = self.bar.lock() {
            let bar = slot.get_or_insert_with(Self::new_bar);
            bar.set_position(percent.clamp(0.0, 100.0) as u64);
            bar.set_message(format!("{elapsed_secs:.1}s / {total_secs:.0}s"));
        }
    }

    fn clear_progress_bar(&self) {
        if let Ok(mut slot) = self.bar.lock() {
            if let Some(bar) = slot.take() {
                bar.finish_and_clear();
            }
        }
    }
}
