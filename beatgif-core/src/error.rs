// ============================================================================
// beatgif-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Custom Error Types for beatgif-core
//
// This module defines the error types used throughout the beatgif-core library.
// Every pipeline stage reports through the same `CoreError` enum so the CLI can
// decide on logging and exit status in one place.
//
// KEY COMPONENTS:
// - CoreError: Enum of all possible error types in the library
// - CoreResult: Type alias for Result<T, CoreError>
// - Helper functions for external command failures
//
// AI-ASSISTANT-INFO: Error handling for the clip conversion pipeline

// ---- External crate imports ----
use thiserror::Error;

// ---- Standard library imports ----
use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Errors produced by the clip conversion pipeline.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The input video does not exist.
    #[error("Input video file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Dimension inspection failed or produced unparsable output.
    #[error("Failed to probe video dimensions: {0}")]
    Probe(String),

    /// The crop margins leave no pixels to encode.
    #[error("Invalid crop geometry: {0}")]
    InvalidGeometry(String),

    /// The encoder exited unsuccessfully.
    #[error("{tool} exited with {}: {stderr}", exit_code_display(.code))]
    Encode {
        tool: String,
        code: Option<i32>,
        stderr: String,
    },

    /// The input filename is not `<mapId>_<label>.<ext>`.
    #[error("Invalid filename '{0}': expected <mapId>_<label> with exactly one underscore")]
    InvalidFilename(String),

    /// The beatmap catalog lookup did not succeed.
    #[error("{0}")]
    MetadataLookup(String),

    #[error("Failed to start {0}: {1}")]
    CommandStart(String, #[source] io::Error),

    #[error("Required tool '{0}' was not found on PATH")]
    DependencyNotFound(String),

    #[error("{tool} did not finish within {}s and was killed", .after.as_secs())]
    Timeout { tool: String, after: Duration },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for beatgif-core operations
pub type CoreResult<T> = Result<T, CoreError>;

fn exit_code_display(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Maps a spawn failure to the matching error.
///
/// A missing executable becomes `DependencyNotFound` so the user is told which
/// tool to install rather than seeing a bare OS error.
pub fn command_start_error(tool: impl Into<String>, err: io::Error) -> CoreError {
    let tool = tool.into();
    if err.kind() == io::ErrorKind::NotFound {
        CoreError::DependencyNotFound(tool)
    } else {
        CoreError::CommandStart(tool, err)
    }
}

/// Builds the error for an encoder that exited with a non-zero status.
pub fn command_failed_error(
    tool: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::Encode {
        tool: tool.into(),
        code: status.code(),
        stderr: stderr.into(),
    }
}
