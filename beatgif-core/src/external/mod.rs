// ============================================================================
// beatgif-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with ffmpeg and ffprobe
//
// This module encapsulates every call out to the ffmpeg toolchain. The clip
// pipeline only depends on the traits defined here, which keeps the real
// processes out of unit tests.
//
// KEY COMPONENTS:
// - FfmpegCommandBuilder / FilterGraph: argument and filter graph construction
// - FfmpegSpawner / FfmpegProcess: running the encoder and streaming its events
// - DimensionProber: reading the width and height of the first video stream
//
// AI-ASSISTANT-INFO: External tool interactions and abstractions for ffmpeg/ffprobe

// ============================================================================
// SUBMODULES
// ============================================================================

/// Builders for ffmpeg commands and filter graphs
pub mod ffmpeg_builder;

/// Contains traits and implementations for executing ffmpeg commands
pub mod ffmpeg_executor;

/// Contains traits and implementations for executing ffprobe commands
pub mod ffprobe_executor;

/// Test doubles for the traits above
#[cfg(all(test, unix))]
pub(crate) mod mocks;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use ffmpeg_builder::{DrawText, FfmpegCommandBuilder, FilterGraph, escape_filter_value};
pub use ffmpeg_executor::{FfmpegProcess, FfmpegSpawner, SidecarProcess, SidecarSpawner};
pub use ffprobe_executor::{DimensionProber, FfprobeProber, parse_dimensions};
