//! Core library for turning beatmap gameplay clips into annotated GIFs.
//!
//! A clip named `<mapId>_<label>.<ext>` is probed with ffprobe, cropped and
//! scaled to a fixed width, overlaid with the song title and mapper fetched
//! from the beatmap catalog, and encoded twice with a generated palette: once
//! into a timestamped archive and once into a per-label collection.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use beatgif_core::{BeatSaverClient, FfprobeProber, SidecarSpawner, load_config, process_clip};
//! use beatgif_core::metadata::beatsaver::DEFAULT_REQUEST_TIMEOUT;
//! use std::path::Path;
//!
//! let (config, _logging) = load_config(None).unwrap();
//! let resolver = BeatSaverClient::new(&config.metadata_base_url, DEFAULT_REQUEST_TIMEOUT);
//! let prober = FfprobeProber::new(&config.ffprobe_path, config.tool_timeout);
//!
//! let report = process_clip(
//!     &config,
//!     &resolver,
//!     &prober,
//!     &SidecarSpawner,
//!     Path::new("clips/1a2b_Expert+.mp4"),
//! ).unwrap();
//! assert!(report.succeeded());
//! ```

pub mod config;
pub mod error;
pub mod external;
pub mod file_logging;
pub mod metadata;
pub mod naming;
pub mod processing;
pub mod progress_reporting;
pub mod utils;

// Re-exports for public API
pub use config::{EncodeConfig, EncodeConfigBuilder, LoggingConfig, load_config};
pub use error::{CoreError, CoreResult};
pub use external::{DimensionProber, FfmpegSpawner, FfprobeProber, SidecarSpawner};
pub use file_logging::setup_logging;
pub use metadata::{BeatSaverClient, BeatmapMetadata, MetadataResolver};
pub use naming::{ClipName, OutputPlan, parse_clip_name};
pub use processing::{ClipReport, OutputKind, process_clip};
pub use utils::{format_bytes, format_duration, parse_ffmpeg_time};
