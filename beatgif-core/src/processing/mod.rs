//! Clip processing.
//!
//! Geometry derivation, the ffmpeg GIF encode and the per-clip orchestration
//! that ties metadata, probing and both encodes together.

/// Crop rectangle and output size computation
pub mod geometry;

/// Filter graph construction and the ffmpeg encode
pub mod encode;

/// Orchestration of one clip into its two GIFs
pub mod clip;

pub use clip::{ClipReport, OutputKind, OutputOutcome, process_clip};
pub use encode::{EncodeRequest, EncodeStats, build_filter_graph, encode};
pub use geometry::{VideoGeometry, compute_geometry};
