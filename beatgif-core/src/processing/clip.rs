//! Per-clip orchestration.
//!
//! Turns one gameplay clip into its archive and collection GIFs. Filename,
//! input, probe and geometry failures abort the clip; a failed metadata lookup
//! does not. Its message replaces the song title so the GIFs still get made
//! and visibly carry the failure. The two encodes are independent: a failed
//! archive encode does not stop the collection encode.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::EncodeConfig;
use crate::error::{CoreError, CoreResult};
use crate::external::{DimensionProber, FfmpegSpawner};
use crate::metadata::{MetadataResolver, NOT_AVAILABLE};
use crate::naming::{ClipName, OutputPlan, parse_clip_name, timestamp_now};
use crate::processing::encode::{EncodeRequest, EncodeStats, encode};
use crate::processing::geometry::compute_geometry;
use crate::progress_reporting;

/// Which of the two GIFs an outcome belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// Timestamped copy under `works/`
    Archive,
    /// Per-label copy under `gifs/<label>/`
    Collection,
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Archive => f.write_str("archive"),
            Self::Collection => f.write_str("collection"),
        }
    }
}

/// Outcome of one output encode.
#[derive(Debug)]
pub struct OutputOutcome {
    pub kind: OutputKind,
    pub path: PathBuf,
    pub result: CoreResult<EncodeStats>,
}

/// Everything that happened to one clip once its encodes were attempted.
#[derive(Debug)]
pub struct ClipReport {
    pub clip: ClipName,
    pub song_title: String,
    pub mapper: String,
    /// Set when the metadata lookup failed and the title is its error message.
    pub metadata_error: Option<String>,
    pub outputs: Vec<OutputOutcome>,
}

impl ClipReport {
    /// True when every output was written. A degraded metadata lookup still counts as success.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.outputs.iter().all(|o| o.result.is_ok())
    }

    pub fn failed_outputs(&self) -> impl Iterator<Item = &OutputOutcome> {
        self.outputs.iter().filter(|o| o.result.is_err())
    }
}

/// Processes one clip end to end.
pub fn process_clip<R, P, S>(
    config: &EncodeConfig,
    resolver: &R,
    prober: &P,
    spawner: &S,
    input_path: &Path,
) -> CoreResult<ClipReport>
where
    R: MetadataResolver + ?Sized,
    P: DimensionProber + ?Sized,
    S: FfmpegSpawner,
{
    let clip = parse_clip_name(input_path)?;
    if !input_path.is_file() {
        return Err(CoreError::FileNotFound(input_path.to_path_buf()));
    }

    progress_reporting::clip_started(input_path, &clip);

    let (song_title, mapper, metadata_error) = match resolver.resolve(&clip.map_id) {
        Ok(record) => (record.song_name, record.mapper_name, None),
        Err(err) => {
            let message = err.to_string();
            log::warn!(
                "Metadata lookup for {} failed, using the error as title: {message}",
                clip.map_id
            );
            (message.clone(), NOT_AVAILABLE.to_string(), Some(message))
        }
    };
    progress_reporting::clip_metadata(&song_title, &mapper, metadata_error.as_deref());

    let (width, height) = prober.probe_dimensions(input_path)?;
    let geometry = compute_geometry(width, height, config.crop, config.output_width)?;
    log::info!(
        "{}: {}x{} -> {}x{}",
        input_path.display(),
        width,
        height,
        geometry.output_width,
        geometry.output_height()
    );

    let plan = OutputPlan::new(&config.output_root, &clip, &song_title, &timestamp_now());
    let caption = format!("{} - Mapped by {}", clip.map_id, mapper);

    let mut outputs = Vec::with_capacity(2);
    for (kind, path) in [
        (OutputKind::Archive, plan.archive),
        (OutputKind::Collection, plan.collection),
    ] {
        let result = ensure_parent_dir(&path).and_then(|()| {
            let request = EncodeRequest::new(
                config,
                input_path.to_path_buf(),
                song_title.clone(),
                caption.clone(),
                clip.label.clone(),
                path.clone(),
            );
            encode(spawner, request, &geometry)
        });

        if let Err(err) = &result {
            log::error!("{kind} output {} failed: {err}", path.display());
            progress_reporting::encode_error(&path, &err.to_string());
        }
        outputs.push(OutputOutcome { kind, path, result });
    }

    Ok(ClipReport {
        clip,
        song_title,
        mapper,
        metadata_error,
        outputs,
    })
}

fn ensure_parent_dir(path: &Path) -> CoreResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
