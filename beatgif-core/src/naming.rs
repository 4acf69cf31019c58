//! Clip file names and output paths.
//!
//! Clips are named `<mapId>_<label>.<ext>`. Each clip produces two GIFs: an
//! archive copy under `works/` whose name carries a timestamp and the song
//! title, and a collection copy under `gifs/<label>/` keyed by map id.

use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};

/// Timestamp format used in archive file names.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// The two parts of a clip's file stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipName {
    pub map_id: String,
    pub label: String,
}

/// Splits `<mapId>_<label>.<ext>` into its parts.
///
/// The stem must contain exactly one underscore with text on both sides.
pub fn parse_clip_name(path: &Path) -> CoreResult<ClipName> {
    let invalid = || CoreError::InvalidFilename(crate::utils::display_name(path));
    let stem = path.file_stem().and_then(|s| s.to_str()).ok_or_else(invalid)?;

    let mut parts = stem.split('_');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(map_id), Some(label), None) if !map_id.is_empty() && !label.is_empty() => {
            Ok(ClipName {
                map_id: map_id.to_string(),
                label: label.to_string(),
            })
        }
        _ => Err(invalid()),
    }
}

/// Makes `raw` safe to use as one path component.
///
/// Separators, characters reserved on Windows and control characters become `_`.
/// Trailing dots and spaces are dropped; an empty result becomes `untitled`.
#[must_use]
pub fn sanitize_path_component(raw: &str) -> String {
    let replaced: String = raw
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = replaced.trim_end_matches(['.', ' ']);
    if trimmed.is_empty() {
        "untitled".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Destination paths for one clip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPlan {
    /// `<root>/works/<timestamp>_<mapId>_<title>.gif`
    pub archive: PathBuf,
    /// `<root>/gifs/<label>/<mapId>.gif`
    pub collection: PathBuf,
}

impl OutputPlan {
    #[must_use]
    pub fn new(root: &Path, clip: &ClipName, song_title: &str, timestamp: &str) -> Self {
        let map_id = sanitize_path_component(&clip.map_id);
        let archive_name = format!(
            "{timestamp}_{map_id}_{}.gif",
            sanitize_path_component(song_title)
        );
        Self {
            archive: root.join("works").join(archive_name),
            collection: root
                .join("gifs")
                .join(sanitize_path_component(&clip.label))
                .join(format!("{map_id}.gif")),
        }
    }
}

/// Local time formatted for archive file names.
#[must_use]
pub fn timestamp_now() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}
