// ============================================================================
// beatgif-core/src/metadata/mod.rs
// ============================================================================
//
// METADATA: Beatmap Catalog Records
//
// A clip's file name carries only the map id; the song title and mapper shown
// on the GIF come from the remote beatmap catalog. Extraction is best-effort:
// any field the catalog omits becomes "N/A" instead of failing the lookup.
//
// AI-ASSISTANT-INFO: Beatmap metadata record, resolver trait, JSON extraction

pub mod beatsaver;

pub use beatsaver::BeatSaverClient;

use crate::error::CoreResult;
use serde_json::Value;

/// Placeholder for fields the catalog did not provide.
pub const NOT_AVAILABLE: &str = "N/A";

/// Resolves a map id to its catalog record.
pub trait MetadataResolver {
    /// Looks up `map_id`. Errors are `CoreError::MetadataLookup` with a human-readable message.
    fn resolve(&self, map_id: &str) -> CoreResult<BeatmapMetadata>;
}

/// Public page of a map on the catalog website.
#[must_use]
pub fn page_url(map_id: &str) -> String {
    format!("https://beatsaver.com/maps/{map_id}")
}

/// One difficulty of one map version.
#[derive(Debug, Clone, PartialEq)]
pub struct Difficulty {
    pub name: String,
    pub characteristic: String,
    pub stars: String,
    pub notes: String,
    pub njs: String,
    pub nps: String,
    pub bombs: String,
    pub obstacles: String,
}

impl Difficulty {
    fn from_json(diff: &Value) -> Self {
        Self {
            name: text(diff.get("difficulty")),
            characteristic: text(diff.get("characteristic")),
            stars: text(diff.get("stars")),
            notes: text(diff.get("notes")),
            njs: text(diff.get("njs")),
            nps: text(diff.get("nps")),
            bombs: text(diff.get("bombs")),
            obstacles: text(diff.get("obstacles")),
        }
    }
}

/// Descriptive fields of a beatmap as reported by the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct BeatmapMetadata {
    pub page_url: String,
    pub map_name: String,
    pub song_name: String,
    pub song_sub_name: String,
    pub song_author: String,
    pub mapper_name: String,
    pub bpm: String,
    pub duration_secs: String,
    pub score: String,
    pub tags: String,
    pub uploaded: String,
    pub difficulties: Vec<Difficulty>,
}

impl Default for BeatmapMetadata {
    fn default() -> Self {
        let na = || NOT_AVAILABLE.to_string();
        Self {
            page_url: na(),
            map_name: na(),
            song_name: na(),
            song_sub_name: na(),
            song_author: na(),
            mapper_name: na(),
            bpm: na(),
            duration_secs: na(),
            score: na(),
            tags: na(),
            uploaded: na(),
            difficulties: Vec::new(),
        }
    }
}

impl BeatmapMetadata {
    /// Extracts a record from the catalog's map document.
    #[must_use]
    pub fn from_json(map_id: &str, doc: &Value) -> Self {
        let metadata = doc.get("metadata");
        let meta = |key: &str| text(metadata.and_then(|m| m.get(key)));

        let tags = doc
            .get("tags")
            .and_then(Value::as_array)
            .map(|tags| {
                tags.iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .filter(|joined| !joined.is_empty())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let difficulties = doc
            .get("versions")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(|version| version.get("diffs").and_then(Value::as_array))
            .flatten()
            .map(Difficulty::from_json)
            .collect();

        Self {
            page_url: page_url(map_id),
            map_name: text(doc.get("name")),
            song_name: meta("songName"),
            song_sub_name: meta("songSubName"),
            song_author: meta("songAuthorName"),
            mapper_name: meta("levelAuthorName"),
            bpm: meta("bpm"),
            duration_secs: meta("duration"),
            score: text(doc.get("stats").and_then(|s| s.get("score"))),
            tags,
            uploaded: doc
                .get("uploaded")
                .and_then(Value::as_str)
                .map_or_else(|| NOT_AVAILABLE.to_string(), format_uploaded),
            difficulties,
        }
    }
}

/// Renders a scalar JSON value as display text.
fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Reformats an RFC 3339 upload time as `YYYY-MM-DD HH:MM:SS`, keeping unparseable input as is.
fn format_uploaded(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|_| raw.to_string())
}
