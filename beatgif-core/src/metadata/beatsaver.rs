//! Beatmap catalog client (BeatSaver REST API).

use std::time::Duration;

use serde_json::Value;

use super::{BeatmapMetadata, MetadataResolver};
use crate::error::{CoreError, CoreResult};

/// Per-request timeout for catalog lookups.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// `MetadataResolver` that performs one `GET {base}/maps/id/{id}` per lookup.
pub struct BeatSaverClient {
    agent: ureq::Agent,
    base_url: String,
}

impl BeatSaverClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("beatgif/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            agent,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// The id is percent-encoded as a single path segment.
    fn map_url(&self, map_id: &str) -> String {
        format!("{}/maps/id/{}", self.base_url, urlencoding::encode(map_id))
    }
}

impl MetadataResolver for BeatSaverClient {
    fn resolve(&self, map_id: &str) -> CoreResult<BeatmapMetadata> {
        let url = self.map_url(map_id);
        log::debug!("Fetching beatmap metadata from {url}");

        let response = match self.agent.get(&url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, _)) => return Err(status_error(code)),
            Err(ureq::Error::Transport(transport)) => {
                return Err(CoreError::MetadataLookup(format!(
                    "metadata lookup failed: {transport}"
                )));
            }
        };
        if response.status() != 200 {
            return Err(status_error(response.status()));
        }

        let body = response.into_string().map_err(|e| {
            CoreError::MetadataLookup(format!("metadata lookup failed reading response: {e}"))
        })?;
        let doc: Value = serde_json::from_str(&body).map_err(|e| {
            CoreError::MetadataLookup(format!("metadata lookup returned invalid JSON: {e}"))
        })?;

        let record = BeatmapMetadata::from_json(map_id, &doc);
        log::debug!("Beatmap metadata for {map_id}: {record:?}");
        Ok(record)
    }
}

fn status_error(code: u16) -> CoreError {
    CoreError::MetadataLookup(format!("metadata lookup failed with status code {code}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_url_joins_base_and_id() {
        let client = BeatSaverClient::new("https://api.beatsaver.com/", DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(client.map_url("1a2b"), "https://api.beatsaver.com/maps/id/1a2b");
    }

    #[test]
    fn map_url_encodes_reserved_characters() {
        let client = BeatSaverClient::new("https://api.beatsaver.com", DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(
            client.map_url("a b?x=1#frag/.."),
            "https://api.beatsaver.com/maps/id/a%20b%3Fx%3D1%23frag%2F.."
        );
    }

    #[test]
    fn status_error_carries_the_code() {
        assert_eq!(
            status_error(404).to_string(),
            "metadata lookup failed with status code 404"
        );
    }

    #[test]
    fn unreachable_host_is_a_lookup_error() {
        // Port 1 on loopback refuses connections without touching the network.
        let client = BeatSaverClient::new("http://127.0.0.1:1", Duration::from_secs(2));
        let err = client.resolve("1a2b").unwrap_err();
        assert!(matches!(err, CoreError::MetadataLookup(_)));
    }
}
