//! Types for the play-history API.

use serde::Deserialize;
use std::time::Duration;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for the play-history endpoint.
#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    /// Base URL of the music API (e.g., "https://music.example.com")
    pub base_url: String,
    /// Bearer token attached to every request when present
    pub access_token: Option<String>,
    /// Whole-request timeout in seconds
    pub timeout_secs: u64,
}

impl AnalyticsConfig {
    /// Create a config with just the URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            access_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Create a config carrying an access token.
    pub fn with_token(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            ..Self::new(base_url)
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Outcome of a successful play report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayReceipt {
    /// A new play-history entry was created
    Recorded { total_plays: Option<u64> },
    /// The server already holds a recent entry for this track and user
    Duplicate,
}

/// Response body of `POST /api/songs/{id}/play`.
#[derive(Debug, Deserialize)]
pub(crate) struct PlayResponse {
    #[serde(default)]
    pub duplicate: bool,
    #[serde(default)]
    pub song_stats: Option<SongStats>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SongStats {
    pub total_plays: u64,
}

/// Error body returned by the API.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
    #[serde(default)]
    pub code: Option<String>,
}

impl PlayResponse {
    pub(crate) fn into_receipt(self) -> PlayReceipt {
        if self.duplicate {
            PlayReceipt::Duplicate
        } else {
            PlayReceipt::Recorded {
                total_plays: self.song_stats.map(|stats| stats.total_plays),
            }
        }
    }
}
