//! Core types for playback control

use serde::{Deserialize, Serialize};
use std::fmt;

/// Track identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    /// Create a new track ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TrackId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TrackId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Opaque playable-media reference (URI or path)
///
/// Only the audio backend interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaRef(String);

impl MediaRef {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single playable item with its display metadata
///
/// Immutable once fetched. The controller only holds the queue it was
/// handed plus an index into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Album name (optional)
    #[serde(default)]
    pub album: Option<String>,

    /// Cover art reference (optional)
    #[serde(default)]
    pub cover_url: Option<String>,

    /// Playable media reference
    #[serde(alias = "storage_url")]
    pub media: MediaRef,
}

impl Track {
    /// Create a track with no album or cover
    pub fn new(
        id: impl Into<TrackId>,
        title: impl Into<String>,
        artist: impl Into<String>,
        media: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            album: None,
            cover_url: None,
            media: MediaRef::new(media),
        }
    }
}

/// Controller state machine position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    /// No active track, player hidden
    Idle,

    /// Track bound, waiting for playback to start
    Loading,

    /// Playback confirmed by the backend
    Playing,

    /// Paused mid-track (or start was refused)
    Paused,

    /// Track reached its end; immediately followed by a restart or track change
    Ended,
}

/// Configuration for the player controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Maximum history stack depth (default: 100)
    pub history_limit: usize,

    /// Initial volume in `[0, 1]` (default: 1.0)
    pub volume: f64,

    /// Initial shuffle flag (default: false)
    pub shuffle: bool,

    /// Initial repeat-one flag (default: false)
    pub repeat: bool,

    /// Fixed seed for shuffle selection; entropy-seeded when absent
    pub shuffle_seed: Option<u64>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            history_limit: crate::history::DEFAULT_HISTORY_LIMIT,
            volume: 1.0,
            shuffle: false,
            repeat: false,
            shuffle_seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlayerConfig::default();
        assert_eq!(config.history_limit, 100);
        assert_eq!(config.volume, 1.0);
        assert!(!config.shuffle);
        assert!(!config.repeat);
        assert!(config.shuffle_seed.is_none());
    }

    #[test]
    fn partial_config_uses_defaults() {
        let config: PlayerConfig = serde_json::from_str(r#"{"repeat": true}"#).unwrap();
        assert!(config.repeat);
        assert_eq!(config.history_limit, 100);
    }

    #[test]
    fn track_accepts_storage_url_key() {
        let json = r#"{
            "id": "1",
            "title": "Believer",
            "artist": "Imagine Dragons",
            "album": "Evolve",
            "cover_url": "https://example.com/cover1.jpg",
            "storage_url": "/songs/song1.mp3"
        }"#;

        let track: Track = serde_json::from_str(json).unwrap();
        assert_eq!(track.id.as_str(), "1");
        assert_eq!(track.media.as_str(), "/songs/song1.mp3");
        assert_eq!(track.album.as_deref(), Some("Evolve"));
    }

    #[test]
    fn track_id_display() {
        let id = TrackId::from("abc");
        assert_eq!(id.to_string(), "abc");
    }
}
