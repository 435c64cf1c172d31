/// Track list loading
use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::Path;
use tempo_playback::Track;
use tracing::{debug, warn};

/// Accepted track list layouts: a bare array, or the `{"songs": [...]}`
/// envelope returned by the music API
#[derive(Deserialize)]
#[serde(untagged)]
enum TrackList {
    Bare(Vec<Track>),
    Envelope { songs: Vec<Track> },
}

/// Parse a JSON track list
pub fn parse_tracks(json: &str) -> Result<Vec<Track>> {
    let tracks = match serde_json::from_str::<TrackList>(json) {
        Ok(TrackList::Bare(tracks) | TrackList::Envelope { songs: tracks }) => tracks,
        // Re-parse as a bare list for a precise error position
        Err(_) => serde_json::from_str::<Vec<Track>>(json)?,
    };

    if tracks.is_empty() {
        warn!("Track list is empty");
    }

    Ok(tracks)
}

/// Read and parse a JSON track list from disk
pub fn load_tracks(path: &Path) -> Result<Vec<Track>> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| CliError::Library(format!("{}: {}", path.display(), e)))?;

    let tracks = parse_tracks(&json)?;
    debug!(path = %path.display(), tracks = tracks.len(), "Loaded track list");
    Ok(tracks)
}
