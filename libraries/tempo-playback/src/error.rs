//! Error types for playback control

use thiserror::Error;

/// Errors observable by callers of the player controller
///
/// Only selection and transport failures surface here. Analytics failures
/// and out-of-range seek/volume input are recovered locally.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Queue is empty, so there is nothing to select
    #[error("Queue is empty")]
    EmptyQueue,

    /// No track is active (player is idle)
    #[error("No active track")]
    NoActiveTrack,

    /// Requested index is outside the current queue
    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(usize),

    /// The audio backend failed to load or start the track
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Non-fatal failures reported by the playback engine
///
/// A transport error always leaves the engine paused and stoppable; the
/// user can retry or skip.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The media reference could not be bound
    #[error("Failed to load media: {0}")]
    LoadFailed(String),

    /// Playback start was refused (e.g. autoplay blocked)
    #[error("Playback was rejected: {0}")]
    PlayRejected(String),

    /// Media error raised while decoding or streaming
    #[error("Media error: {0}")]
    Media(String),

    /// A transport command was issued with nothing bound
    #[error("No media loaded")]
    NothingLoaded,
}

/// Failure reported by an analytics collaborator
///
/// Always swallowed by the session tracker after logging.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// Collaborator could not be reached
    #[error("Analytics unreachable: {0}")]
    Unreachable(String),

    /// Collaborator answered with an error status
    #[error("Analytics rejected play ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Collaborator is not available in this context
    #[error("Analytics unavailable: {0}")]
    Unavailable(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_converts_into_playback_error() {
        let err: PlaybackError = TransportError::PlayRejected("autoplay".to_string()).into();
        assert!(matches!(
            err,
            PlaybackError::Transport(TransportError::PlayRejected(_))
        ));
        assert_eq!(err.to_string(), "Playback was rejected: autoplay");
    }

    #[test]
    fn record_error_display() {
        let err = RecordError::Rejected {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "Analytics rejected play (500): boom");
    }
}
