//! Play tracking
//!
//! Reports a "played" signal to an analytics collaborator at most once per
//! track change, and only once playback has actually started.

use crate::error::RecordError;
use crate::types::TrackId;
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, warn};

/// Analytics collaborator receiving play signals
///
/// Implementations must not block; network-backed recorders hand the
/// request off and return immediately. Errors are logged and dropped.
pub trait PlayRecorder {
    /// Record that `track_id` started playing
    fn record_play(&self, track_id: &TrackId) -> Result<(), RecordError>;
}

impl<T: PlayRecorder + ?Sized> PlayRecorder for Rc<T> {
    fn record_play(&self, track_id: &TrackId) -> Result<(), RecordError> {
        (**self).record_play(track_id)
    }
}

impl<T: PlayRecorder + ?Sized> PlayRecorder for Arc<T> {
    fn record_play(&self, track_id: &TrackId) -> Result<(), RecordError> {
        (**self).record_play(track_id)
    }
}

impl<T: PlayRecorder + ?Sized> PlayRecorder for Box<T> {
    fn record_play(&self, track_id: &TrackId) -> Result<(), RecordError> {
        (**self).record_play(track_id)
    }
}

/// Recorder that discards every signal
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRecorder;

impl PlayRecorder for NoopRecorder {
    fn record_play(&self, _track_id: &TrackId) -> Result<(), RecordError> {
        Ok(())
    }
}

/// Per-track "already reported" gate in front of a recorder
pub struct SessionTracker {
    recorder: Box<dyn PlayRecorder>,
    has_tracked_play: bool,
}

impl SessionTracker {
    pub fn new(recorder: Box<dyn PlayRecorder>) -> Self {
        Self {
            recorder,
            has_tracked_play: false,
        }
    }

    /// Forget the previous track; called on every track change
    pub fn reset(&mut self) {
        self.has_tracked_play = false;
    }

    /// Whether the current track has been reported
    pub fn has_tracked_play(&self) -> bool {
        self.has_tracked_play
    }

    /// Report `track_id` unless already reported for this track
    ///
    /// Returns true when the recorder was invoked. A recorder failure is
    /// logged and still counts as reported; there is no retry.
    pub fn notify_play_started(&mut self, track_id: &TrackId) -> bool {
        if self.has_tracked_play {
            return false;
        }
        self.has_tracked_play = true;

        match self.recorder.record_play(track_id) {
            Ok(()) => debug!(track_id = %track_id, "Play recorded"),
            Err(err) => warn!(track_id = %track_id, error = %err, "Failed to record play"),
        }

        true
    }
}

impl std::fmt::Debug for SessionTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTracker")
            .field("has_tracked_play", &self.has_tracked_play)
            .finish_non_exhaustive()
    }
}
