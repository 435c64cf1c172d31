//! Player events
//!
//! Notifications queued by the controller for its host (UI, track source,
//! CLI). Hosts drain them after each call or pump. Events are emitted at:
//! - State changes (idle/loading/playing/paused/ended)
//! - Track changes and active-index moves
//! - Metadata, position and volume updates
//! - Mode changes and queue replacement
//! - Transport errors

use crate::types::{PlayerState, TrackId};
use serde::{Deserialize, Serialize};

/// Events emitted by the player controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// Controller moved to a new state
    StateChanged { state: PlayerState },

    /// A different track (or the same track, reloaded) became active
    TrackChanged {
        index: usize,
        track_id: TrackId,
        previous_track_id: Option<TrackId>,
    },

    /// Duration of the active track is known (seconds)
    DurationChanged { duration: f64 },

    /// Position update (seconds)
    PositionUpdate { position: f64, duration: f64 },

    /// Volume changed; value in `[0, 1]`
    VolumeChanged { volume: f64 },

    /// Shuffle/repeat flags changed
    ModesChanged { shuffle: bool, repeat: bool },

    /// Track reached its end naturally
    TrackFinished { track_id: TrackId },

    /// Queue was replaced
    QueueChanged { length: usize },

    /// Active track kept playing but sits at a new index after a queue replacement
    ActiveIndexMoved { from: usize, to: usize },

    /// Player closed; active index cleared
    Closed,

    /// Non-fatal transport error
    Error { message: String },
}

impl PlayerEvent {
    /// Active index implied by this event, when it changes it
    ///
    /// `Some(None)` means the index was cleared.
    pub fn active_index_change(&self) -> Option<Option<usize>> {
        match self {
            PlayerEvent::TrackChanged { index, .. } => Some(Some(*index)),
            PlayerEvent::ActiveIndexMoved { to, .. } => Some(Some(*to)),
            PlayerEvent::Closed => Some(None),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_index_change_mapping() {
        let changed = PlayerEvent::TrackChanged {
            index: 2,
            track_id: TrackId::from("c"),
            previous_track_id: None,
        };
        assert_eq!(changed.active_index_change(), Some(Some(2)));

        let moved = PlayerEvent::ActiveIndexMoved { from: 4, to: 1 };
        assert_eq!(moved.active_index_change(), Some(Some(1)));

        assert_eq!(PlayerEvent::Closed.active_index_change(), Some(None));
        assert_eq!(
            PlayerEvent::VolumeChanged { volume: 0.5 }.active_index_change(),
            None
        );
    }

    #[test]
    fn events_serialize() {
        let event = PlayerEvent::StateChanged {
            state: PlayerState::Playing,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"StateChanged":{"state":"Playing"}}"#);
    }
}
