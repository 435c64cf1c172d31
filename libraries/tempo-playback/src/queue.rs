//! Caller-supplied track queue
//!
//! The queue is owned by the track source and handed to the controller
//! wholesale. The controller never edits it; it only keeps an index.

use crate::types::{Track, TrackId};
use std::sync::Arc;

/// Ordered, immutable list of tracks
#[derive(Debug, Clone)]
pub struct Queue {
    tracks: Arc<[Track]>,
}

/// Where the active track ended up after a queue replacement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    /// Same track still sits at the same index
    Kept(usize),

    /// Same track found at a different index
    Moved { from: usize, to: usize },

    /// Track no longer present
    Gone,
}

impl Queue {
    pub fn new(tracks: impl Into<Arc<[Track]>>) -> Self {
        Self {
            tracks: tracks.into(),
        }
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// First index holding `track_id`
    pub fn position_of(&self, track_id: &TrackId) -> Option<usize> {
        self.tracks.iter().position(|track| &track.id == track_id)
    }

    /// True when both queues list the same ids in the same order
    pub fn same_order(&self, other: &Queue) -> bool {
        self.len() == other.len()
            && self
                .tracks
                .iter()
                .zip(other.tracks.iter())
                .all(|(a, b)| a.id == b.id)
    }

    /// Locate the track that was active at `index` in the previous queue
    pub fn reconcile(&self, index: usize, track_id: &TrackId) -> Reconciled {
        if self.get(index).is_some_and(|track| &track.id == track_id) {
            return Reconciled::Kept(index);
        }

        match self.position_of(track_id) {
            Some(to) => Reconciled::Moved { from: index, to },
            None => Reconciled::Gone,
        }
    }
}

impl Default for Queue {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl From<Vec<Track>> for Queue {
    fn from(tracks: Vec<Track>) -> Self {
        Self::new(tracks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: &str) -> Track {
        Track::new(id, format!("Song {id}"), "Artist", format!("/songs/{id}.mp3"))
    }

    fn queue(ids: &[&str]) -> Queue {
        Queue::from(ids.iter().map(|id| track(id)).collect::<Vec<_>>())
    }

    #[test]
    fn reconcile_keeps_matching_index() {
        let queue = queue(&["a", "b", "c"]);
        assert_eq!(queue.reconcile(1, &TrackId::from("b")), Reconciled::Kept(1));
    }

    #[test]
    fn reconcile_finds_moved_track() {
        let queue = queue(&["c", "b"]);
        assert_eq!(
            queue.reconcile(2, &TrackId::from("c")),
            Reconciled::Moved { from: 2, to: 0 }
        );
    }

    #[test]
    fn reconcile_reports_gone() {
        let queue = queue(&["x"]);
        assert_eq!(queue.reconcile(0, &TrackId::from("a")), Reconciled::Gone);
        assert_eq!(Queue::default().reconcile(3, &TrackId::from("a")), Reconciled::Gone);
    }

    #[test]
    fn same_order_compares_ids() {
        assert!(queue(&["a", "b"]).same_order(&queue(&["a", "b"])));
        assert!(!queue(&["a", "b"]).same_order(&queue(&["b", "a"])));
        assert!(!queue(&["a"]).same_order(&queue(&["a", "b"])));
    }
}
