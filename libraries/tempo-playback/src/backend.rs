//! Platform-agnostic audio backend trait
//!
//! Abstracts the single audio-rendering handle (a browser media element,
//! a native output stream, a test double). The playback engine is the only
//! caller; nothing else issues transport commands.

use crate::error::TransportError;
use crate::types::MediaRef;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Monotonic load ticket
///
/// Every bind gets a fresh generation. Events carry the generation they
/// were raised for, so events from superseded loads can be discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Generation(u64);

impl Generation {
    /// The generation after this one
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle notification raised by a backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendEvent {
    /// Generation of the load this event belongs to
    pub ticket: Generation,
    pub kind: BackendEventKind,
}

impl BackendEvent {
    pub fn new(ticket: Generation, kind: BackendEventKind) -> Self {
        Self { ticket, kind }
    }
}

/// What happened on the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BackendEventKind {
    /// Metadata parsed; duration in seconds is known
    MetadataLoaded { duration: f64 },

    /// Playback position advanced (seconds)
    TimeUpdate { position: f64 },

    /// A pending start request succeeded
    Started,

    /// A pending start request was refused (e.g. autoplay policy)
    StartFailed { reason: String },

    /// Reached the end of the media
    Ended,

    /// Load or decode failure
    Failed { reason: String },
}

/// The underlying audio-rendering handle
///
/// `start` only requests playback; the outcome arrives later as
/// [`BackendEventKind::Started`] or [`BackendEventKind::StartFailed`].
pub trait AudioBackend {
    /// Bind new media under `ticket`, replacing whatever was bound
    ///
    /// # Errors
    /// Returns an error if the media reference cannot be bound at all.
    /// Asynchronous load failures are reported as events instead.
    fn bind(&mut self, ticket: Generation, media: &MediaRef) -> Result<(), TransportError>;

    /// Request playback of the bound media
    ///
    /// # Errors
    /// Returns an error if the request is refused synchronously
    fn start(&mut self, ticket: Generation) -> Result<(), TransportError>;

    /// Pause playback, keeping position
    fn pause(&mut self);

    /// Stop playback, rewind to 0 and release the bound media
    fn stop(&mut self);

    /// Move the playhead (seconds, already clamped by the engine)
    fn set_position(&mut self, seconds: f64);

    /// Set output gain in `[0, 1]`
    fn set_gain(&mut self, gain: f64);

    /// Collect events raised since the last call
    ///
    /// Backends that deliver events through callbacks return nothing here
    /// and the host feeds events to the controller directly.
    fn drain_events(&mut self) -> Vec<BackendEvent> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generations_are_monotonic() {
        let first = Generation::default();
        let second = first.next();
        assert!(second > first);
        assert_eq!(second.value(), 1);
        assert_eq!(second.to_string(), "#1");
    }
}
