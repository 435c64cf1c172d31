//! Tempo Player - Playback Control
//!
//! Queue-driven playback controller for Tempo Player.
//!
//! This crate provides:
//! - A single playback engine over a pluggable audio backend
//! - Next/previous selection (sequential, shuffle, repeat-one)
//! - Bounded playback history for "previous"
//! - Shuffle/repeat modes that exclude each other
//! - Seek and volume with clamping
//! - Once-per-track play reporting to an analytics collaborator
//!
//! # Architecture
//!
//! `tempo-playback` owns no audio output and no network client:
//! - Audio output is an [`AudioBackend`] (a deterministic
//!   [`SimulatedBackend`] ships with the crate)
//! - Play reporting is a [`PlayRecorder`]
//! - The queue is supplied wholesale by the host
//!
//! Backend events are tagged with the [`Generation`] of the load that
//! produced them. Events from superseded loads are dropped, so rapid track
//! changes can never leak state from an older track into the current one.
//!
//! # Example: Basic Playback
//!
//! ```rust
//! use tempo_playback::{
//!     NoopRecorder, PlaybackEngine, PlayerConfig, PlayerController, PlayerState,
//!     SimulatedBackend, Track,
//! };
//!
//! let (backend, clock) = SimulatedBackend::new(180.0);
//! let mut player = PlayerController::new(
//!     PlaybackEngine::new(backend),
//!     NoopRecorder,
//!     PlayerConfig::default(),
//! );
//!
//! player.replace_queue(vec![
//!     Track::new("1", "First", "Artist", "/songs/1.mp3"),
//!     Track::new("2", "Second", "Artist", "/songs/2.mp3"),
//! ]);
//!
//! player.select(0).unwrap();
//! player.pump();
//! assert_eq!(player.state(), PlayerState::Playing);
//!
//! // Run the first track to its end; the controller advances on its own
//! clock.advance(180.0);
//! player.pump();
//! assert_eq!(player.active_index(), Some(1));
//! ```
//!
//! # Example: Shuffle and Repeat
//!
//! ```rust
//! use tempo_playback::{NoopRecorder, PlaybackEngine, PlayerConfig, PlayerController, SimulatedBackend};
//!
//! let (backend, _clock) = SimulatedBackend::new(180.0);
//! let mut player = PlayerController::new(PlaybackEngine::new(backend), NoopRecorder, PlayerConfig::default());
//!
//! player.toggle_shuffle();
//! assert!(player.is_shuffling());
//!
//! // Repeat and shuffle exclude each other
//! player.toggle_repeat();
//! assert!(player.is_repeating());
//! assert!(!player.is_shuffling());
//! ```

pub mod backend;
mod controller;
mod engine;
mod error;
mod events;
mod history;
mod modes;
mod queue;
pub mod selection;
pub mod sim;
mod tracker;
mod transport;
pub mod types;

// Public exports
pub use backend::{AudioBackend, BackendEvent, BackendEventKind, Generation};
pub use controller::PlayerController;
pub use engine::{EngineEvent, PlaybackEngine};
pub use error::{PlaybackError, RecordError, Result, TransportError};
pub use events::PlayerEvent;
pub use history::{History, DEFAULT_HISTORY_LIMIT};
pub use modes::{ModeChange, PlayModes};
pub use queue::{Queue, Reconciled};
pub use sim::{BackendCommand, SimulatedBackend, SimulatedHandle};
pub use tracker::{NoopRecorder, PlayRecorder, SessionTracker};
pub use transport::{format_time, TransportState};
pub use types::{MediaRef, PlayerConfig, PlayerState, Track, TrackId};
