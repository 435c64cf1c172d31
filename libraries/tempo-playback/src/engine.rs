//! Playback engine
//!
//! Wraps the single audio backend and owns transport state: position,
//! duration, volume, and whether playback is wanted. Every load is tagged
//! with a fresh [`Generation`]; backend events carrying any other
//! generation are dropped, so a slow event from a superseded track can
//! never touch the current one.

use crate::backend::{AudioBackend, BackendEvent, BackendEventKind, Generation};
use crate::error::TransportError;
use crate::types::{Track, TrackId};
use tracing::{debug, trace, warn};

/// Engine-level event, already filtered to the current load
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Duration known (seconds)
    MetadataReady { duration: f64 },

    /// Position advanced (seconds)
    Progress { position: f64 },

    /// Backend confirmed playback started
    PlaybackStarted,

    /// Track reached its end
    Ended,

    /// Non-fatal transport failure; playback is now paused
    Error(TransportError),
}

#[derive(Debug)]
struct Binding {
    track_id: TrackId,
    /// True until the binding has played, ended, or failed
    fresh: bool,
}

/// Transport owner for one audio backend
#[derive(Debug)]
pub struct PlaybackEngine<B> {
    backend: B,
    generation: Generation,
    binding: Option<Binding>,
    position: f64,
    duration: f64,
    volume: f64,
    playing: bool,
    start_pending: bool,
}

impl<B: AudioBackend> PlaybackEngine<B> {
    /// Create an engine around `backend` with nothing loaded
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            generation: Generation::default(),
            binding: None,
            position: 0.0,
            duration: 0.0,
            volume: 1.0,
            playing: false,
            start_pending: false,
        }
    }

    // ===== Transport Commands =====

    /// Stop current playback and bind `track`
    ///
    /// Loading the track that is already bound and has not started yet
    /// keeps the existing generation and only rewinds to 0.
    pub fn load(&mut self, track: &Track) -> Result<Generation, TransportError> {
        if let Some(binding) = &self.binding {
            if binding.fresh && binding.track_id == track.id {
                debug!(track_id = %track.id, generation = %self.generation, "Track already bound, skipping reload");
                self.position = 0.0;
                self.backend.set_position(0.0);
                return Ok(self.generation);
            }
        }

        self.backend.stop();
        self.generation = self.generation.next();
        self.binding = None;
        self.reset_transport();

        debug!(track_id = %track.id, media = %track.media, generation = %self.generation, "Binding track");
        if let Err(err) = self.backend.bind(self.generation, &track.media) {
            warn!(track_id = %track.id, error = %err, "Failed to bind track");
            return Err(err);
        }

        self.binding = Some(Binding {
            track_id: track.id.clone(),
            fresh: true,
        });
        Ok(self.generation)
    }

    /// Request playback
    ///
    /// Marks playback as wanted immediately; confirmation or refusal
    /// arrives later through [`PlaybackEngine::handle`].
    pub fn play(&mut self) -> Result<(), TransportError> {
        if self.binding.is_none() {
            return Err(TransportError::NothingLoaded);
        }

        self.playing = true;
        self.start_pending = true;

        if let Err(err) = self.backend.start(self.generation) {
            warn!(generation = %self.generation, error = %err, "Start request refused");
            self.playing = false;
            self.start_pending = false;
            return Err(err);
        }

        Ok(())
    }

    /// Pause playback; withdraws any pending start request
    pub fn pause(&mut self) {
        if self.binding.is_none() {
            return;
        }

        self.playing = false;
        self.start_pending = false;
        self.backend.pause();
    }

    /// Stop playback, rewind to 0 and release the binding
    ///
    /// Advances the generation so late events from the released media are
    /// ignored.
    pub fn stop(&mut self) {
        self.backend.stop();
        self.generation = self.generation.next();
        self.binding = None;
        self.reset_transport();
    }

    /// Seek to `seconds`, clamped to `[0, duration]`
    ///
    /// Returns the applied position, or `None` when nothing is loaded or
    /// the input is not a finite number.
    pub fn seek(&mut self, seconds: f64) -> Option<f64> {
        if self.binding.is_none() || !seconds.is_finite() {
            return None;
        }

        let target = self.clamp_position(seconds);
        self.position = target;
        self.backend.set_position(target);
        Some(target)
    }

    /// Rewind to 0 and play again without rebinding
    pub fn restart(&mut self) -> Result<(), TransportError> {
        self.seek(0.0);
        self.play()
    }

    /// Set volume, clamped to `[0, 1]`
    ///
    /// Non-finite input leaves the volume unchanged. Returns the volume in
    /// effect afterwards.
    pub fn set_volume(&mut self, volume: f64) -> f64 {
        if !volume.is_finite() {
            return self.volume;
        }

        self.volume = volume.clamp(0.0, 1.0);
        self.backend.set_gain(self.volume);
        self.volume
    }

    // ===== Events =====

    /// Apply a backend event, dropping it if it belongs to a stale load
    pub fn handle(&mut self, event: BackendEvent) -> Option<EngineEvent> {
        if event.ticket != self.generation || self.binding.is_none() {
            trace!(ticket = %event.ticket, current = %self.generation, kind = ?event.kind, "Dropping stale backend event");
            return None;
        }

        match event.kind {
            BackendEventKind::MetadataLoaded { duration } => {
                self.duration = if duration.is_finite() && duration > 0.0 {
                    duration
                } else {
                    0.0
                };
                self.position = self.clamp_position(self.position);
                Some(EngineEvent::MetadataReady {
                    duration: self.duration,
                })
            }
            BackendEventKind::TimeUpdate { position } => {
                if !position.is_finite() {
                    return None;
                }
                self.position = self.clamp_position(position);
                Some(EngineEvent::Progress {
                    position: self.position,
                })
            }
            BackendEventKind::Started => {
                if !self.start_pending {
                    debug!(generation = %self.generation, "Ignoring start confirmation for withdrawn request");
                    return None;
                }
                self.start_pending = false;
                self.playing = true;
                self.mark_used();
                Some(EngineEvent::PlaybackStarted)
            }
            BackendEventKind::StartFailed { reason } => {
                if !self.start_pending {
                    debug!(generation = %self.generation, "Ignoring start failure for withdrawn request");
                    return None;
                }
                warn!(generation = %self.generation, reason = %reason, "Playback start rejected");
                self.start_pending = false;
                self.playing = false;
                Some(EngineEvent::Error(TransportError::PlayRejected(reason)))
            }
            BackendEventKind::Ended => {
                self.playing = false;
                self.start_pending = false;
                if self.duration > 0.0 {
                    self.position = self.duration;
                }
                self.mark_used();
                Some(EngineEvent::Ended)
            }
            BackendEventKind::Failed { reason } => {
                warn!(generation = %self.generation, reason = %reason, "Media error");
                self.playing = false;
                self.start_pending = false;
                self.mark_used();
                Some(EngineEvent::Error(TransportError::Media(reason)))
            }
        }
    }

    /// Collect pending events from the backend
    pub fn drain_backend_events(&mut self) -> Vec<BackendEvent> {
        self.backend.drain_events()
    }

    // ===== State Queries =====

    /// Current position (seconds)
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Duration in seconds, `0.0` until metadata arrives
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_loaded(&self) -> bool {
        self.binding.is_some()
    }

    /// Id of the bound track, if any
    pub fn bound_track(&self) -> Option<&TrackId> {
        self.binding.as_ref().map(|binding| &binding.track_id)
    }

    /// Read-only access to the backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    // ===== Internal =====

    fn reset_transport(&mut self) {
        self.position = 0.0;
        self.duration = 0.0;
        self.playing = false;
        self.start_pending = false;
    }

    fn mark_used(&mut self) {
        if let Some(binding) = self.binding.as_mut() {
            binding.fresh = false;
        }
    }

    fn clamp_position(&self, seconds: f64) -> f64 {
        let seconds = seconds.max(0.0);
        if self.duration > 0.0 {
            seconds.min(self.duration)
        } else {
            seconds
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{BackendCommand, SimulatedBackend, SimulatedHandle};

    fn engine() -> (PlaybackEngine<SimulatedBackend>, SimulatedHandle) {
        let (backend, handle) = SimulatedBackend::new(200.0);
        (PlaybackEngine::new(backend), handle)
    }

    fn track(id: &str) -> Track {
        Track::new(id, format!("Song {id}"), "Artist", format!("/songs/{id}.mp3"))
    }

    fn pump(engine: &mut PlaybackEngine<SimulatedBackend>) -> Vec<EngineEvent> {
        engine
            .drain_backend_events()
            .into_iter()
            .filter_map(|event| engine.handle(event))
            .collect()
    }

    #[test]
    fn load_binds_and_reports_duration() {
        let (mut engine, handle) = engine();
        let generation = engine.load(&track("a")).unwrap();

        assert_eq!(handle.current_ticket(), Some(generation));
        assert_eq!(
            pump(&mut engine),
            vec![EngineEvent::MetadataReady { duration: 200.0 }]
        );
        assert_eq!(engine.duration(), 200.0);
    }

    #[test]
    fn duplicate_load_is_idempotent() {
        let (mut engine, handle) = engine();
        let first = engine.load(&track("a")).unwrap();
        let second = engine.load(&track("a")).unwrap();

        assert_eq!(first, second);
        assert_eq!(handle.bind_count(), 1);
    }

    #[test]
    fn duplicate_load_rewinds_position() {
        let (mut engine, handle) = engine();
        engine.load(&track("a")).unwrap();
        pump(&mut engine);
        assert_eq!(engine.seek(42.0), Some(42.0));

        engine.load(&track("a")).unwrap();

        assert_eq!(engine.position(), 0.0);
        assert_eq!(handle.position(), 0.0);
        assert_eq!(handle.bind_count(), 1);
    }

    #[test]
    fn reload_after_playing_rebinds() {
        let (mut engine, handle) = engine();
        let first = engine.load(&track("a")).unwrap();
        engine.play().unwrap();
        pump(&mut engine);

        let second = engine.load(&track("a")).unwrap();
        assert_ne!(first, second);
        assert_eq!(handle.bind_count(), 2);
    }

    #[test]
    fn load_stops_previous_playback() {
        let (mut engine, handle) = engine();
        engine.load(&track("a")).unwrap();
        engine.play().unwrap();
        pump(&mut engine);
        handle.advance(30.0);
        pump(&mut engine);
        assert_eq!(engine.position(), 30.0);

        handle.clear_commands();
        engine.load(&track("b")).unwrap();

        assert_eq!(handle.commands()[0], BackendCommand::Stop);
        assert_eq!(engine.position(), 0.0);
        assert!(!engine.is_playing());
    }

    #[test]
    fn play_is_confirmed_by_event() {
        let (mut engine, _handle) = engine();
        engine.load(&track("a")).unwrap();
        engine.play().unwrap();
        assert!(engine.is_playing());

        let events = pump(&mut engine);
        assert!(events.contains(&EngineEvent::PlaybackStarted));
    }

    #[test]
    fn rejected_play_is_non_fatal() {
        let (mut engine, handle) = engine();
        engine.load(&track("a")).unwrap();
        handle.block_next_start("autoplay blocked");
        engine.play().unwrap();

        let events = pump(&mut engine);
        assert!(events.contains(&EngineEvent::Error(TransportError::PlayRejected(
            "autoplay blocked".to_string()
        ))));
        assert!(!engine.is_playing());

        engine.play().unwrap();
        assert!(pump(&mut engine).contains(&EngineEvent::PlaybackStarted));
    }

    #[test]
    fn play_without_track_fails() {
        let (mut engine, _handle) = engine();
        assert_eq!(engine.play(), Err(TransportError::NothingLoaded));
    }

    #[test]
    fn pause_withdraws_pending_start() {
        let (mut engine, _handle) = engine();
        engine.load(&track("a")).unwrap();
        engine.play().unwrap();
        engine.pause();

        let events = pump(&mut engine);
        assert!(!events.contains(&EngineEvent::PlaybackStarted));
        assert!(!engine.is_playing());
    }

    #[test]
    fn stale_events_are_dropped() {
        let (mut engine, _handle) = engine();
        let old = engine.load(&track("a")).unwrap();
        engine.load(&track("b")).unwrap();
        pump(&mut engine);

        let stale = BackendEvent::new(old, BackendEventKind::Ended);
        assert_eq!(engine.handle(stale), None);

        let stale = BackendEvent::new(old, BackendEventKind::TimeUpdate { position: 99.0 });
        assert_eq!(engine.handle(stale), None);
        assert_eq!(engine.position(), 0.0);
    }

    #[test]
    fn events_after_stop_are_dropped() {
        let (mut engine, _handle) = engine();
        let generation = engine.load(&track("a")).unwrap();
        engine.stop();

        let event = BackendEvent::new(generation, BackendEventKind::Started);
        assert_eq!(engine.handle(event), None);
        assert!(!engine.is_loaded());
    }

    #[test]
    fn seek_clamps_to_duration() {
        let (mut engine, _handle) = engine();
        engine.load(&track("a")).unwrap();
        pump(&mut engine);

        assert_eq!(engine.seek(-10.0), Some(0.0));
        assert_eq!(engine.seek(999.0), Some(200.0));
        assert_eq!(engine.seek(42.5), Some(42.5));
        assert_eq!(engine.seek(f64::NAN), None);
        assert_eq!(engine.position(), 42.5);
    }

    #[test]
    fn seek_before_metadata_only_clamps_below() {
        let (mut engine, _handle) = engine();
        engine.load(&track("a")).unwrap();
        assert_eq!(engine.seek(500.0), Some(500.0));

        pump(&mut engine);
        assert_eq!(engine.position(), 200.0);
    }

    #[test]
    fn seek_without_track_is_ignored() {
        let (mut engine, _handle) = engine();
        assert_eq!(engine.seek(10.0), None);
    }

    #[test]
    fn volume_is_clamped() {
        let (mut engine, handle) = engine();
        assert_eq!(engine.set_volume(-0.5), 0.0);
        assert_eq!(engine.set_volume(3.0), 1.0);
        assert_eq!(engine.set_volume(0.4), 0.4);
        assert_eq!(engine.set_volume(f64::NAN), 0.4);
        assert_eq!(handle.gain(), 0.4);
    }

    #[test]
    fn restart_rewinds_and_plays() {
        let (mut engine, handle) = engine();
        engine.load(&track("a")).unwrap();
        engine.play().unwrap();
        pump(&mut engine);
        handle.advance(200.0);
        let events = pump(&mut engine);
        assert!(events.contains(&EngineEvent::Ended));

        engine.restart().unwrap();
        assert_eq!(engine.position(), 0.0);
        assert!(pump(&mut engine).contains(&EngineEvent::PlaybackStarted));
    }

    #[test]
    fn media_failure_pauses() {
        let (mut engine, handle) = engine();
        handle.fail_media("/songs/x.mp3");
        engine.load(&track("x")).unwrap();
        engine.play().unwrap();

        let events = pump(&mut engine);
        assert!(matches!(
            events[0],
            EngineEvent::Error(TransportError::Media(_))
        ));
        assert!(!engine.is_playing());
    }
}
