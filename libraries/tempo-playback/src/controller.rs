//! Player controller - core orchestration
//!
//! Coordinates the playback engine, selection policy, history, play modes
//! and session tracker as one state machine:
//!
//! ```text
//! Idle ──select──▶ Loading ──started──▶ Playing ⇄ Paused
//!                     ▲                    │
//!                     │                 ended
//!                     │                    ▼
//!                     └──── next ◀──── Ended ──repeat──▶ Playing
//! ```
//!
//! `close()` returns to Idle from anywhere.

use crate::{
    backend::{AudioBackend, BackendEvent},
    engine::{EngineEvent, PlaybackEngine},
    error::{PlaybackError, Result, TransportError},
    events::PlayerEvent,
    history::History,
    modes::{ModeChange, PlayModes},
    queue::{Queue, Reconciled},
    selection,
    tracker::{PlayRecorder, SessionTracker},
    transport::TransportState,
    types::{PlayerConfig, PlayerState, Track},
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

/// How a track change updates the history stack
enum HistoryUpdate {
    /// Append the new index
    Push,
    /// Adopt a stack computed by the selection policy
    Replace(History),
}

/// Central playback control
///
/// Owns the single playback engine; nothing else issues transport
/// commands. All mutation happens on the caller's thread. Backend events
/// are fed in through [`PlayerController::handle_backend_event`] or
/// [`PlayerController::pump`].
pub struct PlayerController<B> {
    engine: PlaybackEngine<B>,
    queue: Queue,
    active: Option<usize>,
    history: History,
    modes: PlayModes,
    state: PlayerState,
    tracker: SessionTracker,
    rng: StdRng,
    pending_events: Vec<PlayerEvent>,
}

impl<B: AudioBackend> PlayerController<B> {
    /// Create an idle controller
    pub fn new(
        mut engine: PlaybackEngine<B>,
        recorder: impl PlayRecorder + 'static,
        config: PlayerConfig,
    ) -> Self {
        engine.set_volume(config.volume);

        let rng = match config.shuffle_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            engine,
            queue: Queue::default(),
            active: None,
            history: History::new(config.history_limit),
            modes: PlayModes::new(config.shuffle, config.repeat),
            state: PlayerState::Idle,
            tracker: SessionTracker::new(Box::new(recorder)),
            rng,
            pending_events: Vec::new(),
        }
    }

    // ===== Track Source =====

    /// Replace the queue wholesale
    ///
    /// The active track keeps playing if it is still in the new queue,
    /// possibly at a different index. If it is gone the player closes.
    pub fn replace_queue(&mut self, queue: impl Into<Queue>) {
        let queue = queue.into();
        let same_order = queue.same_order(&self.queue);
        let previous = self
            .active
            .zip(self.current_track().map(|track| track.id.clone()));

        self.queue = queue;
        self.emit(PlayerEvent::QueueChanged {
            length: self.queue.len(),
        });

        let Some((index, track_id)) = previous else {
            return;
        };

        match self.queue.reconcile(index, &track_id) {
            Reconciled::Kept(index) => {
                if !same_order {
                    self.history = History::seeded(index, self.history.limit());
                }
            }
            Reconciled::Moved { from, to } => {
                debug!(track_id = %track_id, from, to, "Active track moved in new queue");
                self.active = Some(to);
                self.history = History::seeded(to, self.history.limit());
                self.emit(PlayerEvent::ActiveIndexMoved { from, to });
            }
            Reconciled::Gone => {
                info!(track_id = %track_id, "Active track left the queue, closing player");
                self.close();
            }
        }
    }

    /// Make the track at `index` active and start it (click-to-play)
    pub fn select(&mut self, index: usize) -> Result<()> {
        if self.queue.is_empty() {
            return Err(PlaybackError::EmptyQueue);
        }
        if index >= self.queue.len() {
            return Err(PlaybackError::IndexOutOfBounds(index));
        }

        self.change_track(index, HistoryUpdate::Push)
    }

    // ===== Playback Control =====

    /// Start or resume playback of the active track
    pub fn play(&mut self) -> Result<()> {
        if self.active.is_none() {
            return Err(PlaybackError::NoActiveTrack);
        }
        if self.state == PlayerState::Playing {
            return Ok(());
        }

        if let Err(err) = self.engine.play() {
            self.fail(err.clone());
            return Err(err.into());
        }
        Ok(())
    }

    /// Pause playback
    pub fn pause(&mut self) {
        if self.active.is_none() {
            return;
        }

        self.engine.pause();
        self.set_state(PlayerState::Paused);
    }

    /// Play if paused, pause if playing
    pub fn toggle_play(&mut self) -> Result<()> {
        if self.engine.is_playing() {
            self.pause();
            Ok(())
        } else {
            self.play()
        }
    }

    /// Seek in the active track; out-of-range input is clamped
    pub fn seek(&mut self, seconds: f64) {
        if self.active.is_none() {
            debug!(seconds, "Ignoring seek while idle");
            return;
        }

        if let Some(position) = self.engine.seek(seconds) {
            self.emit(PlayerEvent::PositionUpdate {
                position,
                duration: self.engine.duration(),
            });
        }
    }

    /// Set volume; out-of-range input is clamped to `[0, 1]`
    pub fn set_volume(&mut self, volume: f64) {
        let before = self.engine.volume();
        let after = self.engine.set_volume(volume);
        if after != before {
            self.emit(PlayerEvent::VolumeChanged { volume: after });
        }
    }

    /// Advance to the next track per the selection policy
    ///
    /// Returns the new active index.
    pub fn next(&mut self) -> Result<usize> {
        let current = self.selection_origin()?;
        let index = selection::next_index(self.queue.len(), current, self.modes, &mut self.rng)
            .ok_or(PlaybackError::EmptyQueue)?;

        self.change_track(index, HistoryUpdate::Push)?;
        Ok(index)
    }

    /// Go back one step in history, or to a random other track when the
    /// history holds nothing earlier
    ///
    /// Returns the new active index.
    pub fn previous(&mut self) -> Result<usize> {
        let current = self.selection_origin()?;
        let rewind =
            selection::previous_index(&self.history, self.queue.len(), current, &mut self.rng)
                .ok_or(PlaybackError::EmptyQueue)?;

        let index = rewind.index;
        self.change_track(index, HistoryUpdate::Replace(rewind.history))?;
        Ok(index)
    }

    /// Stop playback, rewind, and clear the active track
    pub fn close(&mut self) {
        if self.active.is_none() && !self.engine.is_loaded() {
            return;
        }

        self.engine.stop();
        self.active = None;
        self.history = self.history.cleared();
        self.tracker.reset();

        info!("Player closed");
        self.set_state(PlayerState::Idle);
        self.emit(PlayerEvent::Closed);
    }

    // ===== Shuffle & Repeat =====

    /// Toggle shuffle; turning it on turns repeat off. Returns the new flag.
    pub fn toggle_shuffle(&mut self) -> bool {
        self.apply_mode(ModeChange::ToggleShuffle);
        self.modes.shuffle()
    }

    /// Toggle repeat-one; turning it on turns shuffle off. Returns the new flag.
    pub fn toggle_repeat(&mut self) -> bool {
        self.apply_mode(ModeChange::ToggleRepeat);
        self.modes.repeat()
    }

    pub fn set_shuffle(&mut self, on: bool) {
        self.apply_mode(ModeChange::SetShuffle(on));
    }

    pub fn set_repeat(&mut self, on: bool) {
        self.apply_mode(ModeChange::SetRepeat(on));
    }

    // ===== Backend Events =====

    /// Apply one backend event
    ///
    /// Events from superseded loads are dropped by the engine.
    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        let Some(event) = self.engine.handle(event) else {
            return;
        };

        match event {
            EngineEvent::MetadataReady { duration } => {
                self.emit(PlayerEvent::DurationChanged { duration });
            }
            EngineEvent::Progress { position } => {
                self.emit(PlayerEvent::PositionUpdate {
                    position,
                    duration: self.engine.duration(),
                });
            }
            EngineEvent::PlaybackStarted => {
                self.set_state(PlayerState::Playing);
                if let Some(track_id) = self.current_track().map(|track| track.id.clone()) {
                    self.tracker.notify_play_started(&track_id);
                }
            }
            EngineEvent::Ended => self.on_ended(),
            EngineEvent::Error(err) => self.fail(err),
        }
    }

    /// Drain and apply backend events until none are left
    ///
    /// Returns the number of events processed.
    pub fn pump(&mut self) -> usize {
        let mut processed = 0;
        loop {
            let events = self.engine.drain_backend_events();
            if events.is_empty() {
                break;
            }
            for event in events {
                processed += 1;
                self.handle_backend_event(event);
            }
        }
        processed
    }

    /// Take queued player events
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ===== State Queries =====

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.engine.is_playing()
    }

    /// Position in seconds
    pub fn current_time(&self) -> f64 {
        self.engine.position()
    }

    /// Duration in seconds, `0.0` until known
    pub fn duration(&self) -> f64 {
        self.engine.duration()
    }

    pub fn volume(&self) -> f64 {
        self.engine.volume()
    }

    pub fn is_shuffling(&self) -> bool {
        self.modes.shuffle()
    }

    pub fn is_repeating(&self) -> bool {
        self.modes.repeat()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.active.and_then(|index| self.queue.get(index))
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn has_tracked_play(&self) -> bool {
        self.tracker.has_tracked_play()
    }

    /// Read-only access to the engine
    pub fn engine(&self) -> &PlaybackEngine<B> {
        &self.engine
    }

    /// Snapshot of the transport state
    pub fn transport(&self) -> TransportState {
        TransportState {
            is_playing: self.engine.is_playing(),
            current_time: self.engine.position(),
            duration: self.engine.duration(),
            volume: self.engine.volume(),
            is_shuffling: self.modes.shuffle(),
            is_repeating: self.modes.repeat(),
        }
    }

    // ===== Internal =====

    fn selection_origin(&self) -> Result<usize> {
        if self.queue.is_empty() {
            return Err(PlaybackError::EmptyQueue);
        }
        self.active.ok_or(PlaybackError::NoActiveTrack)
    }

    fn change_track(&mut self, index: usize, update: HistoryUpdate) -> Result<()> {
        let Some(track) = self.queue.get(index).cloned() else {
            return Err(PlaybackError::IndexOutOfBounds(index));
        };
        let previous_track_id = self.current_track().map(|track| track.id.clone());

        self.history = match update {
            HistoryUpdate::Push => self.history.push(index),
            HistoryUpdate::Replace(history) => history,
        };
        self.active = Some(index);
        self.tracker.reset();

        info!(index, track_id = %track.id, title = %track.title, "Track changed");
        self.emit(PlayerEvent::TrackChanged {
            index,
            track_id: track.id.clone(),
            previous_track_id,
        });
        self.set_state(PlayerState::Loading);

        let started = self
            .engine
            .load(&track)
            .and_then(|_| self.engine.play());
        if let Err(err) = started {
            self.fail(err.clone());
            return Err(err.into());
        }

        Ok(())
    }

    fn on_ended(&mut self) {
        let Some(track_id) = self.current_track().map(|track| track.id.clone()) else {
            return;
        };

        self.set_state(PlayerState::Ended);
        self.emit(PlayerEvent::TrackFinished { track_id });

        if self.modes.repeat() {
            debug!("Repeating current track");
            match self.engine.restart() {
                Ok(()) => self.set_state(PlayerState::Playing),
                Err(err) => self.fail(err),
            }
            return;
        }

        // Transport failures were already reported by change_track
        if let Err(err) = self.next() {
            debug!(error = %err, "Could not advance after track ended");
        }
    }

    fn apply_mode(&mut self, change: ModeChange) {
        let modes = self.modes.apply(change);
        if modes == self.modes {
            return;
        }

        self.modes = modes;
        debug!(shuffle = modes.shuffle(), repeat = modes.repeat(), "Play modes changed");
        self.emit(PlayerEvent::ModesChanged {
            shuffle: modes.shuffle(),
            repeat: modes.repeat(),
        });
    }

    fn fail(&mut self, err: TransportError) {
        warn!(error = %err, "Transport error");
        if self.active.is_some() {
            self.set_state(PlayerState::Paused);
        }
        self.emit(PlayerEvent::Error {
            message: err.to_string(),
        });
    }

    fn set_state(&mut self, state: PlayerState) {
        if self.state != state {
            self.state = state;
            self.emit(PlayerEvent::StateChanged { state });
        }
    }

    fn emit(&mut self, event: PlayerEvent) {
        self.pending_events.push(event);
    }
}

impl<B> std::fmt::Debug for PlayerController<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerController")
            .field("state", &self.state)
            .field("active", &self.active)
            .field("queue_len", &self.queue.len())
            .field("modes", &self.modes)
            .finish_non_exhaustive()
    }
}
