//! Deterministic in-memory audio backend
//!
//! Stands in for a real media element in tests and headless runs. The
//! backend half is handed to the engine; the [`SimulatedHandle`] half stays
//! with the host and plays the role of the outside world (clock, network,
//! autoplay policy). Both share state on one thread.

use crate::backend::{AudioBackend, BackendEvent, BackendEventKind, Generation};
use crate::error::TransportError;
use crate::types::MediaRef;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

/// A command received by the simulated backend
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCommand {
    Bind { ticket: Generation, media: MediaRef },
    Start { ticket: Generation },
    Pause,
    Stop,
    SetPosition(f64),
    SetGain(f64),
}

#[derive(Debug)]
struct SimState {
    ticket: Option<Generation>,
    media: Option<MediaRef>,
    position: f64,
    duration: f64,
    gain: f64,
    running: bool,
    default_duration: f64,
    durations: HashMap<MediaRef, f64>,
    failing: HashSet<MediaRef>,
    blocked_start: Option<String>,
    outbox: VecDeque<BackendEvent>,
    commands: Vec<BackendCommand>,
}

impl SimState {
    fn raise(&mut self, kind: BackendEventKind) {
        if let Some(ticket) = self.ticket {
            self.outbox.push_back(BackendEvent::new(ticket, kind));
        }
    }
}

/// Backend half, owned by the playback engine
#[derive(Debug)]
pub struct SimulatedBackend {
    state: Rc<RefCell<SimState>>,
}

/// Host half, used to drive time and inspect commands
#[derive(Debug, Clone)]
pub struct SimulatedHandle {
    state: Rc<RefCell<SimState>>,
}

impl SimulatedBackend {
    /// Create a backend whose media all last `default_duration` seconds
    /// unless overridden through the handle
    pub fn new(default_duration: f64) -> (Self, SimulatedHandle) {
        let state = Rc::new(RefCell::new(SimState {
            ticket: None,
            media: None,
            position: 0.0,
            duration: 0.0,
            gain: 1.0,
            running: false,
            default_duration: default_duration.max(0.0),
            durations: HashMap::new(),
            failing: HashSet::new(),
            blocked_start: None,
            outbox: VecDeque::new(),
            commands: Vec::new(),
        }));

        (
            Self {
                state: Rc::clone(&state),
            },
            SimulatedHandle { state },
        )
    }
}

impl AudioBackend for SimulatedBackend {
    fn bind(&mut self, ticket: Generation, media: &MediaRef) -> Result<(), TransportError> {
        let mut state = self.state.borrow_mut();
        state.commands.push(BackendCommand::Bind {
            ticket,
            media: media.clone(),
        });

        state.ticket = Some(ticket);
        state.media = Some(media.clone());
        state.position = 0.0;
        state.running = false;

        if state.failing.contains(media) {
            state.duration = 0.0;
            state.raise(BackendEventKind::Failed {
                reason: format!("unable to load {media}"),
            });
        } else {
            let duration = state
                .durations
                .get(media)
                .copied()
                .unwrap_or(state.default_duration);
            state.duration = duration;
            state.raise(BackendEventKind::MetadataLoaded { duration });
        }

        Ok(())
    }

    fn start(&mut self, ticket: Generation) -> Result<(), TransportError> {
        let mut state = self.state.borrow_mut();
        state.commands.push(BackendCommand::Start { ticket });

        if state.ticket != Some(ticket) || state.media.is_none() {
            return Err(TransportError::NothingLoaded);
        }

        match state.blocked_start.take() {
            Some(reason) => state.raise(BackendEventKind::StartFailed { reason }),
            None => {
                state.running = true;
                state.raise(BackendEventKind::Started);
            }
        }

        Ok(())
    }

    fn pause(&mut self) {
        let mut state = self.state.borrow_mut();
        state.commands.push(BackendCommand::Pause);
        state.running = false;
    }

    fn stop(&mut self) {
        let mut state = self.state.borrow_mut();
        state.commands.push(BackendCommand::Stop);
        state.ticket = None;
        state.media = None;
        state.position = 0.0;
        state.duration = 0.0;
        state.running = false;
    }

    fn set_position(&mut self, seconds: f64) {
        let mut state = self.state.borrow_mut();
        state.commands.push(BackendCommand::SetPosition(seconds));
        state.position = seconds;
    }

    fn set_gain(&mut self, gain: f64) {
        let mut state = self.state.borrow_mut();
        state.commands.push(BackendCommand::SetGain(gain));
        state.gain = gain;
    }

    fn drain_events(&mut self) -> Vec<BackendEvent> {
        self.state.borrow_mut().outbox.drain(..).collect()
    }
}

impl SimulatedHandle {
    /// Advance the virtual clock by `seconds`
    ///
    /// Raises a time update, plus `Ended` when the media runs out.
    pub fn advance(&self, seconds: f64) {
        let mut state = self.state.borrow_mut();
        if !state.running || !seconds.is_finite() || seconds <= 0.0 {
            return;
        }

        state.position += seconds;
        if state.duration > 0.0 && state.position >= state.duration {
            state.position = state.duration;
            state.running = false;
            let position = state.position;
            state.raise(BackendEventKind::TimeUpdate { position });
            state.raise(BackendEventKind::Ended);
        } else {
            let position = state.position;
            state.raise(BackendEventKind::TimeUpdate { position });
        }
    }

    /// Override the duration reported for `media`
    pub fn set_duration(&self, media: impl Into<String>, seconds: f64) {
        self.state
            .borrow_mut()
            .durations
            .insert(MediaRef::new(media), seconds);
    }

    /// Make every future bind of `media` fail
    pub fn fail_media(&self, media: impl Into<String>) {
        self.state
            .borrow_mut()
            .failing
            .insert(MediaRef::new(media));
    }

    /// Refuse the next start request with `reason`
    pub fn block_next_start(&self, reason: impl Into<String>) {
        self.state.borrow_mut().blocked_start = Some(reason.into());
    }

    /// Raise an arbitrary event for the currently bound media
    pub fn emit(&self, kind: BackendEventKind) {
        self.state.borrow_mut().raise(kind);
    }

    /// Commands received so far
    pub fn commands(&self) -> Vec<BackendCommand> {
        self.state.borrow().commands.clone()
    }

    /// Number of binds received so far
    pub fn bind_count(&self) -> usize {
        self.state
            .borrow()
            .commands
            .iter()
            .filter(|command| matches!(command, BackendCommand::Bind { .. }))
            .count()
    }

    pub fn clear_commands(&self) {
        self.state.borrow_mut().commands.clear();
    }

    pub fn position(&self) -> f64 {
        self.state.borrow().position
    }

    pub fn gain(&self) -> f64 {
        self.state.borrow().gain
    }

    pub fn is_running(&self) -> bool {
        self.state.borrow().running
    }

    pub fn current_ticket(&self) -> Option<Generation> {
        self.state.borrow().ticket
    }

    pub fn bound_media(&self) -> Option<MediaRef> {
        self.state.borrow().media.clone()
    }

    /// Number of events waiting to be drained
    pub fn pending_events(&self) -> usize {
        self.state.borrow().outbox.len()
    }
}
