/// Interactive session over a simulated backend
use crate::commands::{Command, HELP};
use crate::error::Result;
use std::io::Write;
use tempo_playback::{
    format_time, PlayRecorder, PlaybackEngine, PlayerConfig, PlayerController, PlayerEvent,
    SimulatedBackend, SimulatedHandle, Track,
};
use tracing::debug;

/// Whether the input loop should keep reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// A controller plus the clock of its simulated backend
pub struct Session {
    player: PlayerController<SimulatedBackend>,
    clock: SimulatedHandle,
}

impl Session {
    pub fn new(
        tracks: Vec<Track>,
        recorder: impl PlayRecorder + 'static,
        config: PlayerConfig,
        default_duration: f64,
    ) -> Self {
        let (backend, clock) = SimulatedBackend::new(default_duration);
        let mut player = PlayerController::new(PlaybackEngine::new(backend), recorder, config);
        player.replace_queue(tracks);
        player.drain_events();

        Self { player, clock }
    }

    pub fn player(&self) -> &PlayerController<SimulatedBackend> {
        &self.player
    }

    pub fn clock(&self) -> &SimulatedHandle {
        &self.clock
    }

    /// Run one command and write what changed to `out`
    ///
    /// Playback errors are returned to the caller; they leave the session
    /// usable.
    pub fn execute(&mut self, command: Command, out: &mut impl Write) -> Result<Flow> {
        debug!(command = ?command, "Executing command");

        let result = self.apply(&command, out);
        self.player.pump();
        self.report(out)?;
        result?;

        if command == Command::Quit {
            return Ok(Flow::Quit);
        }
        Ok(Flow::Continue)
    }

    fn apply(&mut self, command: &Command, out: &mut impl Write) -> Result<()> {
        match command {
            Command::Play => self.player.play()?,
            Command::Pause => self.player.pause(),
            Command::Toggle => self.player.toggle_play()?,
            Command::Next => {
                self.player.next()?;
            }
            Command::Previous => {
                self.player.previous()?;
            }
            Command::Seek(seconds) => self.player.seek(*seconds),
            Command::Volume(volume) => self.player.set_volume(*volume),
            Command::Shuffle(None) => {
                self.player.toggle_shuffle();
            }
            Command::Shuffle(Some(on)) => self.player.set_shuffle(*on),
            Command::Repeat(None) => {
                self.player.toggle_repeat();
            }
            Command::Repeat(Some(on)) => self.player.set_repeat(*on),
            Command::Select(index) => self.player.select(*index)?,
            Command::Tick(seconds) => self.clock.advance(*seconds),
            Command::Status => writeln!(out, "{}", self.status_line())?,
            Command::Queue => self.write_queue(out)?,
            Command::Close => self.player.close(),
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Quit => self.player.close(),
        }
        Ok(())
    }

    /// One-line summary of the transport
    pub fn status_line(&self) -> String {
        let transport = self.player.transport();
        let track = match (self.player.active_index(), self.player.current_track()) {
            (Some(index), Some(track)) => {
                format!("[{}] {} - {}", index + 1, track.title, track.artist)
            }
            _ => "nothing selected".to_string(),
        };

        format!(
            "{:?} {} {}/{} vol {:.0}% shuffle:{} repeat:{}",
            self.player.state(),
            track,
            format_time(transport.current_time),
            format_time(transport.duration),
            transport.volume * 100.0,
            on_off(transport.is_shuffling),
            on_off(transport.is_repeating),
        )
    }

    fn write_queue(&self, out: &mut impl Write) -> Result<()> {
        let active = self.player.active_index();
        for (index, track) in self.player.queue().tracks().iter().enumerate() {
            let marker = if Some(index) == active { '>' } else { ' ' };
            writeln!(
                out,
                "{} {:>3}. {} - {}",
                marker,
                index + 1,
                track.title,
                track.artist
            )?;
        }
        Ok(())
    }

    fn report(&mut self, out: &mut impl Write) -> Result<()> {
        for event in self.player.drain_events() {
            if let Some(line) = self.describe(&event) {
                writeln!(out, "{}", line)?;
            }
        }
        Ok(())
    }

    fn describe(&self, event: &PlayerEvent) -> Option<String> {
        let line = match event {
            PlayerEvent::StateChanged { state } => format!("state: {:?}", state),
            PlayerEvent::TrackChanged { index, .. } => {
                let track = self.player.queue().get(*index)?;
                format!(
                    "now playing [{}] {} - {}",
                    index + 1,
                    track.title,
                    track.artist
                )
            }
            PlayerEvent::VolumeChanged { volume } => format!("volume: {:.0}%", volume * 100.0),
            PlayerEvent::ModesChanged { shuffle, repeat } => format!(
                "shuffle:{} repeat:{}",
                on_off(*shuffle),
                on_off(*repeat)
            ),
            PlayerEvent::TrackFinished { track_id } => format!("finished {}", track_id),
            PlayerEvent::ActiveIndexMoved { to, .. } => format!("active track now at {}", to + 1),
            PlayerEvent::Closed => "player closed".to_string(),
            PlayerEvent::Error { message } => format!("error: {}", message),
            PlayerEvent::DurationChanged { .. }
            | PlayerEvent::PositionUpdate { .. }
            | PlayerEvent::QueueChanged { .. } => return None,
        };
        Some(line)
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}
