/// Interactive command parsing
use crate::error::CliError;
use std::str::FromStr;

/// A line of user input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Play,
    Pause,
    Toggle,
    Next,
    Previous,
    Seek(f64),
    Volume(f64),
    /// `None` toggles
    Shuffle(Option<bool>),
    /// `None` toggles
    Repeat(Option<bool>),
    Select(usize),
    /// Advance the simulated clock
    Tick(f64),
    Status,
    Queue,
    Close,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  play | pause | toggle        transport
  next | prev                  skip
  seek <secs>                  jump within the track
  vol <0..1>                   set volume
  shuffle [on|off]             toggle or set shuffle
  repeat [on|off]              toggle or set repeat-one
  select <n>                   play queue entry n (1-based)
  tick <secs>                  advance the simulated clock
  status | queue               show state
  close                        stop and hide the player
  quit";

impl FromStr for Command {
    type Err = CliError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Err(CliError::InvalidInput("empty input".to_string()));
        };
        let arg = words.next();

        let command = match name.to_ascii_lowercase().as_str() {
            "play" => Command::Play,
            "pause" => Command::Pause,
            "toggle" | "p" => Command::Toggle,
            "next" | "n" => Command::Next,
            "prev" | "previous" | "b" => Command::Previous,
            "seek" => Command::Seek(number(name, arg)?),
            "vol" | "volume" => Command::Volume(number(name, arg)?),
            "shuffle" => Command::Shuffle(switch(name, arg)?),
            "repeat" => Command::Repeat(switch(name, arg)?),
            "select" => {
                let position = number(name, arg)?;
                if position < 1.0 || position.fract() != 0.0 {
                    return Err(CliError::InvalidInput(format!(
                        "select expects a queue position from 1, got {}",
                        position
                    )));
                }
                Command::Select(position as usize - 1)
            }
            "tick" => Command::Tick(number(name, arg)?),
            "status" | "s" => Command::Status,
            "queue" | "q" => Command::Queue,
            "close" | "stop" => Command::Close,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(CliError::Command(other.to_string())),
        };

        Ok(command)
    }
}

fn number(name: &str, arg: Option<&str>) -> Result<f64, CliError> {
    arg.and_then(|value| value.parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .ok_or_else(|| CliError::InvalidInput(format!("{} expects a number", name)))
}

fn switch(name: &str, arg: Option<&str>) -> Result<Option<bool>, CliError> {
    match arg.map(str::to_ascii_lowercase).as_deref() {
        None => Ok(None),
        Some("on" | "true" | "1") => Ok(Some(true)),
        Some("off" | "false" | "0") => Ok(Some(false)),
        Some(other) => Err(CliError::InvalidInput(format!(
            "{} expects on or off, got {}",
            name, other
        ))),
    }
}
