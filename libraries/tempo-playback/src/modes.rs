//! Shuffle and repeat flags
//!
//! Shuffle and repeat-one are mutually exclusive. All changes go through
//! [`PlayModes::apply`], which is the only place that invariant is enforced.

use serde::{Deserialize, Serialize};

/// A requested change to the play modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeChange {
    ToggleShuffle,
    ToggleRepeat,
    SetShuffle(bool),
    SetRepeat(bool),
}

/// Shuffle/repeat flags; never both true
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlayModes {
    shuffle: bool,
    repeat: bool,
}

impl PlayModes {
    /// Build modes from initial flags
    ///
    /// If both are requested, shuffle wins.
    pub fn new(shuffle: bool, repeat: bool) -> Self {
        Self::default()
            .apply(ModeChange::SetRepeat(repeat))
            .apply(ModeChange::SetShuffle(shuffle))
    }

    /// Apply a change and return the resulting modes
    #[must_use]
    pub fn apply(self, change: ModeChange) -> Self {
        let (shuffle, repeat) = match change {
            ModeChange::ToggleShuffle => (!self.shuffle, self.repeat),
            ModeChange::ToggleRepeat => (self.shuffle, !self.repeat),
            ModeChange::SetShuffle(on) => (on, self.repeat),
            ModeChange::SetRepeat(on) => (self.shuffle, on),
        };

        match change {
            ModeChange::ToggleShuffle | ModeChange::SetShuffle(_) if shuffle => Self {
                shuffle: true,
                repeat: false,
            },
            ModeChange::ToggleRepeat | ModeChange::SetRepeat(_) if repeat => Self {
                shuffle: false,
                repeat: true,
            },
            _ => Self { shuffle, repeat },
        }
    }

    pub fn shuffle(self) -> bool {
        self.shuffle
    }

    pub fn repeat(self) -> bool {
        self.repeat
    }
}
