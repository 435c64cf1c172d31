//! Observable transport state

use serde::{Deserialize, Serialize};

/// Snapshot of the playback parameters a UI layer renders
///
/// Invariants: `0 <= volume <= 1`; `0 <= current_time <= duration` once
/// `duration` is known (it is `0.0` until metadata arrives); `is_shuffling`
/// and `is_repeating` are never both true.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransportState {
    pub is_playing: bool,
    pub current_time: f64,
    pub duration: f64,
    pub volume: f64,
    pub is_shuffling: bool,
    pub is_repeating: bool,
}

impl TransportState {
    /// Playback progress in `[0, 1]`, or 0 while duration is unknown
    pub fn progress(&self) -> f64 {
        if self.duration > 0.0 {
            (self.current_time / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Format seconds as `m:ss`
///
/// Non-finite or negative input renders as `0:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }

    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
