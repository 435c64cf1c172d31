//! Tempo CLI Library
//!
//! Headless harness for the Tempo playback controller: loads a track list,
//! drives the controller against the simulated backend from text commands,
//! and optionally reports plays to the music API.
//!
//! This library exposes the core components for testing purposes.

pub mod commands;
pub mod config;
pub mod error;
pub mod library;
pub mod session;

// Re-export commonly used types for convenience
pub use commands::Command;
pub use config::CliConfig;
pub use error::{CliError, Result};
pub use session::{Flow, Session};
