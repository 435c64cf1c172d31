//! Tempo Player Analytics
//!
//! Client for the music API's play-history endpoint.
//!
//! # Features
//!
//! - **Play reporting**: `POST /api/songs/{id}/play` with bearer auth
//! - **Duplicate detection**: the server's recent-play window is surfaced as
//!   [`PlayReceipt::Duplicate`]
//! - **Background recording**: [`HttpPlayRecorder`] plugs into the playback
//!   controller and never blocks it
//!
//! # Example
//!
//! ```ignore
//! use tempo_analytics::{AnalyticsConfig, HttpPlayRecorder, PlayHistoryClient};
//!
//! let runtime = tokio::runtime::Runtime::new()?;
//! let client = PlayHistoryClient::new(AnalyticsConfig::with_token(
//!     "https://music.example.com",
//!     "token",
//! ))?;
//!
//! // Hand this to `PlayerController::new`
//! let recorder = HttpPlayRecorder::new(client, runtime.handle().clone());
//! ```

mod client;
mod error;
mod recorder;
mod types;

// Re-export main types
pub use client::PlayHistoryClient;
pub use error::{AnalyticsError, Result};
pub use recorder::HttpPlayRecorder;
pub use types::{AnalyticsConfig, PlayReceipt, DEFAULT_TIMEOUT_SECS};
