//! Error types for the play-history client.

use thiserror::Error;

/// Errors that can occur when talking to the play-history API.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Server rejected the access token, or none was configured
    #[error("Authentication required")]
    AuthRequired,

    /// Invalid base URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),
}

/// Result type for play-history operations.
pub type Result<T> = std::result::Result<T, AnalyticsError>;
