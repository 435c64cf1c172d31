//! Play-history API client.

use crate::error::{AnalyticsError, Result};
use crate::types::{AnalyticsConfig, ErrorBody, PlayReceipt, PlayResponse};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tempo_playback::TrackId;
use tracing::debug;
use url::Url;

/// Client for the play-history endpoint of the music API.
///
/// # Example
///
/// ```ignore
/// use tempo_analytics::{AnalyticsConfig, PlayHistoryClient};
///
/// let config = AnalyticsConfig::with_token("https://music.example.com", "token");
/// let client = PlayHistoryClient::new(config)?;
///
/// let receipt = client.record_play(&"song-1".into()).await?;
/// println!("{receipt:?}");
/// ```
#[derive(Debug, Clone)]
pub struct PlayHistoryClient {
    http: Client,
    base_url: Url,
    access_token: Option<String>,
}

impl PlayHistoryClient {
    /// Create a new client with the given configuration.
    pub fn new(config: AnalyticsConfig) -> Result<Self> {
        if config.base_url.is_empty() {
            return Err(AnalyticsError::InvalidUrl("URL cannot be empty".into()));
        }

        let trimmed = config.base_url.trim_end_matches('/');
        if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
            return Err(AnalyticsError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let base_url =
            Url::parse(trimmed).map_err(|e| AnalyticsError::InvalidUrl(e.to_string()))?;

        let http = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(Duration::from_secs(5))
            .user_agent(format!("TempoPlayer/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            access_token: config.access_token.filter(|token| !token.is_empty()),
        })
    }

    /// Base URL, without trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Check if the client has an access token.
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// Endpoint URL for reporting a play of `track_id`.
    ///
    /// The id is percent-encoded as a single path segment.
    pub fn play_url(&self, track_id: &TrackId) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| AnalyticsError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["api", "songs", track_id.as_str(), "play"]);
        Ok(url)
    }

    /// Report that the current user played `track_id`.
    ///
    /// The server deduplicates plays of the same track within a short
    /// window and answers those with [`PlayReceipt::Duplicate`].
    pub async fn record_play(&self, track_id: &TrackId) -> Result<PlayReceipt> {
        let url = self.play_url(track_id)?;
        debug!(url = %url, track_id = %track_id, "Recording play");

        let mut request = self.http.post(url);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                AnalyticsError::ServerUnreachable(e.to_string())
            } else {
                AnalyticsError::Request(e)
            }
        })?;

        let status = response.status();

        if status.is_success() {
            let body: PlayResponse = response.json().await.map_err(|e| {
                AnalyticsError::ParseError(format!("Failed to parse play response: {}", e))
            })?;
            let receipt = body.into_receipt();

            debug!(track_id = %track_id, status = status.as_u16(), receipt = ?receipt, "Play accepted");
            Ok(receipt)
        } else if status == StatusCode::UNAUTHORIZED {
            Err(AnalyticsError::AuthRequired)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ErrorBody>(&error_text) {
                Ok(body) => {
                    debug!(code = ?body.code, "Play rejected");
                    body.error
                }
                Err(_) => error_text,
            };

            Err(AnalyticsError::ServerError {
                status: status.as_u16(),
                message,
            })
        }
    }
}
