//! Fire-and-forget play recorder backed by [`PlayHistoryClient`].

use crate::client::PlayHistoryClient;
use crate::types::PlayReceipt;
use std::sync::Arc;
use tempo_playback::{PlayRecorder, RecordError, TrackId};
use tokio::runtime::Handle;
use tracing::{debug, warn};

/// [`PlayRecorder`] that sends each play to the music API in the background.
///
/// `record_play` returns as soon as the request is spawned onto the
/// runtime; delivery failures are only logged. There is no retry.
#[derive(Debug, Clone)]
pub struct HttpPlayRecorder {
    client: Arc<PlayHistoryClient>,
    runtime: Handle,
}

impl HttpPlayRecorder {
    pub fn new(client: PlayHistoryClient, runtime: Handle) -> Self {
        Self {
            client: Arc::new(client),
            runtime,
        }
    }

    pub fn client(&self) -> &PlayHistoryClient {
        &self.client
    }
}

impl PlayRecorder for HttpPlayRecorder {
    fn record_play(&self, track_id: &TrackId) -> Result<(), RecordError> {
        if !self.client.is_authenticated() {
            return Err(RecordError::Unavailable("no access token configured".into()));
        }

        let client = Arc::clone(&self.client);
        let track_id = track_id.clone();

        self.runtime.spawn(async move {
            match client.record_play(&track_id).await {
                Ok(PlayReceipt::Recorded { total_plays }) => {
                    debug!(track_id = %track_id, total_plays = ?total_plays, "Play recorded");
                }
                Ok(PlayReceipt::Duplicate) => {
                    debug!(track_id = %track_id, "Play already recorded recently");
                }
                Err(e) => {
                    warn!(track_id = %track_id, error = %e, "Failed to record play");
                }
            }
        });

        Ok(())
    }
}
