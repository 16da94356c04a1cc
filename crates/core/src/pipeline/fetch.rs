//! Concurrent fetch stage.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::tracking::{TrackingClient, TrackingError, TrackingId};

use super::settle::settle_all;
use super::types::FetchOutcome;

/// Issues one tracking request per identifier, all at once.
pub struct FetchCoordinator {
    client: Arc<dyn TrackingClient>,
    task_timeout: Option<Duration>,
}

impl FetchCoordinator {
    pub fn new(client: Arc<dyn TrackingClient>, task_timeout: Option<Duration>) -> Self {
        Self {
            client,
            task_timeout,
        }
    }

    /// Fetch every identifier and wait for all of them to settle.
    ///
    /// Returns exactly one outcome per identifier, in input order.
    pub async fn fetch_all(&self, ids: &[TrackingId]) -> Vec<FetchOutcome> {
        debug!(count = ids.len(), "Starting concurrent fetch");

        let requests = ids.iter().map(|id| self.client.fetch_history(id));
        let results = settle_all(requests, self.task_timeout).await;

        ids.iter()
            .zip(results)
            .map(|(id, result)| {
                match result
                    .map_err(|_| TrackingError::Timeout)
                    .and_then(|fetched| fetched)
                {
                    Ok(body) => FetchOutcome::Success {
                        id: id.clone(),
                        body,
                    },
                    Err(error) => {
                        warn!(id = %id, error = %error, "Tracking fetch failed");
                        FetchOutcome::Failure {
                            id: id.clone(),
                            error,
                        }
                    }
                }
            })
            .collect()
    }
}
