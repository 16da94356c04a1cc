//! Body decoding stage.

use std::time::Duration;

use tracing::{debug, warn};

use crate::tracking::{PendingBody, TrackingError, TrackingId, TrackingRecord};

use super::settle::settle_all;
use super::types::{DecodedRecord, FetchOutcome};

/// Reads and decodes the bodies of successful fetches.
pub struct RecordParser {
    task_timeout: Option<Duration>,
}

impl RecordParser {
    pub fn new(task_timeout: Option<Duration>) -> Self {
        Self { task_timeout }
    }

    /// Parse a response body as a tracking record.
    pub fn parse(body: &str) -> Result<TrackingRecord, TrackingError> {
        serde_json::from_str(body).map_err(|e| TrackingError::Parse(e.to_string()))
    }

    /// Decode every successful outcome; failed fetches are skipped.
    ///
    /// Bodies are read concurrently and one bad body never affects another.
    /// Identifiers whose body cannot be read or parsed are dropped.
    pub async fn decode_all(&self, outcomes: Vec<FetchOutcome>) -> Vec<DecodedRecord> {
        let pending: Vec<(TrackingId, PendingBody)> = outcomes
            .into_iter()
            .filter_map(|outcome| match outcome {
                FetchOutcome::Success { id, body } => Some((id, body)),
                FetchOutcome::Failure { .. } => None,
            })
            .collect();

        debug!(count = pending.len(), "Decoding response bodies");

        let (ids, bodies): (Vec<_>, Vec<_>) = pending.into_iter().unzip();
        let reads = bodies.into_iter().map(PendingBody::read);
        let results = settle_all(reads, self.task_timeout).await;

        ids.into_iter()
            .zip(results)
            .filter_map(|(id, result)| {
                let decoded = result
                    .map_err(|_| TrackingError::Timeout)
                    .and_then(|read| read)
                    .and_then(|body| Self::parse(&body));

                match decoded {
                    Ok(record) => Some(DecodedRecord { id, record }),
                    Err(error) => {
                        warn!(id = %id, error = %error, "Dropping undecodable tracking response");
                        None
                    }
                }
            })
            .collect()
    }
}
