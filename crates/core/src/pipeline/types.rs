//! Types shared by the pipeline stages.

use thiserror::Error;

use crate::notifier::NotifyError;
use crate::tracking::{PendingBody, TrackingError, TrackingId, TrackingRecord};

/// Result of fetching one identifier.
#[derive(Debug)]
pub enum FetchOutcome {
    Success { id: TrackingId, body: PendingBody },
    Failure { id: TrackingId, error: TrackingError },
}

impl FetchOutcome {
    pub fn id(&self) -> &TrackingId {
        match self {
            FetchOutcome::Success { id, .. } | FetchOutcome::Failure { id, .. } => id,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success { .. })
    }
}

/// A record that decoded successfully, paired with its identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRecord {
    pub id: TrackingId,
    pub record: TrackingRecord,
}

/// How many history items each message carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemLimit {
    /// Every item the service returned.
    All,
    /// At most this many items from the start of the list.
    First(usize),
}

impl ItemLimit {
    /// Sentinel meaning "no truncation".
    pub const UNLIMITED: i64 = -1;

    /// Parse the raw `last_x_items` input.
    ///
    /// `-1` means all items. Any other negative value renders no items.
    pub fn parse(raw: &str) -> Result<Self, RunError> {
        let value: i64 = raw.trim().parse().map_err(|_| {
            RunError::InvalidInput(format!(
                "last_x_items must be a numeric value, got {:?}",
                raw
            ))
        })?;
        Ok(Self::from(value))
    }
}

impl From<i64> for ItemLimit {
    fn from(value: i64) -> Self {
        if value == Self::UNLIMITED {
            ItemLimit::All
        } else {
            ItemLimit::First(usize::try_from(value).unwrap_or(0))
        }
    }
}

/// Validated input for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRequest {
    pub ids: Vec<TrackingId>,
    pub limit: ItemLimit,
    pub chat_id: String,
}

impl RunRequest {
    pub fn new(ids: Vec<TrackingId>, limit: ItemLimit, chat_id: impl Into<String>) -> Self {
        Self {
            ids,
            limit,
            chat_id: chat_id.into(),
        }
    }

    /// Validate raw invocation inputs.
    ///
    /// `data` must be a JSON array of strings or numbers and `last_x_items`
    /// an integer.
    pub fn parse(data: &str, last_x_items: &str, chat_id: &str) -> Result<Self, RunError> {
        let ids: Vec<TrackingId> = serde_json::from_str(data).map_err(|e| {
            RunError::InvalidInput(format!(
                "data must be a JSON array of tracking identifiers: {}",
                e
            ))
        })?;
        let limit = ItemLimit::parse(last_x_items)?;

        Ok(Self::new(ids, limit, chat_id))
    }
}

/// Aggregate outcome of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Identifiers in the batch.
    pub requested: usize,
    pub fetch_failures: usize,
    pub decode_failures: usize,
    /// Messages delivered.
    pub dispatched: usize,
    /// Failed sends tolerated under the `continue` policy.
    pub dispatch_failures: usize,
    /// The run reached the end of its dispatch phase.
    pub done: bool,
}

/// Errors that fail a whole run.
#[derive(Debug, Error)]
pub enum RunError {
    /// Invocation inputs were rejected before any network activity.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A notification could not be delivered.
    #[error("Failed to send notification for {id}: {source}")]
    Dispatch {
        id: TrackingId,
        #[source]
        source: NotifyError,
    },
}
