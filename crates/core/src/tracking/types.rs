//! Types for the remote tracking service.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque tracking identifier supplied by the caller.
///
/// Accepts JSON strings and numbers; numbers keep their textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawTrackingId", into = "String")]
pub struct TrackingId(String);

impl TrackingId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrackingId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<TrackingId> for String {
    fn from(id: TrackingId) -> Self {
        id.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTrackingId {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawTrackingId> for TrackingId {
    fn from(raw: RawTrackingId) -> Self {
        match raw {
            RawTrackingId::Text(s) => Self(s),
            RawTrackingId::Number(n) => Self(n.to_string()),
        }
    }
}

/// Status reported by the tracking service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Success,
    Error,
    /// Anything else the service might send; rendered as header only.
    #[serde(other)]
    Unknown,
}

/// Decoded `history_items` response for one identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingRecord {
    pub status: RecordStatus,
    /// Service error text (present when `status` is `error`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<TrackingData>,
}

impl TrackingRecord {
    /// Total item count as reported by the service (0 when absent).
    pub fn total(&self) -> i64 {
        self.data.as_ref().map(|d| d.total).unwrap_or(0)
    }

    /// History items in the order the service returned them.
    pub fn items(&self) -> &[HistoryItem] {
        self.data.as_ref().map(|d| d.list.as_slice()).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingData {
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub list: Vec<HistoryItem>,
}

/// A single tracking event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub status_desc: String,
    /// ISO-8601-like timestamp, kept verbatim.
    pub date: String,
    pub warehouse: Warehouse,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch: Option<Batch>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warehouse {
    pub name: String,
}

/// Shipment batch an item travelled with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    #[serde(rename = "type")]
    pub kind: String,
    pub code: String,
}
