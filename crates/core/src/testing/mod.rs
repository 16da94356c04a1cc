//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the tracking service and
//! the messaging endpoint, allowing whole runs to be tested without
//! network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use tracknotify_core::testing::{fixtures, MockNotifier, MockTrackingClient};
//!
//! let tracking = Arc::new(MockTrackingClient::new());
//! let notifier = Arc::new(MockNotifier::new());
//!
//! tracking.set_body("A1", fixtures::success_body(&["Arrived"])).await;
//!
//! let pipeline = TrackingPipeline::new(PipelineConfig::default(), tracking, notifier.clone());
//! ```

mod mock_notifier;
mod mock_tracking_client;

pub use mock_notifier::MockNotifier;
pub use mock_tracking_client::MockTrackingClient;

/// Test fixtures and helper functions.
pub mod fixtures {
    use serde_json::json;

    use crate::tracking::{HistoryItem, RecordStatus, TrackingData, TrackingRecord, Warehouse};

    /// Create a history item without a batch.
    pub fn history_item(status_desc: &str, date: &str, warehouse: &str) -> HistoryItem {
        HistoryItem {
            status_desc: status_desc.to_string(),
            date: date.to_string(),
            warehouse: Warehouse {
                name: warehouse.to_string(),
            },
            batch: None,
        }
    }

    /// Create `count` items named "Status 1", "Status 2", ... on consecutive days.
    pub fn history_items(count: usize) -> Vec<HistoryItem> {
        (1..=count)
            .map(|i| {
                history_item(
                    &format!("Status {}", i),
                    &format!("2024-01-{:02}T10:00:00Z", i),
                    &format!("Warehouse {}", i),
                )
            })
            .collect()
    }

    /// A `success` record whose total matches its items.
    pub fn success_record(items: Vec<HistoryItem>) -> TrackingRecord {
        TrackingRecord {
            status: RecordStatus::Success,
            message: None,
            data: Some(TrackingData {
                total: items.len() as i64,
                list: items,
            }),
        }
    }

    /// Wire body with one item per status description.
    pub fn success_body(statuses: &[&str]) -> String {
        let list: Vec<_> = statuses
            .iter()
            .enumerate()
            .map(|(i, status)| {
                json!({
                    "status_desc": status,
                    "date": format!("2024-01-{:02}T10:00:00Z", i + 1),
                    "warehouse": { "name": format!("Hub{}", i + 1) },
                })
            })
            .collect();
        let total = list.len();

        json!({
            "status": "success",
            "data": { "total": total, "list": list },
        })
        .to_string()
    }

    /// Wire body for a `success` response with no items.
    pub fn empty_success_body() -> String {
        json!({
            "status": "success",
            "data": { "total": 0, "list": [] },
        })
        .to_string()
    }

    /// Wire body for a service-reported error.
    pub fn error_body(message: &str) -> String {
        json!({ "status": "error", "message": message }).to_string()
    }
}
