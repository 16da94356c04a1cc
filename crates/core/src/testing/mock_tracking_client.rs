//! Mock tracking client for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::tracking::{PendingBody, TrackingClient, TrackingError, TrackingId};

/// Scripted response for one identifier.
#[derive(Debug, Clone)]
enum MockResponse {
    Body(String),
    FetchError(TrackingError),
    BodyError(TrackingError),
}

/// Mock implementation of the TrackingClient trait.
///
/// Provides controllable behavior for testing:
/// - Return fixed bodies per identifier
/// - Fail the fetch or the body read of chosen identifiers
/// - Delay responses and observe how many requests overlap
///
/// Identifiers without a scripted response fail with `ConnectionFailed`.
///
/// # Example
///
/// ```rust,ignore
/// use tracknotify_core::testing::{MockTrackingClient, fixtures};
///
/// let client = MockTrackingClient::new();
/// client.set_body("A1", fixtures::success_body(&["Arrived"])).await;
/// client.fail_fetch("A2", TrackingError::Timeout).await;
/// ```
#[derive(Debug, Default)]
pub struct MockTrackingClient {
    responses: Arc<RwLock<HashMap<String, MockResponse>>>,
    delays: Arc<RwLock<HashMap<String, Duration>>>,
    /// Identifiers in the order their fetch was issued.
    calls: Arc<RwLock<Vec<TrackingId>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl MockTrackingClient {
    /// Create a new mock with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Response Configuration
    // =========================================================================

    /// Answer `id` with this body.
    pub async fn set_body(&self, id: &str, body: impl Into<String>) {
        self.responses
            .write()
            .await
            .insert(id.to_string(), MockResponse::Body(body.into()));
    }

    /// Make the fetch of `id` fail.
    pub async fn fail_fetch(&self, id: &str, error: TrackingError) {
        self.responses
            .write()
            .await
            .insert(id.to_string(), MockResponse::FetchError(error));
    }

    /// Let the fetch of `id` succeed but its body read fail.
    pub async fn fail_body(&self, id: &str, error: TrackingError) {
        self.responses
            .write()
            .await
            .insert(id.to_string(), MockResponse::BodyError(error));
    }

    /// Delay the fetch of `id`.
    pub async fn set_delay(&self, id: &str, delay: Duration) {
        self.delays.write().await.insert(id.to_string(), delay);
    }

    // =========================================================================
    // Call Recording
    // =========================================================================

    /// Identifiers fetched so far, in issue order.
    pub async fn recorded_calls(&self) -> Vec<TrackingId> {
        self.calls.read().await.clone()
    }

    /// Number of fetches issued.
    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }

    /// Highest number of fetches that were pending at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TrackingClient for MockTrackingClient {
    async fn fetch_history(&self, id: &TrackingId) -> Result<PendingBody, TrackingError> {
        self.calls.write().await.push(id.clone());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = self.delays.read().await.get(id.as_str()).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let response = self.responses.read().await.get(id.as_str()).cloned();
        match response {
            Some(MockResponse::Body(body)) => Ok(PendingBody::ready(body)),
            Some(MockResponse::BodyError(error)) => Ok(PendingBody::failed(error)),
            Some(MockResponse::FetchError(error)) => Err(error),
            None => Err(TrackingError::ConnectionFailed(format!(
                "no mock response for {}",
                id
            ))),
        }
    }
}
