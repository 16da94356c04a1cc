//! Remote tracking service integration.
//!
//! A fetch is split in two steps: `fetch_history` returns once the response
//! headers arrive, handing back a [`PendingBody`] that is read separately.
//! The pipeline awaits each step with its own settle-all barrier.

mod client;
mod types;

pub use client::HttpTrackingClient;
pub use types::*;

use std::fmt;
use std::future::Future;

use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::FutureExt;
use thiserror::Error;

/// Errors that can occur when talking to the tracking service.
#[derive(Debug, Clone, Error)]
pub enum TrackingError {
    /// Request did not complete in time.
    #[error("Tracking request timed out")]
    Timeout,

    /// Could not connect to the service.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Any other transport-level failure.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The response body could not be read.
    #[error("Failed to read response body: {0}")]
    Body(String),

    /// The body is not a valid tracking response.
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for TrackingError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TrackingError::Timeout
        } else if e.is_connect() {
            TrackingError::ConnectionFailed(e.to_string())
        } else {
            TrackingError::Http(e.to_string())
        }
    }
}

/// A response whose body has not been read yet.
pub struct PendingBody {
    inner: BoxFuture<'static, Result<String, TrackingError>>,
}

impl PendingBody {
    /// Wrap a body-reading future.
    pub fn new<F>(read: F) -> Self
    where
        F: Future<Output = Result<String, TrackingError>> + Send + 'static,
    {
        Self {
            inner: read.boxed(),
        }
    }

    /// A body that is already available.
    pub fn ready(body: impl Into<String>) -> Self {
        let body = body.into();
        Self::new(async move { Ok(body) })
    }

    /// A body whose read will fail.
    pub fn failed(error: TrackingError) -> Self {
        Self::new(async move { Err(error) })
    }

    /// Read the body to completion.
    pub async fn read(self) -> Result<String, TrackingError> {
        self.inner.await
    }
}

impl fmt::Debug for PendingBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingBody").finish_non_exhaustive()
    }
}

/// Client for the tracking service's history endpoint.
#[async_trait]
pub trait TrackingClient: Send + Sync {
    /// Request the history of one identifier.
    ///
    /// Succeeds as soon as the service answers, whatever the HTTP status:
    /// the service reports its own errors inside the body.
    async fn fetch_history(&self, id: &TrackingId) -> Result<PendingBody, TrackingError>;
}
