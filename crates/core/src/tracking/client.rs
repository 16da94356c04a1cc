//! HTTP tracking client backed by reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::TrackingConfig;

use super::{PendingBody, TrackingClient, TrackingError, TrackingId};

/// Tracking service client.
///
/// One instance is shared by every fetch of a run; reqwest pools
/// connections internally.
pub struct HttpTrackingClient {
    client: Client,
    base_url: String,
}

impl HttpTrackingClient {
    /// Create a new tracking client.
    pub fn new(config: &TrackingConfig) -> Result<Self, TrackingError> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build the history URL for an identifier.
    fn history_url(&self, id: &TrackingId) -> String {
        format!(
            "{}/{}/history_items",
            self.base_url,
            urlencoding::encode(id.as_str())
        )
    }
}

#[async_trait]
impl TrackingClient for HttpTrackingClient {
    async fn fetch_history(&self, id: &TrackingId) -> Result<PendingBody, TrackingError> {
        let url = self.history_url(id);
        debug!(id = %id, "Fetching tracking history");

        let response = self.client.get(&url).send().await?;

        debug!(id = %id, status = %response.status(), "Tracking service answered");

        Ok(PendingBody::new(async move {
            response
                .text()
                .await
                .map_err(|e| TrackingError::Body(e.to_string()))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> TrackingConfig {
        TrackingConfig {
            base_url: format!("{}/api/v1/public/order/", server.uri()),
            ..TrackingConfig::default()
        }
    }

    #[test]
    fn test_history_url_encodes_identifier() {
        let client = HttpTrackingClient::new(&TrackingConfig {
            base_url: "http://tracker.local/order/".to_string(),
            ..TrackingConfig::default()
        })
        .unwrap();

        assert_eq!(
            client.history_url(&TrackingId::new("AB 12/3")),
            "http://tracker.local/order/AB%2012%2F3/history_items"
        );
    }

    #[tokio::test]
    async fn test_fetch_history_sends_user_agent() {
        let server = MockServer::start().await;
        let config = config_for(&server);

        Mock::given(method("GET"))
            .and(path("/api/v1/public/order/UZ100/history_items"))
            .and(header("user-agent", config.user_agent.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status":"success"}"#))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpTrackingClient::new(&config).unwrap();
        let body = client
            .fetch_history(&TrackingId::new("UZ100"))
            .await
            .unwrap()
            .read()
            .await
            .unwrap();

        assert_eq!(body, r#"{"status":"success"}"#);
    }

    #[tokio::test]
    async fn test_fetch_history_keeps_error_status_bodies() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/public/order/MISSING/history_items"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_string(r#"{"status":"error","message":"Order not found"}"#),
            )
            .mount(&server)
            .await;

        let client = HttpTrackingClient::new(&config_for(&server)).unwrap();
        let body = client
            .fetch_history(&TrackingId::new("MISSING"))
            .await
            .unwrap()
            .read()
            .await
            .unwrap();

        assert!(body.contains("Order not found"));
    }

    #[tokio::test]
    async fn test_fetch_history_connection_refused() {
        // Nothing listens on port 9 (discard) in the test environment
        let client = HttpTrackingClient::new(&TrackingConfig {
            base_url: "http://127.0.0.1:9/order".to_string(),
            ..TrackingConfig::default()
        })
        .unwrap();

        let result = client.fetch_history(&TrackingId::new("X")).await;
        assert!(result.is_err());
    }
}
