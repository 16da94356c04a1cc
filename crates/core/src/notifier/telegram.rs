//! Telegram Bot API notifier.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::TelegramConfig;

use super::{NotificationMessage, Notifier, NotifyError};

/// Sends messages through a bot's `sendMessage` method.
pub struct TelegramNotifier {
    client: Client,
    base_url: String,
    token: String,
}

impl TelegramNotifier {
    /// Create a notifier for the given bot token.
    pub fn new(config: &TelegramConfig, token: impl Into<String>) -> Result<Self, NotifyError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.base_url, self.token)
    }
}

impl fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, message: &NotificationMessage) -> Result<(), NotifyError> {
        let request = SendMessageRequest {
            chat_id: &message.chat_id,
            text: &message.text,
            parse_mode: &message.parse_mode,
        };

        let response = self
            .client
            .post(self.send_message_url())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let api: ApiResponse = response.json().await?;
        if !api.ok {
            return Err(NotifyError::Rejected(
                api.description
                    .unwrap_or_else(|| "no description".to_string()),
            ));
        }

        debug!(chat_id = %message.chat_id, "Telegram message sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn message() -> NotificationMessage {
        NotificationMessage {
            chat_id: "-100200".to_string(),
            text: "🚚 <b>Parcel tracking history</b>: <code>A1</code>".to_string(),
            parse_mode: "HTML".to_string(),
        }
    }

    fn notifier_for(server: &MockServer) -> TelegramNotifier {
        let config = TelegramConfig {
            base_url: server.uri(),
            ..TelegramConfig::default()
        };
        TelegramNotifier::new(&config, "123:abc").unwrap()
    }

    #[tokio::test]
    async fn test_send_posts_json_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .and(body_json(serde_json::json!({
                "chat_id": "-100200",
                "text": "🚚 <b>Parcel tracking history</b>: <code>A1</code>",
                "parse_mode": "HTML",
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})),
            )
            .expect(1)
            .mount(&server)
            .await;

        notifier_for(&server).send(&message()).await.unwrap();
    }

    #[tokio::test]
    async fn test_send_non_success_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .mount(&server)
            .await;

        let err = notifier_for(&server).send(&message()).await.unwrap_err();
        assert!(matches!(err, NotifyError::Api { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_send_rejected_by_api() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": false,
                "description": "Bad Request: chat not found"
            })))
            .mount(&server)
            .await;

        let err = notifier_for(&server).send(&message()).await.unwrap_err();
        match err {
            NotifyError::Rejected(description) => assert!(description.contains("chat not found")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_debug_redacts_token() {
        let notifier = TelegramNotifier::new(&TelegramConfig::default(), "secret-token").unwrap();
        let debug = format!("{:?}", notifier);
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("<redacted>"));
    }
}
