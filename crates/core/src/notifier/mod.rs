//! Notification delivery.

mod telegram;

pub use telegram::TelegramNotifier;

use async_trait::async_trait;
use thiserror::Error;

/// One outbound notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    /// Destination chat.
    pub chat_id: String,
    /// Formatted message text.
    pub text: String,
    /// Markup mode the text is written in (e.g. `HTML`).
    pub parse_mode: String,
}

/// Errors that can occur when sending a notification.
#[derive(Debug, Clone, Error)]
pub enum NotifyError {
    #[error("Notification send timed out")]
    Timeout,

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Endpoint answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Endpoint accepted the request but refused the message.
    #[error("Message rejected: {0}")]
    Rejected(String),
}

impl From<reqwest::Error> for NotifyError {
    fn from(e: reqwest::Error) -> Self {
        // The request URL embeds the bot token.
        let e = e.without_url();
        if e.is_timeout() {
            NotifyError::Timeout
        } else if e.is_connect() {
            NotifyError::ConnectionFailed(e.to_string())
        } else {
            NotifyError::Http(e.to_string())
        }
    }
}

/// Messaging endpoint.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one message.
    async fn send(&self, message: &NotificationMessage) -> Result<(), NotifyError>;
}
