//! Mock notifier for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::notifier::{NotificationMessage, Notifier, NotifyError};

/// Mock implementation of the Notifier trait.
///
/// Messages are matched by a substring of their text, which lets tests
/// target a tracking identifier through its `<code>` header.
#[derive(Debug, Default)]
pub struct MockNotifier {
    /// Messages that were delivered.
    sent: Arc<RwLock<Vec<NotificationMessage>>>,
    attempts: Arc<AtomicUsize>,
    failures: Arc<RwLock<Vec<(String, NotifyError)>>>,
    delays: Arc<RwLock<Vec<(String, Duration)>>>,
}

impl MockNotifier {
    /// Create a new mock that accepts every message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail sends whose text contains `needle`.
    pub async fn fail_when_text_contains(&self, needle: &str, error: NotifyError) {
        self.failures.write().await.push((needle.to_string(), error));
    }

    /// Delay sends whose text contains `needle`.
    pub async fn delay_when_text_contains(&self, needle: &str, delay: Duration) {
        self.delays.write().await.push((needle.to_string(), delay));
    }

    /// Delivered messages, in completion order.
    pub async fn sent_messages(&self) -> Vec<NotificationMessage> {
        self.sent.read().await.clone()
    }

    /// Number of sends started, delivered or not.
    pub fn attempt_count(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send(&self, message: &NotificationMessage) -> Result<(), NotifyError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        let delay = self
            .delays
            .read()
            .await
            .iter()
            .find(|(needle, _)| message.text.contains(needle.as_str()))
            .map(|(_, delay)| *delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let failure = self
            .failures
            .read()
            .await
            .iter()
            .find(|(needle, _)| message.text.contains(needle.as_str()))
            .map(|(_, error)| error.clone());
        if let Some(error) = failure {
            return Err(error);
        }

        self.sent.write().await.push(message.clone());
        Ok(())
    }
}
