//! Concurrent notification delivery.

use std::sync::Arc;
use std::time::Duration;

use futures::future::try_join_all;
use tracing::{debug, error};

use crate::config::DispatchFailurePolicy;
use crate::notifier::{NotificationMessage, Notifier, NotifyError};
use crate::tracking::TrackingId;

use super::settle::{guard, settle_all};
use super::types::RunError;

/// Counts from a dispatch phase that ran to completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub dispatched: usize,
    pub failed: usize,
}

/// Sends every message at once, without ordering between identifiers.
pub struct NotificationDispatcher {
    notifier: Arc<dyn Notifier>,
    policy: DispatchFailurePolicy,
    task_timeout: Option<Duration>,
}

impl NotificationDispatcher {
    pub fn new(
        notifier: Arc<dyn Notifier>,
        policy: DispatchFailurePolicy,
        task_timeout: Option<Duration>,
    ) -> Self {
        Self {
            notifier,
            policy,
            task_timeout,
        }
    }

    /// Send all messages, applying the configured failure policy.
    ///
    /// Under `AbortRun` the first failure is returned immediately and any
    /// sends still in flight are dropped.
    pub async fn dispatch_all(
        &self,
        messages: &[(TrackingId, NotificationMessage)],
    ) -> Result<DispatchReport, RunError> {
        debug!(count = messages.len(), policy = ?self.policy, "Dispatching notifications");

        match self.policy {
            DispatchFailurePolicy::AbortRun => self.dispatch_or_abort(messages).await,
            DispatchFailurePolicy::Continue => Ok(self.dispatch_settled(messages).await),
        }
    }

    async fn dispatch_or_abort(
        &self,
        messages: &[(TrackingId, NotificationMessage)],
    ) -> Result<DispatchReport, RunError> {
        let sends = messages.iter().map(|(id, message)| async move {
            self.send_one(message).await.map_err(|source| {
                error!(id = %id, error = %source, "Notification dispatch failed, aborting run");
                RunError::Dispatch {
                    id: id.clone(),
                    source,
                }
            })
        });

        try_join_all(sends).await?;

        Ok(DispatchReport {
            dispatched: messages.len(),
            failed: 0,
        })
    }

    async fn dispatch_settled(
        &self,
        messages: &[(TrackingId, NotificationMessage)],
    ) -> DispatchReport {
        let sends = messages.iter().map(|(_, message)| self.send_one(message));
        let results = settle_all(sends, None).await;

        let mut report = DispatchReport::default();
        for ((id, _), result) in messages.iter().zip(results) {
            match result.map_err(|_| NotifyError::Timeout).and_then(|sent| sent) {
                Ok(()) => report.dispatched += 1,
                Err(e) => {
                    error!(id = %id, error = %e, "Notification dispatch failed");
                    report.failed += 1;
                }
            }
        }
        report
    }

    async fn send_one(&self, message: &NotificationMessage) -> Result<(), NotifyError> {
        guard(self.notifier.send(message), self.task_timeout)
            .await
            .map_err(|_| NotifyError::Timeout)
            .and_then(|sent| sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockNotifier;
    use std::time::Instant;

    fn message(id: &str) -> (TrackingId, NotificationMessage) {
        (
            TrackingId::new(id),
            NotificationMessage {
                chat_id: "42".to_string(),
                text: format!("<code>{}</code>", id),
                parse_mode: "HTML".to_string(),
            },
        )
    }

    #[tokio::test]
    async fn test_dispatch_all_sends_every_message() {
        let notifier = Arc::new(MockNotifier::new());
        let dispatcher =
            NotificationDispatcher::new(notifier.clone(), DispatchFailurePolicy::AbortRun, None);

        let report = dispatcher
            .dispatch_all(&[message("A"), message("B")])
            .await
            .unwrap();

        assert_eq!(report.dispatched, 2);
        assert_eq!(notifier.sent_messages().await.len(), 2);
    }

    #[tokio::test]
    async fn test_abort_policy_fails_run_without_waiting_for_siblings() {
        let notifier = Arc::new(MockNotifier::new());
        notifier
            .fail_when_text_contains("<code>B</code>", NotifyError::Rejected("blocked".to_string()))
            .await;
        notifier
            .delay_when_text_contains("<code>C</code>", Duration::from_secs(5))
            .await;
        let dispatcher =
            NotificationDispatcher::new(notifier.clone(), DispatchFailurePolicy::AbortRun, None);

        let start = Instant::now();
        let err = dispatcher
            .dispatch_all(&[message("A"), message("B"), message("C")])
            .await
            .unwrap_err();

        assert!(start.elapsed() < Duration::from_secs(2));
        match err {
            RunError::Dispatch { id, source } => {
                assert_eq!(id.as_str(), "B");
                assert!(matches!(source, NotifyError::Rejected(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
        let sent: Vec<String> = notifier
            .sent_messages()
            .await
            .into_iter()
            .map(|m| m.text)
            .collect();
        assert!(!sent.contains(&"<code>C</code>".to_string()));
    }

    #[tokio::test]
    async fn test_abort_policy_does_not_wait_for_earlier_slow_send() {
        let notifier = Arc::new(MockNotifier::new());
        notifier
            .delay_when_text_contains("<code>A</code>", Duration::from_secs(5))
            .await;
        notifier
            .fail_when_text_contains("<code>B</code>", NotifyError::Rejected("blocked".to_string()))
            .await;
        let dispatcher =
            NotificationDispatcher::new(notifier.clone(), DispatchFailurePolicy::AbortRun, None);

        let start = Instant::now();
        let err = dispatcher
            .dispatch_all(&[message("A"), message("B")])
            .await
            .unwrap_err();

        assert!(start.elapsed() < Duration::from_secs(1));
        assert!(matches!(err, RunError::Dispatch { ref id, .. } if id.as_str() == "B"));
        assert_eq!(notifier.attempt_count(), 2);
        assert!(notifier.sent_messages().await.is_empty());
    }

    #[tokio::test]
    async fn test_continue_policy_counts_failures() {
        let notifier = Arc::new(MockNotifier::new());
        notifier
            .fail_when_text_contains("<code>A</code>", NotifyError::Timeout)
            .await;
        let dispatcher =
            NotificationDispatcher::new(notifier.clone(), DispatchFailurePolicy::Continue, None);

        let report = dispatcher
            .dispatch_all(&[message("A"), message("B"), message("C")])
            .await
            .unwrap();

        assert_eq!(
            report,
            DispatchReport {
                dispatched: 2,
                failed: 1
            }
        );
    }

    #[tokio::test]
    async fn test_task_timeout_counts_as_dispatch_failure() {
        let notifier = Arc::new(MockNotifier::new());
        notifier
            .delay_when_text_contains("<code>A</code>", Duration::from_secs(5))
            .await;
        let dispatcher = NotificationDispatcher::new(
            notifier,
            DispatchFailurePolicy::AbortRun,
            Some(Duration::from_millis(50)),
        );

        let err = dispatcher.dispatch_all(&[message("A")]).await.unwrap_err();
        assert!(matches!(
            err,
            RunError::Dispatch {
                source: NotifyError::Timeout,
                ..
            }
        ));
    }
}
