//! Top-level run orchestration.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::config::{PipelineConfig, DEFAULT_PARSE_MODE};
use crate::notifier::{NotificationMessage, Notifier};
use crate::tracking::TrackingClient;

use super::dispatch::NotificationDispatcher;
use super::fetch::FetchCoordinator;
use super::format::MessageFormatter;
use super::parse::RecordParser;
use super::types::{RunError, RunRequest, RunSummary};

/// Fetch → decode → format → dispatch, once per invocation.
///
/// The pipeline never exits the process; fatal conditions come back as
/// [`RunError`] for the caller to act on.
pub struct TrackingPipeline {
    config: PipelineConfig,
    tracking: Arc<dyn TrackingClient>,
    notifier: Arc<dyn Notifier>,
    parse_mode: String,
}

impl TrackingPipeline {
    pub fn new(
        config: PipelineConfig,
        tracking: Arc<dyn TrackingClient>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            tracking,
            notifier,
            parse_mode: DEFAULT_PARSE_MODE.to_string(),
        }
    }

    /// Override the markup mode sent with each message.
    pub fn with_parse_mode(mut self, parse_mode: impl Into<String>) -> Self {
        self.parse_mode = parse_mode.into();
        self
    }

    fn task_timeout(&self) -> Option<Duration> {
        self.config.task_timeout_secs.map(Duration::from_secs)
    }

    /// Validate raw invocation inputs, then run.
    ///
    /// Invalid inputs fail before any request is issued.
    pub async fn run_raw(
        &self,
        data: &str,
        last_x_items: &str,
        chat_id: &str,
    ) -> Result<RunSummary, RunError> {
        let request = RunRequest::parse(data, last_x_items, chat_id)?;
        self.run(&request).await
    }

    /// Process one identifier batch.
    pub async fn run(&self, request: &RunRequest) -> Result<RunSummary, RunError> {
        let task_timeout = self.task_timeout();
        info!(count = request.ids.len(), limit = ?request.limit, "Starting tracking run");

        let outcomes = FetchCoordinator::new(Arc::clone(&self.tracking), task_timeout)
            .fetch_all(&request.ids)
            .await;
        let fetched = outcomes.iter().filter(|o| o.is_success()).count();

        let records = RecordParser::new(task_timeout).decode_all(outcomes).await;

        info!(
            fetched = fetched,
            decoded = records.len(),
            "Tracking histories collected"
        );

        let formatter = MessageFormatter::new(request.limit)
            .with_utc_offset_minutes(self.config.display_utc_offset_minutes);
        let messages: Vec<_> = records
            .iter()
            .map(|decoded| {
                let message = NotificationMessage {
                    chat_id: request.chat_id.clone(),
                    text: formatter.format(&decoded.id, &decoded.record),
                    parse_mode: self.parse_mode.clone(),
                };
                (decoded.id.clone(), message)
            })
            .collect();

        let report = NotificationDispatcher::new(
            Arc::clone(&self.notifier),
            self.config.dispatch_failure_policy,
            task_timeout,
        )
        .dispatch_all(&messages)
        .await?;

        let summary = RunSummary {
            requested: request.ids.len(),
            fetch_failures: request.ids.len() - fetched,
            decode_failures: fetched - records.len(),
            dispatched: report.dispatched,
            dispatch_failures: report.failed,
            done: true,
        };

        info!(
            dispatched = summary.dispatched,
            fetch_failures = summary.fetch_failures,
            decode_failures = summary.decode_failures,
            "Tracking run complete"
        );

        Ok(summary)
    }
}
