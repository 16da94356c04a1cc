//! Settle-all barrier with an optional per-task deadline.

use std::future::Future;
use std::time::Duration;

use futures::future::join_all;
use thiserror::Error;

/// A task exceeded its deadline.
#[derive(Debug, Clone, Copy, Error)]
#[error("task timed out after {0:?}")]
pub struct TaskTimedOut(pub Duration);

/// Await a task, giving up after `limit` when one is set.
pub async fn guard<F>(task: F, limit: Option<Duration>) -> Result<F::Output, TaskTimedOut>
where
    F: Future,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, task)
            .await
            .map_err(|_| TaskTimedOut(limit)),
        None => Ok(task.await),
    }
}

/// Drive every task to a terminal state and return results in input order.
///
/// No task is cancelled because a sibling failed.
pub async fn settle_all<I, F>(
    tasks: I,
    limit: Option<Duration>,
) -> Vec<Result<F::Output, TaskTimedOut>>
where
    I: IntoIterator<Item = F>,
    F: Future,
{
    join_all(tasks.into_iter().map(|task| guard(task, limit))).await
}
