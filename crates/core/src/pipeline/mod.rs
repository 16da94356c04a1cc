//! The tracking notification pipeline.
//!
//! Each stage fans out one future per identifier and joins them behind a
//! settle-all barrier before the next stage starts:
//!
//! ```text
//! ids -> FetchCoordinator -> RecordParser -> MessageFormatter -> NotificationDispatcher
//! ```
//!
//! Fetch and decode failures are contained to their identifier. A dispatch
//! failure is fatal to the run unless the policy says otherwise.

mod dispatch;
mod fetch;
mod format;
mod parse;
mod runner;
mod settle;
mod types;

pub use dispatch::{DispatchReport, NotificationDispatcher};
pub use fetch::FetchCoordinator;
pub use format::{MessageFormatter, INVALID_DATE};
pub use parse::RecordParser;
pub use runner::TrackingPipeline;
pub use settle::{guard, settle_all, TaskTimedOut};
pub use types::*;
