pub mod config;
pub mod notifier;
pub mod pipeline;
pub mod testing;
pub mod tracking;

pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, Config,
    ConfigError, DispatchFailurePolicy, PipelineConfig, TelegramConfig, TrackingConfig,
    DEFAULT_PARSE_MODE,
};
pub use notifier::{NotificationMessage, Notifier, NotifyError, TelegramNotifier};
pub use pipeline::{
    FetchCoordinator, FetchOutcome, ItemLimit, MessageFormatter, NotificationDispatcher,
    RecordParser, RunError, RunRequest, RunSummary, TrackingPipeline,
};
pub use tracking::{
    HistoryItem, HttpTrackingClient, PendingBody, TrackingClient, TrackingError, TrackingId,
    TrackingRecord,
};
