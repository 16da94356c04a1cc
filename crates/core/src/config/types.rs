use serde::{Deserialize, Serialize};

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub tracking: TrackingConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Remote tracking service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrackingConfig {
    /// Base URL; `/{id}/history_items` is appended per identifier.
    #[serde(default = "default_tracking_base_url")]
    pub base_url: String,
    /// Client identity sent with every tracking request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// HTTP client timeout in seconds (unset = no timeout).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            base_url: default_tracking_base_url(),
            user_agent: default_user_agent(),
            request_timeout_secs: None,
        }
    }
}

fn default_tracking_base_url() -> String {
    "https://prodapi.pochta.uz/api/v1/public/order".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/110.0".to_string()
}

/// Telegram Bot API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelegramConfig {
    /// Bot API base URL (e.g., "https://api.telegram.org")
    #[serde(default = "default_telegram_base_url")]
    pub base_url: String,
    /// `parse_mode` sent with every message
    #[serde(default = "default_parse_mode")]
    pub parse_mode: String,
    /// HTTP client timeout in seconds (unset = no timeout).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            base_url: default_telegram_base_url(),
            parse_mode: default_parse_mode(),
            request_timeout_secs: None,
        }
    }
}

fn default_telegram_base_url() -> String {
    "https://api.telegram.org".to_string()
}

/// Markup mode used when no `parse_mode` is configured.
pub const DEFAULT_PARSE_MODE: &str = "HTML";

fn default_parse_mode() -> String {
    DEFAULT_PARSE_MODE.to_string()
}

/// Pipeline behaviour configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Per-task timeout applied to every fetch, decode and dispatch.
    /// Unset means a hung call stalls the run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_timeout_secs: Option<u64>,
    /// What a failed notification send does to the run.
    #[serde(default)]
    pub dispatch_failure_policy: DispatchFailurePolicy,
    /// Offset from UTC, in minutes, used when rendering item dates.
    #[serde(default)]
    pub display_utc_offset_minutes: i32,
}

/// How the dispatcher reacts to a failed send.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DispatchFailurePolicy {
    /// The first failed send fails the whole run; outstanding sends are dropped.
    #[default]
    AbortRun,
    /// Every send settles; failures are logged and counted.
    Continue,
}
