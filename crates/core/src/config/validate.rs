use super::{types::Config, ConfigError};

/// Largest offset a fixed UTC offset may carry.
const MAX_OFFSET_MINUTES: i32 = 18 * 60;

/// Validate configuration
/// Currently validates:
/// - Service URLs are not empty
/// - Timeouts, when set, are not 0
/// - Display offset is within ±18h
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.tracking.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "tracking.base_url cannot be empty".to_string(),
        ));
    }

    if config.telegram.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "telegram.base_url cannot be empty".to_string(),
        ));
    }

    let timeouts = [
        ("tracking.request_timeout_secs", config.tracking.request_timeout_secs),
        ("telegram.request_timeout_secs", config.telegram.request_timeout_secs),
        ("pipeline.task_timeout_secs", config.pipeline.task_timeout_secs),
    ];
    for (name, value) in timeouts {
        if value == Some(0) {
            return Err(ConfigError::ValidationError(format!("{} cannot be 0", name)));
        }
    }

    if config.pipeline.display_utc_offset_minutes.abs() > MAX_OFFSET_MINUTES {
        return Err(ConfigError::ValidationError(format!(
            "pipeline.display_utc_offset_minutes must be within ±{}",
            MAX_OFFSET_MINUTES
        )));
    }

    Ok(())
}
