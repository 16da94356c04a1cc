use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix for environment variable overrides, e.g.
/// `TRACKNOTIFY_PIPELINE__TASK_TIMEOUT_SECS=30`.
const ENV_PREFIX: &str = "TRACKNOTIFY_";

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration starting from defaults.
///
/// The file is optional here: a run inside an automation environment
/// usually has nothing but environment variables.
pub fn load_config_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string())),
    }
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DispatchFailurePolicy;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[tracking]
base_url = "http://localhost:9000/order"

[pipeline]
task_timeout_secs = 15
dispatch_failure_policy = "continue"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.tracking.base_url, "http://localhost:9000/order");
        assert_eq!(config.pipeline.task_timeout_secs, Some(15));
        assert_eq!(
            config.pipeline.dispatch_failure_policy,
            DispatchFailurePolicy::Continue
        );
        // Untouched sections keep their defaults
        assert_eq!(config.telegram.parse_mode, "HTML");
    }

    #[test]
    fn test_load_config_from_str_empty_uses_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.telegram.base_url, "https://api.telegram.org");
        assert_eq!(config.pipeline.display_utc_offset_minutes, 0);
    }

    #[test]
    fn test_load_config_from_str_bad_policy() {
        let toml = r#"
[pipeline]
dispatch_failure_policy = "retry_forever"
"#;
        let result = load_config_from_str(toml);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/tracknotify.toml"));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[telegram]
base_url = "http://127.0.0.1:8081"
request_timeout_secs = 10

[pipeline]
display_utc_offset_minutes = 300
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.telegram.base_url, "http://127.0.0.1:8081");
        assert_eq!(config.telegram.request_timeout_secs, Some(10));
        assert_eq!(config.pipeline.display_utc_offset_minutes, 300);
        assert_eq!(
            config.tracking.base_url,
            "https://prodapi.pochta.uz/api/v1/public/order"
        );
    }

    #[test]
    fn test_load_config_or_default_without_file() {
        let config = load_config_or_default(None).unwrap();
        assert!(config.tracking.user_agent.starts_with("Mozilla/5.0"));
    }
}
