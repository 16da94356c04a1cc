//! Automation environment contract: inputs from `INPUT_*` variables,
//! outputs to the `GITHUB_OUTPUT` file.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::{anyhow, Context, Result};

/// Raw invocation inputs, validated later by the pipeline.
pub struct ActionInputs {
    pub data: String,
    pub last_x_items: String,
    pub telegram_token: String,
    pub telegram_id: String,
}

impl ActionInputs {
    /// Read inputs from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read inputs through `lookup`, keyed by environment variable name.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| -> Result<String> {
            let key = input_key(name);
            lookup(key.as_str())
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or_else(|| anyhow!("Input required and not supplied: {}", name))
        };

        Ok(Self {
            data: required("data")?,
            last_x_items: required("last_x_items")?,
            telegram_token: required("telegram_token")?,
            telegram_id: required("telegram_id")?,
        })
    }
}

impl fmt::Debug for ActionInputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionInputs")
            .field("data", &self.data)
            .field("last_x_items", &self.last_x_items)
            .field("telegram_token", &"<redacted>")
            .field("telegram_id", &self.telegram_id)
            .finish()
    }
}

/// `last_x_items` -> `INPUT_LAST_X_ITEMS`
fn input_key(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

/// Publish an output value.
///
/// Appends `name=value` to the output file when one is given, otherwise
/// prints it.
pub fn set_output(output_file: Option<&Path>, name: &str, value: &str) -> Result<()> {
    match output_file {
        Some(path) => {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open output file {:?}", path))?;
            writeln!(file, "{}={}", name, value)
                .with_context(|| format!("Failed to write output file {:?}", path))?;
        }
        None => println!("{}={}", name, value),
    }
    Ok(())
}

/// Report a failed run to the automation environment.
pub fn report_failure(reason: &str) {
    println!("{}", error_command(reason));
}

fn error_command(reason: &str) -> String {
    format!("::error::{}", escape_command_data(reason))
}

/// Workflow commands end at the first line break, so `%` and line breaks
/// are percent-encoded.
fn escape_command_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::NamedTempFile;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_input_key() {
        assert_eq!(input_key("last_x_items"), "INPUT_LAST_X_ITEMS");
        assert_eq!(input_key("telegram id"), "INPUT_TELEGRAM_ID");
    }

    #[test]
    fn test_from_lookup_reads_all_inputs() {
        let vars = env(&[
            ("INPUT_DATA", r#"["A1"]"#),
            ("INPUT_LAST_X_ITEMS", " 3 "),
            ("INPUT_TELEGRAM_TOKEN", "123:abc"),
            ("INPUT_TELEGRAM_ID", "-100"),
        ]);

        let inputs = ActionInputs::from_lookup(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(inputs.data, r#"["A1"]"#);
        assert_eq!(inputs.last_x_items, "3");
        assert_eq!(inputs.telegram_id, "-100");
        assert!(!format!("{:?}", inputs).contains("123:abc"));
    }

    #[test]
    fn test_from_lookup_missing_input() {
        let vars = env(&[("INPUT_DATA", "[]"), ("INPUT_LAST_X_ITEMS", "-1")]);

        let err = ActionInputs::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert!(err.to_string().contains("telegram_token"));
    }

    #[test]
    fn test_error_command_keeps_multiline_reason_on_one_line() {
        let command = error_command("Telegram API error (400): 100% bad\r\nchat not found");

        assert_eq!(
            command,
            "::error::Telegram API error (400): 100%25 bad%0D%0Achat not found"
        );
        assert!(!command.contains('\n'));
    }

    #[test]
    fn test_set_output_appends_to_file() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "previous=1\n").unwrap();

        set_output(Some(file.path()), "done", "true").unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(contents, "previous=1\ndone=true\n");
    }
}
