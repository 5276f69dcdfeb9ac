use crate::error::{Result, SatlensError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Backend used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfigSource::Default => "default",
            ConfigSource::File => "file",
            ConfigSource::Environment => "environment",
            ConfigSource::Cli => "cli",
        };
        f.write_str(label)
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// How the chat widget produces assistant replies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    /// Canned replies after a fixed delay
    Demo,
    /// Replies from the backend chat endpoint
    Live,
}

impl FromStr for ChatMode {
    type Err = SatlensError;

    fn from_str(s: &str) -> Result<Self> {
        parse_chat_mode(s)
    }
}

/// Layered configuration for SatLens
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub api_url: ConfigValue<String>,
    pub gpt_model: ConfigValue<Option<String>>,
    pub chat_mode: ConfigValue<ChatMode>,
    pub reply_delay_ms: ConfigValue<u64>,
    pub poll_interval_ms: ConfigValue<u64>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            api_url: ConfigValue::new(DEFAULT_API_URL.to_string(), ConfigSource::Default),
            gpt_model: ConfigValue::new(None, ConfigSource::Default),
            chat_mode: ConfigValue::new(ChatMode::Live, ConfigSource::Default),
            reply_delay_ms: ConfigValue::new(1500, ConfigSource::Default),
            poll_interval_ms: ConfigValue::new(1000, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| SatlensError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| SatlensError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(api_url) = file_config.api_url {
            self.api_url.update(api_url, ConfigSource::File);
        }

        if let Some(gpt_model) = file_config.gpt_model {
            self.gpt_model.update(Some(gpt_model), ConfigSource::File);
        }

        if let Some(chat_mode) = file_config.chat_mode {
            self.chat_mode.update(chat_mode, ConfigSource::File);
        }

        if let Some(delay) = file_config.reply_delay_ms {
            self.reply_delay_ms.update(delay, ConfigSource::File);
        }

        if let Some(interval) = file_config.poll_interval_ms {
            self.poll_interval_ms.update(interval, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // SATLENS_API_URL
        if let Ok(api_url) = env::var("SATLENS_API_URL") {
            if !api_url.trim().is_empty() {
                self.api_url.update(api_url, ConfigSource::Environment);
            }
        }

        // SATLENS_GPT_MODEL
        if let Ok(model) = env::var("SATLENS_GPT_MODEL") {
            if !model.trim().is_empty() {
                self.gpt_model.update(Some(model), ConfigSource::Environment);
            }
        }

        // SATLENS_CHAT_MODE
        if let Ok(mode_str) = env::var("SATLENS_CHAT_MODE") {
            match parse_chat_mode(&mode_str) {
                Ok(mode) => self.chat_mode.update(mode, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid SATLENS_CHAT_MODE value '{}': expected demo or live",
                    mode_str
                ),
            }
        }

        // SATLENS_REPLY_DELAY_MS
        if let Ok(delay_str) = env::var("SATLENS_REPLY_DELAY_MS") {
            match delay_str.parse::<u64>() {
                Ok(delay) => self.reply_delay_ms.update(delay, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid SATLENS_REPLY_DELAY_MS value '{}': expected milliseconds",
                    delay_str
                ),
            }
        }

        // SATLENS_POLL_INTERVAL_MS
        if let Ok(interval_str) = env::var("SATLENS_POLL_INTERVAL_MS") {
            match interval_str.parse::<u64>() {
                Ok(interval) => self.poll_interval_ms.update(interval, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid SATLENS_POLL_INTERVAL_MS value '{}': expected milliseconds",
                    interval_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(api_url) = overrides.api_url {
            self.api_url.update(api_url, ConfigSource::Cli);
        }

        if let Some(gpt_model) = overrides.gpt_model {
            self.gpt_model.update(Some(gpt_model), ConfigSource::Cli);
        }

        if let Some(chat_mode) = overrides.chat_mode {
            self.chat_mode.update(chat_mode, ConfigSource::Cli);
        }
    }

    /// Backend base URL with any trailing slash removed
    pub fn base_url(&self) -> String {
        resolve_base_url(Some(&self.api_url.value), None)
    }

    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms.value)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.value)
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert("api_url".to_string(), (self.api_url.value.clone(), self.api_url.source));

        map.insert(
            "gpt_model".to_string(),
            (
                self.gpt_model.value.clone().unwrap_or_else(|| "(none)".to_string()),
                self.gpt_model.source,
            ),
        );

        map.insert(
            "chat_mode".to_string(),
            (format!("{:?}", self.chat_mode.value), self.chat_mode.source),
        );

        map.insert(
            "reply_delay_ms".to_string(),
            (self.reply_delay_ms.value.to_string(), self.reply_delay_ms.source),
        );

        map.insert(
            "poll_interval_ms".to_string(),
            (self.poll_interval_ms.value.to_string(), self.poll_interval_ms.source),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    api_url: Option<String>,
    gpt_model: Option<String>,
    chat_mode: Option<ChatMode>,
    reply_delay_ms: Option<u64>,
    poll_interval_ms: Option<u64>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub api_url: Option<String>,
    pub gpt_model: Option<String>,
    pub chat_mode: Option<ChatMode>,
}

/// Resolve the backend base URL: explicit override, then origin, then the default.
///
/// Blank candidates are skipped and trailing slashes are trimmed.
pub fn resolve_base_url(explicit: Option<&str>, origin: Option<&str>) -> String {
    [explicit, origin]
        .into_iter()
        .flatten()
        .map(|candidate| candidate.trim().trim_end_matches('/'))
        .find(|candidate| !candidate.is_empty())
        .unwrap_or(DEFAULT_API_URL)
        .to_string()
}

/// Parse chat mode from string
pub fn parse_chat_mode(s: &str) -> Result<ChatMode> {
    match s.trim().to_lowercase().as_str() {
        "demo" => Ok(ChatMode::Demo),
        "live" => Ok(ChatMode::Live),
        _ => Err(SatlensError::ConfigInvalid {
            key: "chat_mode".to_string(),
            reason: format!("Invalid chat mode: {}. Use demo or live", s),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = LayeredConfig::with_defaults();
        assert_eq!(config.api_url.value, DEFAULT_API_URL);
        assert_eq!(config.api_url.source, ConfigSource::Default);
        assert_eq!(config.chat_mode.value, ChatMode::Live);
        assert_eq!(config.reply_delay(), Duration::from_millis(1500));
        assert!(config.gpt_model.value.is_none());
    }

    #[test]
    fn test_config_precedence() {
        let mut value = ConfigValue::new(100, ConfigSource::Default);

        value.update(200, ConfigSource::File);
        assert_eq!(value.value, 200);

        value.update(300, ConfigSource::Environment);
        assert_eq!(value.value, 300);

        value.update(400, ConfigSource::Cli);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);

        // Lower precedence should not override
        value.update(500, ConfigSource::File);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
api_url = "http://analysis.internal:9000/"
gpt_model = "gpt-4o"
chat_mode = "demo"
reply_delay_ms = 250
"#
        )
        .unwrap();

        let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

        assert_eq!(config.api_url.source, ConfigSource::File);
        assert_eq!(config.base_url(), "http://analysis.internal:9000");
        assert_eq!(config.gpt_model.value.as_deref(), Some("gpt-4o"));
        assert_eq!(config.chat_mode.value, ChatMode::Demo);
        assert_eq!(config.reply_delay_ms.value, 250);
        assert_eq!(config.poll_interval_ms.source, ConfigSource::Default);
    }

    #[test]
    fn test_invalid_file_is_reported() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "chat_mode = \"sometimes\"").unwrap();

        let err = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, SatlensError::ConfigInvalid { .. }));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = LayeredConfig::with_defaults();

        config.update_from_cli(CliConfigOverrides {
            api_url: Some("http://127.0.0.1:3000".to_string()),
            gpt_model: None,
            chat_mode: Some(ChatMode::Demo),
        });

        assert_eq!(config.api_url.value, "http://127.0.0.1:3000");
        assert_eq!(config.api_url.source, ConfigSource::Cli);
        assert_eq!(config.chat_mode.value, ChatMode::Demo);
        assert_eq!(config.gpt_model.source, ConfigSource::Default);
    }

    #[test]
    fn test_resolve_base_url() {
        assert_eq!(
            resolve_base_url(Some("http://override:1/"), Some("http://origin:2")),
            "http://override:1"
        );
        assert_eq!(resolve_base_url(Some("  "), Some("http://origin:2")), "http://origin:2");
        assert_eq!(resolve_base_url(None, Some("")), DEFAULT_API_URL);
        assert_eq!(resolve_base_url(None, None), DEFAULT_API_URL);
    }

    #[test]
    fn test_parse_chat_mode() {
        assert_eq!(parse_chat_mode("demo").unwrap(), ChatMode::Demo);
        assert_eq!(parse_chat_mode("LIVE").unwrap(), ChatMode::Live);
        assert!(parse_chat_mode("invalid").is_err());
    }

    #[test]
    fn test_inspection_map() {
        let config = LayeredConfig::with_defaults();
        let map = config.to_inspection_map();

        let (url, source) = &map["api_url"];
        assert_eq!(url, DEFAULT_API_URL);
        assert_eq!(*source, ConfigSource::Default);
        assert_eq!(map["gpt_model"].0, "(none)");
        assert_eq!(map["chat_mode"].0, "Live");
    }
}
