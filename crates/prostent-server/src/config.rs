//! Server configuration loading from file and environment variables.

use prostent_ai::GeminiConfig;
use prostent_voice::TtsConfig;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Completion provider (Gemini).
    #[serde(default)]
    pub ai: GeminiConfig,

    /// Text-to-speech provider (Murf).
    #[serde(default)]
    pub tts: TtsConfig,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,

    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    #[serde(default = "default_pool_max_size")]
    pub pool_max_size: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "prostent_chat=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

fn default_port() -> u16 {
    5000
}

fn default_db_path() -> String {
    "prostent.db".to_string()
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

fn default_pool_max_size() -> u32 {
    8
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
            pool_max_size: default_pool_max_size(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults, then
/// applies environment overrides (see [`apply_env_overrides`]).
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

/// Overrides config values from environment variables:
///
/// - `PROSTENT_HOST`, `PROSTENT_PORT` -> `server.*`
/// - `PROSTENT_DB_PATH` -> `database.path`
/// - `PROSTENT_LOG_LEVEL`, `PROSTENT_LOG_JSON` ("true"/"1") -> `logging.*`
/// - `GEMINI_API_KEY`, `GEMINI_MODEL` -> `ai.api_key`, `ai.model`
/// - `MURF_API_KEY` -> `tts.api_key`
///
/// Values that fail to parse are ignored.
pub fn apply_env_overrides(config: &mut Config, var: impl Fn(&str) -> Option<String>) {
    if let Some(parsed) = var("PROSTENT_HOST").and_then(|v| v.parse().ok()) {
        config.server.host = parsed;
    }
    if let Some(parsed) = var("PROSTENT_PORT").and_then(|v| v.parse().ok()) {
        config.server.port = parsed;
    }
    if let Some(path) = var("PROSTENT_DB_PATH") {
        config.database.path = path;
    }
    if let Some(level) = var("PROSTENT_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = var("PROSTENT_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
    if let Some(key) = var("GEMINI_API_KEY") {
        config.ai.api_key = key;
    }
    if let Some(model) = var("GEMINI_MODEL") {
        config.ai.model = model;
    }
    if let Some(key) = var("MURF_API_KEY") {
        config.tts.api_key = key;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_without_file() {
        let config = Config::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.database.path, "prostent.db");
        assert_eq!(config.ai.model, "gemini-pro");
        assert_eq!(config.tts.default_voice.voice_id, "en-US-thomas");
        assert!(config.ai.api_key.is_empty());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 8080

            [ai]
            timeout_secs = 5

            [tts.default_voice]
            voiceId = "en-GB-james"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.ai.timeout_secs, 5);
        assert_eq!(config.ai.model, "gemini-pro");
        assert_eq!(config.tts.default_voice.voice_id, "en-GB-james");
        assert_eq!(config.tts.default_voice.rate, 1.0);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn env_overrides_apply_and_bad_values_are_ignored() {
        let env: HashMap<&str, &str> = [
            ("PROSTENT_PORT", "not-a-port"),
            ("PROSTENT_HOST", "0.0.0.0"),
            ("PROSTENT_LOG_JSON", "1"),
            ("GEMINI_API_KEY", "g-key"),
            ("MURF_API_KEY", "m-key"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        apply_env_overrides(&mut config, |k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert!(config.logging.json);
        assert_eq!(config.ai.api_key, "g-key");
        assert_eq!(config.tts.api_key, "m-key");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(load_config(Some(path.to_str().unwrap())).is_ok());
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[server\nport = ").unwrap();
        assert!(matches!(
            load_config(Some(path.to_str().unwrap())),
            Err(ConfigError::Parse(_))
        ));
    }
}
