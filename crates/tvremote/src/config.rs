//! Configuration management for tvremote.
//!
//! Settings are read from `~/.config/tvremote/config.toml` (platform config
//! directory). Every key is optional; a missing file means all defaults.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use jointspace::{TransportConfig, DEFAULT_PORT};
use serde::Deserialize;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("port must be between 1 and 65535, got {0}")]
    InvalidPort(u16),

    #[error("timeout_secs must be between 0 and {MAX_TIMEOUT_SECS} seconds, got {0}")]
    InvalidTimeout(u64),

    #[error("log level must be one of: trace, debug, info, warn, error; got {0}")]
    InvalidLogLevel(String),
}

/// Valid log level values for tracing configuration.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Upper bound for the request timeout.
pub const MAX_TIMEOUT_SECS: u64 = 600;

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    /// Connection settings for the TV.
    pub tv: TvConfig,

    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Connection settings for the TV.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct TvConfig {
    /// JointSpace API port.
    pub port: u16,

    /// Request timeout in seconds; 0 disables it.
    pub timeout_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    pub level: String,
}

impl Default for TvConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            timeout_secs: 10,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl TvConfig {
    /// Request timeout, `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// Transport settings for the TV at `host`.
    pub fn transport_config(&self, host: &str) -> TransportConfig {
        TransportConfig::new(host)
            .with_port(self.port)
            .with_timeout(self.timeout())
    }
}

/// Returns the default configuration file path.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tvremote")
        .join("config.toml")
}

impl Config {
    /// Apply environment variable overrides to the configuration.
    ///
    /// Environment variables take precedence over config file values.
    /// Supported variables:
    /// - TVREMOTE_PORT: Override the API port
    /// - TVREMOTE_LOG_LEVEL: Override log level (trace, debug, info, warn, error)
    pub fn apply_env_overrides(&mut self) {
        if let Ok(port) = std::env::var("TVREMOTE_PORT") {
            if !port.is_empty() {
                match port.parse() {
                    Ok(port) => {
                        tracing::info!("Overriding port from environment: {}", port);
                        self.tv.port = port;
                    }
                    Err(_) => {
                        tracing::warn!("Ignoring invalid TVREMOTE_PORT value: {}", port);
                    }
                }
            }
        }

        if let Ok(level) = std::env::var("TVREMOTE_LOG_LEVEL") {
            if !level.is_empty() {
                tracing::info!("Overriding log level from environment: {}", level);
                self.logging.level = level;
            }
        }
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tv.port == 0 {
            return Err(ConfigError::InvalidPort(self.tv.port));
        }

        if self.tv.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::InvalidTimeout(self.tv.timeout_secs));
        }

        let level = self.logging.level.to_lowercase();
        if !VALID_LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(self.logging.level.clone()));
        }

        Ok(())
    }

    /// Reads the configuration at `path`; a missing file gives the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("Config file not found at {:?}, using defaults", path);
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Cannot read {}", path.display()));
            }
        };

        Self::from_toml(&contents).with_context(|| format!("Invalid config in {}", path.display()))
    }

    pub fn load_default() -> Result<Self> {
        Self::load(default_config_path())
    }

    /// Parses TOML text, reporting the byte range of a syntax or type error.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| match e.span() {
            Some(span) => anyhow::anyhow!("{} (bytes {}..{})", e.message(), span.start, span.end),
            None => anyhow::anyhow!("{}", e.message()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn clear_env() {
        std::env::remove_var("TVREMOTE_PORT");
        std::env::remove_var("TVREMOTE_LOG_LEVEL");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.tv.port, 1926);
        assert_eq!(config.tv.timeout_secs, 10);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_from_toml_empty() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_from_toml_partial() {
        let toml = r#"
[tv]
timeout_secs = 30
"#;
        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.tv.timeout_secs, 30);
        assert_eq!(config.tv.port, 1926);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_from_toml_full() {
        let toml = r#"
[tv]
port = 1925
timeout_secs = 0

[logging]
level = "debug"
"#;
        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.tv.port, 1925);
        assert_eq!(config.tv.timeout(), None);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_from_toml_wrong_type() {
        let toml = r#"
[tv]
port = "high"
"#;
        let err = Config::from_toml(toml).unwrap_err().to_string();
        assert!(err.contains("invalid type"));
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load(temp_dir.path().join("missing.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_file_from_disk() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[tv]\ntimeout_secs = 42\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.tv.timeout_secs, 42);
        assert_eq!(config.tv.port, DEFAULT_PORT);
    }

    #[test]
    fn test_load_directory_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = format!("{:#}", Config::load(temp_dir.path()).unwrap_err());
        assert!(err.contains("Cannot read"));
    }

    #[test]
    fn test_load_invalid_file_mentions_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[tv\nport = 1").unwrap();

        let err = format!("{:#}", Config::load(&path).unwrap_err());
        assert!(err.contains("config.toml"));
    }

    #[test]
    fn test_default_config_path() {
        let path = default_config_path();
        assert!(path.ends_with("tvremote/config.toml"));
    }

    #[test]
    fn test_transport_config() {
        let tv = TvConfig {
            port: 1925,
            timeout_secs: 5,
        };
        let transport = tv.transport_config("192.168.0.10");
        assert_eq!(transport.host, "192.168.0.10");
        assert_eq!(transport.port, 1925);
        assert_eq!(transport.timeout, Some(Duration::from_secs(5)));
        assert!(transport.tls);
    }

    #[test]
    #[serial]
    fn test_env_override_port() {
        clear_env();
        std::env::set_var("TVREMOTE_PORT", "1925");

        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config.tv.port, 1925);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_env_override_invalid_port_is_ignored() {
        clear_env();
        std::env::set_var("TVREMOTE_PORT", "not-a-port");

        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config.tv.port, DEFAULT_PORT);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_env_override_log_level() {
        clear_env();
        std::env::set_var("TVREMOTE_LOG_LEVEL", "trace");

        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config.logging.level, "trace");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_env_override_empty_does_not_override() {
        clear_env();
        std::env::set_var("TVREMOTE_LOG_LEVEL", "");
        std::env::set_var("TVREMOTE_PORT", "");

        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config, Config::default());

        clear_env();
    }

    #[test]
    fn test_validate_default_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_port_zero() {
        let mut config = Config::default();
        config.tv.port = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidPort(0)));
    }

    #[test]
    fn test_validate_timeout_bounds() {
        let mut config = Config::default();
        config.tv.timeout_secs = MAX_TIMEOUT_SECS;
        assert!(config.validate().is_ok());

        config.tv.timeout_secs = MAX_TIMEOUT_SECS + 1;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidTimeout(MAX_TIMEOUT_SECS + 1))
        );
    }

    #[test]
    fn test_validate_log_level() {
        let mut config = Config::default();
        config.logging.level = "DEBUG".to_string();
        assert!(config.validate().is_ok());

        config.logging.level = "verbose".to_string();
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidLogLevel("verbose".to_string()))
        );
    }

    #[test]
    fn test_config_error_display() {
        assert_eq!(
            ConfigError::InvalidTimeout(900).to_string(),
            "timeout_secs must be between 0 and 600 seconds, got 900"
        );
    }
}
