//! Configuration management for Synthia.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. Credentials are never stored in code: the default token is a
//! `${HF_API_TOKEN}` reference resolved at startup.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Synthia.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Credentials and request parameters
    pub inference: InferenceConfig,

    /// Model endpoint URLs
    pub endpoints: EndpointsConfig,

    /// Warming-up retry settings
    pub retry: RetryConfig,

    /// Resource limits
    pub limits: LimitsConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// - macOS: ~/Library/Application Support/com.synthia.synthia/config.toml
    /// - Linux: ~/.config/synthia/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\synthia\config\config.toml
    ///
    /// Falls back to ~/.synthia/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "synthia", "synthia")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".synthia").join("config.toml")
            })
    }

    /// Get the resolved image output directory (with ~ expansion).
    pub fn image_dir(&self) -> PathBuf {
        let path_str = self.output.image_dir.to_string_lossy();
        let expanded = shellexpand::tilde(&path_str);
        PathBuf::from(expanded.into_owned())
    }

    /// Resolve the API token, following a `${ENV_VAR}` reference if present.
    pub fn api_key(&self) -> Result<String, ConfigError> {
        resolve_env_var(&self.inference.api_key).ok_or_else(|| {
            ConfigError::MissingCredential(format!(
                "inference.api_key is '{}'. Set the referenced env var or put the token in the config file.",
                self.inference.api_key
            ))
        })
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok().filter(|v| !v.is_empty())
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.delay_seconds, 30);
        assert_eq!(config.inference.max_new_tokens, 1000);
        assert_eq!(config.limits.request_timeout_ms, 120_000);
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[inference]"));
        assert!(toml.contains("[endpoints]"));
        assert!(toml.contains("[retry]"));
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[retry]\nmax_attempts = 2\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.retry.max_attempts, 2);
        assert_eq!(config.retry.delay_seconds, 30);
        assert!(config.endpoints.text_generation.starts_with("https://"));
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[retry]\nmax_attempts = 0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[retry\nmax_attempts = ").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_resolve_env_var() {
        // Non-env-var strings pass through
        assert_eq!(resolve_env_var("hf_plain"), Some("hf_plain".to_string()));
        // Empty returns None
        assert_eq!(resolve_env_var(""), None);
        // Unset env var returns None
        assert_eq!(resolve_env_var("${DEFINITELY_NOT_SET_SYNTHIA_123}"), None);
    }

    #[test]
    fn test_api_key_missing_is_reported() {
        let mut config = Config::default();
        config.inference.api_key = "${DEFINITELY_NOT_SET_SYNTHIA_456}".to_string();
        let err = config.api_key().unwrap_err();
        assert!(err.to_string().contains("DEFINITELY_NOT_SET_SYNTHIA_456"));
    }

    #[test]
    fn test_api_key_literal() {
        let mut config = Config::default();
        config.inference.api_key = "hf_literal".to_string();
        assert_eq!(config.api_key().unwrap(), "hf_literal");
    }
}
