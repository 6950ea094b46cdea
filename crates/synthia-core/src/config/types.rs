//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Credentials and request parameters shared by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Bearer token (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Token budget for text generation
    pub max_new_tokens: u32,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            api_key: "${HF_API_TOKEN}".to_string(),
            max_new_tokens: 1000,
        }
    }
}

/// Model endpoint URLs, one per endpoint kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointsConfig {
    /// Text generation model
    pub text_generation: String,

    /// Image captioning model
    pub image_captioning: String,

    /// Text-to-image model
    pub image_generation: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            text_generation:
                "https://api-inference.huggingface.co/models/mistralai/Mistral-7B-Instruct-v0.3"
                    .to_string(),
            image_captioning:
                "https://api-inference.huggingface.co/models/Salesforce/blip-image-captioning-large"
                    .to_string(),
            image_generation:
                "https://api-inference.huggingface.co/models/stabilityai/stable-diffusion-xl-base-1.0"
                    .to_string(),
        }
    }
}

/// Retry settings for models that are still loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts per call, including the first
    pub max_attempts: u32,

    /// Fixed delay between attempts in seconds
    pub delay_seconds: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay_seconds: 30,
        }
    }
}

/// Resource limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Per-attempt HTTP timeout in milliseconds
    pub request_timeout_ms: u64,

    /// Maximum size of an image sent for captioning
    pub max_upload_size_mb: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 120_000,
            max_upload_size_mb: 20,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory generated images are written to when no path is given
    pub image_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            image_dir: PathBuf::from("."),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
