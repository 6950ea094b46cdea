//! Error types for the Synthia invocation layer.
//!
//! Remote-service failures (non-200 statuses, empty or malformed bodies) are
//! not errors here: they are reported as an [`Outcome`](crate::Outcome). The
//! types below cover local problems: bad configuration, invalid requests,
//! transport failures, and caller-initiated cancellation.

use thiserror::Error;

/// Top-level error type for Synthia operations.
#[derive(Error, Debug)]
pub enum SynthiaError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The request could not be built from user input
    #[error("Invalid request: {0}")]
    Request(#[from] RequestError),

    /// The call was cancelled before reaching a terminal outcome
    #[error(transparent)]
    Cancelled(#[from] Cancelled),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// The API token is empty or references an unset environment variable
    #[error("API token not set: {0}")]
    MissingCredential(String),
}

/// Errors raised while building an [`InferenceRequest`](crate::InferenceRequest).
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RequestError {
    /// Prompt is empty or whitespace only
    #[error("Prompt is empty")]
    EmptyPrompt,

    /// Uploaded image has no bytes
    #[error("Image upload is empty")]
    EmptyUpload,

    /// Uploaded image is not one of the accepted formats
    #[error("Unsupported image format: {0} (expected jpeg or png)")]
    UnsupportedUpload(String),
}

/// Failure to complete a single HTTP exchange.
#[derive(Error, Debug)]
pub enum TransportError {
    /// No response arrived within the per-attempt bound
    #[error("Request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The connection could not be established
    #[error("Connection failed: {0}")]
    Connect(String),

    /// Any other failure while sending or reading the response
    #[error("Request failed: {0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else {
            TransportError::Other(e.to_string())
        }
    }
}

/// Returned when a caller cancels an in-flight invocation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Inference call cancelled after {attempts} attempt(s)")]
pub struct Cancelled {
    /// Attempts that were sent before cancellation was observed
    pub attempts: u32,
}

/// Convenience type alias for Synthia results.
pub type Result<T> = std::result::Result<T, SynthiaError>;
