//! Terminal results of an inference call.

use std::fmt;
use std::time::Duration;

use super::request::EndpointKind;

/// A decoded image returned by the image-generation endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    /// Bytes exactly as received
    pub bytes: Vec<u8>,
    /// Detected format ("png", "jpeg", "webp", ...)
    pub format: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Usable content extracted from a successful response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(String),
    Image(GeneratedImage),
}

/// The single terminal result of one inference call.
///
/// Every failure of the remote service is represented here; none of them
/// are Rust errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The response carried the expected content.
    Success(Payload),
    /// The response was well-formed but held nothing usable.
    EmptyResult,
    /// The response body did not have the expected shape.
    Malformed { reason: String },
    /// Every attempt saw the model still loading.
    ExhaustedRetries { attempts: u32, last_body: String },
    /// A non-retryable status (or a failed transport, see `Transport`).
    HttpError { status_code: u16, body: String },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Success(_) => "success",
            Outcome::EmptyResult => "empty_result",
            Outcome::Malformed { .. } => "malformed",
            Outcome::ExhaustedRetries { .. } => "exhausted_retries",
            Outcome::HttpError { .. } => "http_error",
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Outcome::Success(Payload::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn image(&self) -> Option<&GeneratedImage> {
        match self {
            Outcome::Success(Payload::Image(image)) => Some(image),
            _ => None,
        }
    }
}

/// Fired once per warming-up retry, before the delay starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryNotice {
    pub kind: EndpointKind,
    /// The attempt that just saw the warming-up status (1-based)
    pub attempt: u32,
    pub max_attempts: u32,
    pub delay: Duration,
}

impl fmt::Display for RetryNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Model is currently loading. Retrying in {} seconds (attempt {}/{})...",
            self.delay.as_secs(),
            self.attempt,
            self.max_attempts
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let outcome = Outcome::Success(Payload::Text("hi".to_string()));
        assert!(outcome.is_success());
        assert_eq!(outcome.text(), Some("hi"));
        assert!(outcome.image().is_none());
        assert!(!Outcome::EmptyResult.is_success());
    }

    #[test]
    fn test_retry_notice_message() {
        let notice = RetryNotice {
            kind: EndpointKind::ImageGeneration,
            attempt: 2,
            max_attempts: 5,
            delay: Duration::from_secs(30),
        };
        assert_eq!(
            notice.to_string(),
            "Model is currently loading. Retrying in 30 seconds (attempt 2/5)..."
        );
    }
}
