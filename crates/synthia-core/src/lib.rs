//! Synthia Core - resilient calls to remote inference models.
//!
//! Synthia forwards prompts to three hosted models (text generation, image
//! captioning, text-to-image) and hands back a single [`Outcome`] per call.
//! Models that answer "still loading" are retried with a bounded number of
//! attempts and a fixed delay; successful bodies are validated before they
//! reach the caller.
//!
//! # Usage
//!
//! ```rust,ignore
//! use synthia_core::{invoke_configured, Config, InferenceRequest, Outcome};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> synthia_core::Result<()> {
//!     let config = Config::load()?;
//!     let request = InferenceRequest::text_generation("Describe photosynthesis.", None)?;
//!
//!     let cancel = CancellationToken::new();
//!     match invoke_configured(&config, &request, &cancel, |notice| eprintln!("{notice}")).await? {
//!         Outcome::Success(payload) => println!("{payload:?}"),
//!         other => eprintln!("No response: {other:?}"),
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod inference;

pub use config::Config;
pub use error::{Cancelled, ConfigError, RequestError, Result, SynthiaError, TransportError};
pub use inference::{
    invoke_configured, EndpointKind, GeneratedImage, InferenceInvoker, InferenceRequest, Outcome, Payload,
    RetryNotice, RetryPolicy,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Example prompts shown to new users.
pub const EXAMPLE_PROMPTS: [&str; 5] = [
    "Explain Machine Learning to me in a nutshell.",
    "What are the latest trends in artificial intelligence?",
    "Write a short story about a journey through time.",
    "Describe the process of photosynthesis.",
    "Compose a poem about the beauty of nature.",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_example_prompts_build_requests() {
        for prompt in EXAMPLE_PROMPTS {
            assert!(InferenceRequest::text_generation(prompt, None).is_ok());
        }
    }
}
