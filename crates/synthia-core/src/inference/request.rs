//! Inference request types and the endpoint descriptor table.

use crate::config::EndpointsConfig;
use crate::error::RequestError;
use image::ImageFormat;
use serde::Serialize;
use std::fmt;

/// The three remote models Synthia talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointKind {
    TextGeneration,
    ImageCaptioning,
    ImageGeneration,
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointKind::TextGeneration => write!(f, "text-generation"),
            EndpointKind::ImageCaptioning => write!(f, "image-captioning"),
            EndpointKind::ImageGeneration => write!(f, "image-generation"),
        }
    }
}

/// Where to send requests of one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub kind: EndpointKind,
    pub url: String,
}

/// URL lookup for every endpoint kind, injected into the invoker.
#[derive(Debug, Clone)]
pub struct Endpoints {
    text_generation: String,
    image_captioning: String,
    image_generation: String,
}

impl Endpoints {
    pub fn new(
        text_generation: impl Into<String>,
        image_captioning: impl Into<String>,
        image_generation: impl Into<String>,
    ) -> Self {
        Self {
            text_generation: text_generation.into(),
            image_captioning: image_captioning.into(),
            image_generation: image_generation.into(),
        }
    }

    /// Descriptor for the given kind.
    pub fn get(&self, kind: EndpointKind) -> Endpoint {
        let url = match kind {
            EndpointKind::TextGeneration => &self.text_generation,
            EndpointKind::ImageCaptioning => &self.image_captioning,
            EndpointKind::ImageGeneration => &self.image_generation,
        };
        Endpoint {
            kind,
            url: url.clone(),
        }
    }
}

impl From<&EndpointsConfig> for Endpoints {
    fn from(config: &EndpointsConfig) -> Self {
        Self::new(
            &config.text_generation,
            &config.image_captioning,
            &config.image_generation,
        )
    }
}

/// What the user supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestInput {
    Prompt(String),
    Image(Vec<u8>),
}

/// A single immutable inference request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceRequest {
    kind: EndpointKind,
    input: RequestInput,
    max_new_tokens: Option<u32>,
}

impl InferenceRequest {
    /// Default token budget for text generation.
    pub const DEFAULT_MAX_NEW_TOKENS: u32 = 1000;

    /// Build a text generation request.
    ///
    /// `max_new_tokens` falls back to [`Self::DEFAULT_MAX_NEW_TOKENS`] when `None`.
    pub fn text_generation(
        prompt: impl Into<String>,
        max_new_tokens: Option<u32>,
    ) -> Result<Self, RequestError> {
        let prompt = non_empty_prompt(prompt.into())?;
        Ok(Self {
            kind: EndpointKind::TextGeneration,
            input: RequestInput::Prompt(prompt),
            max_new_tokens: Some(max_new_tokens.unwrap_or(Self::DEFAULT_MAX_NEW_TOKENS)),
        })
    }

    /// Build a captioning request from an uploaded JPEG or PNG.
    ///
    /// The format is detected from content, not from a file name.
    pub fn image_captioning(image: Vec<u8>) -> Result<Self, RequestError> {
        if image.is_empty() {
            return Err(RequestError::EmptyUpload);
        }
        match image::guess_format(&image) {
            Ok(ImageFormat::Jpeg) | Ok(ImageFormat::Png) => {}
            Ok(other) => {
                return Err(RequestError::UnsupportedUpload(format!("{other:?}").to_lowercase()))
            }
            Err(_) => return Err(RequestError::UnsupportedUpload("unknown".to_string())),
        }
        Ok(Self {
            kind: EndpointKind::ImageCaptioning,
            input: RequestInput::Image(image),
            max_new_tokens: None,
        })
    }

    /// Build a text-to-image request.
    pub fn image_generation(prompt: impl Into<String>) -> Result<Self, RequestError> {
        let prompt = non_empty_prompt(prompt.into())?;
        Ok(Self {
            kind: EndpointKind::ImageGeneration,
            input: RequestInput::Prompt(prompt),
            max_new_tokens: None,
        })
    }

    pub fn kind(&self) -> EndpointKind {
        self.kind
    }

    pub fn input(&self) -> &RequestInput {
        &self.input
    }

    pub fn max_new_tokens(&self) -> Option<u32> {
        self.max_new_tokens
    }

    /// The prompt text, if this request carries one.
    pub fn prompt(&self) -> Option<&str> {
        match &self.input {
            RequestInput::Prompt(p) => Some(p),
            RequestInput::Image(_) => None,
        }
    }

    /// Wire body for this request.
    pub fn body(&self) -> RequestBody {
        match &self.input {
            RequestInput::Image(bytes) => RequestBody::Bytes(bytes.clone()),
            RequestInput::Prompt(prompt) => {
                let payload = match self.max_new_tokens {
                    Some(max_new_tokens) => serde_json::json!({
                        "inputs": prompt,
                        "parameters": { "max_new_tokens": max_new_tokens },
                    }),
                    None => serde_json::json!({ "inputs": prompt }),
                };
                RequestBody::Json(payload)
            }
        }
    }
}

fn non_empty_prompt(prompt: String) -> Result<String, RequestError> {
    if prompt.trim().is_empty() {
        Err(RequestError::EmptyPrompt)
    } else {
        Ok(prompt)
    }
}

/// Body of an outgoing POST.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(serde_json::Value),
    Bytes(Vec<u8>),
}
