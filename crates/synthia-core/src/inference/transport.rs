//! HTTP transport for inference endpoints.
//!
//! The invoker talks to a [`Transport`] so the retry loop can be exercised
//! against scripted responses; [`HttpTransport`] is the reqwest-backed
//! implementation used in production.

use async_trait::async_trait;
use std::time::Duration;

use super::request::{Endpoint, RequestBody};
use crate::error::TransportError;

/// Status and body of one HTTP exchange, read in full.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Body as text, replacing invalid UTF-8.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Sends one request and returns the raw response.
///
/// Uses `async_trait` because the invoker holds an `Arc<dyn Transport>`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Transport name for logging.
    fn name(&self) -> &str;

    /// POST `body` to `endpoint`. Non-200 statuses are not errors here.
    async fn send(
        &self,
        endpoint: &Endpoint,
        body: &RequestBody,
    ) -> Result<RawResponse, TransportError>;
}

/// reqwest-backed transport with bearer authentication.
pub struct HttpTransport {
    api_key: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(api_key: &str, timeout: Duration) -> Self {
        Self {
            api_key: api_key.to_string(),
            client: reqwest::Client::new(),
            timeout,
        }
    }

    /// Build the POST for `endpoint` without sending it.
    pub fn build_request(
        &self,
        endpoint: &Endpoint,
        body: &RequestBody,
    ) -> Result<reqwest::Request, reqwest::Error> {
        let builder = self
            .client
            .post(&endpoint.url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .timeout(self.timeout);
        let builder = match body {
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Bytes(bytes) => builder
                .header("Content-Type", "application/octet-stream")
                .body(bytes.clone()),
        };
        builder.build()
    }

    fn map_error(&self, e: reqwest::Error) -> TransportError {
        if e.is_timeout() {
            TransportError::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            }
        } else {
            e.into()
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    async fn send(
        &self,
        endpoint: &Endpoint,
        body: &RequestBody,
    ) -> Result<RawResponse, TransportError> {
        let request = self
            .build_request(endpoint, body)
            .map_err(|e| TransportError::Other(format!("Invalid request for {}: {e}", endpoint.url)))?;

        let resp = self
            .client
            .execute(request)
            .await
            .map_err(|e| self.map_error(e))?;

        let status = resp.status().as_u16();
        let body = resp.bytes().await.map_err(|e| self.map_error(e))?;

        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::request::EndpointKind;

    fn endpoint(kind: EndpointKind) -> Endpoint {
        Endpoint {
            kind,
            url: "https://models.example/test".to_string(),
        }
    }

    #[test]
    fn test_json_request_has_bearer_and_json_body() {
        let transport = HttpTransport::new("hf_secret", Duration::from_secs(5));
        let body = RequestBody::Json(serde_json::json!({ "inputs": "hello" }));
        let request = transport
            .build_request(&endpoint(EndpointKind::TextGeneration), &body)
            .unwrap();

        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(request.url().as_str(), "https://models.example/test");
        assert_eq!(
            request.headers().get("authorization").unwrap(),
            "Bearer hf_secret"
        );
        assert_eq!(
            request.headers().get("content-type").unwrap(),
            "application/json"
        );
        let sent = request.body().and_then(|b| b.as_bytes()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(sent).unwrap();
        assert_eq!(value["inputs"], "hello");
        assert_eq!(request.timeout(), Some(&Duration::from_secs(5)));
    }

    #[test]
    fn test_bytes_request_sends_raw_image() {
        let transport = HttpTransport::new("hf_secret", Duration::from_secs(5));
        let body = RequestBody::Bytes(vec![0xFF, 0xD8, 0xFF]);
        let request = transport
            .build_request(&endpoint(EndpointKind::ImageCaptioning), &body)
            .unwrap();

        assert_eq!(
            request.body().and_then(|b| b.as_bytes()),
            Some(&[0xFF, 0xD8, 0xFF][..])
        );
        assert_eq!(
            request.headers().get("content-type").unwrap(),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_invalid_url_is_rejected_at_build() {
        let transport = HttpTransport::new("k", Duration::from_secs(1));
        let bad = Endpoint {
            kind: EndpointKind::TextGeneration,
            url: "not a url".to_string(),
        };
        assert!(transport
            .build_request(&bad, &RequestBody::Bytes(vec![]))
            .is_err());
    }

    #[test]
    fn test_body_text_is_lossy() {
        let resp = RawResponse::new(500, vec![b'o', b'k', 0xFF]);
        assert_eq!(resp.body_text(), "ok\u{FFFD}");
    }
}
