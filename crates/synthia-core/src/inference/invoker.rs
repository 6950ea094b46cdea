//! Bounded retry loop around a single inference call.
//!
//! One invoker serves every endpoint kind. Each call owns its attempt
//! counter; the delay between attempts suspends only the calling task.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::outcome::{Outcome, RetryNotice};
use super::policy::{RetryDecision, RetryPolicy, STATUS_WARMING_UP};
use super::request::{EndpointKind, Endpoints, InferenceRequest};
use super::transport::{HttpTransport, Transport};
use super::validate;
use crate::config::Config;
use crate::error::{Cancelled, ConfigError, TransportError};

/// Status reported when an attempt exceeds the per-request timeout.
pub const STATUS_TIMEOUT: u16 = 408;

/// Status reported when no HTTP response was received at all.
pub const STATUS_TRANSPORT_FAILURE: u16 = 502;

/// Sends inference requests and applies the warming-up retry policy.
pub struct InferenceInvoker {
    transport: Arc<dyn Transport>,
    endpoints: Endpoints,
    policy: RetryPolicy,
    timeout: Duration,
}

impl InferenceInvoker {
    pub fn new(
        transport: Arc<dyn Transport>,
        endpoints: Endpoints,
        policy: RetryPolicy,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            endpoints,
            policy,
            timeout,
        }
    }

    /// Build an HTTP-backed invoker from configuration.
    ///
    /// Fails if the API token cannot be resolved.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let api_key = config.api_key()?;
        let timeout = Duration::from_millis(config.limits.request_timeout_ms);
        Ok(Self::new(
            Arc::new(HttpTransport::new(&api_key, timeout)),
            Endpoints::from(&config.endpoints),
            RetryPolicy::from(&config.retry),
            timeout,
        ))
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Run one call to completion. Retry notices are discarded.
    pub async fn invoke(&self, request: &InferenceRequest) -> Outcome {
        match self.run(request, &Uncancellable, |_| {}).await {
            Ok(outcome) => outcome,
            Err(never) => match never {},
        }
    }

    /// Run one call, reporting each retry to `on_retry` and stopping early if
    /// `cancel` fires before a send or during a send or delay.
    pub async fn invoke_with<F>(
        &self,
        request: &InferenceRequest,
        cancel: &CancellationToken,
        on_retry: F,
    ) -> Result<Outcome, Cancelled>
    where
        F: Fn(RetryNotice) + Send + Sync,
    {
        self.run(request, cancel, on_retry).await
    }

    async fn run<C, F>(
        &self,
        request: &InferenceRequest,
        cancel: &C,
        on_retry: F,
    ) -> Result<Outcome, C::Error>
    where
        C: CancelSignal,
        F: Fn(RetryNotice) + Send + Sync,
    {
        let kind = request.kind();
        let endpoint = self.endpoints.get(kind);
        let body = request.body();
        let max_attempts = self.policy.max_attempts();
        let mut last_error: Option<Outcome> = None;

        for attempt in 1..=max_attempts {
            cancel.check(attempt - 1)?;

            let start = Instant::now();
            let sent = tokio::select! {
                biased;
                e = cancel.wait(attempt) => return Err(e),
                result = tokio::time::timeout(self.timeout, self.transport.send(&endpoint, &body)) => result,
            };

            let response = match sent {
                Ok(Ok(response)) => response,
                Ok(Err(e)) => {
                    tracing::warn!(
                        "{kind} attempt {attempt}/{max_attempts} via {} failed: {e}",
                        self.transport.name()
                    );
                    return Ok(transport_failure(e));
                }
                Err(_) => {
                    let e = TransportError::Timeout {
                        timeout_ms: self.timeout.as_millis() as u64,
                    };
                    tracing::warn!("{kind} attempt {attempt}/{max_attempts}: {e}");
                    return Ok(transport_failure(e));
                }
            };

            tracing::debug!(
                "{kind} attempt {attempt}/{max_attempts} -> HTTP {} in {}ms",
                response.status,
                start.elapsed().as_millis()
            );

            match self.policy.decide(response.status, attempt) {
                RetryDecision::Succeed => {
                    let outcome = validate_response(kind, request.prompt(), response.body).await;
                    tracing::info!("{kind} finished after {attempt} attempt(s): {}", outcome.label());
                    return Ok(outcome);
                }
                RetryDecision::RetryAfter(delay) => {
                    let body_text = response.body_text();
                    tracing::warn!(
                        "{kind} model is loading ({body_text}), retrying in {}s",
                        delay.as_secs()
                    );
                    on_retry(RetryNotice {
                        kind,
                        attempt,
                        max_attempts,
                        delay,
                    });
                    last_error = Some(Outcome::HttpError {
                        status_code: response.status,
                        body: body_text,
                    });
                    tokio::select! {
                        biased;
                        e = cancel.wait(attempt) => return Err(e),
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
                RetryDecision::FailPermanently if response.status == STATUS_WARMING_UP => {
                    tracing::info!("{kind} model still loading after {attempt} attempt(s)");
                    return Ok(Outcome::ExhaustedRetries {
                        attempts: attempt,
                        last_body: response.body_text(),
                    });
                }
                RetryDecision::FailPermanently => {
                    let outcome = Outcome::HttpError {
                        status_code: response.status,
                        body: response.body_text(),
                    };
                    tracing::info!("{kind} failed with HTTP {}", response.status);
                    return Ok(outcome);
                }
            }
        }

        // The last warming-up attempt always returns above.
        Ok(last_error.unwrap_or(Outcome::ExhaustedRetries {
            attempts: max_attempts,
            last_body: String::new(),
        }))
    }
}

/// Build an invoker from `config` and run one call with it.
///
/// Fails before any request is sent if the API token cannot be resolved.
pub async fn invoke_configured<F>(
    config: &Config,
    request: &InferenceRequest,
    cancel: &CancellationToken,
    on_retry: F,
) -> crate::Result<Outcome>
where
    F: Fn(RetryNotice) + Send + Sync,
{
    let invoker = InferenceInvoker::from_config(config)?;
    tracing::debug!(
        "Sending {} request (max {} attempts, {}s delay)",
        request.kind(),
        invoker.policy().max_attempts(),
        invoker.policy().delay().as_secs()
    );
    Ok(invoker.invoke_with(request, cancel, on_retry).await?)
}

/// Where a call learns that its caller gave up.
#[async_trait]
trait CancelSignal: Sync {
    type Error: Send;

    /// Fail if cancellation was already requested.
    fn check(&self, attempts: u32) -> Result<(), Self::Error>;

    /// Resolve once cancellation is requested.
    async fn wait(&self, attempts: u32) -> Self::Error;
}

#[async_trait]
impl CancelSignal for CancellationToken {
    type Error = Cancelled;

    fn check(&self, attempts: u32) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled { attempts })
        } else {
            Ok(())
        }
    }

    async fn wait(&self, attempts: u32) -> Cancelled {
        self.cancelled().await;
        Cancelled { attempts }
    }
}

/// Signal for calls that nobody can cancel.
struct Uncancellable;

#[async_trait]
impl CancelSignal for Uncancellable {
    type Error = Infallible;

    fn check(&self, _attempts: u32) -> Result<(), Infallible> {
        Ok(())
    }

    async fn wait(&self, _attempts: u32) -> Infallible {
        std::future::pending().await
    }
}

/// Validate on the blocking pool; image decoding is CPU-bound.
async fn validate_response(kind: EndpointKind, prompt: Option<&str>, body: Vec<u8>) -> Outcome {
    let prompt = prompt.map(str::to_owned);
    match tokio::task::spawn_blocking(move || validate::validate(kind, prompt.as_deref(), &body))
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => Outcome::Malformed {
            reason: format!("Validation task failed: {e}"),
        },
    }
}

fn transport_failure(error: TransportError) -> Outcome {
    let status_code = match error {
        TransportError::Timeout { .. } => STATUS_TIMEOUT,
        TransportError::Connect(_) | TransportError::Other(_) => STATUS_TRANSPORT_FAILURE,
    };
    Outcome::HttpError {
        status_code,
        body: error.to_string(),
    }
}
