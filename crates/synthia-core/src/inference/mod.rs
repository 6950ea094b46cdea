//! Resilient invocation of remote inference endpoints.
//!
//! A call flows through three pieces: the [`RetryPolicy`] decides what a status
//! code means, the [`InferenceInvoker`] sends requests and sleeps between
//! warming-up retries, and the validator turns an accepted body into a
//! terminal [`Outcome`].
//!
//! ```text
//! InferenceRequest → send → decide ─┬─ 200 → validate → Success | EmptyResult | Malformed
//!                      ↑            ├─ 503 (attempts left) → notify, sleep ─┐
//!                      └────────────┼───────────────────────────────────────┘
//!                                   ├─ 503 (last attempt) → ExhaustedRetries
//!                                   └─ other → HttpError
//! ```

pub mod invoker;
pub mod outcome;
pub mod policy;
pub mod request;
pub mod transport;
pub mod validate;

pub use invoker::{invoke_configured, InferenceInvoker};
pub use outcome::{GeneratedImage, Outcome, Payload, RetryNotice};
pub use policy::{RetryDecision, RetryPolicy};
pub use request::{Endpoint, EndpointKind, Endpoints, InferenceRequest, RequestBody, RequestInput};
pub use transport::{HttpTransport, RawResponse, Transport};
