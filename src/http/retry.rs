//! Retry policy: which failures are worth another attempt, and when.

use std::time::Duration;

use reqwest::Method;

use super::error::RequestError;

/// Default retry budget for a request. The executor issues at most
/// `max_retries + 1` attempts.
pub const DEFAULT_RETRIES: u32 = 5;

/// Server-side statuses treated as transient.
const HTTP_SERVER_ERRORS: [u16; 4] = [500, 502, 503, 504];

/// What kind of failure an attempt produced, as far as retrying cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// The connection could not be established or died underneath us
    /// before a usable response arrived.
    Connection,
    /// The server answered with a non-OK status.
    Status(u16),
    /// Nothing a retry could fix.
    Fatal,
}

/// Classifies an attempt error for the retry decision.
pub fn classify(error: &anyhow::Error) -> FailureClass {
    if let Some(e) = error.downcast_ref::<RequestError>() {
        return match e.status() {
            Some(status) => FailureClass::Status(status),
            None => FailureClass::Fatal,
        };
    }
    if let Some(e) = error.downcast_ref::<reqwest::Error>() {
        if e.is_connect() || e.is_timeout() || e.is_request() || e.is_body() {
            return FailureClass::Connection;
        }
    }
    FailureClass::Fatal
}

/// Decides whether a failed attempt may be reissued.
///
/// Connection failures are always safe to retry. An HTTP failure is
/// retried only for GET requests, for statuses the server declares
/// transient, or when the caller opted in with `always_retry`. A 422 is
/// a rejection of the request content itself and will never succeed, so
/// it overrides `always_retry`.
pub fn should_retry(class: FailureClass, method: &Method, always_retry: bool) -> bool {
    match class {
        FailureClass::Connection => true,
        FailureClass::Status(422) => false,
        FailureClass::Status(status) => {
            always_retry || *method == Method::GET || HTTP_SERVER_ERRORS.contains(&status)
        }
        FailureClass::Fatal => false,
    }
}

/// Delay before retry number `retry + 1`: 2, 4, 8, ... backoff units.
pub fn retry_delay(retry: u32, unit: Duration) -> Duration {
    unit * 2u32.saturating_pow(retry + 1)
}
