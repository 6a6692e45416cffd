//! Description of one logical API call.

use std::time::Duration;

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;

use super::retry::DEFAULT_RETRIES;

/// Request body: structured JSON, or bytes passed through untouched.
#[derive(Debug, Clone)]
pub enum Payload {
    Json(Value),
    Raw(Vec<u8>),
}

/// Response compression negotiated with the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    #[default]
    None,
    Snappy,
}

impl Compression {
    /// Name used in the encoding headers, if any compression is
    /// requested.
    pub fn encoding(&self) -> Option<&'static str> {
        match self {
            Compression::None => None,
            Compression::Snappy => Some("snappy"),
        }
    }
}

/// One logical call: route, payload, and delivery knobs.
///
/// Immutable once handed to the executor, which may attempt it several
/// times. The timeout applies per attempt, not across retries.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub route: String,
    pub payload: Payload,
    pub method: Method,
    pub headers: HeaderMap,
    pub timeout: Duration,
    pub want_full_response: bool,
    pub compression: Compression,
    pub max_retries: u32,
    pub always_retry: bool,
}

impl ApiRequest {
    /// A POST of `input` to `route` with the default delivery settings.
    pub fn new(route: impl Into<String>, input: Value) -> Self {
        Self {
            route: route.into(),
            payload: Payload::Json(input),
            method: Method::POST,
            headers: HeaderMap::new(),
            timeout: Duration::from_secs(3600),
            want_full_response: false,
            compression: Compression::None,
            max_retries: DEFAULT_RETRIES,
            always_retry: false,
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sends `bytes` as the body verbatim instead of a JSON document.
    pub fn raw_payload(mut self, bytes: Vec<u8>) -> Self {
        self.payload = Payload::Raw(bytes);
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the raw response instead of a decoded body.
    pub fn want_full_response(mut self, want: bool) -> Self {
        self.want_full_response = want;
        self
    }

    pub fn compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Marks the request as safe to reissue even when it is not a GET
    /// and the failure status is not a transient server error.
    pub fn always_retry(mut self, always_retry: bool) -> Self {
        self.always_retry = always_retry;
        self
    }

    /// Absolute URL for this request. Routes that already carry a
    /// scheme are used verbatim.
    pub(crate) fn url(&self, base_url: &str) -> String {
        if self.route.starts_with("http://") || self.route.starts_with("https://") {
            self.route.clone()
        } else {
            format!("{}{}", base_url, self.route)
        }
    }
}
