//! The request executor: authentication, encoding, retry, and error
//! classification for every API call.

use anyhow::{Context, Result, anyhow};
use log::{debug, warn};
use reqwest::header::{
    ACCEPT_ENCODING, AUTHORIZATION, CONTENT_ENCODING, CONTENT_LENGTH, CONTENT_TYPE, HeaderMap,
    HeaderValue,
};
use reqwest::{Response, StatusCode};
use serde_json::Value;
use std::time::Duration;

use crate::config::{ApiServer, Config, SecurityContext};
use crate::{API_VERSION, VERSION};

use super::codec::{ContentCodec, codec_for};
use super::error::RequestError;
use super::request::{ApiRequest, Payload};
use super::retry::{classify, retry_delay, should_retry};

/// Header carrying the API protocol version understood by this client.
const API_VERSION_HEADER: &str = "stratus-api";

/// Decoded reply from the API server.
#[derive(Debug)]
pub enum ApiOutput {
    /// JSON reply, decoded (content-type `application/json`).
    Json(Value),
    /// Anything else, returned byte for byte.
    Bytes(Vec<u8>),
    /// The raw response, untouched (`want_full_response`).
    Full(Response),
}

impl ApiOutput {
    /// The decoded JSON value, or an error for non-JSON replies.
    pub fn into_json(self) -> Result<Value> {
        match self {
            ApiOutput::Json(value) => Ok(value),
            _ => Err(anyhow!("Expected a JSON reply from the API server")),
        }
    }
}

/// Client for the platform API server.
///
/// Holds the server address and security context for its lifetime; both
/// are set once at construction, or replaced wholesale through the
/// setters during process initialization and in test harnesses.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    security: Option<SecurityContext>,
    backoff_unit: Duration,
}

impl ApiClient {
    /// Creates a client for the configured server.
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(format!("stratus/{}", VERSION))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url: config.server.base_url(),
            security: config.security.clone(),
            backoff_unit: Duration::from_secs(1),
        })
    }

    /// Creates a client from the `STRATUS_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(&Config::from_env()?)
    }

    /// Replaces the server address. Requests in flight keep the address
    /// they started with.
    pub fn set_server(&mut self, server: &ApiServer) {
        self.base_url = server.base_url();
    }

    /// Replaces the security context.
    pub fn set_security_context(&mut self, security: SecurityContext) {
        self.security = Some(security);
    }

    /// Changes the backoff unit (1 second by default). The retry
    /// schedule is 2, 4, 8, ... units; harnesses that provoke retries
    /// shrink the unit to keep runs fast.
    pub fn backoff_unit(mut self, unit: Duration) -> Self {
        self.backoff_unit = unit;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Performs one logical API call, retrying as the policy allows.
    ///
    /// Issues at most `max_retries + 1` attempts, sleeping 2, 4, 8, ...
    /// backoff units between them. The last observed error is surfaced
    /// verbatim once the budget is spent or a failure is not safe to
    /// reissue.
    #[tracing::instrument(skip(self, request))]
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiOutput> {
        let url = request.url(&self.base_url);

        let codec = match request.compression.encoding() {
            Some(name) => Some(
                codec_for(request.compression).ok_or(RequestError::CodecUnavailable(name))?,
            ),
            None => None,
        };

        let auth = match &self.security {
            Some(security) => {
                let mut value = HeaderValue::from_str(&security.authorization_header()?)
                    .context("Security context produced an invalid Authorization header")?;
                value.set_sensitive(true);
                Some(value)
            }
            None => None,
        };

        debug!("{} {}...", request.method, url);

        let mut last_error = None;

        for retry in 0..=request.max_retries {
            match self
                .attempt(&request, &url, auth.as_ref(), codec.as_deref())
                .await
            {
                Ok(output) => return Ok(output),
                Err(e) => {
                    let retryable =
                        should_retry(classify(&e), &request.method, request.always_retry);
                    if retry < request.max_retries && retryable {
                        let delay = retry_delay(retry, self.backoff_unit);
                        warn!(
                            "{} {}: {}. Waiting {:?} before retry {} of {}...",
                            request.method,
                            url,
                            e,
                            delay,
                            retry + 1,
                            request.max_retries
                        );
                        tokio::time::sleep(delay).await;
                        last_error = Some(e);
                    } else {
                        return Err(e);
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            anyhow!(
                "Request failed after {} attempts",
                request.max_retries + 1
            )
        }))
    }

    /// JSON-in, JSON-out call to a server route. This is the calling
    /// convention the per-route wrappers use; `retryable` is the
    /// route's retry-safety flag.
    #[tracing::instrument(skip(self, input))]
    pub async fn call(&self, route: &str, input: Value, retryable: bool) -> Result<Value> {
        let output = self
            .execute(ApiRequest::new(route, input).always_retry(retryable))
            .await?;
        output.into_json()
    }

    /// Single attempt without retry.
    async fn attempt(
        &self,
        request: &ApiRequest,
        url: &str,
        auth: Option<&HeaderValue>,
        codec: Option<&dyn ContentCodec>,
    ) -> Result<ApiOutput> {
        let mut headers = request.headers.clone();
        if !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        headers.insert(API_VERSION_HEADER, HeaderValue::from_static(API_VERSION));
        if let Some(auth) = auth {
            headers.insert(AUTHORIZATION, auth.clone());
        }
        if let Some(codec) = codec {
            headers.insert(ACCEPT_ENCODING, HeaderValue::from_static(codec.encoding()));
        }

        let body = match &request.payload {
            Payload::Json(value) => {
                serde_json::to_vec(value).context("Failed to serialize request body")?
            }
            Payload::Raw(bytes) => bytes.clone(),
        };

        let response = self
            .http
            .request(request.method.clone(), url)
            .headers(headers)
            .timeout(request.timeout)
            .body(body)
            .send()
            .await
            .context("Failed to send request to API server")?;

        let status = response.status();
        if status != StatusCode::OK {
            // A JSON body on a failure status is a structured API
            // error; keep the decoded payload for the caller.
            if content_type_is_json(response.headers()) {
                let body: Value = response.json().await.with_context(|| {
                    format!("Failed to decode JSON error body (code {})", status.as_u16())
                })?;
                return Err(RequestError::Api {
                    status: status.as_u16(),
                    body,
                }
                .into());
            }
            return Err(RequestError::Http {
                status: status.as_u16(),
            }
            .into());
        }

        if request.want_full_response {
            return Ok(ApiOutput::Full(response));
        }

        let declared_length = content_length(response.headers());
        let is_json = content_type_is_json(response.headers());
        let encoding = response
            .headers()
            .get(CONTENT_ENCODING)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let bytes = response
            .bytes()
            .await
            .context("Failed to read response body")?;

        if let Some(declared) = declared_length {
            verify_content_length(declared, bytes.len() as u64)?;
        }

        let decoded = match codec {
            Some(codec) if encoding.as_deref() == Some(codec.encoding()) => codec.decode(&bytes)?,
            _ => bytes.to_vec(),
        };

        if is_json {
            let value = serde_json::from_slice(&decoded)
                .context("Failed to decode JSON response from API server")?;
            return Ok(ApiOutput::Json(value));
        }
        Ok(ApiOutput::Bytes(decoded))
    }
}

fn content_type_is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

fn content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

/// A declared content-length that disagrees with the body means the
/// reply was truncated or mangled somewhere on the way.
fn verify_content_length(declared: u64, actual: u64) -> Result<()> {
    if declared != actual {
        return Err(RequestError::ContentLengthMismatch { declared, actual }.into());
    }
    Ok(())
}
