//! Typed failures produced by the request executor.

use serde_json::Value;

/// Failures the transport can produce besides plain network errors.
///
/// Carried inside `anyhow::Error`; callers that need the status code or
/// the server's error payload recover it with `downcast_ref`.
#[derive(Debug)]
pub enum RequestError {
    /// Non-OK status with a JSON error body. The decoded payload is
    /// preserved verbatim for the caller to inspect.
    Api { status: u16, body: Value },
    /// Non-OK status without a JSON body.
    Http { status: u16 },
    /// The content-length header disagrees with the bytes actually
    /// received.
    ContentLengthMismatch { declared: u64, actual: u64 },
    /// Response compression was requested but the codec is not
    /// compiled into this build.
    CodecUnavailable(&'static str),
    /// The security context carries a token type this client cannot
    /// send.
    UnsupportedTokenType(String),
}

impl std::fmt::Display for RequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestError::Api { status, body } => {
                write!(f, "API error (code {}): {}", status, body)
            }
            RequestError::Http { status } => {
                write!(f, "HTTP error (code {})", status)
            }
            RequestError::ContentLengthMismatch { declared, actual } => {
                write!(
                    f,
                    "Received response with content-length header set to {} but content length is {}",
                    declared, actual
                )
            }
            RequestError::CodecUnavailable(name) => {
                write!(
                    f,
                    "{} compression requested, but the {} codec is unavailable",
                    name, name
                )
            }
            RequestError::UnsupportedTokenType(token_type) => {
                write!(
                    f,
                    "Token type '{}' is not supported; only bearer tokens are",
                    token_type
                )
            }
        }
    }
}

impl std::error::Error for RequestError {}

impl RequestError {
    /// HTTP status carried by this failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Api { status, .. } | RequestError::Http { status } => Some(*status),
            _ => None,
        }
    }
}
