//! HTTP transport: the request executor every API call goes through.

mod client;
mod codec;
mod error;
mod request;
mod retry;

pub use client::{ApiClient, ApiOutput};
pub use codec::ContentCodec;
pub use error::RequestError;
pub use request::{ApiRequest, Compression, Payload};
pub use retry::{DEFAULT_RETRIES, FailureClass, classify, retry_delay, should_retry};
