//! Wire types and error definitions for the backing store.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest slice of a raw error body carried into an error message.
const MAX_RAW_MESSAGE_CHARS: usize = 512;

/// Errors that can occur when calling the backing store.
///
/// Every operation classifies its failures into exactly these variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    /// The store answered 429 Too Many Requests.
    #[error("backing store rate limit exceeded")]
    RateLimited,

    /// Any other non-2xx answer, or a 2xx answer that could not be used.
    #[error("backing store returned {status}: {message}")]
    Remote { status: u16, message: String },

    /// Transport-level failure (connect, timeout, broken body).
    #[error("backing store unreachable: {0}")]
    Unreachable(String),
}

impl UpstreamError {
    /// Short label used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::RateLimited => "rate_limited",
            UpstreamError::Remote { .. } => "remote_error",
            UpstreamError::Unreachable(_) => "unreachable",
        }
    }
}

/// Errors raised while constructing the store client.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("invalid upstream base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Success envelope wrapping every 2xx payload.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub(crate) data: Option<T>,
    pub(crate) status: Option<String>,
}

impl<T> Envelope<T> {
    /// Unwrap the payload, treating `data: null` as a remote failure.
    pub(crate) fn into_data(self, status: StatusCode) -> Result<T, UpstreamError> {
        match self.data {
            Some(data) => Ok(data),
            None => Err(UpstreamError::Remote {
                status: status.as_u16(),
                message: self
                    .status
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| "response carried no data".to_string()),
            }),
        }
    }
}

/// Error envelope returned with non-2xx answers.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    status: Option<String>,
    error: Option<String>,
}

/// Body of the store's delete-by-name call.
#[derive(Debug, Serialize)]
pub(crate) struct DeleteByName<'a> {
    pub(crate) name: &'a str,
}

/// Map a non-2xx answer onto the error taxonomy.
///
/// Shared by every operation so that callers classify failures identically.
pub(crate) fn classify_failure(status: StatusCode, body: &str) -> UpstreamError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return UpstreamError::RateLimited;
    }

    let non_blank = |field: Option<String>| field.filter(|m| !m.trim().is_empty());
    let from_envelope = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| non_blank(envelope.error).or_else(|| non_blank(envelope.status)));

    let message = from_envelope
        .or_else(|| {
            let raw = body.trim();
            (!raw.is_empty()).then(|| raw.chars().take(MAX_RAW_MESSAGE_CHARS).collect())
        })
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());

    UpstreamError::Remote {
        status: status.as_u16(),
        message,
    }
}

/// Decode a 2xx body into its envelope, or classify the failure.
pub(crate) fn decode<T: serde::de::DeserializeOwned>(
    status: StatusCode,
    body: &str,
) -> Result<Envelope<T>, UpstreamError> {
    if !status.is_success() {
        return Err(classify_failure(status, body));
    }
    serde_json::from_str(body).map_err(|e| UpstreamError::Remote {
        status: status.as_u16(),
        message: format!("undecodable response body: {}", e),
    })
}
