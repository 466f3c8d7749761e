//! Description API error types.

use std::sync::Arc;

/// Errors from the description API client.
///
/// None of these reach callers of [`Describer`](terravue_core::Describer);
/// they are logged and reported as "no description".
#[derive(Debug, Clone, thiserror::Error)]
pub enum DescribeError {
    /// Authentication failed (invalid API key).
    #[error("authentication failed: invalid API key")]
    AuthError,

    /// Rate limited by the API.
    #[error("rate limited: too many requests")]
    RateLimited,

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),

    /// The API answered without any text.
    #[error("empty completion")]
    EmptyCompletion,
}

impl From<reqwest::Error> for DescribeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { DescribeError::Timeout } else { DescribeError::Network(Arc::new(err)) }
    }
}
