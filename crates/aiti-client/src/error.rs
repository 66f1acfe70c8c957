//! Error types for response generation.

use thiserror::Error;

/// Errors that can occur while obtaining assistant text.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The endpoint could not be reached, timed out, or answered non-2xx.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The endpoint answered but the payload had the wrong shape.
    #[error("upstream protocol error: {0}")]
    UpstreamProtocolError(String),
}

impl From<reqwest::Error> for GenerateError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GenerateError::UpstreamUnavailable(format!("request timed out: {err}"))
        } else {
            GenerateError::UpstreamUnavailable(err.to_string())
        }
    }
}
