//! Client Error Types
//!
//! Every failed call to the assistant service collapses into a single
//! user-visible kind ("the request failed"). The variants below only exist so
//! the diagnostic log can say *why*.

use thiserror::Error;

/// Errors that can occur when talking to the assistant service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// Server answered with a non-success status
    #[error("HTTP error {status}: {body}")]
    Status { status: u16, body: String },

    /// No answer within the configured timeout
    #[error("Request timeout")]
    Timeout,

    /// Could not connect to the service
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Any other transport-level failure
    #[error("Request failed: {0}")]
    Transport(String),

    /// Body could not be decoded
    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl RequestError {
    /// Whether the failure came from the server rather than the network
    pub fn is_status(&self) -> bool {
        matches!(self, RequestError::Status { .. })
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<reqwest::Error> for RequestError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RequestError::Timeout
        } else if e.is_connect() {
            RequestError::Unavailable(e.to_string())
        } else if e.is_decode() {
            RequestError::Decode(e.to_string())
        } else {
            RequestError::Transport(e.to_string())
        }
    }
}

/// Reasons a submission is refused before any state changes
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejected {
    /// Query was empty after trimming
    #[error("Query is empty")]
    EmptyQuery,

    /// A previous submission is still waiting for its response
    #[error("A request is already in flight")]
    Busy,
}

/// Result type for service calls
pub type RequestResult<T> = Result<T, RequestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        let err = RequestError::Status {
            status: 503,
            body: "down".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP error 503: down");
        assert!(err.is_status());
        assert!(!RequestError::Timeout.is_status());
    }
}
