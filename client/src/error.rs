//! Error types for the job search client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// Ways a search can fail.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    /// API key or host not configured; no request was sent
    #[error("API credentials not configured")]
    CredentialsMissing,

    /// The request did not complete within the configured timeout
    #[error("request timed out")]
    Timeout,

    /// Connection-level failure
    #[error("network error: {0}")]
    Network(String),

    /// API answered with a non-2xx status
    #[error("API error (status {status}): {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body as returned by the API
        body: String,
    },

    /// 2xx response whose body is not a job list
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl ApiError {
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// The API rejected the call because of its request quota (HTTP 429).
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::Status { status: 429, .. })
    }

    /// Message shown to the user in place of results.
    pub fn user_message(&self) -> String {
        match self {
            Self::CredentialsMissing => "API credentials not configured".to_string(),
            Self::Timeout => "Request timed out. Please try again.".to_string(),
            Self::Network(msg) => format!("Network error: {}", msg),
            Self::Status { status: 429, .. } => {
                "Rate limit exceeded. Please wait a moment and try again.".to_string()
            }
            Self::Status { status, body } => format!("API error: {} - {}", status, body),
            Self::MalformedResponse(msg) => {
                format!("Unexpected response from the job API: {}", msg)
            }
        }
    }
}
