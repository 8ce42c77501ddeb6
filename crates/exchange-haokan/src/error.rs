//! Error types for the Haokan listing integration.
//!
//! Every variant except the request-validation ones is an upstream failure
//! that ingestion retries before giving up on an account for the cycle.

use thiserror::Error;

/// Errors that can occur when talking to the listing API.
#[derive(Debug, Error)]
pub enum HaokanError {
    /// Network error.
    #[error("network error: {0}")]
    Network(String),

    /// Request timeout.
    #[error("request timeout: {0}")]
    Timeout(String),

    /// Non-success HTTP status.
    #[error("API error: {status_code} - {message}")]
    Api {
        /// HTTP status code.
        status_code: u16,
        /// Response body or reason.
        message: String,
    },

    /// The platform answered 200 but reported a failure in its envelope.
    #[error("platform error: errno {errno} - {message}")]
    Platform {
        /// `errno` / `status` field from the envelope.
        errno: i64,
        /// `errmsg` field from the envelope.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimit {
        /// Seconds to wait before retry.
        retry_after_secs: u64,
    },

    /// Response body could not be decoded.
    #[error("malformed response: {0}")]
    Serialization(String),

    /// Rejected before sending (bad account or video id).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl HaokanError {
    /// Creates an API error from status code and message.
    pub fn api(status_code: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status_code,
            message: message.into(),
        }
    }

    /// Creates a platform envelope error.
    pub fn platform(errno: i64, message: impl Into<String>) -> Self {
        Self::Platform {
            errno,
            message: message.into(),
        }
    }

    /// Creates a rate limit error.
    pub fn rate_limit(retry_after_secs: u64) -> Self {
        Self::RateLimit { retry_after_secs }
    }

    /// Returns true if another attempt could succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::InvalidRequest(_) | Self::Configuration(_))
    }

    /// Returns true for failures that are usually gone on the next attempt.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) | Self::RateLimit { .. } => true,
            Self::Api { status_code, .. } => *status_code >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for HaokanError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_decode() {
            Self::Serialization(err.to_string())
        } else if err.is_connect() {
            Self::Network(format!("connection failed: {err}"))
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for HaokanError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for listing API operations.
pub type Result<T> = std::result::Result<T, HaokanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_construction() {
        let err = HaokanError::api(502, "bad gateway");
        assert!(matches!(err, HaokanError::Api { status_code: 502, .. }));
        assert!(err.to_string().contains("502"));
        assert!(err.to_string().contains("bad gateway"));
    }

    #[test]
    fn test_platform_error_display() {
        let err = HaokanError::platform(40001, "invalid app_id");
        assert!(err.to_string().contains("40001"));
        assert!(err.to_string().contains("invalid app_id"));
    }

    #[test]
    fn test_upstream_failures_are_retryable() {
        assert!(HaokanError::Network("reset".to_string()).is_retryable());
        assert!(HaokanError::Timeout("10s".to_string()).is_retryable());
        assert!(HaokanError::api(404, "not found").is_retryable());
        assert!(HaokanError::platform(1, "busy").is_retryable());
        assert!(HaokanError::Serialization("eof".to_string()).is_retryable());
        assert!(HaokanError::rate_limit(30).is_retryable());
    }

    #[test]
    fn test_request_validation_is_not_retryable() {
        assert!(!HaokanError::InvalidRequest("empty id".to_string()).is_retryable());
        assert!(!HaokanError::Configuration("no url".to_string()).is_retryable());
    }

    #[test]
    fn test_transient_classification() {
        assert!(HaokanError::Timeout("slow".to_string()).is_transient());
        assert!(HaokanError::api(503, "unavailable").is_transient());
        assert!(!HaokanError::api(400, "bad request").is_transient());
        assert!(!HaokanError::platform(1, "busy").is_transient());
    }
}
