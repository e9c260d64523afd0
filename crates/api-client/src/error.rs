//! Error types for the API client

use reqwest::Method;
use std::time::Duration;
use thiserror::Error;

use crate::auth::AuthError;
use crate::classify::{RateLimitInfo, ResponseError};
use crate::transport::BoxError;

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API client errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// Caller input rejected before any network call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Authenticator could not stamp the request
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// Method outside GET, POST, PUT and DELETE
    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(Method),

    /// Base URL and path did not form a valid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Request body could not be serialized
    #[error("Failed to serialize request body: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Connection-level failure reported by the transport
    #[error("HTTP request failed: {0}")]
    Transport(#[source] BoxError),

    /// Per-call deadline elapsed
    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    /// Per-call cancellation token fired
    #[error("Request cancelled")]
    Cancelled,

    /// Server answered with a non-OK status
    #[error(transparent)]
    Response(#[from] ResponseError),

    /// OK response whose body did not match the expected shape
    #[error("Failed to parse response: {0}")]
    Parse(#[source] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing environment variable
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
}

impl ApiError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a missing env var error
    pub fn missing_env(var: impl Into<String>) -> Self {
        Self::MissingEnvVar(var.into())
    }

    /// Check if this error is worth retrying later.
    ///
    /// Only a rate-limit response qualifies; its reset hint says when.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Response(e) if e.is_retryable())
    }

    /// Rate-limit details, if the server throttled the call
    #[must_use]
    pub fn rate_limit(&self) -> Option<&RateLimitInfo> {
        match self {
            Self::Response(ResponseError::RateLimit(info)) => Some(info),
            _ => None,
        }
    }

    /// HTTP status of a server-reported failure
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Response(e) => Some(e.status()),
            _ => None,
        }
    }

    /// True for errors raised before any network call was attempted
    #[must_use]
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::Auth(_)
                | Self::UnsupportedMethod(_)
                | Self::InvalidUrl(_)
                | Self::Serialize(_)
                | Self::Config(_)
                | Self::MissingEnvVar(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate_limited() -> ApiError {
        ApiError::Response(ResponseError::RateLimit(RateLimitInfo {
            limit: "100".to_string(),
            remaining: "0".to_string(),
            reset_at: "1640818767".to_string(),
        }))
    }

    #[test]
    fn test_only_rate_limit_is_retryable() {
        assert!(rate_limited().is_retryable());
        assert!(!ApiError::validation("bad").is_retryable());
        assert!(!ApiError::Cancelled.is_retryable());
        assert!(!ApiError::Response(ResponseError::Http {
            status: 503,
            status_text: "Service Unavailable".to_string(),
            url: "https://api.clickup.com/api/v2/team".to_string(),
        })
        .is_retryable());
    }

    #[test]
    fn test_rate_limit_accessor() {
        let err = rate_limited();
        assert_eq!(err.rate_limit().map(|r| r.reset_at.as_str()), Some("1640818767"));
        assert_eq!(err.status(), Some(429));
        assert!(ApiError::Cancelled.rate_limit().is_none());
    }

    #[test]
    fn test_local_errors() {
        assert!(ApiError::validation("x").is_local());
        assert!(ApiError::Auth(AuthError::MissingToken).is_local());
        assert!(ApiError::UnsupportedMethod(Method::PATCH).is_local());
        assert!(!rate_limited().is_local());
        assert!(!ApiError::Timeout(Duration::from_secs(1)).is_local());
    }

    #[test]
    fn test_display_passes_through_response_error() {
        let err = ApiError::Response(ResponseError::Api {
            code: "OAUTH_025".to_string(),
            message: "Oauth token not found".to_string(),
            status: 401,
            status_text: "Unauthorized".to_string(),
        });
        let text = err.to_string();
        assert!(text.contains("OAUTH_025"));
        assert!(text.contains("401"));
    }
}
