//! Classification of non-OK responses
//!
//! First match wins:
//!
//! 1. `429 Too Many Requests` becomes [`ResponseError::RateLimit`], built from
//!    the rate-limit headers alone.
//! 2. A body of the form `{"ECODE": "...", "err": "..."}` becomes
//!    [`ResponseError::Api`].
//! 3. Anything else becomes [`ResponseError::Http`].
//!
//! The service does not return a well-formed error document on every failure
//! path, so an unreadable body degrades to the plain HTTP variant instead of
//! failing to decode.

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

use crate::transport::HttpResponse;

/// Request ceiling for the current window
pub const RATE_LIMIT_LIMIT_HEADER: &str = "x-ratelimit-limit";
/// Requests left in the current window
pub const RATE_LIMIT_REMAINING_HEADER: &str = "x-ratelimit-remaining";
/// Unix time (seconds) at which the window resets
pub const RATE_LIMIT_RESET_HEADER: &str = "x-ratelimit-reset";

/// Rate-limit headers, copied verbatim
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Request ceiling
    pub limit: String,
    /// Remaining quota
    pub remaining: String,
    /// Reset timestamp
    pub reset_at: String,
}

impl RateLimitInfo {
    /// Read the three rate-limit headers; absent ones become empty strings
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            limit: header_string(headers, RATE_LIMIT_LIMIT_HEADER),
            remaining: header_string(headers, RATE_LIMIT_REMAINING_HEADER),
            reset_at: header_string(headers, RATE_LIMIT_RESET_HEADER),
        }
    }

    /// Reset hint as Unix seconds, when it parses
    #[must_use]
    pub fn reset_at_unix(&self) -> Option<i64> {
        self.reset_at.trim().parse().ok()
    }
}

impl fmt::Display for RateLimitInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "limit={} remaining={} reset={}",
            self.limit, self.remaining, self.reset_at
        )
    }
}

/// Server-reported failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseError {
    /// Request was throttled
    #[error("clickup rate limit exceeded: {0}")]
    RateLimit(RateLimitInfo),

    /// Structured error document returned by the service
    #[error("clickup response ECODE={code} err={message} status={status} {status_text}")]
    Api {
        /// Service error code (`ECODE`)
        code: String,
        /// Service error message (`err`)
        message: String,
        /// HTTP status code
        status: u16,
        /// Canonical reason phrase
        status_text: String,
    },

    /// Non-OK status with an unreadable body
    #[error("clickup response [{url}] status: {status} {status_text}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Canonical reason phrase
        status_text: String,
        /// URL of the failed request
        url: String,
    },
}

impl ResponseError {
    /// HTTP status code
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::RateLimit(_) => StatusCode::TOO_MANY_REQUESTS.as_u16(),
            Self::Api { status, .. } | Self::Http { status, .. } => *status,
        }
    }

    /// True only for throttling
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimit(_))
    }
}

#[derive(Deserialize)]
struct ErrorDocument {
    #[serde(rename = "ECODE")]
    code: String,
    #[serde(default)]
    err: String,
}

/// Classify a non-OK response.
///
/// `request_url` is reported by the fallback variant. The function reads the
/// response without consuming it, so the same response always classifies to
/// an equal value.
#[must_use]
pub fn classify(response: &HttpResponse, request_url: &str) -> ResponseError {
    if response.status == StatusCode::TOO_MANY_REQUESTS {
        return ResponseError::RateLimit(RateLimitInfo::from_headers(&response.headers));
    }

    let status = response.status.as_u16();
    let status_text = response
        .status
        .canonical_reason()
        .unwrap_or_default()
        .to_string();

    match serde_json::from_slice::<ErrorDocument>(&response.body) {
        Ok(doc) => ResponseError::Api {
            code: doc.code,
            message: doc.err,
            status,
            status_text,
        },
        Err(_) => ResponseError::Http {
            status,
            status_text,
            url: request_url.to_string(),
        },
    }
}

fn header_string(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://api.clickup.com/api/v2/task/abc";

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse::new(StatusCode::from_u16(status).unwrap()).with_body(body)
    }

    #[test]
    fn test_rate_limit_from_headers() {
        let res = response(429, r#"{"ECODE":"RATE_001","err":"ignored"}"#)
            .with_header("X-RateLimit-Limit", "10000")
            .with_header("X-RateLimit-Remaining", "9999")
            .with_header("X-RateLimit-Reset", "1640818767");

        let err = classify(&res, URL);
        assert_eq!(
            err,
            ResponseError::RateLimit(RateLimitInfo {
                limit: "10000".to_string(),
                remaining: "9999".to_string(),
                reset_at: "1640818767".to_string(),
            })
        );
        assert_eq!(err.status(), 429);
        assert!(err.is_retryable());
    }

    #[test]
    fn test_rate_limit_with_missing_headers() {
        let err = classify(&response(429, ""), URL);
        assert_eq!(err, ResponseError::RateLimit(RateLimitInfo::default()));
        if let ResponseError::RateLimit(info) = err {
            assert_eq!(info.reset_at_unix(), None);
        }
    }

    #[test]
    fn test_structured_error() {
        let err = classify(&response(422, r#"{"ECODE":"fail","err":"error"}"#), URL);
        assert_eq!(
            err,
            ResponseError::Api {
                code: "fail".to_string(),
                message: "error".to_string(),
                status: 422,
                status_text: "Unprocessable Entity".to_string(),
            }
        );
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_unparseable_body_falls_back_to_http_error() {
        let err = classify(&response(422, "{{{badJSON}}}"), URL);
        assert_eq!(
            err,
            ResponseError::Http {
                status: 422,
                status_text: "Unprocessable Entity".to_string(),
                url: URL.to_string(),
            }
        );
    }

    #[test]
    fn test_empty_body_falls_back_to_http_error() {
        let err = classify(&response(502, ""), URL);
        assert!(matches!(err, ResponseError::Http { status: 502, .. }));
    }

    #[test]
    fn test_document_without_ecode_is_http_error() {
        let err = classify(&response(500, r#"{"message":"boom"}"#), URL);
        assert!(matches!(err, ResponseError::Http { status: 500, .. }));
    }

    #[test]
    fn test_missing_err_field_defaults_to_empty() {
        let err = classify(&response(401, r#"{"ECODE":"OAUTH_017"}"#), URL);
        assert!(matches!(
            err,
            ResponseError::Api { ref code, ref message, status: 401, .. }
                if code == "OAUTH_017" && message.is_empty()
        ));
    }

    #[test]
    fn test_classification_is_idempotent() {
        let responses = [
            response(429, "").with_header("x-ratelimit-reset", "1"),
            response(404, r#"{"ECODE":"ITEM_013","err":"Task not found"}"#),
            response(503, "<html>down</html>"),
        ];
        for res in &responses {
            assert_eq!(classify(res, URL), classify(&res.clone(), URL));
        }
    }

    #[test]
    fn test_display_formats() {
        let api = classify(&response(400, r#"{"ECODE":"X","err":"bad"}"#), URL);
        assert_eq!(
            api.to_string(),
            "clickup response ECODE=X err=bad status=400 Bad Request"
        );
        let http = classify(&response(418, "teapot"), URL);
        assert_eq!(
            http.to_string(),
            format!("clickup response [{URL}] status: 418 I'm a teapot")
        );
    }
}
