//! Request authentication
//!
//! A client holds exactly one [`Authenticator`] for its lifetime. The
//! dispatcher invokes it on every outgoing request, after the request is built
//! and before it reaches the transport.

use reqwest::header::{HeaderValue, AUTHORIZATION};
use std::fmt;
use thiserror::Error;

use crate::transport::HttpRequest;

/// Credential problems detected before a request is sent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No API token was configured
    #[error("no API token configured")]
    MissingToken,

    /// Token contains bytes that cannot appear in a header value
    #[error("API token is not a valid header value")]
    InvalidToken,
}

/// Stamps outgoing requests with credentials.
///
/// Implementations must be safe to call once per request, from many tasks at
/// once, with no effect beyond mutating the request they are given.
pub trait Authenticator: Send + Sync {
    /// Attach credentials to `request`
    fn authenticate(&self, request: &mut HttpRequest) -> Result<(), AuthError>;
}

/// Personal API token sent verbatim in the `Authorization` header
#[derive(Clone)]
pub struct ApiTokenAuthenticator {
    token: String,
}

impl ApiTokenAuthenticator {
    /// Create an authenticator for `token`
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl fmt::Debug for ApiTokenAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiTokenAuthenticator")
            .field("token", &"<redacted>")
            .finish()
    }
}

impl Authenticator for ApiTokenAuthenticator {
    fn authenticate(&self, request: &mut HttpRequest) -> Result<(), AuthError> {
        if self.token.trim().is_empty() {
            return Err(AuthError::MissingToken);
        }

        let mut value = HeaderValue::from_str(&self.token).map_err(|_| AuthError::InvalidToken)?;
        value.set_sensitive(true);
        request.headers.insert(AUTHORIZATION, value);
        Ok(())
    }
}
