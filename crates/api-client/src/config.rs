//! Configuration for the ClickUp API client
//!
//! Supports environment-based configuration with sensible defaults.

use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::time::Duration;

/// Production API base URL
pub const BASE_URL: &str = "https://api.clickup.com/api/v2";

/// Fewest task ids the bulk time-in-status endpoint accepts
pub const MIN_BULK_IDS: usize = 2;

/// Most task ids the bulk time-in-status endpoint accepts
pub const MAX_BULK_IDS: usize = 100;

/// Page size used by list endpoints; a shorter page is the last one
pub const MAX_PAGE_SIZE: usize = 100;

/// Environment variable holding the personal API token
pub const API_TOKEN_ENV: &str = "CLICKUP_API_TOKEN";

/// Environment variable overriding the base URL
pub const API_URL_ENV: &str = "CLICKUP_API_URL";

/// Environment variable overriding the request timeout, in seconds
pub const TIMEOUT_ENV: &str = "CLICKUP_TIMEOUT_SECS";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Client configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API base URL, without trailing slash
    pub base_url: String,
    /// Personal API token
    pub api_token: Option<String>,
    /// Request timeout
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// Task ids sent per bulk call
    pub bulk_batch_size: usize,
    /// Page size that marks the end of a paginated listing
    pub page_size: usize,
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            api_token: None,
            timeout: DEFAULT_TIMEOUT,
            bulk_batch_size: MAX_BULK_IDS,
            page_size: MAX_PAGE_SIZE,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("bulk_batch_size", &self.bulk_batch_size)
            .field("page_size", &self.page_size)
            .finish()
    }
}

impl ClientConfig {
    /// Create configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `CLICKUP_API_TOKEN`: Personal API token (required)
    /// - `CLICKUP_API_URL`: Base URL override
    /// - `CLICKUP_TIMEOUT_SECS`: Request timeout in seconds
    pub fn from_env() -> ApiResult<Self> {
        let api_token = env::var(API_TOKEN_ENV).map_err(|_| ApiError::missing_env(API_TOKEN_ENV))?;

        let base_url = env::var(API_URL_ENV).unwrap_or_else(|_| BASE_URL.to_string());

        let timeout = env::var(TIMEOUT_ENV)
            .ok()
            .and_then(|s| s.parse().ok())
            .map_or(DEFAULT_TIMEOUT, Duration::from_secs);

        Ok(Self {
            base_url,
            api_token: Some(api_token),
            timeout,
            ..Self::default()
        })
    }

    /// Builder-style method to set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builder-style method to set the API token
    #[must_use]
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder-style method to set the bulk batch size
    #[must_use]
    pub fn with_bulk_batch_size(mut self, size: usize) -> Self {
        self.bulk_batch_size = size;
        self
    }

    /// Builder-style method to set the page size
    #[must_use]
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.base_url.is_empty() {
            return Err(ApiError::config("base_url cannot be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ApiError::config("base_url must start with http:// or https://"));
        }

        if self.timeout.is_zero() {
            return Err(ApiError::config("timeout cannot be zero"));
        }

        if !(MIN_BULK_IDS..=MAX_BULK_IDS).contains(&self.bulk_batch_size) {
            return Err(ApiError::config(format!(
                "bulk_batch_size must be between {MIN_BULK_IDS} and {MAX_BULK_IDS}"
            )));
        }

        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(ApiError::config(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "https://api.clickup.com/api/v2");
        assert_eq!(config.timeout, Duration::from_secs(20));
        assert_eq!(config.bulk_batch_size, 100);
        assert_eq!(config.page_size, 100);
        assert!(config.api_token.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = ClientConfig::default()
            .with_base_url("http://localhost:8080")
            .with_api_token("pk_1")
            .with_timeout(Duration::from_secs(60))
            .with_bulk_batch_size(50)
            .with_page_size(10);

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.api_token.as_deref(), Some("pk_1"));
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.bulk_batch_size, 50);
        assert_eq!(config.page_size, 10);
    }

    #[test]
    fn test_validation() {
        assert!(ClientConfig::default().validate().is_ok());
        assert!(ClientConfig::default().with_base_url("").validate().is_err());
        assert!(ClientConfig::default()
            .with_base_url("ftp://api.clickup.com")
            .validate()
            .is_err());
        assert!(ClientConfig::default()
            .with_timeout(Duration::ZERO)
            .validate()
            .is_err());
    }

    #[test]
    fn test_batch_size_bounds() {
        let at = |n| ClientConfig::default().with_bulk_batch_size(n).validate();
        assert!(at(1).is_err());
        assert!(at(2).is_ok());
        assert!(at(100).is_ok());
        assert!(at(101).is_err());

        assert!(ClientConfig::default().with_page_size(0).validate().is_err());
        assert!(ClientConfig::default().with_page_size(101).validate().is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = ClientConfig::default().with_api_token("pk_secret");
        assert!(!format!("{config:?}").contains("pk_secret"));
    }

    #[test]
    fn test_serde_timeout_in_seconds() {
        let json = serde_json::to_value(ClientConfig::default()).unwrap();
        assert_eq!(json["timeout"], 20);
        let back: ClientConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back.timeout, Duration::from_secs(20));
    }
}
