//! Main API client implementation

use crate::auth::{ApiTokenAuthenticator, Authenticator};
use crate::classify::classify;
use crate::config::ClientConfig;
use crate::context::CallContext;
use crate::endpoints::{TasksApi, WebhooksApi};
use crate::error::{ApiError, ApiResult};
use crate::transport::{HttpRequest, ReqwestTransport, Transport};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn, Span};
use url::Url;
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// ClickUp API client
///
/// Every resource wrapper issues its HTTP calls through [`ClickupClient::call`],
/// which:
/// - Rejects methods other than GET, POST, PUT and DELETE
/// - Stamps the request through the bound [`Authenticator`]
/// - Honors the per-call [`CallContext`] cancellation token and deadline
/// - Classifies non-OK responses into typed errors
///
/// The client is immutable after construction and cheap to clone.
#[derive(Clone)]
pub struct ClickupClient {
    transport: Arc<dyn Transport>,
    authenticator: Arc<dyn Authenticator>,
    config: Arc<ClientConfig>,
}

impl fmt::Debug for ClickupClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClickupClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ClickupClient {
    /// Create a new client with default configuration from environment
    pub fn new() -> ApiResult<Self> {
        let config = ClientConfig::from_env()?;
        Self::with_config(config)
    }

    /// Create a new client with specific configuration
    ///
    /// Uses the `reqwest` transport and sends the configured token verbatim.
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(config.timeout)?;
        let authenticator = ApiTokenAuthenticator::new(config.api_token.clone().unwrap_or_default());
        Self::with_parts(config, Arc::new(transport), Arc::new(authenticator))
    }

    /// Create a client from explicit parts
    pub fn with_parts(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        authenticator: Arc<dyn Authenticator>,
    ) -> ApiResult<Self> {
        config.validate()?;
        Ok(Self {
            transport,
            authenticator,
            config: Arc::new(config),
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    // -------------------------------------------------------------------------
    // Endpoint API accessors
    // -------------------------------------------------------------------------

    /// Access task endpoints
    #[must_use]
    pub fn tasks(&self) -> TasksApi {
        TasksApi::new(self.clone())
    }

    /// Access webhook endpoints
    #[must_use]
    pub fn webhooks(&self) -> WebhooksApi {
        WebhooksApi::new(self.clone())
    }

    // -------------------------------------------------------------------------
    // Low-level HTTP methods
    // -------------------------------------------------------------------------

    /// Perform a GET request
    pub async fn get<T: DeserializeOwned>(&self, ctx: &CallContext, path: &str) -> ApiResult<T> {
        self.call(ctx, Method::GET, path, None).await
    }

    /// Perform a POST request with a JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        ctx: &CallContext,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let body = serde_json::to_vec(body).map_err(ApiError::Serialize)?;
        self.call(ctx, Method::POST, path, Some(body)).await
    }

    /// Perform a PUT request with a JSON body
    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        ctx: &CallContext,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let body = serde_json::to_vec(body).map_err(ApiError::Serialize)?;
        self.call(ctx, Method::PUT, path, Some(body)).await
    }

    /// Perform a DELETE request
    pub async fn delete<T: DeserializeOwned>(&self, ctx: &CallContext, path: &str) -> ApiResult<T> {
        self.call(ctx, Method::DELETE, path, None).await
    }

    /// Execute one request and decode the `200 OK` body into `T`.
    ///
    /// `path` is appended to the base URL and may carry a query string. `body`
    /// is only sent for POST and PUT.
    #[instrument(skip(self, ctx, body), fields(request_id))]
    pub async fn call<T: DeserializeOwned>(
        &self,
        ctx: &CallContext,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> ApiResult<T> {
        if !is_supported(&method) {
            return Err(ApiError::UnsupportedMethod(method));
        }

        let request_id = Uuid::new_v4().to_string();
        Span::current().record("request_id", request_id.as_str());

        let url = self.url_for(path)?;
        let mut request = HttpRequest::new(method.clone(), url);

        if let Ok(value) = HeaderValue::from_str(&request_id) {
            request.headers.insert(X_REQUEST_ID, value);
        }

        if method == Method::POST || method == Method::PUT {
            request
                .headers
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            request.body = body;
        }

        self.authenticator.authenticate(&mut request)?;

        let request_url = request.url.to_string();
        let start = Instant::now();
        let response = ctx
            .run(async {
                self.transport
                    .execute(request)
                    .await
                    .map_err(ApiError::Transport)
            })
            .await?;

        debug!(
            status = response.status.as_u16(),
            elapsed_ms = start.elapsed().as_millis(),
            "Response received"
        );

        if response.status != StatusCode::OK {
            let error = classify(&response, &request_url);
            warn!(
                status = response.status.as_u16(),
                error = %error,
                "Request failed"
            );
            return Err(error.into());
        }

        decode(&response.body)
    }

    fn url_for(&self, path: &str) -> ApiResult<Url> {
        let base = self.config.base_url.trim_end_matches('/');
        let raw = if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        };
        Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))
    }
}

fn is_supported(method: &Method) -> bool {
    *method == Method::GET
        || *method == Method::POST
        || *method == Method::PUT
        || *method == Method::DELETE
}

/// Decode a success body; an empty body reads as JSON `null`
fn decode<T: DeserializeOwned>(body: &[u8]) -> ApiResult<T> {
    let body = if body.iter().all(u8::is_ascii_whitespace) {
        b"null".as_slice()
    } else {
        body
    };
    serde_json::from_slice(body).map_err(ApiError::Parse)
}
