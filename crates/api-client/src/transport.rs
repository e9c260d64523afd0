//! HTTP transport seam
//!
//! The client never talks to `reqwest` directly. Every call is expressed as an
//! [`HttpRequest`] and handed to a [`Transport`], which returns the status,
//! headers and fully buffered body. Tests substitute their own transport.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use std::time::Duration;
use url::Url;

use crate::error::{ApiError, ApiResult};

/// Boxed error returned by transports
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Default transport timeout
pub const DEFAULT_TRANSPORT_TIMEOUT: Duration = Duration::from_secs(20);

/// Outgoing request, built by the dispatcher and stamped by the authenticator
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute URL
    pub url: Url,
    /// Request headers
    pub headers: HeaderMap,
    /// Serialized body, only for POST and PUT
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Create a request with no headers and no body
    #[must_use]
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }
}

/// Buffered response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Raw body bytes
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Create an empty response with the given status
    #[must_use]
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    /// Builder-style method to set the body
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Builder-style method to add a header; invalid names or values are ignored
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.insert(name, value);
        }
        self
    }
}

/// Executes one HTTP request.
///
/// Implementations report connection-level failures (refused, DNS, TLS,
/// timeouts) as errors. Any response the server produced, whatever its status,
/// is a success at this layer.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and buffer the response
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, BoxError>;
}

/// [`Transport`] backed by a pooled `reqwest` client
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    inner: Client,
}

impl ReqwestTransport {
    /// Build a transport with the given request timeout
    pub fn new(timeout: Duration) -> ApiResult<Self> {
        let inner = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("clickup-api-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { inner })
    }

    /// Wrap an existing `reqwest` client
    #[must_use]
    pub fn from_client(inner: Client) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, BoxError> {
        let mut builder = self
            .inner
            .request(request.method, request.url)
            .headers(request.headers);

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_reqwest_transport_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/echo"))
            .and(header("content-type", "application/json"))
            .and(body_string(r#"{"name":"x"}"#))
            .respond_with(
                ResponseTemplate::new(201)
                    .insert_header("x-ratelimit-remaining", "42")
                    .set_body_string("created"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();
        let url = Url::parse(&format!("{}/echo", server.uri())).unwrap();
        let mut request = HttpRequest::new(Method::POST, url);
        request
            .headers
            .insert("content-type", "application/json".parse().unwrap());
        request.body = Some(br#"{"name":"x"}"#.to_vec());

        let response = transport.execute(request).await.unwrap();
        assert_eq!(response.status, StatusCode::CREATED);
        assert_eq!(response.body, b"created");
        assert_eq!(response.headers["x-ratelimit-remaining"], "42");
    }

    #[tokio::test]
    async fn test_error_status_is_not_a_transport_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();
        let url = Url::parse(&server.uri()).unwrap();
        let response = transport
            .execute(HttpRequest::new(Method::GET, url))
            .await
            .unwrap();
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_failure() {
        // Port 9 (discard) is not expected to accept HTTP on loopback
        let transport = ReqwestTransport::new(Duration::from_secs(2)).unwrap();
        let url = Url::parse("http://127.0.0.1:9/").unwrap();
        assert!(transport
            .execute(HttpRequest::new(Method::GET, url))
            .await
            .is_err());
    }

    #[test]
    fn test_response_builder() {
        let response = HttpResponse::new(StatusCode::TOO_MANY_REQUESTS)
            .with_header("x-ratelimit-limit", "100")
            .with_body("{}");
        assert_eq!(response.headers["x-ratelimit-limit"], "100");
        assert_eq!(response.body, b"{}");
    }
}
