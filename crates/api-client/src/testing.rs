//! In-process transport for unit tests

use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::auth::ApiTokenAuthenticator;
use crate::client::ClickupClient;
use crate::config::ClientConfig;
use crate::transport::{BoxError, HttpRequest, HttpResponse, Transport};

type Responder = Box<dyn Fn(&HttpRequest) -> Result<HttpResponse, BoxError> + Send + Sync>;

/// Transport that answers from a closure and records every request it sees
pub(crate) struct ScriptedTransport {
    responder: Responder,
    requests: Mutex<Vec<HttpRequest>>,
    delay: Option<Duration>,
}

impl ScriptedTransport {
    pub(crate) fn new(
        responder: impl Fn(&HttpRequest) -> Result<HttpResponse, BoxError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Always answer `200 OK` with `body`
    pub(crate) fn ok_json(body: &str) -> Self {
        let body = body.to_string();
        Self::new(move |_| Ok(HttpResponse::new(StatusCode::OK).with_body(body.clone())))
    }

    /// Sleep before answering; the request is recorded first
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, BoxError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.responder)(&request)
    }
}

/// Client with default config and token `pk_test` over `transport`
pub(crate) fn test_client(transport: Arc<ScriptedTransport>) -> ClickupClient {
    ClickupClient::with_parts(
        ClientConfig::default().with_api_token("pk_test"),
        transport,
        Arc::new(ApiTokenAuthenticator::new("pk_test")),
    )
    .unwrap()
}

/// Query values for `key`, in order
pub(crate) fn query_values(request: &HttpRequest, key: &str) -> Vec<String> {
    request
        .url
        .query_pairs()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
        .collect()
}
