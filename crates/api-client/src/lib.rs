//! Typed client for the ClickUp REST API (v2)
//!
//! Every call goes through one dispatcher that authenticates the request,
//! runs it through a pluggable transport and turns failures into typed errors.
//!
//! # Features
//!
//! - **Pluggable authentication**: one [`Authenticator`] per client, API token by default
//! - **Pluggable transport**: `reqwest` by default, anything implementing [`Transport`] in tests
//! - **Classified errors**: rate limits, service error codes and bare HTTP failures
//! - **Bulk lookups**: time-in-status for any number of tasks, chunked to what the service accepts
//! - **Cancellation**: per-call deadline and cancellation token via [`CallContext`]
//! - **Webhooks**: CRUD plus signature verification of deliveries
//!
//! # Example
//!
//! ```rust,no_run
//! use clickup_api_client::{CallContext, ClickupClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads CLICKUP_API_TOKEN
//!     let client = ClickupClient::new()?;
//!     let ctx = CallContext::background();
//!
//!     let history = client
//!         .tasks()
//!         .time_in_status_for_all(&ctx, &["86a1b2c3", "86a1b2c4", "86a1b2c5"], "", false)
//!         .await?;
//!
//!     for (task_id, status) in &history {
//!         println!("{task_id}: {}", status.current_status.status);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod classify;
pub mod client;
pub mod config;
pub mod context;
pub mod endpoints;
pub mod error;
pub mod pagination;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::{ApiTokenAuthenticator, AuthError, Authenticator};
pub use classify::{classify, RateLimitInfo, ResponseError};
pub use client::ClickupClient;
pub use config::{ClientConfig, BASE_URL, MAX_BULK_IDS, MAX_PAGE_SIZE, MIN_BULK_IDS};
pub use context::CallContext;
pub use endpoints::webhooks::verify_delivery;
pub use error::{ApiError, ApiResult};
pub use pagination::TaskPages;
pub use transport::{BoxError, HttpRequest, HttpResponse, ReqwestTransport, Transport};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::auth::{ApiTokenAuthenticator, Authenticator};
    pub use crate::client::ClickupClient;
    pub use crate::config::ClientConfig;
    pub use crate::context::CallContext;
    pub use crate::endpoints::tasks::{TaskQueryOptions, TaskTimeInStatus};
    pub use crate::endpoints::webhooks::{verify_delivery, WebhookEvent, WebhookPayload};
    pub use crate::endpoints::{TasksApi, WebhooksApi};
    pub use crate::error::{ApiError, ApiResult};
}
