//! Endpoint-specific API implementations
//!
//! Each module provides a typed interface for a set of ClickUp endpoints.
//!
//! | Module | Endpoints | Description |
//! |--------|-----------|-------------|
//! | `tasks` | `/task/...`, `/list/{id}/task` | Time in status, bulk lookups, task listings |
//! | `webhooks` | `/team/{id}/webhook`, `/webhook/{id}` | Webhook CRUD and delivery verification |

pub mod tasks;
pub mod webhooks;

pub use tasks::TasksApi;
pub use webhooks::WebhooksApi;
