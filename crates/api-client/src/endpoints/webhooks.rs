//! Webhook endpoints and delivery verification
//!
//! - Create, update, delete and list webhooks of a workspace
//! - Event vocabulary and inbound delivery message
//! - [`verify_delivery`]: check the `X-Signature` header of a delivery

use crate::client::ClickupClient;
use crate::context::CallContext;
use crate::endpoints::tasks::path_segment;
use crate::error::{ApiError, ApiResult};
use reqwest::header::HeaderMap;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

pub use clickup_crypto::webhook::{
    verify_webhook_signature, WebhookPayload, WebhookVerification, SIGNATURE_HEADER,
};

/// Webhook API interface
#[derive(Clone, Debug)]
pub struct WebhooksApi {
    client: ClickupClient,
}

impl WebhooksApi {
    /// Create a new webhook API interface
    pub(crate) fn new(client: ClickupClient) -> Self {
        Self { client }
    }

    /// Register a webhook for a workspace
    ///
    /// POST /team/{workspace_id}/webhook
    ///
    /// Keep the returned secret: deliveries are signed with it.
    pub async fn create(
        &self,
        ctx: &CallContext,
        workspace_id: &str,
        request: &CreateWebhookRequest,
    ) -> ApiResult<CreateWebhookResponse> {
        let workspace_id = path_segment("workspace id", workspace_id)?;
        if request.endpoint.is_empty() {
            return Err(ApiError::validation("webhook endpoint cannot be empty"));
        }
        let path = format!("/team/{workspace_id}/webhook");
        self.client.post(ctx, &path, request).await
    }

    /// Change an existing webhook
    ///
    /// PUT /webhook/{webhook_id}
    pub async fn update(
        &self,
        ctx: &CallContext,
        request: &UpdateWebhookRequest,
    ) -> ApiResult<CreateWebhookResponse> {
        let webhook_id = path_segment("webhook id", &request.id)?;
        let path = format!("/webhook/{webhook_id}");
        self.client.put(ctx, &path, request).await
    }

    /// Remove a webhook
    ///
    /// DELETE /webhook/{webhook_id}
    pub async fn delete(&self, ctx: &CallContext, webhook_id: &str) -> ApiResult<()> {
        let webhook_id = path_segment("webhook id", webhook_id)?;
        let path = format!("/webhook/{webhook_id}");
        let _: IgnoredAny = self.client.delete(ctx, &path).await?;
        Ok(())
    }

    /// All webhooks of a workspace
    ///
    /// GET /team/{workspace_id}/webhook
    pub async fn list(&self, ctx: &CallContext, workspace_id: &str) -> ApiResult<WebhooksResponse> {
        let workspace_id = path_segment("workspace id", workspace_id)?;
        let path = format!("/team/{workspace_id}/webhook");
        self.client.get(ctx, &path).await
    }
}

/// Verify a delivery using its request headers.
///
/// A missing or non-text signature header verifies as an empty signature, so
/// the result is invalid rather than an error.
#[must_use]
pub fn verify_delivery(
    headers: &HeaderMap,
    payload: &WebhookPayload,
    secret: &str,
) -> WebhookVerification {
    let received = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    payload.verify(received, secret)
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Event a webhook can subscribe to
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WebhookEvent {
    /// Every event
    #[serde(rename = "*")]
    All,
    #[serde(rename = "taskCreated")]
    TaskCreated,
    #[serde(rename = "taskUpdated")]
    TaskUpdated,
    #[serde(rename = "taskDeleted")]
    TaskDeleted,
    #[serde(rename = "taskPriorityUpdated")]
    TaskPriorityUpdated,
    #[serde(rename = "taskStatusUpdated")]
    TaskStatusUpdated,
    #[serde(rename = "taskAssigneeUpdated")]
    TaskAssigneeUpdated,
    #[serde(rename = "taskDueDateUpdated")]
    TaskDueDateUpdated,
    #[serde(rename = "taskTagUpdated")]
    TaskTagUpdated,
    #[serde(rename = "taskMoved")]
    TaskMoved,
    #[serde(rename = "taskCommentPosted")]
    TaskCommentPosted,
    #[serde(rename = "taskCommentUpdated")]
    TaskCommentUpdated,
    #[serde(rename = "taskTimeEstimateUpdated")]
    TaskTimeEstimateUpdated,
    #[serde(rename = "taskTimeTrackedUpdated")]
    TaskTimeTrackedUpdated,
    #[serde(rename = "listCreated")]
    ListCreated,
    #[serde(rename = "listUpdated")]
    ListUpdated,
    #[serde(rename = "listDeleted")]
    ListDeleted,
    #[serde(rename = "folderCreated")]
    FolderCreated,
    #[serde(rename = "folderUpdated")]
    FolderUpdated,
    #[serde(rename = "folderDeleted")]
    FolderDeleted,
    #[serde(rename = "spaceCreated")]
    SpaceCreated,
    #[serde(rename = "spaceUpdated")]
    SpaceUpdated,
    #[serde(rename = "spaceDeleted")]
    SpaceDeleted,
    #[serde(rename = "goalCreated")]
    GoalCreated,
    #[serde(rename = "goalUpdated")]
    GoalUpdated,
    #[serde(rename = "goalDeleted")]
    GoalDeleted,
    #[serde(rename = "keyResultCreated")]
    KeyResultCreated,
    #[serde(rename = "keyResultUpdated")]
    KeyResultUpdated,
    #[serde(rename = "keyResultDeleted")]
    KeyResultDeleted,
    /// Event name this client does not know
    #[serde(other)]
    Unknown,
}

/// Delivery health reported by the service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookHealth {
    /// `active`, `failing`, `suspended`, ...
    #[serde(default)]
    pub status: String,
    /// Consecutive failed deliveries
    #[serde(default)]
    pub fail_count: i64,
}

/// A registered webhook
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Webhook {
    /// Webhook id
    pub id: String,
    /// Owner user id
    #[serde(default)]
    pub userid: i64,
    /// Workspace id
    #[serde(default, deserialize_with = "optional_id")]
    pub team_id: Option<String>,
    /// Delivery URL
    #[serde(default)]
    pub endpoint: String,
    /// OAuth client id
    #[serde(default)]
    pub client_id: Option<String>,
    /// Subscribed events
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
    /// Task scope
    #[serde(default, deserialize_with = "optional_id")]
    pub task_id: Option<String>,
    /// List scope
    #[serde(default, deserialize_with = "optional_id")]
    pub list_id: Option<String>,
    /// Folder scope
    #[serde(default, deserialize_with = "optional_id")]
    pub folder_id: Option<String>,
    /// Space scope
    #[serde(default, deserialize_with = "optional_id")]
    pub space_id: Option<String>,
    /// Delivery health
    #[serde(default)]
    pub health: Option<WebhookHealth>,
    /// Signing secret
    #[serde(default)]
    pub secret: String,
}

/// Body of a create request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateWebhookRequest {
    /// Delivery URL
    pub endpoint: String,
    /// Events to subscribe to
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub events: Vec<WebhookEvent>,
    /// Restrict to a task
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub task_id: Option<String>,
    /// Restrict to a list
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub list_id: Option<String>,
    /// Restrict to a folder
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub folder_id: Option<String>,
    /// Restrict to a space
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub space_id: Option<String>,
}

impl CreateWebhookRequest {
    /// Subscribe `endpoint` to `events`
    pub fn new(endpoint: impl Into<String>, events: impl IntoIterator<Item = WebhookEvent>) -> Self {
        Self {
            endpoint: endpoint.into(),
            events: events.into_iter().collect(),
            ..Self::default()
        }
    }
}

/// Body of an update request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateWebhookRequest {
    /// Webhook id
    pub id: String,
    /// New delivery URL
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub endpoint: Option<String>,
    /// New event set
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub events: Vec<WebhookEvent>,
    /// `active` or `inactive`
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub status: Option<String>,
}

/// Response to create and update
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateWebhookResponse {
    /// Webhook id
    #[serde(default)]
    pub id: String,
    /// Full webhook, including its secret
    #[serde(default)]
    pub webhook: Webhook,
}

/// Response to list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhooksResponse {
    /// Registered webhooks
    #[serde(default)]
    pub webhooks: Vec<Webhook>,
}

/// Status snapshot inside a history item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryStatus {
    /// Status name
    #[serde(default)]
    pub status: String,
    /// Display color
    #[serde(default)]
    pub color: String,
    /// Status type
    #[serde(default, rename = "type")]
    pub status_type: String,
}

/// One change carried by a delivery
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebhookHistoryItem {
    /// History item id
    #[serde(default)]
    pub id: String,
    /// Change time, Unix milliseconds
    #[serde(default)]
    pub date: String,
    /// Changed field
    #[serde(default)]
    pub field: String,
    /// Parent container id
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Acting user, as sent
    #[serde(default)]
    pub user: serde_json::Value,
    /// Value before the change; shape depends on `field`
    #[serde(default)]
    pub before: serde_json::Value,
    /// Value after the change; shape depends on `field`
    #[serde(default)]
    pub after: serde_json::Value,
}

impl WebhookHistoryItem {
    /// Before and after statuses, for `status` changes
    #[must_use]
    pub fn status_change(&self) -> Option<(HistoryStatus, HistoryStatus)> {
        if self.field != "status" {
            return None;
        }
        let before = serde_json::from_value(self.before.clone()).ok()?;
        let after = serde_json::from_value(self.after.clone()).ok()?;
        Some((before, after))
    }
}

/// Body of a webhook delivery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookEventMessage {
    /// Event type
    pub event: WebhookEvent,
    /// Changes carried by this delivery
    #[serde(default)]
    pub history_items: Vec<WebhookHistoryItem>,
    /// Affected task, for task events
    #[serde(default)]
    pub task_id: Option<String>,
    /// Webhook that produced the delivery
    #[serde(default)]
    pub webhook_id: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

fn optional_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<RawId>::deserialize(deserializer)?.map(|id| match id {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    }))
}
