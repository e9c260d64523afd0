//! Task endpoints
//!
//! - Time in status for one task (`/task/{id}/time_in_status`)
//! - Bulk time in status (`/task/bulk_time_in_status/task_ids`), chunked
//! - Tasks of a list, one page at a time or as a [`TaskPages`] sequence
//! - Single task lookup

use crate::client::ClickupClient;
use crate::config::{MAX_BULK_IDS, MIN_BULK_IDS};
use crate::context::CallContext;
use crate::error::{ApiError, ApiResult};
use crate::pagination::TaskPages;
use chrono::{DateTime, Utc};
use clickup_core::{partition, status_interval, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, instrument};
use url::{form_urlencoded, Url};

/// Task API interface
#[derive(Clone, Debug)]
pub struct TasksApi {
    client: ClickupClient,
}

impl TasksApi {
    /// Create a new task API interface
    pub(crate) fn new(client: ClickupClient) -> Self {
        Self { client }
    }

    /// Client this interface issues calls through
    #[must_use]
    pub fn client(&self) -> &ClickupClient {
        &self.client
    }

    /// Status history of a single task
    ///
    /// GET /task/{task_id}/time_in_status
    pub async fn time_in_status(
        &self,
        ctx: &CallContext,
        task_id: &str,
        workspace_id: &str,
        use_custom_task_ids: bool,
    ) -> ApiResult<TaskTimeInStatus> {
        require_workspace(workspace_id, use_custom_task_ids)?;
        let task_id = path_segment("task id", task_id)?;

        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("custom_task_ids", bool_str(use_custom_task_ids))
            .append_pair("team_id", workspace_id)
            .finish();

        let path = format!("/task/{task_id}/time_in_status?{query}");
        self.client.get(ctx, &path).await
    }

    /// Status history of 2 to 100 tasks, keyed by task id
    ///
    /// GET /task/bulk_time_in_status/task_ids
    ///
    /// The ids are sent in chunks of the configured bulk batch size, one call
    /// per chunk, in order. The first failing chunk fails the whole lookup.
    pub async fn bulk_time_in_status<S: AsRef<str>>(
        &self,
        ctx: &CallContext,
        task_ids: &[S],
        workspace_id: &str,
        use_custom_task_ids: bool,
    ) -> ApiResult<HashMap<String, TaskTimeInStatus>> {
        require_workspace(workspace_id, use_custom_task_ids)?;

        if task_ids.len() < MIN_BULK_IDS || task_ids.len() > MAX_BULK_IDS {
            return Err(ApiError::validation(format!(
                "must provide between {MIN_BULK_IDS} and {MAX_BULK_IDS} task ids, got {}",
                task_ids.len()
            )));
        }

        self.fetch_chunked(ctx, task_ids, workspace_id, use_custom_task_ids)
            .await
    }

    /// Status history of any number of tasks, keyed by task id
    ///
    /// Chunks of two or more ids go to the bulk endpoint; a lone trailing id
    /// goes to the single-task endpoint.
    pub async fn time_in_status_for_all<S: AsRef<str>>(
        &self,
        ctx: &CallContext,
        task_ids: &[S],
        workspace_id: &str,
        use_custom_task_ids: bool,
    ) -> ApiResult<HashMap<String, TaskTimeInStatus>> {
        require_workspace(workspace_id, use_custom_task_ids)?;

        if task_ids.is_empty() {
            return Err(ApiError::validation("must provide at least one task id"));
        }

        self.fetch_chunked(ctx, task_ids, workspace_id, use_custom_task_ids)
            .await
    }

    #[instrument(skip(self, ctx, task_ids), fields(total = task_ids.len()))]
    async fn fetch_chunked<S: AsRef<str>>(
        &self,
        ctx: &CallContext,
        task_ids: &[S],
        workspace_id: &str,
        use_custom_task_ids: bool,
    ) -> ApiResult<HashMap<String, TaskTimeInStatus>> {
        let chunks = partition(task_ids, self.client.config().bulk_batch_size)
            .map_err(|e| ApiError::validation(e.to_string()))?;

        let mut merged = HashMap::with_capacity(task_ids.len());
        for (index, chunk) in chunks.iter().enumerate() {
            debug!(chunk = index, size = chunk.len(), "Fetching time in status");
            let part = self
                .fetch_chunk(ctx, chunk, workspace_id, use_custom_task_ids)
                .await?;
            merged.extend(part);
        }

        Ok(merged)
    }

    async fn fetch_chunk<S: AsRef<str>>(
        &self,
        ctx: &CallContext,
        chunk: &[S],
        workspace_id: &str,
        use_custom_task_ids: bool,
    ) -> ApiResult<HashMap<String, TaskTimeInStatus>> {
        if let [only] = chunk {
            let id = only.as_ref();
            let status = self
                .time_in_status(ctx, id, workspace_id, use_custom_task_ids)
                .await?;
            return Ok(HashMap::from([(id.to_string(), status)]));
        }

        let mut query = form_urlencoded::Serializer::new(String::new());
        query
            .append_pair("custom_task_ids", bool_str(use_custom_task_ids))
            .append_pair("team_id", workspace_id);
        for id in chunk {
            query.append_pair("task_ids", id.as_ref());
        }

        let path = format!("/task/bulk_time_in_status/task_ids?{}", query.finish());
        self.client.get(ctx, &path).await
    }

    /// One page of the tasks in a list
    ///
    /// GET /list/{list_id}/task
    ///
    /// A page holding fewer than the configured page size is the last one.
    pub async fn tasks_for_list(
        &self,
        ctx: &CallContext,
        list_id: &str,
        options: &TaskQueryOptions,
    ) -> ApiResult<GetTasksResponse> {
        let list_id = path_segment("list id", list_id)?;
        let path = format!("/list/{list_id}/task?{}", options.to_query());
        self.client.get(ctx, &path).await
    }

    /// Lazy page sequence over the tasks of a list, starting at `options.page`
    #[must_use]
    pub fn list_pages(&self, list_id: impl Into<String>, options: TaskQueryOptions) -> TaskPages {
        TaskPages::new(self.clone(), list_id.into(), options)
    }

    /// A single task
    ///
    /// GET /task/{task_id}
    pub async fn task_by_id(
        &self,
        ctx: &CallContext,
        task_id: &str,
        workspace_id: &str,
        use_custom_task_ids: bool,
        include_subtasks: bool,
    ) -> ApiResult<Task> {
        require_workspace(workspace_id, use_custom_task_ids)?;
        let task_id = path_segment("task id", task_id)?;

        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("custom_task_ids", bool_str(use_custom_task_ids))
            .append_pair("include_subtasks", bool_str(include_subtasks))
            .append_pair("team_id", workspace_id)
            .finish();

        let path = format!("/task/{task_id}?{query}");
        self.client.get(ctx, &path).await
    }
}

fn require_workspace(workspace_id: &str, use_custom_task_ids: bool) -> ApiResult<()> {
    if use_custom_task_ids && workspace_id.is_empty() {
        return Err(ApiError::validation(
            "workspace id must be provided when querying by custom task id",
        ));
    }
    Ok(())
}

/// Validate an id and percent-encode it as a single path segment
///
/// Empty ids, dot segments and ids containing `/`, `?` or `#` are rejected.
pub(crate) fn path_segment(what: &str, id: &str) -> ApiResult<String> {
    if id.is_empty() {
        return Err(ApiError::validation(format!("{what} cannot be empty")));
    }
    if matches!(id, "." | "..") {
        return Err(ApiError::validation(format!("{what} cannot be a dot segment: {id}")));
    }
    if id.contains(['/', '?', '#']) {
        return Err(ApiError::validation(format!("{what} contains reserved characters: {id}")));
    }

    let mut scratch = Url::parse("http://segment.invalid/")
        .map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
    scratch
        .path_segments_mut()
        .map_err(|()| ApiError::InvalidUrl(format!("cannot encode {what}: {id}")))?
        .pop_if_empty()
        .push(id);
    Ok(scratch.path().trim_start_matches('/').to_string())
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Time accumulated in a status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalTime {
    /// Minutes spent in the status
    #[serde(default)]
    pub by_minute: i64,
    /// Entry time, Unix milliseconds as a decimal string
    #[serde(default)]
    pub since: String,
}

impl TotalTime {
    /// Start and end instants of the period
    pub fn interval(&self) -> CoreResult<(DateTime<Utc>, DateTime<Utc>)> {
        status_interval(&self.since, self.by_minute)
    }
}

/// Status the task is in now
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentStatus {
    /// Status name
    #[serde(default)]
    pub status: String,
    /// Display color
    #[serde(default)]
    pub color: String,
    /// Time in the status so far
    #[serde(default)]
    pub total_time: TotalTime,
}

/// A status the task passed through
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusHistoryEntry {
    /// Status name
    #[serde(default)]
    pub status: String,
    /// Display color
    #[serde(default)]
    pub color: String,
    /// Status type (`open`, `custom`, `closed`, ...)
    #[serde(default, rename = "type")]
    pub status_type: String,
    /// Time spent in the status
    #[serde(default)]
    pub total_time: TotalTime,
    /// Position of the status in the workflow
    #[serde(default)]
    pub orderindex: i64,
}

/// Status history of one task
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskTimeInStatus {
    /// Current status
    #[serde(default)]
    pub current_status: CurrentStatus,
    /// Statuses in workflow order
    #[serde(default)]
    pub status_history: Vec<StatusHistoryEntry>,
}

/// Workspace member as embedded in tasks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamUser {
    /// User id
    #[serde(default)]
    pub id: i64,
    /// Display name
    #[serde(default)]
    pub username: Option<String>,
    /// Email address
    #[serde(default)]
    pub email: Option<String>,
    /// Avatar color
    #[serde(default)]
    pub color: Option<String>,
    /// Initials
    #[serde(default)]
    pub initials: Option<String>,
    /// Avatar URL
    #[serde(default, rename = "profilePicture")]
    pub profile_picture: Option<String>,
}

/// Status embedded in a task
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatus {
    /// Status id
    #[serde(default)]
    pub id: Option<String>,
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

/// Task tag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name
    pub name: String,
    /// Foreground color
    #[serde(default)]
    pub tag_fg: Option<String>,
    /// Background color
    #[serde(default)]
    pub tag_bg: Option<String>,
}

/// Container reference (list, folder or space)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Container id
    pub id: String,
    /// Container name
    #[serde(default)]
    pub name: Option<String>,
}

/// A task
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Task id
    pub id: String,
    /// Workspace-specific custom id
    #[serde(default)]
    pub custom_id: Option<String>,
    /// Task name
    #[serde(default)]
    pub name: String,
    /// Plain-text description
    #[serde(default)]
    pub text_content: Option<String>,
    /// Description
    #[serde(default)]
    pub description: Option<String>,
    /// Current status
    #[serde(default)]
    pub status: TaskStatus,
    /// Creation time, Unix milliseconds
    #[serde(default)]
    pub date_created: Option<String>,
    /// Last update time, Unix milliseconds
    #[serde(default)]
    pub date_updated: Option<String>,
    /// Close time, Unix milliseconds
    #[serde(default)]
    pub date_closed: Option<String>,
    /// Whether the task is archived
    #[serde(default)]
    pub archived: bool,
    /// Creator
    #[serde(default)]
    pub creator: TeamUser,
    /// Assignees
    #[serde(default)]
    pub assignees: Vec<TeamUser>,
    /// Watchers
    #[serde(default)]
    pub watchers: Vec<TeamUser>,
    /// Tags
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// Parent task id for subtasks
    #[serde(default)]
    pub parent: Option<String>,
    /// Due date, Unix milliseconds
    #[serde(default)]
    pub due_date: Option<String>,
    /// Start date, Unix milliseconds
    #[serde(default)]
    pub start_date: Option<String>,
    /// Estimate in milliseconds
    #[serde(default)]
    pub time_estimate: Option<i64>,
    /// Tracked time in milliseconds
    #[serde(default)]
    pub time_spent: Option<i64>,
    /// Workspace id
    #[serde(default)]
    pub team_id: Option<String>,
    /// Link to the task in the web app
    #[serde(default)]
    pub url: Option<String>,
    /// List holding the task
    #[serde(default)]
    pub list: Option<Location>,
    /// Folder holding the list
    #[serde(default)]
    pub folder: Option<Location>,
    /// Space holding the folder
    #[serde(default)]
    pub space: Option<Location>,
    /// Subtasks, when requested
    #[serde(default)]
    pub subtasks: Vec<Task>,
}

/// One page of tasks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetTasksResponse {
    /// Tasks on the page
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// Sort key for task listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBy {
    /// Task id
    Id,
    /// Creation time
    Created,
    /// Last update time
    Updated,
    /// Due date
    DueDate,
}

impl OrderBy {
    /// Query parameter value
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Created => "created",
            Self::Updated => "updated",
            Self::DueDate => "due_date",
        }
    }
}

/// Filters and ordering for task listings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQueryOptions {
    /// Zero-based page number
    pub page: u32,
    /// Include archived tasks
    pub include_archived: bool,
    /// Include subtasks
    pub include_subtasks: bool,
    /// Include closed tasks
    pub include_closed: bool,
    /// Reverse the ordering
    pub reverse: bool,
    /// Only these statuses
    pub statuses: Vec<String>,
    /// Only these assignee ids
    pub assignees: Vec<String>,
    /// Due after (Unix ms)
    pub due_date_gt: Option<i64>,
    /// Due before (Unix ms)
    pub due_date_lt: Option<i64>,
    /// Created after (Unix ms)
    pub date_created_gt: Option<i64>,
    /// Created before (Unix ms)
    pub date_created_lt: Option<i64>,
    /// Updated after (Unix ms)
    pub date_updated_gt: Option<i64>,
    /// Updated before (Unix ms)
    pub date_updated_lt: Option<i64>,
    /// Sort key
    pub order_by: Option<OrderBy>,
}

impl TaskQueryOptions {
    /// Create empty options (first page, no filters)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page number
    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Include archived tasks
    #[must_use]
    pub fn with_archived(mut self, include: bool) -> Self {
        self.include_archived = include;
        self
    }

    /// Include subtasks
    #[must_use]
    pub fn with_subtasks(mut self, include: bool) -> Self {
        self.include_subtasks = include;
        self
    }

    /// Include closed tasks
    #[must_use]
    pub fn with_closed(mut self, include: bool) -> Self {
        self.include_closed = include;
        self
    }

    /// Restrict to a status
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.statuses.push(status.into());
        self
    }

    /// Restrict to an assignee
    #[must_use]
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignees.push(assignee.into());
        self
    }

    /// Set the sort key and direction
    #[must_use]
    pub fn with_order(mut self, order_by: OrderBy, reverse: bool) -> Self {
        self.order_by = Some(order_by);
        self.reverse = reverse;
        self
    }

    /// Encode as a query string
    #[must_use]
    pub fn to_query(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query.append_pair("page", &self.page.to_string());

        for (flag, key) in [
            (self.include_archived, "archived"),
            (self.include_subtasks, "subtasks"),
            (self.include_closed, "include_closed"),
            (self.reverse, "reverse"),
        ] {
            if flag {
                query.append_pair(key, "true");
            }
        }

        for status in &self.statuses {
            query.append_pair("statuses[]", status);
        }
        for assignee in &self.assignees {
            query.append_pair("assignees[]", assignee);
        }

        for (value, key) in [
            (self.due_date_gt, "due_date_gt"),
            (self.due_date_lt, "due_date_lt"),
            (self.date_created_gt, "date_created_gt"),
            (self.date_created_lt, "date_created_lt"),
            (self.date_updated_gt, "date_updated_gt"),
            (self.date_updated_lt, "date_updated_lt"),
        ] {
            if let Some(value) = value {
                query.append_pair(key, &value.to_string());
            }
        }

        if let Some(order_by) = self.order_by {
            query.append_pair("order_by", order_by.as_str());
        }

        query.finish()
    }
}
