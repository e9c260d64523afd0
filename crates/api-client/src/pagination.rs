//! Page-by-page iteration over list endpoints
//!
//! The service pages with a bare counter and no total. A page shorter than
//! the page size is the last one.

use crate::context::CallContext;
use crate::endpoints::tasks::{Task, TaskQueryOptions, TasksApi};
use crate::error::ApiResult;
use tracing::debug;

/// Lazy, restartable sequence of task pages for one list
#[derive(Debug, Clone)]
pub struct TaskPages {
    api: TasksApi,
    list_id: String,
    options: TaskQueryOptions,
    first_page: u32,
    next_page: u32,
    exhausted: bool,
}

impl TaskPages {
    pub(crate) fn new(api: TasksApi, list_id: String, options: TaskQueryOptions) -> Self {
        let first_page = options.page;
        Self {
            api,
            list_id,
            options,
            first_page,
            next_page: first_page,
            exhausted: false,
        }
    }

    /// Fetch the next page; `None` once the sequence is exhausted.
    ///
    /// A failed fetch leaves the position unchanged, so calling again retries
    /// the same page.
    pub async fn next_page(&mut self, ctx: &CallContext) -> ApiResult<Option<Vec<Task>>> {
        if self.exhausted {
            return Ok(None);
        }

        let options = self.options.clone().with_page(self.next_page);
        let response = self.api.tasks_for_list(ctx, &self.list_id, &options).await?;
        let count = response.tasks.len();

        debug!(list_id = %self.list_id, page = self.next_page, count, "Fetched task page");

        self.next_page += 1;
        if count < self.api.client().config().page_size {
            self.exhausted = true;
        }

        if count == 0 {
            Ok(None)
        } else {
            Ok(Some(response.tasks))
        }
    }

    /// Rewind to the starting page
    pub fn restart(&mut self) {
        self.next_page = self.first_page;
        self.exhausted = false;
    }

    /// Page number the next fetch will request
    #[must_use]
    pub fn current_page(&self) -> u32 {
        self.next_page
    }

    /// Whether the last page has been seen
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Drain the remaining pages into one list
    pub async fn collect_all(&mut self, ctx: &CallContext) -> ApiResult<Vec<Task>> {
        let mut tasks = Vec::new();
        while let Some(page) = self.next_page(ctx).await? {
            tasks.extend(page);
        }
        Ok(tasks)
    }
}
