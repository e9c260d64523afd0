//! Per-call cancellation and deadlines

use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::error::{ApiError, ApiResult};

/// Cancellation signal and optional deadline for one API call.
///
/// Cloning shares the cancellation token, so one token can abort a whole
/// group of calls, such as every chunk of a bulk lookup.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    cancel: CancellationToken,
    timeout: Option<Duration>,
}

impl CallContext {
    /// Context that is never cancelled and has no deadline
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// Builder-style method to set a per-call deadline
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builder-style method to use an external cancellation token
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// The cancellation token observed by calls made with this context
    #[must_use]
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Cancel every call sharing this context's token
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether the token has fired
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Per-call deadline, if any
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Drive `operation` unless the token fires or the deadline passes first.
    ///
    /// The operation future is dropped on cancellation or timeout, which
    /// aborts an in-flight request.
    pub(crate) async fn run<F, T>(&self, operation: F) -> ApiResult<T>
    where
        F: Future<Output = ApiResult<T>>,
    {
        if self.cancel.is_cancelled() {
            return Err(ApiError::Cancelled);
        }

        let bounded = async {
            match self.timeout {
                Some(limit) => tokio::time::timeout(limit, operation)
                    .await
                    .map_err(|_| ApiError::Timeout(limit))?,
                None => operation.await,
            }
        };

        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(ApiError::Cancelled),
            result = bounded => result,
        }
    }
}
