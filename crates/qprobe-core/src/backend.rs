use std::time::Duration;

use async_trait::async_trait;
use qprobe_model::NativeRow;
use tokio::time::Instant;
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

use crate::{BackendError, ClientInitError, Credentials};

/// Longest deadline a [`QueryContext`] accepts.
pub const MAX_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);

/// Deadline-bound, cancellable context a query executes under.
///
/// Cloning shares the cancellation token; cancelling any clone cancels all of them.
#[derive(Debug, Clone)]
pub struct QueryContext {
    deadline: Instant,
    cancel: CancellationToken,
}

impl QueryContext {
    /// Context whose deadline is `timeout` from now, clamped to [`MAX_TIMEOUT`].
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Instant::now() + timeout.min(MAX_TIMEOUT),
            cancel: CancellationToken::new(),
        }
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Time left until the deadline, zero once it passed.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Resolves once the context is cancelled.
    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.cancel.cancelled()
    }
}

/// An authenticated connection to one query endpoint.
#[async_trait]
pub trait QueryClient: Send + Sync + 'static {
    /// Run `query` against `database` and return the primary result table.
    ///
    /// Implementations should stop work and return [`BackendError::Cancelled`] once `ctx` is cancelled,
    /// or [`BackendError::DeadlineExceeded`] once its deadline passed.
    async fn query(
        &self,
        database: &str,
        query: &str,
        ctx: &QueryContext,
    ) -> Result<Vec<NativeRow>, BackendError>;
}

/// Constructs and authenticates [`QueryClient`]s.
///
/// The [`crate::ClientCache`] calls this at most once per endpoint until a call succeeds.
#[async_trait]
pub trait ClientFactory: Send + Sync + 'static {
    type Client: QueryClient;

    async fn connect(
        &self,
        endpoint: &str,
        credentials: &Credentials,
    ) -> Result<Self::Client, ClientInitError>;
}
