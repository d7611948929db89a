//! Repository port for progress events.

use crate::schedule::domain::{ProgressEvent, ProgressEventType};
use crate::task::domain::TaskId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for progress event repository operations.
pub type ProgressEventRepositoryResult<T> = Result<T, ProgressEventRepositoryError>;

/// Progress event persistence contract.
///
/// Uniqueness is enforced on (task, type) for the non-periodic kinds and on
/// (task, type, due timestamp) for periodic check-ins; the upsert operations
/// update in place rather than duplicating.
#[async_trait]
pub trait ProgressEventRepository: Send + Sync {
    /// Creates or updates the event keyed by (task, type).
    async fn upsert_by_type(
        &self,
        task_id: TaskId,
        event_type: ProgressEventType,
        due_at: DateTime<Utc>,
        title: &str,
    ) -> ProgressEventRepositoryResult<ProgressEvent>;

    /// Creates the periodic check-in keyed by (task, due timestamp) unless
    /// it already exists.
    async fn upsert_occurrence(
        &self,
        task_id: TaskId,
        due_at: DateTime<Utc>,
        title: &str,
    ) -> ProgressEventRepositoryResult<ProgressEvent>;

    /// Returns the latest periodic check-in due date across the given task
    /// scope (a project and its sub-tasks).
    async fn latest_periodic_due(
        &self,
        scope: &[TaskId],
    ) -> ProgressEventRepositoryResult<Option<DateTime<Utc>>>;

    /// Counts the task's periodic check-ins with `after < due_at < before`.
    ///
    /// Bounds are strict: an event exactly 24 hours away does not collide.
    async fn periodic_count_within(
        &self,
        task_id: TaskId,
        after: DateTime<Utc>,
        before: DateTime<Utc>,
    ) -> ProgressEventRepositoryResult<u32>;

    /// Returns every event scheduled on the task.
    async fn events_for_task(
        &self,
        task_id: TaskId,
    ) -> ProgressEventRepositoryResult<Vec<ProgressEvent>>;
}

/// Errors returned by progress event repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ProgressEventRepositoryError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ProgressEventRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
