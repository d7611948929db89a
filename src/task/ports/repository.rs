//! Repository port for task and participation lookup.

use crate::task::domain::{Participant, ParticipationId, Task, TaskId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
///
/// Job entry points receive a task identifier and resolve it through this
/// port before processing; a missing task is a typed error fatal to that
/// invocation.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Persists changes to an existing task (`pay_distributed` flag).
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Returns the accepted participants of the given task, each paired with
    /// the participant's profile.
    async fn accepted_participants(&self, task_id: TaskId)
    -> TaskRepositoryResult<Vec<Participant>>;

    /// Finds a single participant by participation identifier.
    ///
    /// Returns `None` when the participation does not exist.
    async fn participant(
        &self,
        participation_id: ParticipationId,
    ) -> TaskRepositoryResult<Option<Participant>>;

    /// Returns the identifiers of the task's sub-tasks.
    async fn sub_task_ids(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<TaskId>>;

    /// Returns the earliest activation timestamp among accepted participants
    /// of the task and its sub-tasks.
    async fn earliest_accepted_activation(
        &self,
        task_id: TaskId,
    ) -> TaskRepositoryResult<Option<DateTime<Utc>>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
