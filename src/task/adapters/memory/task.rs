//! In-memory task repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{Participant, ParticipationId, Task, TaskId},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    participants: HashMap<ParticipationId, Participant>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a task.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the lock is poisoned.
    pub fn insert_task(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = lock_write(&self.state)?;
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    /// Seeds a participant.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the lock is poisoned.
    pub fn insert_participant(&self, participant: &Participant) -> TaskRepositoryResult<()> {
        let mut state = lock_write(&self.state)?;
        state
            .participants
            .insert(participant.participation().id(), participant.clone());
        Ok(())
    }
}

fn lock_write(
    state: &Arc<RwLock<InMemoryTaskState>>,
) -> TaskRepositoryResult<std::sync::RwLockWriteGuard<'_, InMemoryTaskState>> {
    state
        .write()
        .map_err(|err| TaskRepositoryError::persistence(std::io::Error::other(err.to_string())))
}

fn lock_read(
    state: &Arc<RwLock<InMemoryTaskState>>,
) -> TaskRepositoryResult<std::sync::RwLockReadGuard<'_, InMemoryTaskState>> {
    state
        .read()
        .map_err(|err| TaskRepositoryError::persistence(std::io::Error::other(err.to_string())))
}

/// Returns the ids of `task_id` and every task whose parent is `task_id`.
fn project_scope(state: &InMemoryTaskState, task_id: TaskId) -> Vec<TaskId> {
    let mut scope = vec![task_id];
    scope.extend(
        state
            .tasks
            .values()
            .filter(|task| task.parent() == Some(task_id))
            .map(Task::id),
    );
    scope
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = lock_read(&self.state)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = lock_write(&self.state)?;
        if !state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::NotFound(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn accepted_participants(
        &self,
        task_id: TaskId,
    ) -> TaskRepositoryResult<Vec<Participant>> {
        let state = lock_read(&self.state)?;
        Ok(state
            .participants
            .values()
            .filter(|participant| {
                let participation = participant.participation();
                participation.task_id() == task_id && participation.accepted()
            })
            .cloned()
            .collect())
    }

    async fn participant(
        &self,
        participation_id: ParticipationId,
    ) -> TaskRepositoryResult<Option<Participant>> {
        let state = lock_read(&self.state)?;
        Ok(state.participants.get(&participation_id).cloned())
    }

    async fn sub_task_ids(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<TaskId>> {
        let state = lock_read(&self.state)?;
        Ok(state
            .tasks
            .values()
            .filter(|task| task.parent() == Some(task_id))
            .map(Task::id)
            .collect())
    }

    async fn earliest_accepted_activation(
        &self,
        task_id: TaskId,
    ) -> TaskRepositoryResult<Option<DateTime<Utc>>> {
        let state = lock_read(&self.state)?;
        let scope = project_scope(&state, task_id);
        Ok(state
            .participants
            .values()
            .filter(|participant| {
                let participation = participant.participation();
                participation.accepted() && scope.contains(&participation.task_id())
            })
            .filter_map(|participant| participant.participation().activated_at())
            .min())
    }
}
