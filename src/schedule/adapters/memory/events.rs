//! In-memory progress event repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock};

use crate::schedule::{
    domain::{ProgressEvent, ProgressEventType},
    ports::{
        ProgressEventRepository, ProgressEventRepositoryError, ProgressEventRepositoryResult,
    },
};
use crate::task::domain::TaskId;

/// Thread-safe in-memory progress event repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProgressEventRepository {
    state: Arc<RwLock<Vec<ProgressEvent>>>,
}

impl InMemoryProgressEventRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn write(
        &self,
    ) -> ProgressEventRepositoryResult<std::sync::RwLockWriteGuard<'_, Vec<ProgressEvent>>> {
        self.state.write().map_err(|err| {
            ProgressEventRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn read(
        &self,
    ) -> ProgressEventRepositoryResult<std::sync::RwLockReadGuard<'_, Vec<ProgressEvent>>> {
        self.state.read().map_err(|err| {
            ProgressEventRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl ProgressEventRepository for InMemoryProgressEventRepository {
    async fn upsert_by_type(
        &self,
        task_id: TaskId,
        event_type: ProgressEventType,
        due_at: DateTime<Utc>,
        title: &str,
    ) -> ProgressEventRepositoryResult<ProgressEvent> {
        let mut events = self.write()?;
        if let Some(existing) = events
            .iter_mut()
            .find(|event| event.task_id() == task_id && event.event_type() == event_type)
        {
            existing.reschedule(due_at, title);
            return Ok(existing.clone());
        }
        let event = ProgressEvent::new(task_id, event_type, due_at, title);
        events.push(event.clone());
        Ok(event)
    }

    async fn upsert_occurrence(
        &self,
        task_id: TaskId,
        due_at: DateTime<Utc>,
        title: &str,
    ) -> ProgressEventRepositoryResult<ProgressEvent> {
        let mut events = self.write()?;
        if let Some(existing) = events.iter().find(|event| {
            event.task_id() == task_id
                && event.event_type() == ProgressEventType::PeriodicCheckIn
                && event.due_at() == due_at
        }) {
            return Ok(existing.clone());
        }
        let event = ProgressEvent::new(task_id, ProgressEventType::PeriodicCheckIn, due_at, title);
        events.push(event.clone());
        Ok(event)
    }

    async fn latest_periodic_due(
        &self,
        scope: &[TaskId],
    ) -> ProgressEventRepositoryResult<Option<DateTime<Utc>>> {
        let events = self.read()?;
        Ok(events
            .iter()
            .filter(|event| {
                event.event_type() == ProgressEventType::PeriodicCheckIn
                    && scope.contains(&event.task_id())
            })
            .map(ProgressEvent::due_at)
            .max())
    }

    async fn periodic_count_within(
        &self,
        task_id: TaskId,
        after: DateTime<Utc>,
        before: DateTime<Utc>,
    ) -> ProgressEventRepositoryResult<u32> {
        let events = self.read()?;
        let count = events
            .iter()
            .filter(|event| {
                event.task_id() == task_id
                    && event.event_type() == ProgressEventType::PeriodicCheckIn
                    && event.due_at() > after
                    && event.due_at() < before
            })
            .count();
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    async fn events_for_task(
        &self,
        task_id: TaskId,
    ) -> ProgressEventRepositoryResult<Vec<ProgressEvent>> {
        let events = self.read()?;
        Ok(events
            .iter()
            .filter(|event| event.task_id() == task_id)
            .cloned()
            .collect())
    }
}
