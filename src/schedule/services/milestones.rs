//! Milestone and check-in scheduling.
//!
//! Projects and tasks carry submission milestones derived from the deadline
//! and recurring progress check-ins derived from the configured update
//! interval. Both operations are idempotent: milestones are upserted by
//! (task, kind) and check-ins deduplicated within a 24-hour window, so
//! re-running after a deadline change moves events instead of duplicating
//! them.

use crate::config::MilestoneSettings;
use crate::schedule::{
    domain::{ProgressEvent, ProgressEventType, next_occurrence, shift_off_weekend},
    ports::{ProgressEventRepository, ProgressEventRepositoryError},
};
use crate::task::{
    domain::{Task, TaskId},
    ports::{TaskRepository, TaskRepositoryError},
};
use chrono::Duration;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Title of the draft-submission milestone.
const DRAFT_TITLE: &str = "Final draft";

/// Title of the final-submission milestone.
const SUBMIT_TITLE: &str = "Submit work";

/// Title of each periodic check-in.
const CHECK_IN_TITLE: &str = "Progress update";

/// Service-level errors for milestone scheduling.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// Task repository operation failed.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),

    /// Progress event repository operation failed.
    #[error(transparent)]
    Events(#[from] ProgressEventRepositoryError),
}

/// Result type for scheduling operations.
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Milestone and check-in scheduler.
#[derive(Clone)]
pub struct MilestoneSchedulerService<T, E, C>
where
    T: TaskRepository,
    E: ProgressEventRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    events: Arc<E>,
    settings: MilestoneSettings,
    clock: Arc<C>,
}

impl<T, E, C> MilestoneSchedulerService<T, E, C>
where
    T: TaskRepository,
    E: ProgressEventRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new scheduler service.
    #[must_use]
    pub const fn new(tasks: Arc<T>, events: Arc<E>, settings: MilestoneSettings, clock: Arc<C>) -> Self {
        Self {
            tasks,
            events,
            settings,
            clock,
        }
    }

    /// Schedules both submission milestones and periodic check-ins for a
    /// freshly created or updated task.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError`] on missing tasks or store failures.
    pub async fn initialize_progress_events(&self, task_id: TaskId) -> SchedulerResult<()> {
        self.update_submit_milestones(task_id).await?;
        self.update_periodic_checkins(task_id).await?;
        Ok(())
    }

    /// Creates or moves the submission milestones derived from the deadline.
    ///
    /// Tasks without a deadline carry no submission milestones and this is a
    /// no-op. The final-submission milestone always lands on the deadline.
    /// Sub-tasks get their draft milestone on the deadline as well; for
    /// standalone tasks the draft precedes the deadline by an offset that
    /// widens for high-value tasks with at least a week of runway.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError`] on missing tasks or store failures.
    pub async fn update_submit_milestones(
        &self,
        task_id: TaskId,
    ) -> SchedulerResult<Vec<ProgressEvent>> {
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or(SchedulerError::TaskNotFound(task_id))?;
        let Some(deadline) = task.deadline() else {
            debug!(%task_id, "no deadline, submission milestones skipped");
            return Ok(Vec::new());
        };

        let draft_due = if task.parent().is_some() {
            deadline
        } else {
            deadline - Duration::days(self.draft_offset_days(&task))
        };
        let draft = self
            .events
            .upsert_by_type(
                task_id,
                ProgressEventType::DraftSubmission,
                draft_due,
                DRAFT_TITLE,
            )
            .await?;
        let submit = self
            .events
            .upsert_by_type(
                task_id,
                ProgressEventType::FinalSubmission,
                deadline,
                SUBMIT_TITLE,
            )
            .await?;
        info!(%task_id, draft_due = %draft_due, %deadline, "submission milestones scheduled");
        Ok(vec![draft, submit])
    }

    /// Extends the periodic check-in schedule up to the present.
    ///
    /// Sub-tasks delegate to their parent project; check-ins are only ever
    /// scheduled on the project. The walk resumes from the latest existing
    /// check-in across the project and its sub-tasks, or from the earliest
    /// accepted participation when none exist yet, and steps by the
    /// configured recurrence. Occurrences landing on a weekend shift to the
    /// following Monday, occurrences within 24 hours of an existing check-in
    /// or past the deadline are dropped, and the walk stops after the first
    /// occurrence due in the future.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError`] on missing tasks or store failures.
    pub async fn update_periodic_checkins(
        &self,
        task_id: TaskId,
    ) -> SchedulerResult<Vec<ProgressEvent>> {
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or(SchedulerError::TaskNotFound(task_id))?;
        let target = if let Some(parent_id) = task.parent() {
            self.tasks
                .find_by_id(parent_id)
                .await?
                .ok_or(SchedulerError::TaskNotFound(parent_id))?
        } else {
            task
        };
        let Some(recurrence) = target.recurrence() else {
            debug!(task_id = %target.id(), "no recurrence, check-ins skipped");
            return Ok(Vec::new());
        };

        let mut scope = self.tasks.sub_task_ids(target.id()).await?;
        scope.push(target.id());

        let now = self.clock.utc();
        let mut anchor = match self.events.latest_periodic_due(&scope).await? {
            Some(latest) if latest > now => {
                debug!(task_id = %target.id(), due = %latest, "future check-in already scheduled");
                return Ok(Vec::new());
            }
            Some(latest) => latest,
            None => {
                let Some(activated) = self
                    .tasks
                    .earliest_accepted_activation(target.id())
                    .await?
                else {
                    debug!(task_id = %target.id(), "no accepted participation, check-ins skipped");
                    return Ok(Vec::new());
                };
                activated
            }
        };

        let mut scheduled = Vec::new();
        while let Some(next) = next_occurrence(anchor, recurrence) {
            let due = shift_off_weekend(next);
            let within_deadline = target.deadline().is_none_or(|deadline| due < deadline);
            if within_deadline {
                let window = Duration::hours(24);
                let collisions = self
                    .events
                    .periodic_count_within(target.id(), due - window, due + window)
                    .await?;
                if collisions == 0 {
                    let event = self
                        .events
                        .upsert_occurrence(target.id(), due, CHECK_IN_TITLE)
                        .await?;
                    scheduled.push(event);
                }
            }
            if due > now {
                break;
            }
            anchor = due;
        }
        info!(task_id = %target.id(), count = scheduled.len(), "check-ins scheduled");
        Ok(scheduled)
    }

    /// Resolves the draft offset for a standalone task.
    fn draft_offset_days(&self, task: &Task) -> i64 {
        let period = task
            .deadline()
            .map_or(Duration::zero(), |deadline| deadline - task.created_at());
        if task.pay() > self.settings.draft_pay_threshold
            && period.num_days() >= self.settings.long_period_days
        {
            self.settings.long_offset_days
        } else {
            self.settings.short_offset_days
        }
    }
}
