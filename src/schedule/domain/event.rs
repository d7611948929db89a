//! Progress events scheduled on tasks.

use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a progress event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressEventId(Uuid);

impl ProgressEventId {
    /// Creates a new random event identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ProgressEventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProgressEventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of progress event.
///
/// The non-periodic kinds are unique per (task, kind); periodic check-ins
/// are unique per (task, kind, due timestamp).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressEventType {
    /// Draft-submission milestone ahead of the deadline.
    DraftSubmission,
    /// Final submission milestone at the deadline.
    FinalSubmission,
    /// Recurring progress check-in.
    PeriodicCheckIn,
}

impl ProgressEventType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DraftSubmission => "draft_submission",
            Self::FinalSubmission => "final_submission",
            Self::PeriodicCheckIn => "periodic_check_in",
        }
    }
}

/// A scheduled progress event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    id: ProgressEventId,
    task_id: TaskId,
    event_type: ProgressEventType,
    due_at: DateTime<Utc>,
    title: String,
}

impl ProgressEvent {
    /// Creates a progress event.
    #[must_use]
    pub fn new(
        task_id: TaskId,
        event_type: ProgressEventType,
        due_at: DateTime<Utc>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: ProgressEventId::new(),
            task_id,
            event_type,
            due_at,
            title: title.into(),
        }
    }

    /// Returns the event identifier.
    #[must_use]
    pub const fn id(&self) -> ProgressEventId {
        self.id
    }

    /// Returns the task the event is scheduled on.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the event kind.
    #[must_use]
    pub const fn event_type(&self) -> ProgressEventType {
        self.event_type
    }

    /// Returns the due timestamp.
    #[must_use]
    pub const fn due_at(&self) -> DateTime<Utc> {
        self.due_at
    }

    /// Returns the event title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Moves the event to a new due date and title.
    pub fn reschedule(&mut self, due_at: DateTime<Utc>, title: impl Into<String>) {
        self.due_at = due_at;
        self.title = title.into();
    }
}
