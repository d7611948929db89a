//! Task aggregate root.

use super::{Recurrence, TaskDomainError, TaskId, TaskNumber};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Marketplace task or project.
///
/// A task with a `parent` is a sub-task of a project; several scheduling
/// rules differ between the two. The `paid` and `pay_distributed` flags gate
/// the payment distribution engine, which is the only component allowed to
/// set `pay_distributed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    parent: Option<TaskId>,
    title: String,
    task_number: TaskNumber,
    created_at: DateTime<Utc>,
    deadline: Option<DateTime<Utc>>,
    pay: Decimal,
    recurrence: Option<Recurrence>,
    paid: bool,
    pay_distributed: bool,
}

impl Task {
    /// Creates a standalone task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTaskTitle`] when the title is empty
    /// after trimming.
    pub fn new(
        id: TaskId,
        title: impl Into<String>,
        task_number: TaskNumber,
        pay: Decimal,
        created_at: DateTime<Utc>,
    ) -> Result<Self, TaskDomainError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(TaskDomainError::EmptyTaskTitle);
        }
        Ok(Self {
            id,
            parent: None,
            title,
            task_number,
            created_at,
            deadline: None,
            pay,
            recurrence: None,
            paid: false,
            pay_distributed: false,
        })
    }

    /// Marks the task as a sub-task of the given project.
    #[must_use]
    pub const fn with_parent(mut self, parent: TaskId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Sets the deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets the periodic check-in recurrence.
    #[must_use]
    pub const fn with_recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = Some(recurrence);
        self
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the parent project, when this is a sub-task.
    #[must_use]
    pub const fn parent(&self) -> Option<TaskId> {
        self.parent
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the human-facing task number.
    #[must_use]
    pub const fn task_number(&self) -> TaskNumber {
        self.task_number
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the deadline, if one is set.
    #[must_use]
    pub const fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    /// Returns the agreed pay amount.
    #[must_use]
    pub const fn pay(&self) -> Decimal {
        self.pay
    }

    /// Returns the check-in recurrence, if one is configured.
    #[must_use]
    pub const fn recurrence(&self) -> Option<Recurrence> {
        self.recurrence
    }

    /// Returns whether the client has paid for the task.
    #[must_use]
    pub const fn paid(&self) -> bool {
        self.paid
    }

    /// Returns whether every received payment has been fully distributed.
    #[must_use]
    pub const fn pay_distributed(&self) -> bool {
        self.pay_distributed
    }

    /// Renders the description used in payment memos.
    #[must_use]
    pub fn summary(&self) -> String {
        format!("Task #{}: {}", self.task_number, self.title)
    }

    /// Marks the task as paid by the client.
    pub const fn mark_paid(&mut self) {
        self.paid = true;
    }

    /// Marks every received payment as fully distributed.
    ///
    /// Only the payment distribution engine calls this, and only after all
    /// unprocessed payments settled in a single round.
    pub const fn mark_distributed(&mut self) {
        self.pay_distributed = true;
    }
}
