//! Provider integration records.

use crate::task::domain::TaskId;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an integration record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntegrationId(Uuid);

impl IntegrationId {
    /// Creates a new random integration identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an integration identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for IntegrationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for IntegrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of external provider an integration connects to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationProvider {
    /// Time-tracking provider.
    TimeTracking,
    /// Issue-tracking provider.
    IssueTracking,
}

impl IntegrationProvider {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TimeTracking => "time_tracking",
            Self::IssueTracking => "issue_tracking",
        }
    }
}

/// Link between a task and an external provider project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Integration {
    id: IntegrationId,
    task_id: TaskId,
    provider: IntegrationProvider,
    project_id: u64,
}

impl Integration {
    /// Creates an integration record.
    #[must_use]
    pub const fn new(
        id: IntegrationId,
        task_id: TaskId,
        provider: IntegrationProvider,
        project_id: u64,
    ) -> Self {
        Self {
            id,
            task_id,
            provider,
            project_id,
        }
    }

    /// Returns the integration identifier.
    #[must_use]
    pub const fn id(&self) -> IntegrationId {
        self.id
    }

    /// Returns the linked task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the provider kind.
    #[must_use]
    pub const fn provider(&self) -> IntegrationProvider {
        self.provider
    }

    /// Returns the remote project identifier.
    #[must_use]
    pub const fn project_id(&self) -> u64 {
        self.project_id
    }
}
