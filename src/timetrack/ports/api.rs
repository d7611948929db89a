//! Outbound port for the time-tracking provider API.

use async_trait::async_trait;
use thiserror::Error;

/// Result type for provider API calls.
pub type TimeTrackingApiResult<T> = Result<T, TimeTrackingApiError>;

/// Errors returned by the provider API.
#[derive(Debug, Clone, Error)]
pub enum TimeTrackingApiError {
    /// The provider rejected the request.
    #[error("provider rejected request: {0}")]
    Rejected(String),

    /// The provider could not be reached.
    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

/// Response to a remote task creation.
///
/// The provider returns the created resource's path in a `Location` header
/// rather than a response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTaskResponse {
    /// Location path of the created assignment, when the provider sent one.
    pub location: Option<String>,
}

/// A remote task assignment within a provider project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskAssignment {
    /// Identifier of the remote task the assignment points at.
    pub task_id: u64,
}

/// A provider account to create for a participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRemoteUser {
    /// Participant's first name.
    pub first_name: String,
    /// Participant's last name.
    pub last_name: String,
    /// Participant's email address.
    pub email: String,
}

/// Time-tracking provider contract.
#[async_trait]
pub trait TimeTrackingApi: Send + Sync {
    /// Creates a task in the remote project and returns the assignment
    /// location.
    async fn create_task(
        &self,
        project_id: u64,
        name: &str,
    ) -> TimeTrackingApiResult<RemoteTaskResponse>;

    /// Fetches a task assignment within a project.
    async fn task_assignment(
        &self,
        project_id: u64,
        assignment_id: u64,
    ) -> TimeTrackingApiResult<TaskAssignment>;

    /// Creates a provider account.
    async fn create_user(&self, user: NewRemoteUser) -> TimeTrackingApiResult<()>;
}
