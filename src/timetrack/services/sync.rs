//! Time-tracking sync orchestration.

use crate::config::TimeTrackSettings;
use crate::task::{
    domain::TaskId,
    ports::{TaskRepository, TaskRepositoryError},
};
use crate::timetrack::{
    domain::{Integration, IntegrationId, IntegrationProvider, parse_assignment_location},
    ports::{
        IntegrationRepository, IntegrationRepositoryError, NewRemoteUser, TimeTrackingApi,
    },
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Metadata key holding the remote task identifier.
const META_REMOTE_TASK_ID: &str = "project_task_id";

/// Service-level errors for time-tracking sync.
///
/// Provider API failures never surface here; they leave the sync incomplete
/// for a later retry. These variants are missing local records or local
/// storage failures.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The integration does not exist.
    #[error("integration not found: {0}")]
    IntegrationNotFound(IntegrationId),

    /// The integrated task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// Integration repository operation failed.
    #[error(transparent)]
    Integrations(#[from] IntegrationRepositoryError),

    /// Task repository operation failed.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),
}

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Summary of one sync attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncOutcome {
    /// Whether the remote task identifier was resolved and stored.
    pub remote_task_linked: bool,
    /// Provider accounts requested for participants.
    pub users_provisioned: usize,
}

/// Time-tracking sync service.
#[derive(Clone)]
pub struct TimeTrackSyncService<R, A, T>
where
    R: IntegrationRepository,
    A: TimeTrackingApi,
    T: TaskRepository,
{
    integrations: Arc<R>,
    api: Arc<A>,
    tasks: Arc<T>,
    settings: TimeTrackSettings,
}

impl<R, A, T> TimeTrackSyncService<R, A, T>
where
    R: IntegrationRepository,
    A: TimeTrackingApi,
    T: TaskRepository,
{
    /// Creates a new sync service.
    #[must_use]
    pub const fn new(
        integrations: Arc<R>,
        api: Arc<A>,
        tasks: Arc<T>,
        settings: TimeTrackSettings,
    ) -> Self {
        Self {
            integrations,
            api,
            tasks,
            settings,
        }
    }

    /// Mirrors the integrated task into the remote time-tracking project.
    ///
    /// Creates the remote task, resolves the assignment the provider
    /// reports in its `Location` header, stores the remote task identifier
    /// in the integration metadata, and requests provider accounts for each
    /// accepted participant. Non-time-tracking integrations are a no-op.
    /// Every remote step is best-effort: provider errors are logged and
    /// leave the outcome incomplete rather than failing the sync. An
    /// integration deleted mid-sync is likewise absorbed.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] on missing local records or store failures.
    pub async fn complete_integration(
        &self,
        integration_id: IntegrationId,
    ) -> SyncResult<SyncOutcome> {
        let integration = self
            .integrations
            .find_by_id(integration_id)
            .await?
            .ok_or(SyncError::IntegrationNotFound(integration_id))?;
        if integration.provider() != IntegrationProvider::TimeTracking {
            debug!(%integration_id, provider = integration.provider().as_str(), "sync skipped");
            return Ok(SyncOutcome::default());
        }

        let task = self
            .tasks
            .find_by_id(integration.task_id())
            .await?
            .ok_or(SyncError::TaskNotFound(integration.task_id()))?;

        let name = format!("{}: {}", self.settings.task_name_prefix, task.title());
        let remote_task_linked = self
            .link_remote_task(&integration, &name)
            .await?;

        let participants = self.tasks.accepted_participants(task.id()).await?;
        let mut users_provisioned = 0usize;
        for participant in &participants {
            let profile = participant.profile();
            let user = NewRemoteUser {
                first_name: profile.first_name().to_owned(),
                last_name: profile.last_name().to_owned(),
                email: profile.email().to_owned(),
            };
            match self.api.create_user(user).await {
                Ok(()) => users_provisioned += 1,
                Err(err) => {
                    warn!(email = profile.email(), error = %err, "provider account not created");
                }
            }
        }

        info!(
            %integration_id,
            remote_task_linked, users_provisioned, "time-tracking sync finished"
        );
        Ok(SyncOutcome {
            remote_task_linked,
            users_provisioned,
        })
    }

    /// Creates the remote task and stores its resolved identifier.
    async fn link_remote_task(&self, integration: &Integration, name: &str) -> SyncResult<bool> {
        let response = match self.api.create_task(integration.project_id(), name).await {
            Ok(response) => response,
            Err(err) => {
                warn!(integration_id = %integration.id(), error = %err, "remote task not created");
                return Ok(false);
            }
        };
        let Some(location) = response.location else {
            warn!(integration_id = %integration.id(), "provider sent no assignment location");
            return Ok(false);
        };
        let Some(parsed) = parse_assignment_location(&location) else {
            warn!(integration_id = %integration.id(), location, "unparseable assignment location");
            return Ok(false);
        };
        if parsed.project_id != integration.project_id() {
            warn!(
                integration_id = %integration.id(),
                expected = integration.project_id(),
                reported = parsed.project_id,
                "assignment location names a different project"
            );
            return Ok(false);
        }

        let assignment = match self
            .api
            .task_assignment(parsed.project_id, parsed.assignment_id)
            .await
        {
            Ok(assignment) => assignment,
            Err(err) => {
                warn!(integration_id = %integration.id(), error = %err, "assignment fetch failed");
                return Ok(false);
            }
        };

        match self
            .integrations
            .upsert_meta(
                integration.id(),
                META_REMOTE_TASK_ID,
                &assignment.task_id.to_string(),
            )
            .await
        {
            Ok(()) => Ok(true),
            // The integration was deleted mid-sync; there is nothing left to
            // link, so the sync finishes without a stored remote task id.
            Err(IntegrationRepositoryError::NotFound(id)) => {
                warn!(integration_id = %id, "integration vanished before the link was stored");
                Ok(false)
            }
            Err(err) => Err(SyncError::Integrations(err)),
        }
    }
}
