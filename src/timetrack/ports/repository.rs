//! Repository port for integration records.

use crate::timetrack::domain::{Integration, IntegrationId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for integration repository operations.
pub type IntegrationRepositoryResult<T> = Result<T, IntegrationRepositoryError>;

/// Integration persistence contract.
#[async_trait]
pub trait IntegrationRepository: Send + Sync {
    /// Finds an integration by identifier.
    ///
    /// Returns `None` when the integration does not exist.
    async fn find_by_id(
        &self,
        id: IntegrationId,
    ) -> IntegrationRepositoryResult<Option<Integration>>;

    /// Stores or replaces a metadata entry on the integration.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationRepositoryError::NotFound`] when the integration
    /// does not exist, distinct from storage failures so callers can decide
    /// which to absorb.
    async fn upsert_meta(
        &self,
        id: IntegrationId,
        key: &str,
        value: &str,
    ) -> IntegrationRepositoryResult<()>;
}

/// Errors returned by integration repository implementations.
#[derive(Debug, Clone, Error)]
pub enum IntegrationRepositoryError {
    /// The integration was not found.
    #[error("integration not found: {0}")]
    NotFound(IntegrationId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl IntegrationRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
