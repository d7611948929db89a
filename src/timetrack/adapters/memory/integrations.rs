//! In-memory integration repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::timetrack::{
    domain::{Integration, IntegrationId},
    ports::{IntegrationRepository, IntegrationRepositoryError, IntegrationRepositoryResult},
};

#[derive(Debug, Default)]
struct State {
    integrations: HashMap<IntegrationId, Integration>,
    meta: HashMap<(IntegrationId, String), String>,
    fail_meta_writes: bool,
}

/// Thread-safe in-memory integration repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIntegrationRepository {
    state: Arc<RwLock<State>>,
}

impl InMemoryIntegrationRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an integration record.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationRepositoryError::Persistence`] when the store
    /// lock is poisoned.
    pub fn insert_integration(
        &self,
        integration: Integration,
    ) -> IntegrationRepositoryResult<()> {
        let mut state = self.write()?;
        state.integrations.insert(integration.id(), integration);
        Ok(())
    }

    /// Removes an integration record.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationRepositoryError::Persistence`] when the store
    /// lock is poisoned.
    pub fn remove_integration(&self, id: IntegrationId) -> IntegrationRepositoryResult<()> {
        let mut state = self.write()?;
        state.integrations.remove(&id);
        Ok(())
    }

    /// Makes subsequent metadata writes fail with a persistence error.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationRepositoryError::Persistence`] when the store
    /// lock is poisoned.
    pub fn set_meta_failure(&self, fail: bool) -> IntegrationRepositoryResult<()> {
        let mut state = self.write()?;
        state.fail_meta_writes = fail;
        Ok(())
    }

    /// Returns the stored metadata value for a key.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationRepositoryError::Persistence`] when the store
    /// lock is poisoned.
    pub fn meta_value(
        &self,
        id: IntegrationId,
        key: &str,
    ) -> IntegrationRepositoryResult<Option<String>> {
        let state = self.read()?;
        Ok(state.meta.get(&(id, key.to_owned())).cloned())
    }

    fn write(&self) -> IntegrationRepositoryResult<std::sync::RwLockWriteGuard<'_, State>> {
        self.state.write().map_err(|err| {
            IntegrationRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn read(&self) -> IntegrationRepositoryResult<std::sync::RwLockReadGuard<'_, State>> {
        self.state.read().map_err(|err| {
            IntegrationRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl IntegrationRepository for InMemoryIntegrationRepository {
    async fn find_by_id(
        &self,
        id: IntegrationId,
    ) -> IntegrationRepositoryResult<Option<Integration>> {
        let state = self.read()?;
        Ok(state.integrations.get(&id).cloned())
    }

    async fn upsert_meta(
        &self,
        id: IntegrationId,
        key: &str,
        value: &str,
    ) -> IntegrationRepositoryResult<()> {
        let mut state = self.write()?;
        if !state.integrations.contains_key(&id) {
            return Err(IntegrationRepositoryError::NotFound(id));
        }
        if state.fail_meta_writes {
            return Err(IntegrationRepositoryError::persistence(
                std::io::Error::other("metadata writes disabled"),
            ));
        }
        state.meta.insert((id, key.to_owned()), value.to_owned());
        Ok(())
    }
}
