//! In-memory store for inbound payments and the settlement ledger.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::payment::{
    domain::{LedgerEntry, LedgerEntryId, PaymentId, TaskPayment},
    ports::{
        LedgerRepository, LedgerRepositoryError, LedgerRepositoryResult, PaymentRepository,
        PaymentRepositoryError, PaymentRepositoryResult,
    },
};
use crate::task::domain::{ParticipationId, TaskId};

/// Thread-safe in-memory payment and ledger store.
///
/// The (payment, participation) index models the store's uniqueness
/// enforcement: concurrent creation attempts for the same pair resolve to a
/// single row.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentStore {
    state: Arc<RwLock<InMemoryPaymentState>>,
}

#[derive(Debug, Default)]
struct InMemoryPaymentState {
    payments: HashMap<PaymentId, TaskPayment>,
    entries: HashMap<LedgerEntryId, LedgerEntry>,
    pair_index: HashMap<(PaymentId, ParticipationId), LedgerEntryId>,
}

impl InMemoryPaymentStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an inbound payment.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the lock is poisoned.
    pub fn insert_payment(&self, payment: &TaskPayment) -> PaymentRepositoryResult<()> {
        let mut state = self.write_payments()?;
        state.payments.insert(payment.id(), payment.clone());
        Ok(())
    }

    fn write_payments(
        &self,
    ) -> PaymentRepositoryResult<std::sync::RwLockWriteGuard<'_, InMemoryPaymentState>> {
        self.state.write().map_err(|err| {
            PaymentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn read_payments(
        &self,
    ) -> PaymentRepositoryResult<std::sync::RwLockReadGuard<'_, InMemoryPaymentState>> {
        self.state.read().map_err(|err| {
            PaymentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write_ledger(
        &self,
    ) -> LedgerRepositoryResult<std::sync::RwLockWriteGuard<'_, InMemoryPaymentState>> {
        self.state.write().map_err(|err| {
            LedgerRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn read_ledger(
        &self,
    ) -> LedgerRepositoryResult<std::sync::RwLockReadGuard<'_, InMemoryPaymentState>> {
        self.state.read().map_err(|err| {
            LedgerRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentStore {
    async fn unprocessed_payments(
        &self,
        task_id: TaskId,
    ) -> PaymentRepositoryResult<Vec<TaskPayment>> {
        let state = self.read_payments()?;
        Ok(state
            .payments
            .values()
            .filter(|payment| {
                payment.task_id() == task_id
                    && payment.received().is_some()
                    && !payment.processed()
            })
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: PaymentId) -> PaymentRepositoryResult<Option<TaskPayment>> {
        let state = self.read_payments()?;
        Ok(state.payments.get(&id).cloned())
    }

    async fn update(&self, payment: &TaskPayment) -> PaymentRepositoryResult<()> {
        let mut state = self.write_payments()?;
        if !state.payments.contains_key(&payment.id()) {
            return Err(PaymentRepositoryError::NotFound(payment.id()));
        }
        state.payments.insert(payment.id(), payment.clone());
        Ok(())
    }
}

#[async_trait]
impl LedgerRepository for InMemoryPaymentStore {
    async fn get_or_create(
        &self,
        candidate: LedgerEntry,
    ) -> LedgerRepositoryResult<(LedgerEntry, bool)> {
        let mut state = self.write_ledger()?;
        let pair = (candidate.payment_id(), candidate.participation_id());
        if let Some(existing_id) = state.pair_index.get(&pair) {
            let existing = state
                .entries
                .get(existing_id)
                .cloned()
                .ok_or(LedgerRepositoryError::NotFound(*existing_id))?;
            return Ok((existing, false));
        }
        state.pair_index.insert(pair, candidate.id());
        state.entries.insert(candidate.id(), candidate.clone());
        Ok((candidate, true))
    }

    async fn find_entry(&self, id: LedgerEntryId) -> LedgerRepositoryResult<Option<LedgerEntry>> {
        let state = self.read_ledger()?;
        Ok(state.entries.get(&id).cloned())
    }

    async fn entries_for_payment(
        &self,
        payment_id: PaymentId,
    ) -> LedgerRepositoryResult<Vec<LedgerEntry>> {
        let state = self.read_ledger()?;
        Ok(state
            .entries
            .values()
            .filter(|entry| entry.payment_id() == payment_id)
            .cloned()
            .collect())
    }

    async fn update(&self, entry: &LedgerEntry) -> LedgerRepositoryResult<()> {
        let mut state = self.write_ledger()?;
        if !state.entries.contains_key(&entry.id()) {
            return Err(LedgerRepositoryError::NotFound(entry.id()));
        }
        state.entries.insert(entry.id(), entry.clone());
        Ok(())
    }
}
