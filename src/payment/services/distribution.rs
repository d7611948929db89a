//! Payment distribution engine.
//!
//! Drives every received, unprocessed payment of a paid task through the
//! appropriate payment rail until settled or terminally failed for the
//! round. Safe to invoke repeatedly: already-settled shares are skipped and
//! already-initiated bridge transactions are polled rather than re-sent.

use crate::config::PaymentSettings;
use crate::payment::{
    domain::{
        BridgePayoutRequest, BridgeTransaction, BtcAmount, LedgerEntry, LedgerEntryId, PaymentId,
        SettlementStatus, TaskPayment, payout_type_for,
    },
    ports::{
        BridgeGateway, DirectSendGateway, DirectSendRequest, LedgerRepository,
        LedgerRepositoryError, PaymentRepository, PaymentRepositoryError,
    },
};
use crate::task::{
    domain::{
        BtcAddress, Participant, ParticipationId, PayoutMethod, PayoutRail, Task, TaskId,
        UserProfile,
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Service-level errors for payment distribution.
///
/// Gateway failures never surface here; they mark the affected share failed
/// for the round. These variants are programming or data errors, fatal to
/// the job invocation and surfaced to the queue's retry mechanism.
#[derive(Debug, Error)]
pub enum DistributionError {
    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// A ledger entry references a payment that no longer exists.
    #[error("payment record missing: {0}")]
    PaymentMissing(PaymentId),

    /// A ledger entry references a participation that no longer exists.
    #[error("participation record missing: {0}")]
    ParticipationMissing(ParticipationId),

    /// Task repository operation failed.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),

    /// Payment repository operation failed.
    #[error(transparent)]
    Payments(#[from] PaymentRepositoryError),

    /// Ledger repository operation failed.
    #[error(transparent)]
    Ledger(#[from] LedgerRepositoryError),
}

/// Result type for distribution operations.
pub type DistributionResult<T> = Result<T, DistributionError>;

/// Summary of one distribution round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DistributionOutcome {
    /// Whether the task was marked fully distributed this round.
    pub task_distributed: bool,
    /// Payments whose every share settled this round.
    pub payments_processed: usize,
    /// Payments left for the next invocation.
    pub payments_pending: usize,
}

/// Payment distribution engine.
#[derive(Clone)]
pub struct PaymentDistributionService<T, P, L, D, B, C>
where
    T: TaskRepository,
    P: PaymentRepository,
    L: LedgerRepository,
    D: DirectSendGateway,
    B: BridgeGateway,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    payments: Arc<P>,
    ledger: Arc<L>,
    direct: Arc<D>,
    bridge: Arc<B>,
    settings: PaymentSettings,
    clock: Arc<C>,
}

impl<T, P, L, D, B, C> PaymentDistributionService<T, P, L, D, B, C>
where
    T: TaskRepository,
    P: PaymentRepository,
    L: LedgerRepository,
    D: DirectSendGateway,
    B: BridgeGateway,
    C: Clock + Send + Sync,
{
    /// Creates a new distribution service.
    #[must_use]
    pub const fn new(
        tasks: Arc<T>,
        payments: Arc<P>,
        ledger: Arc<L>,
        direct: Arc<D>,
        bridge: Arc<B>,
        settings: PaymentSettings,
        clock: Arc<C>,
    ) -> Self {
        Self {
            tasks,
            payments,
            ledger,
            direct,
            bridge,
            settings,
            clock,
        }
    }

    /// Attempts to fully distribute every received, unprocessed payment of
    /// the task to its accepted participants.
    ///
    /// No-op unless the task is paid and not yet distributed. Each
    /// participant's share is independent: a failed share leaves its
    /// payment pending for the next invocation and never aborts the pass.
    /// The task is marked distributed only when every unprocessed payment
    /// was processed in this round.
    ///
    /// # Errors
    ///
    /// Returns [`DistributionError`] on missing entities or store failures;
    /// gateway failures are absorbed per share.
    pub async fn distribute_task_payment(
        &self,
        task_id: TaskId,
    ) -> DistributionResult<DistributionOutcome> {
        let mut task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or(DistributionError::TaskNotFound(task_id))?;
        if !task.paid() || task.pay_distributed() {
            debug!(%task_id, paid = task.paid(), "distribution skipped");
            return Ok(DistributionOutcome::default());
        }

        let participants = self.tasks.accepted_participants(task_id).await?;
        let payments = self.payments.unprocessed_payments(task_id).await?;

        let mut processed = 0usize;
        let mut pending = 0usize;
        for payment in &payments {
            if self.process_payment(&task, payment, &participants).await? {
                let mut settled = payment.clone();
                settled.mark_processed();
                self.payments.update(&settled).await?;
                processed += 1;
            } else {
                pending += 1;
            }
        }

        let task_distributed = !payments.is_empty() && pending == 0;
        if task_distributed {
            task.mark_distributed();
            self.tasks.update(&task).await?;
        }
        info!(
            %task_id,
            processed, pending, task_distributed, "distribution round finished"
        );
        Ok(DistributionOutcome {
            task_distributed,
            payments_processed: processed,
            payments_pending: pending,
        })
    }

    /// Settles every share of one payment; returns whether all of them
    /// reported sent.
    ///
    /// Participants without a payout account are skipped entirely: they
    /// neither settle nor block the payment. An empty share list counts as
    /// failure.
    async fn process_payment(
        &self,
        task: &Task,
        payment: &TaskPayment,
        participants: &[Participant],
    ) -> DistributionResult<bool> {
        let mut attempted = 0u32;
        let mut sent = 0u32;
        for participant in participants {
            let Some(payout) = participant.profile().payout() else {
                continue;
            };
            attempted += 1;
            if self.settle_share(task, payment, participant, payout).await? {
                sent += 1;
            }
        }
        Ok(attempted > 0 && attempted == sent)
    }

    /// Drives a single participant share through its rail.
    async fn settle_share(
        &self,
        task: &Task,
        payment: &TaskPayment,
        participant: &Participant,
        payout: &PayoutMethod,
    ) -> DistributionResult<bool> {
        let candidate = LedgerEntry::new(
            payment.id(),
            participant.participation().id(),
            &*self.clock,
        );
        let (entry, created) = self.ledger.get_or_create(candidate).await?;

        if created || entry.status() == SettlementStatus::Pending {
            return match payout.rail() {
                PayoutRail::Direct => {
                    self.dispatch_direct(task, payment, participant, payout, entry)
                        .await
                }
                PayoutRail::Bridge => {
                    self.dispatch_bridge(payment, participant, payout, entry)
                        .await
                }
            };
        }

        match entry.status() {
            SettlementStatus::Initiated if payout.rail() == PayoutRail::Bridge => {
                self.poll_bridge(&entry).await
            }
            // Dispatched in an earlier round; nothing left to send.
            SettlementStatus::Processing | SettlementStatus::Settled => Ok(true),
            _ => Ok(false),
        }
    }

    /// Sends a share immediately through the direct gateway.
    async fn dispatch_direct(
        &self,
        task: &Task,
        payment: &TaskPayment,
        participant: &Participant,
        payout: &PayoutMethod,
        mut entry: LedgerEntry,
    ) -> DistributionResult<bool> {
        let destination = entry
            .destination()
            .filter(|address| BtcAddress::looks_valid(address.as_str()))
            .cloned()
            .or_else(|| payout.direct_address().cloned());
        let Some(destination) = destination else {
            warn!(ledger_entry = %entry.id(), "no usable destination address");
            return Ok(false);
        };
        entry.set_destination(destination.clone());

        let amount = payment
            .amount_received()
            .share(participant.participation().share());
        let request = DirectSendRequest {
            destination: destination.to_string(),
            amount,
            idem_key: entry.idem_key(),
            description: memo(task, participant.profile()),
        };
        match self.direct.send(request).await {
            Ok(receipt) if !receipt.status.is_terminal_failure() => {
                entry.record_direct_send(
                    receipt.id.clone(),
                    BtcAmount::absolute(receipt.amount),
                    &*self.clock,
                );
                self.ledger.update(&entry).await?;
                Ok(true)
            }
            Ok(receipt) => {
                warn!(
                    ledger_entry = %entry.id(),
                    status = ?receipt.status,
                    "direct send reported terminal failure"
                );
                Ok(false)
            }
            Err(err) => {
                warn!(ledger_entry = %entry.id(), error = %err, "direct send failed");
                Ok(false)
            }
        }
    }

    /// Creates a bridge payout, then immediately attempts completion since
    /// the bridge may resolve synchronously.
    async fn dispatch_bridge(
        &self,
        payment: &TaskPayment,
        participant: &Participant,
        payout: &PayoutMethod,
        mut entry: LedgerEntry,
    ) -> DistributionResult<bool> {
        let PayoutMethod::MobileMoney {
            country_code,
            phone_number,
        } = payout
        else {
            return Ok(false);
        };

        let profile = participant.profile();
        let amount = payment
            .amount_received()
            .share(participant.participation().share());
        let nonce = Uuid::new_v4();
        let request = BridgePayoutRequest {
            sender: self.settings.bridge_sender.clone(),
            amount,
            input_currency: self.settings.currency.clone(),
            payout_type: payout_type_for(country_code),
            first_name: profile.first_name().to_owned(),
            last_name: profile.last_name().to_owned(),
            phone_number: phone_number.clone(),
            reference: entry.id().to_string(),
            nonce,
        };
        match self.bridge.create_transaction(request).await {
            Ok(transaction) => {
                entry.record_bridge_initiation(
                    transaction.id.clone(),
                    nonce.to_string(),
                    &*self.clock,
                );
                self.ledger.update(&entry).await?;
                self.complete_bridge_settlement(&transaction).await
            }
            Err(err) => {
                warn!(ledger_entry = %entry.id(), error = %err, "bridge payout failed");
                Ok(false)
            }
        }
    }

    /// Polls the bridge for an already-initiated transaction instead of
    /// re-sending.
    async fn poll_bridge(&self, entry: &LedgerEntry) -> DistributionResult<bool> {
        let Some(provider_ref) = entry.provider_ref() else {
            warn!(ledger_entry = %entry.id(), "initiated entry has no provider reference");
            return Ok(false);
        };
        match self.bridge.fetch_transaction(provider_ref).await {
            Ok(Some(transaction)) => self.complete_bridge_settlement(&transaction).await,
            Ok(None) => {
                warn!(provider_ref, "bridge transaction unknown to provider");
                Ok(false)
            }
            Err(err) => {
                warn!(provider_ref, error = %err, "bridge poll failed");
                Ok(false)
            }
        }
    }

    /// Completion logic for a fetched bridge transaction.
    ///
    /// The transaction's metadata must identify an initiated ledger entry
    /// with matching provider reference and idempotency metadata; any
    /// mismatch means the transaction does not correspond to a known
    /// pending entry and is ignored. A canceled transaction reverts the
    /// entry to pending so the next run retries from scratch. Otherwise the
    /// settled input amount, when it does not exceed the participant's
    /// expected share, is forwarded verbatim to the discovered payout
    /// address through the direct rail.
    ///
    /// Also the entry point for provider confirmation callbacks.
    ///
    /// # Errors
    ///
    /// Returns [`DistributionError`] when a matched entry references
    /// missing records or a store operation fails.
    pub async fn complete_bridge_settlement(
        &self,
        transaction: &BridgeTransaction,
    ) -> DistributionResult<bool> {
        let Some(address_raw) = transaction.payout_address() else {
            warn!(bridge_ref = %transaction.id, "bridge transaction has no payout address");
            return Ok(false);
        };
        let Some(mut entry) = self.matched_entry(transaction).await? else {
            return Ok(false);
        };

        if transaction.state.is_canceled() {
            entry.revert_to_pending(&*self.clock);
            self.ledger.update(&entry).await?;
            info!(ledger_entry = %entry.id(), "canceled bridge payout reverted to pending");
            return Ok(false);
        }

        let payment = self
            .payments
            .find_by_id(entry.payment_id())
            .await?
            .ok_or(DistributionError::PaymentMissing(entry.payment_id()))?;
        let participant = self
            .tasks
            .participant(entry.participation_id())
            .await?
            .ok_or(DistributionError::ParticipationMissing(
                entry.participation_id(),
            ))?;
        let task = self
            .tasks
            .find_by_id(payment.task_id())
            .await?
            .ok_or(DistributionError::TaskNotFound(payment.task_id()))?;

        let expected = payment
            .amount_received()
            .share(participant.participation().share());
        let input = BtcAmount::absolute(transaction.input_amount);
        if input > expected {
            warn!(
                ledger_entry = %entry.id(),
                %input, %expected, "bridge input exceeds expected share"
            );
            return Ok(false);
        }

        let Ok(destination) = BtcAddress::new(address_raw) else {
            warn!(ledger_entry = %entry.id(), "discovered payout address is invalid");
            return Ok(false);
        };
        let request = DirectSendRequest {
            destination: destination.to_string(),
            amount: input,
            idem_key: entry.idem_key(),
            description: memo(&task, participant.profile()),
        };
        match self.direct.send(request).await {
            Ok(receipt) if !receipt.status.is_terminal_failure() => {
                entry.record_bridge_settlement(
                    receipt.id.clone(),
                    destination,
                    input,
                    &transaction.id,
                    &*self.clock,
                );
                self.ledger.update(&entry).await?;
                Ok(true)
            }
            Ok(receipt) => {
                warn!(
                    ledger_entry = %entry.id(),
                    status = ?receipt.status,
                    "bridge settlement forward reported terminal failure"
                );
                Ok(false)
            }
            Err(err) => {
                warn!(ledger_entry = %entry.id(), error = %err, "bridge settlement forward failed");
                Ok(false)
            }
        }
    }

    /// Resolves the ledger entry a bridge transaction claims to settle.
    ///
    /// State mismatches are expected (stale or foreign callbacks) and are
    /// logged and ignored rather than retried.
    async fn matched_entry(
        &self,
        transaction: &BridgeTransaction,
    ) -> DistributionResult<Option<LedgerEntry>> {
        let Ok(reference) = LedgerEntryId::parse(&transaction.metadata.reference) else {
            warn!(
                bridge_ref = %transaction.id,
                reference = %transaction.metadata.reference,
                "bridge reference is not a ledger entry id"
            );
            return Ok(None);
        };
        let Some(entry) = self.ledger.find_entry(reference).await? else {
            warn!(bridge_ref = %transaction.id, %reference, "bridge reference matches no entry");
            return Ok(None);
        };
        let matches = entry.provider_ref() == Some(transaction.id.as_str())
            && entry.extra() == Some(transaction.metadata.idem_key.as_str())
            && entry.status() == SettlementStatus::Initiated;
        if !matches {
            warn!(
                ledger_entry = %entry.id(),
                bridge_ref = %transaction.id,
                status = ?entry.status(),
                "bridge transaction does not correspond to a pending entry"
            );
            return Ok(None);
        }
        Ok(Some(entry))
    }
}

/// Renders the memo attached to provider transactions.
fn memo(task: &Task, profile: &UserProfile) -> String {
    format!("{} - {}", task.summary(), profile.display_name())
}
