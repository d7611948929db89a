//! Settlement ledger entries.

use super::{BtcAmount, LedgerEntryId, PaymentDomainError, PaymentId};
use crate::task::domain::{BtcAddress, ParticipationId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Settlement lifecycle of one participant share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementStatus {
    /// Created, nothing dispatched yet.
    Pending,
    /// Bridge transaction created, awaiting confirmation.
    Initiated,
    /// Funds sent through the direct rail, awaiting chain confirmation.
    Processing,
    /// Settlement confirmed.
    Settled,
    /// Provider reported a terminal failure.
    Failed,
    /// Provider-side expiry.
    Expired,
    /// Canceled before settlement.
    Canceled,
}

impl SettlementStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Initiated => "initiated",
            Self::Processing => "processing",
            Self::Settled => "settled",
            Self::Failed => "failed",
            Self::Expired => "expired",
            Self::Canceled => "canceled",
        }
    }
}

impl TryFrom<&str> for SettlementStatus {
    type Error = PaymentDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "initiated" => Ok(Self::Initiated),
            "processing" => Ok(Self::Processing),
            "settled" => Ok(Self::Settled),
            "failed" => Ok(Self::Failed),
            "expired" => Ok(Self::Expired),
            "canceled" => Ok(Self::Canceled),
            _ => Err(PaymentDomainError::UnknownSettlementStatus(value.to_owned())),
        }
    }
}

/// One ledger row per (payment, participation) pair, tracking a single
/// settlement attempt's lifecycle.
///
/// Rows are created once (get-or-create) and only ever updated by the
/// distribution engine; nothing deletes them. The `idem_key` is the
/// provider-side deduplication token, so a retried dispatch can never
/// double-send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    id: LedgerEntryId,
    payment_id: PaymentId,
    participation_id: ParticipationId,
    destination: Option<BtcAddress>,
    idem_key: Uuid,
    status: SettlementStatus,
    provider_ref: Option<String>,
    amount_sent: Option<BtcAmount>,
    extra: Option<String>,
    updated_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Creates a pending entry for the given pair with a fresh idempotency
    /// key.
    #[must_use]
    pub fn new(payment_id: PaymentId, participation_id: ParticipationId, clock: &impl Clock) -> Self {
        Self {
            id: LedgerEntryId::new(),
            payment_id,
            participation_id,
            destination: None,
            idem_key: Uuid::new_v4(),
            status: SettlementStatus::Pending,
            provider_ref: None,
            amount_sent: None,
            extra: None,
            updated_at: clock.utc(),
        }
    }

    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> LedgerEntryId {
        self.id
    }

    /// Returns the inbound payment this share settles from.
    #[must_use]
    pub const fn payment_id(&self) -> PaymentId {
        self.payment_id
    }

    /// Returns the participation this share settles to.
    #[must_use]
    pub const fn participation_id(&self) -> ParticipationId {
        self.participation_id
    }

    /// Returns the destination address, once resolved.
    #[must_use]
    pub const fn destination(&self) -> Option<&BtcAddress> {
        self.destination.as_ref()
    }

    /// Returns the provider-side deduplication token.
    #[must_use]
    pub const fn idem_key(&self) -> Uuid {
        self.idem_key
    }

    /// Returns the settlement status.
    #[must_use]
    pub const fn status(&self) -> SettlementStatus {
        self.status
    }

    /// Returns the most recent provider transaction reference.
    #[must_use]
    pub fn provider_ref(&self) -> Option<&str> {
        self.provider_ref.as_deref()
    }

    /// Returns the amount sent to the participant, once dispatched.
    #[must_use]
    pub const fn amount_sent(&self) -> Option<BtcAmount> {
        self.amount_sent
    }

    /// Returns the free-form extra data (bridge nonce, settlement note).
    #[must_use]
    pub fn extra(&self) -> Option<&str> {
        self.extra.as_deref()
    }

    /// Returns the last mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Records the destination the next dispatch will use.
    pub fn set_destination(&mut self, destination: BtcAddress) {
        self.destination = Some(destination);
    }

    /// Records a successful direct-rail send.
    pub fn record_direct_send(
        &mut self,
        provider_ref: impl Into<String>,
        amount: BtcAmount,
        clock: &impl Clock,
    ) {
        self.provider_ref = Some(provider_ref.into());
        self.amount_sent = Some(amount);
        self.status = SettlementStatus::Processing;
        self.touch(clock);
    }

    /// Records a created bridge transaction awaiting confirmation.
    ///
    /// The nonce is kept in `extra`; completion matches it against the
    /// provider's echoed idempotency metadata.
    pub fn record_bridge_initiation(
        &mut self,
        provider_ref: impl Into<String>,
        nonce: impl Into<String>,
        clock: &impl Clock,
    ) {
        self.provider_ref = Some(provider_ref.into());
        self.extra = Some(nonce.into());
        self.status = SettlementStatus::Initiated;
        self.touch(clock);
    }

    /// Records the direct-rail forward that settles a confirmed bridge
    /// transaction.
    pub fn record_bridge_settlement(
        &mut self,
        provider_ref: impl Into<String>,
        destination: BtcAddress,
        amount: BtcAmount,
        bridge_ref: &str,
        clock: &impl Clock,
    ) {
        self.provider_ref = Some(provider_ref.into());
        self.destination = Some(destination);
        self.amount_sent = Some(amount);
        self.extra = Some(serde_json::json!({ "bridge": bridge_ref }).to_string());
        self.status = SettlementStatus::Processing;
        self.touch(clock);
    }

    /// Reverts a canceled bridge initiation so the next run retries from
    /// scratch.
    pub fn revert_to_pending(&mut self, clock: &impl Clock) {
        self.status = SettlementStatus::Pending;
        self.touch(clock);
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
