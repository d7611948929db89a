//! Gateway ports for the two payment rails.

use crate::payment::domain::{
    BridgePayoutRequest, BridgeTransaction, BtcAmount, DirectSendReceipt,
};
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors returned by payment gateway adapters.
///
/// Gateway failures mark the affected share as failed for the current round
/// and are retried on the next invocation; they are never fatal to a
/// distribution pass.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// The provider rejected the request.
    #[error("provider rejected request: {0}")]
    Rejected(String),

    /// The provider could not be reached.
    #[error("provider unreachable: {0}")]
    Unavailable(String),
}

/// Direct-send request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectSendRequest {
    /// Destination address.
    pub destination: String,
    /// Amount to send, normalized to satoshi precision.
    pub amount: BtcAmount,
    /// Provider-side deduplication token; retries with the same key never
    /// double-send.
    pub idem_key: Uuid,
    /// Human-readable memo.
    pub description: String,
}

/// Direct on-chain send provider.
#[async_trait]
pub trait DirectSendGateway: Send + Sync {
    /// Sends funds to a destination address.
    async fn send(&self, request: DirectSendRequest) -> GatewayResult<DirectSendReceipt>;
}

/// Mobile-money bridge provider.
#[async_trait]
pub trait BridgeGateway: Send + Sync {
    /// Creates a payout transaction.
    async fn create_transaction(
        &self,
        request: BridgePayoutRequest,
    ) -> GatewayResult<BridgeTransaction>;

    /// Fetches the current state of a previously created transaction.
    ///
    /// Returns `None` when the provider does not know the reference.
    async fn fetch_transaction(
        &self,
        provider_ref: &str,
    ) -> GatewayResult<Option<BridgeTransaction>>;
}
