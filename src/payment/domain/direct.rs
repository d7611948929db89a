//! Direct-rail wire types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Provider-reported status of a direct send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferStatus {
    /// Transfer confirmed.
    Completed,
    /// Transfer accepted, not yet confirmed.
    Pending,
    /// Transfer rejected.
    Failed,
    /// Transfer expired before completion.
    Expired,
    /// Transfer canceled.
    Canceled,
}

impl TransferStatus {
    /// Returns whether the status is a terminal failure.
    ///
    /// Anything else counts as sent for the purposes of a distribution
    /// round.
    #[must_use]
    pub const fn is_terminal_failure(self) -> bool {
        matches!(self, Self::Failed | Self::Expired | Self::Canceled)
    }
}

/// Transaction record returned by the direct-send provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectSendReceipt {
    /// Provider transaction identifier.
    pub id: String,
    /// Provider-reported status.
    pub status: TransferStatus,
    /// Provider-reported amount; sends are reported as negative balance
    /// movements.
    pub amount: Decimal,
}
