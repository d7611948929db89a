//! Domain model for payment settlement.

mod amount;
mod bridge;
mod direct;
mod error;
mod ids;
mod inbound;
mod ledger;

pub use amount::{BtcAmount, CURRENCY_BTC};
pub use bridge::{
    BridgeMetadata, BridgePayoutRequest, BridgeSender, BridgeState, BridgeTransaction,
    PayinMethod, payout_type_for,
};
pub use direct::{DirectSendReceipt, TransferStatus};
pub use error::PaymentDomainError;
pub use ids::{LedgerEntryId, PaymentId};
pub use inbound::TaskPayment;
pub use ledger::{LedgerEntry, SettlementStatus};
