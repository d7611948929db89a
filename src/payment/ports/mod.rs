//! Port contracts for payment settlement.
//!
//! Ports define infrastructure-agnostic interfaces used by the distribution
//! engine: the persistent stores for payments and ledger rows, and the two
//! payment-provider gateways.

pub mod gateway;
pub mod repository;

pub use gateway::{BridgeGateway, DirectSendGateway, DirectSendRequest, GatewayError, GatewayResult};
pub use repository::{
    LedgerRepository, LedgerRepositoryError, LedgerRepositoryResult, PaymentRepository,
    PaymentRepositoryError, PaymentRepositoryResult,
};
