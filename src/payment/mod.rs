//! Payment distribution engine, settlement ledger, and gateway contracts.
//!
//! Given a paid task, the engine distributes every received, unprocessed
//! payment to all accepted participants with a payout account, according to
//! each participant's payment-share fraction. Settlement runs over two rails:
//! a direct on-chain send, and a mobile-money bridge that requires
//! asynchronous confirmation. The engine is re-entrant and idempotent; the
//! per-(payment, participant) ledger row is the sole guard against duplicate
//! dispatch, and the provider-side idempotency key guards against
//! double-sends on retry.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
