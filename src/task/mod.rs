//! Marketplace task and participation model.
//!
//! Tasks carry the deadline, pay, and recurrence configuration that drive the
//! scheduler, plus the `paid`/`pay_distributed` flags owned by the payment
//! distribution engine. Participations link users to tasks with an acceptance
//! flag, an activation timestamp, and a payment-share fraction. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;
