//! Invoice numbering for completed tasks.
//!
//! Assigns each task invoice a composite, human-readable number derived from
//! the client's stable sequence number, the invoice month, and a per-client
//! monthly ordinal. Assignment is idempotent: once an invoice carries a
//! number it is never renumbered.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
