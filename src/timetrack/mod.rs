//! Time-tracking provider sync.
//!
//! Mirrors a task into an external time-tracking project: creates the remote
//! task, resolves the assignment the provider implicitly creates, stores the
//! remote task identifier on the integration, and provisions provider
//! accounts for accepted participants. Remote provisioning is best-effort;
//! only missing local records fail the sync.
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
