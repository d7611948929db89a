//! Milestone scheduler for submission deadlines and periodic check-ins.
//!
//! Computes due dates for submission milestones from the task deadline and
//! schedules periodic progress check-ins from the configured recurrence.
//! Both operations are idempotent: existing events are updated in place,
//! never duplicated, and at most one periodic check-in lands in any 24-hour
//! window.
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
