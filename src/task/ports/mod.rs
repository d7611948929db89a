//! Port contracts for the task context.
//!
//! Ports define infrastructure-agnostic interfaces used by the settlement,
//! scheduling, invoicing, and sync services.

pub mod repository;

pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
