//! Settlor: payment settlement and scheduling core for a freelance task
//! marketplace.
//!
//! This crate implements the backend business logic that sits behind the
//! marketplace's job queue: distributing received cryptocurrency payments to
//! task participants across two payment rails, scheduling progress-update
//! milestones, assigning invoice numbers, and syncing tasks to an external
//! time-tracking service.
//!
//! # Architecture
//!
//! Settlor follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (stores, providers)
//!
//! The persistent store and the external payment and time-tracking providers
//! are collaborators behind ports; only in-memory adapters ship with this
//! crate.
//!
//! # Modules
//!
//! - [`task`]: Marketplace task and participation model shared by the others
//! - [`payment`]: Payment distribution engine, settlement ledger, gateways
//! - [`schedule`]: Submission-milestone and periodic check-in scheduler
//! - [`invoice`]: Invoice number assignment
//! - [`timetrack`]: Time-tracking integration sync
//! - [`config`]: Injected settings shared by the services

pub mod config;
pub mod invoice;
pub mod payment;
pub mod schedule;
pub mod task;
pub mod timetrack;
