//! Adapter implementations for invoice ports.

pub mod memory;
