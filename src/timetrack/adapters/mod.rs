//! Adapter implementations for timetrack ports.

pub mod memory;
