//! Adapter implementations for payment ports.

pub mod memory;
