//! In-memory adapters for the payment context.

mod gateway;
mod store;

pub use gateway::{RecordingDirectGateway, ScriptedBridgeGateway};
pub use store::InMemoryPaymentStore;
