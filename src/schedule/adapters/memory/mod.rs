//! In-memory adapters for the schedule context.

mod events;

pub use events::InMemoryProgressEventRepository;
