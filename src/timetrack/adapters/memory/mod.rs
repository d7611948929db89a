//! In-memory adapters for the timetrack context.

mod integrations;

pub use integrations::InMemoryIntegrationRepository;
