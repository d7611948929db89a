//! Domain model for provider integrations.

mod integration;
mod location;

pub use integration::{Integration, IntegrationId, IntegrationProvider};
pub use location::{AssignmentLocation, parse_assignment_location};
