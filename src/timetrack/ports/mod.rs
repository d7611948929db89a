//! Port contracts for time-tracking providers and integration persistence.

pub mod api;
pub mod repository;

pub use api::{
    NewRemoteUser, RemoteTaskResponse, TaskAssignment, TimeTrackingApi, TimeTrackingApiError,
    TimeTrackingApiResult,
};
pub use repository::{
    IntegrationRepository, IntegrationRepositoryError, IntegrationRepositoryResult,
};
