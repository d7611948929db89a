//! Port contracts for progress event persistence.

pub mod repository;

pub use repository::{
    ProgressEventRepository, ProgressEventRepositoryError, ProgressEventRepositoryResult,
};
