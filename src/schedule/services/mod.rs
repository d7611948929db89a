//! Application services for the schedule context.

pub mod milestones;

pub use milestones::{MilestoneSchedulerService, SchedulerError, SchedulerResult};
