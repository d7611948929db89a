//! Application services for the timetrack context.

pub mod sync;

pub use sync::{SyncError, SyncOutcome, SyncResult, TimeTrackSyncService};
