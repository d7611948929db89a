//! Domain model for progress events and recurrence stepping.

mod event;
mod occurrence;

pub use event::{ProgressEvent, ProgressEventId, ProgressEventType};
pub use occurrence::{RecurrenceStep, TimeUnit, next_occurrence, shift_off_weekend};
