//! Domain model for marketplace tasks and participations.
//!
//! The task domain holds the entities the settlement and scheduling contexts
//! operate on while keeping all infrastructure concerns outside of the domain
//! boundary.

mod error;
mod ids;
mod participation;
mod payout;
mod recurrence;
mod task;

pub use error::TaskDomainError;
pub use ids::{ParticipationId, TaskId, TaskNumber, UserId};
pub use participation::{Participant, Participation, PaymentShare};
pub use payout::{BtcAddress, PayoutMethod, PayoutRail, UserProfile};
pub use recurrence::{Recurrence, RecurrenceUnit};
pub use task::Task;
