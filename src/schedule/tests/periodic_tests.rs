//! Periodic check-in scheduling.
//!
//! A fixed clock pins "now" to a Wednesday so the weekend-shift behaviour is
//! deterministic regardless of when the tests run.

use std::sync::Arc;

use crate::config::MilestoneSettings;
use crate::schedule::{
    adapters::memory::InMemoryProgressEventRepository,
    domain::{ProgressEvent, ProgressEventType},
    ports::ProgressEventRepository,
    services::MilestoneSchedulerService,
};
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{
        Participant, Participation, ParticipationId, PaymentShare, Recurrence, RecurrenceUnit,
        Task, TaskId, TaskNumber, UserId, UserProfile,
    },
};
use chrono::{DateTime, Datelike, Duration, Local, TimeZone, Utc, Weekday};
use mockable::Clock;
use rstest::{fixture, rstest};
use rust_decimal_macros::dec;

/// Clock frozen at 2026-03-04 12:00 UTC, a Wednesday.
struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

fn wednesday_noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 4, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

type TestScheduler =
    MilestoneSchedulerService<InMemoryTaskRepository, InMemoryProgressEventRepository, FixedClock>;

struct Harness {
    tasks: Arc<InMemoryTaskRepository>,
    events: Arc<InMemoryProgressEventRepository>,
    scheduler: TestScheduler,
    now: DateTime<Utc>,
}

#[fixture]
fn harness() -> Harness {
    let now = wednesday_noon();
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let events = Arc::new(InMemoryProgressEventRepository::new());
    let scheduler = MilestoneSchedulerService::new(
        Arc::clone(&tasks),
        Arc::clone(&events),
        MilestoneSettings::default(),
        Arc::new(FixedClock(now)),
    );
    Harness {
        tasks,
        events,
        scheduler,
        now,
    }
}

fn recurring_task(recurrence: Recurrence, created_at: DateTime<Utc>) -> Task {
    Task::new(TaskId::new(), "Long project", TaskNumber::new(11), dec!(500), created_at)
        .expect("task should validate")
        .with_recurrence(recurrence)
}

fn accepted_participant(task_id: TaskId, activated_at: DateTime<Utc>) -> Participant {
    let user = UserId::new();
    let participation = Participation::new(
        ParticipationId::new(),
        task_id,
        user,
        PaymentShare::new(dec!(1)).expect("share should validate"),
    )
    .accepted_at(activated_at);
    let profile = UserProfile::new(user, "Ada Lovelace", "Ada", "Lovelace", "ada@example.com");
    Participant::new(participation, profile)
}

fn daily() -> Recurrence {
    Recurrence::new(1, RecurrenceUnit::Daily).expect("recurrence should validate")
}

fn periodic_events(events: &[ProgressEvent]) -> Vec<&ProgressEvent> {
    events
        .iter()
        .filter(|event| event.event_type() == ProgressEventType::PeriodicCheckIn)
        .collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn daily_check_ins_fill_the_gap_and_avoid_weekends(harness: Harness) {
    let task = recurring_task(daily(), harness.now - Duration::days(12));
    harness.tasks.insert_task(&task).expect("seed task");
    let participant = accepted_participant(task.id(), harness.now - Duration::days(10));
    harness.tasks.insert_participant(&participant).expect("seed participant");

    let scheduled = harness
        .scheduler
        .update_periodic_checkins(task.id())
        .await
        .expect("scheduling should succeed");

    // Activation was Sunday Feb 22: weekdays Feb 23-27, the weekend
    // occurrence shifted to Mar 2, then Mar 3-4 and the first future
    // occurrence on Mar 5.
    assert_eq!(scheduled.len(), 9);
    assert!(scheduled
        .iter()
        .all(|event| !matches!(event.due_at().weekday(), Weekday::Sat | Weekday::Sun)));
    assert!(scheduled.iter().all(|event| event.title() == "Progress update"));
    let events = harness
        .events
        .events_for_task(task.id())
        .await
        .expect("events lookup");
    assert_eq!(periodic_events(&events).len(), 9);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rerun_with_a_future_check_in_schedules_nothing(harness: Harness) {
    let task = recurring_task(daily(), harness.now - Duration::days(12));
    harness.tasks.insert_task(&task).expect("seed task");
    let participant = accepted_participant(task.id(), harness.now - Duration::days(10));
    harness.tasks.insert_participant(&participant).expect("seed participant");

    let first = harness
        .scheduler
        .update_periodic_checkins(task.id())
        .await
        .expect("first scheduling should succeed");
    assert!(!first.is_empty());

    let second = harness
        .scheduler
        .update_periodic_checkins(task.id())
        .await
        .expect("second scheduling should succeed");
    assert!(second.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_without_recurrence_schedules_nothing(harness: Harness) {
    let task = Task::new(TaskId::new(), "One-off task", TaskNumber::new(3), dec!(100), harness.now)
        .expect("task should validate");
    harness.tasks.insert_task(&task).expect("seed task");
    let participant = accepted_participant(task.id(), harness.now - Duration::days(5));
    harness.tasks.insert_participant(&participant).expect("seed participant");

    let scheduled = harness
        .scheduler
        .update_periodic_checkins(task.id())
        .await
        .expect("scheduling should succeed");

    assert!(scheduled.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_without_accepted_participants_schedules_nothing(harness: Harness) {
    let task = recurring_task(daily(), harness.now - Duration::days(12));
    harness.tasks.insert_task(&task).expect("seed task");

    let scheduled = harness
        .scheduler
        .update_periodic_checkins(task.id())
        .await
        .expect("scheduling should succeed");

    assert!(scheduled.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn check_ins_stop_at_the_deadline(harness: Harness) {
    let activated_at = harness.now - Duration::days(10);
    let deadline = activated_at + Duration::days(4);
    let task = recurring_task(daily(), activated_at).with_deadline(deadline);
    harness.tasks.insert_task(&task).expect("seed task");
    let participant = accepted_participant(task.id(), activated_at);
    harness.tasks.insert_participant(&participant).expect("seed participant");

    harness
        .scheduler
        .update_periodic_checkins(task.id())
        .await
        .expect("scheduling should succeed");

    let events = harness
        .events
        .events_for_task(task.id())
        .await
        .expect("events lookup");
    let check_ins = periodic_events(&events);
    assert!(!check_ins.is_empty());
    assert!(check_ins.iter().all(|event| event.due_at() < deadline));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sub_tasks_delegate_check_ins_to_the_parent_project(harness: Harness) {
    let weekly = Recurrence::new(1, RecurrenceUnit::Weekly).expect("recurrence should validate");
    let parent = recurring_task(weekly, harness.now - Duration::days(12));
    harness.tasks.insert_task(&parent).expect("seed parent");
    let child = Task::new(TaskId::new(), "Sub-task", TaskNumber::new(12), dec!(50), harness.now)
        .expect("task should validate")
        .with_parent(parent.id());
    harness.tasks.insert_task(&child).expect("seed child");
    let participant = accepted_participant(child.id(), harness.now - Duration::days(8));
    harness.tasks.insert_participant(&participant).expect("seed participant");

    let scheduled = harness
        .scheduler
        .update_periodic_checkins(child.id())
        .await
        .expect("scheduling should succeed");

    assert!(!scheduled.is_empty());
    assert!(scheduled.iter().all(|event| event.task_id() == parent.id()));
    let child_events = harness
        .events
        .events_for_task(child.id())
        .await
        .expect("events lookup");
    assert!(child_events.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn an_existing_check_in_exactly_a_day_away_does_not_collide(harness: Harness) {
    let task = recurring_task(daily(), harness.now - Duration::days(12));
    harness.tasks.insert_task(&task).expect("seed task");
    let seeded_due = harness.now - Duration::hours(1);
    harness
        .events
        .upsert_occurrence(task.id(), seeded_due, "Progress update")
        .await
        .expect("seed check-in");

    let scheduled = harness
        .scheduler
        .update_periodic_checkins(task.id())
        .await
        .expect("scheduling should succeed");

    // The walk resumes from the seeded check-in; the next occurrence is
    // exactly 24 hours later and the strict dedup bounds admit it.
    assert_eq!(
        scheduled.first().map(ProgressEvent::due_at),
        Some(seeded_due + Duration::days(1))
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn occurrences_within_a_day_of_an_existing_check_in_are_dropped(harness: Harness) {
    let hourly = Recurrence::new(1, RecurrenceUnit::Hourly).expect("recurrence should validate");
    let task = recurring_task(hourly, harness.now - Duration::days(12));
    harness.tasks.insert_task(&task).expect("seed task");
    let seeded_due = harness.now - Duration::hours(2);
    harness
        .events
        .upsert_occurrence(task.id(), seeded_due, "Progress update")
        .await
        .expect("seed check-in");

    let scheduled = harness
        .scheduler
        .update_periodic_checkins(task.id())
        .await
        .expect("scheduling should succeed");

    assert!(scheduled.is_empty());
    let events = harness
        .events
        .events_for_task(task.id())
        .await
        .expect("events lookup");
    assert_eq!(periodic_events(&events).len(), 1);
}
