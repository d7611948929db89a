//! Submission milestone scheduling.

use std::sync::Arc;

use crate::config::MilestoneSettings;
use crate::schedule::{
    adapters::memory::InMemoryProgressEventRepository,
    domain::{ProgressEvent, ProgressEventType},
    ports::ProgressEventRepository,
    services::{MilestoneSchedulerService, SchedulerError},
};
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{Task, TaskId, TaskNumber},
};
use chrono::{DateTime, Duration, Utc};
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

type TestScheduler =
    MilestoneSchedulerService<InMemoryTaskRepository, InMemoryProgressEventRepository, DefaultClock>;

struct Harness {
    tasks: Arc<InMemoryTaskRepository>,
    events: Arc<InMemoryProgressEventRepository>,
    scheduler: TestScheduler,
}

#[fixture]
fn harness() -> Harness {
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let events = Arc::new(InMemoryProgressEventRepository::new());
    let scheduler = MilestoneSchedulerService::new(
        Arc::clone(&tasks),
        Arc::clone(&events),
        MilestoneSettings::default(),
        Arc::new(DefaultClock),
    );
    Harness {
        tasks,
        events,
        scheduler,
    }
}

fn task_with_deadline(pay: Decimal, period: Duration) -> Task {
    let created_at = Utc::now();
    Task::new(TaskId::new(), "Design landing page", TaskNumber::new(5), pay, created_at)
        .expect("task should validate")
        .with_deadline(created_at + period)
}

fn due_of(events: &[ProgressEvent], event_type: ProgressEventType) -> DateTime<Utc> {
    events
        .iter()
        .find(|event| event.event_type() == event_type)
        .map(ProgressEvent::due_at)
        .expect("event should be scheduled")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_without_deadline_gets_no_milestones(harness: Harness) {
    let task = Task::new(TaskId::new(), "Open-ended work", TaskNumber::new(1), dec!(100), Utc::now())
        .expect("task should validate");
    harness.tasks.insert_task(&task).expect("seed task");

    let scheduled = harness
        .scheduler
        .update_submit_milestones(task.id())
        .await
        .expect("scheduling should succeed");

    assert!(scheduled.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn low_value_task_gets_a_one_day_draft_offset(harness: Harness) {
    let task = task_with_deadline(dec!(100), Duration::days(10));
    harness.tasks.insert_task(&task).expect("seed task");
    let deadline = task.deadline().expect("deadline is set");

    let scheduled = harness
        .scheduler
        .update_submit_milestones(task.id())
        .await
        .expect("scheduling should succeed");

    assert_eq!(due_of(&scheduled, ProgressEventType::DraftSubmission), deadline - Duration::days(1));
    assert_eq!(due_of(&scheduled, ProgressEventType::FinalSubmission), deadline);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn high_value_long_running_task_gets_a_two_day_draft_offset(harness: Harness) {
    let task = task_with_deadline(dec!(300), Duration::days(10));
    harness.tasks.insert_task(&task).expect("seed task");
    let deadline = task.deadline().expect("deadline is set");

    let scheduled = harness
        .scheduler
        .update_submit_milestones(task.id())
        .await
        .expect("scheduling should succeed");

    assert_eq!(due_of(&scheduled, ProgressEventType::DraftSubmission), deadline - Duration::days(2));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn high_value_short_task_keeps_the_short_offset(harness: Harness) {
    let task = task_with_deadline(dec!(300), Duration::days(3));
    harness.tasks.insert_task(&task).expect("seed task");
    let deadline = task.deadline().expect("deadline is set");

    let scheduled = harness
        .scheduler
        .update_submit_milestones(task.id())
        .await
        .expect("scheduling should succeed");

    assert_eq!(due_of(&scheduled, ProgressEventType::DraftSubmission), deadline - Duration::days(1));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sub_task_draft_lands_on_the_deadline(harness: Harness) {
    let parent = TaskId::new();
    let task = task_with_deadline(dec!(300), Duration::days(10)).with_parent(parent);
    harness.tasks.insert_task(&task).expect("seed task");
    let deadline = task.deadline().expect("deadline is set");

    let scheduled = harness
        .scheduler
        .update_submit_milestones(task.id())
        .await
        .expect("scheduling should succeed");

    assert_eq!(due_of(&scheduled, ProgressEventType::DraftSubmission), deadline);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deadline_changes_move_milestones_instead_of_duplicating(harness: Harness) {
    let task = task_with_deadline(dec!(100), Duration::days(10));
    harness.tasks.insert_task(&task).expect("seed task");
    harness
        .scheduler
        .update_submit_milestones(task.id())
        .await
        .expect("first scheduling should succeed");

    let moved = task
        .clone()
        .with_deadline(task.deadline().expect("deadline is set") + Duration::days(5));
    harness.tasks.insert_task(&moved).expect("reseed task");
    harness
        .scheduler
        .update_submit_milestones(task.id())
        .await
        .expect("second scheduling should succeed");

    let events = harness
        .events
        .events_for_task(task.id())
        .await
        .expect("events lookup");
    assert_eq!(events.len(), 2);
    assert_eq!(
        due_of(&events, ProgressEventType::FinalSubmission),
        moved.deadline().expect("deadline is set")
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_task_is_a_typed_error(harness: Harness) {
    let result = harness.scheduler.update_submit_milestones(TaskId::new()).await;
    assert!(matches!(result, Err(SchedulerError::TaskNotFound(_))));
}
