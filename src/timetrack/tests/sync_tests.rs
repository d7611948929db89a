//! Time-tracking sync orchestration.

use std::sync::Arc;

use crate::config::TimeTrackSettings;
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{
        Participant, Participation, ParticipationId, PaymentShare, Task, TaskId, TaskNumber,
        UserId, UserProfile,
    },
};
use crate::timetrack::{
    adapters::memory::InMemoryIntegrationRepository,
    domain::{Integration, IntegrationId, IntegrationProvider},
    ports::{
        NewRemoteUser, RemoteTaskResponse, TaskAssignment, TimeTrackingApi, TimeTrackingApiError,
        TimeTrackingApiResult,
    },
    services::{SyncError, TimeTrackSyncService},
};
use async_trait::async_trait;
use chrono::Utc;
use mockall::mock;
use mockall::predicate::eq;
use rstest::rstest;
use rust_decimal_macros::dec;

mock! {
    Api {}

    #[async_trait]
    impl TimeTrackingApi for Api {
        async fn create_task(
            &self,
            project_id: u64,
            name: &str,
        ) -> TimeTrackingApiResult<RemoteTaskResponse>;

        async fn task_assignment(
            &self,
            project_id: u64,
            assignment_id: u64,
        ) -> TimeTrackingApiResult<TaskAssignment>;

        async fn create_user(&self, user: NewRemoteUser) -> TimeTrackingApiResult<()>;
    }
}

type TestService =
    TimeTrackSyncService<InMemoryIntegrationRepository, MockApi, InMemoryTaskRepository>;

struct Harness {
    integrations: Arc<InMemoryIntegrationRepository>,
    tasks: Arc<InMemoryTaskRepository>,
}

fn harness() -> Harness {
    Harness {
        integrations: Arc::new(InMemoryIntegrationRepository::new()),
        tasks: Arc::new(InMemoryTaskRepository::new()),
    }
}

fn service(harness: &Harness, api: MockApi) -> TestService {
    TimeTrackSyncService::new(
        Arc::clone(&harness.integrations),
        Arc::new(api),
        Arc::clone(&harness.tasks),
        TimeTrackSettings::default(),
    )
}

fn seed_task(harness: &Harness, title: &str) -> Task {
    let task = Task::new(TaskId::new(), title, TaskNumber::new(1), dec!(100), Utc::now())
        .expect("task should validate");
    harness.tasks.insert_task(&task).expect("seed task");
    task
}

fn seed_integration(harness: &Harness, task_id: TaskId, project_id: u64) -> Integration {
    let integration = Integration::new(
        IntegrationId::new(),
        task_id,
        IntegrationProvider::TimeTracking,
        project_id,
    );
    harness
        .integrations
        .insert_integration(integration.clone())
        .expect("seed integration");
    integration
}

fn seed_participant(harness: &Harness, task_id: TaskId) {
    let user = UserId::new();
    let participation = Participation::new(
        ParticipationId::new(),
        task_id,
        user,
        PaymentShare::new(dec!(1)).expect("share should validate"),
    )
    .accepted_at(Utc::now());
    let profile = UserProfile::new(user, "Ada Lovelace", "Ada", "Lovelace", "ada@example.com");
    harness
        .tasks
        .insert_participant(&Participant::new(participation, profile))
        .expect("seed participant");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn links_the_remote_task_and_provisions_participants() {
    let harness = harness();
    let task = seed_task(&harness, "Client site");
    let integration = seed_integration(&harness, task.id(), 77);
    seed_participant(&harness, task.id());

    let mut api = MockApi::new();
    api.expect_create_task()
        .withf(|project_id, name| *project_id == 77 && name == "Settlor: Client site")
        .times(1)
        .returning(|_, _| {
            Ok(RemoteTaskResponse {
                location: Some("/projects/77/task_assignments/555".to_owned()),
            })
        });
    api.expect_task_assignment()
        .with(eq(77u64), eq(555u64))
        .times(1)
        .returning(|_, _| Ok(TaskAssignment { task_id: 9001 }));
    api.expect_create_user()
        .withf(|user| user.email == "ada@example.com")
        .times(1)
        .returning(|_| Ok(()));

    let outcome = service(&harness, api)
        .complete_integration(integration.id())
        .await
        .expect("sync should succeed");

    assert!(outcome.remote_task_linked);
    assert_eq!(outcome.users_provisioned, 1);
    assert_eq!(
        harness
            .integrations
            .meta_value(integration.id(), "project_task_id")
            .expect("meta lookup"),
        Some("9001".to_owned())
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn issue_tracking_integrations_are_a_no_op() {
    let harness = harness();
    let task = seed_task(&harness, "Client site");
    let integration = Integration::new(
        IntegrationId::new(),
        task.id(),
        IntegrationProvider::IssueTracking,
        77,
    );
    harness
        .integrations
        .insert_integration(integration.clone())
        .expect("seed integration");

    let outcome = service(&harness, MockApi::new())
        .complete_integration(integration.id())
        .await
        .expect("sync should succeed");

    assert!(!outcome.remote_task_linked);
    assert_eq!(outcome.users_provisioned, 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_location_header_leaves_the_task_unlinked() {
    let harness = harness();
    let task = seed_task(&harness, "Client site");
    let integration = seed_integration(&harness, task.id(), 77);
    seed_participant(&harness, task.id());

    let mut api = MockApi::new();
    api.expect_create_task()
        .times(1)
        .returning(|_, _| Ok(RemoteTaskResponse { location: None }));
    api.expect_create_user().times(1).returning(|_| Ok(()));

    let outcome = service(&harness, api)
        .complete_integration(integration.id())
        .await
        .expect("sync should succeed");

    assert!(!outcome.remote_task_linked);
    assert_eq!(outcome.users_provisioned, 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn location_naming_a_different_project_is_refused() {
    let harness = harness();
    let task = seed_task(&harness, "Client site");
    let integration = seed_integration(&harness, task.id(), 77);

    let mut api = MockApi::new();
    api.expect_create_task().times(1).returning(|_, _| {
        Ok(RemoteTaskResponse {
            location: Some("/projects/88/task_assignments/555".to_owned()),
        })
    });

    let outcome = service(&harness, api)
        .complete_integration(integration.id())
        .await
        .expect("sync should succeed");

    assert!(!outcome.remote_task_linked);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn metadata_storage_failures_propagate() {
    let harness = harness();
    let task = seed_task(&harness, "Client site");
    let integration = seed_integration(&harness, task.id(), 77);
    harness
        .integrations
        .set_meta_failure(true)
        .expect("configure repository");

    let mut api = MockApi::new();
    api.expect_create_task().times(1).returning(|_, _| {
        Ok(RemoteTaskResponse {
            location: Some("/projects/77/task_assignments/555".to_owned()),
        })
    });
    api.expect_task_assignment()
        .times(1)
        .returning(|_, _| Ok(TaskAssignment { task_id: 9001 }));

    let result = service(&harness, api)
        .complete_integration(integration.id())
        .await;

    assert!(matches!(result, Err(SyncError::Integrations(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn integration_deleted_mid_sync_leaves_the_task_unlinked() {
    let harness = harness();
    let task = seed_task(&harness, "Client site");
    let integration = seed_integration(&harness, task.id(), 77);
    seed_participant(&harness, task.id());

    // The integration disappears while the provider call is in flight, so
    // the metadata write finds nothing to attach to.
    let integrations = Arc::clone(&harness.integrations);
    let integration_id = integration.id();
    let mut api = MockApi::new();
    api.expect_create_task().times(1).returning(move |_, _| {
        integrations
            .remove_integration(integration_id)
            .expect("remove integration");
        Ok(RemoteTaskResponse {
            location: Some("/projects/77/task_assignments/555".to_owned()),
        })
    });
    api.expect_task_assignment()
        .times(1)
        .returning(|_, _| Ok(TaskAssignment { task_id: 9001 }));
    api.expect_create_user().times(1).returning(|_| Ok(()));

    let outcome = service(&harness, api)
        .complete_integration(integration.id())
        .await
        .expect("sync should succeed");

    assert!(!outcome.remote_task_linked);
    assert_eq!(outcome.users_provisioned, 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn provider_account_failures_are_best_effort() {
    let harness = harness();
    let task = seed_task(&harness, "Client site");
    let integration = seed_integration(&harness, task.id(), 77);
    seed_participant(&harness, task.id());

    let mut api = MockApi::new();
    api.expect_create_task().times(1).returning(|_, _| {
        Ok(RemoteTaskResponse {
            location: Some("/projects/77/task_assignments/555".to_owned()),
        })
    });
    api.expect_task_assignment()
        .times(1)
        .returning(|_, _| Ok(TaskAssignment { task_id: 9001 }));
    api.expect_create_user()
        .times(1)
        .returning(|_| Err(TimeTrackingApiError::Rejected("duplicate email".to_owned())));

    let outcome = service(&harness, api)
        .complete_integration(integration.id())
        .await
        .expect("sync should succeed");

    assert!(outcome.remote_task_linked);
    assert_eq!(outcome.users_provisioned, 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_integration_is_a_typed_error() {
    let harness = harness();
    let result = service(&harness, MockApi::new())
        .complete_integration(IntegrationId::new())
        .await;
    assert!(matches!(result, Err(SyncError::IntegrationNotFound(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_remote_task_creation_is_absorbed() {
    let harness = harness();
    let task = seed_task(&harness, "Client site");
    let integration = seed_integration(&harness, task.id(), 77);

    let mut api = MockApi::new();
    api.expect_create_task()
        .times(1)
        .returning(|_, _| Err(TimeTrackingApiError::Unavailable("timeout".to_owned())));

    let outcome = service(&harness, api)
        .complete_integration(integration.id())
        .await
        .expect("sync should succeed");

    assert!(!outcome.remote_task_linked);
}
