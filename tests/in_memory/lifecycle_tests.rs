//! In-memory integration tests for task lifecycle operations.

use std::sync::Arc;

use rota::task::{
    adapters::memory::{InMemoryAssignmentRepository, InMemoryTaskRepository},
    domain::{
        AssignmentStatus, CompletionRule, EmployeeId, LifecyclePolicy, PhotoRef, Recurrence,
        TaskStatus,
    },
    ports::{AssignmentRepository, TaskRepository},
    services::{CreateTaskRequest, RequestTaskRequest, TaskLifecycleError, TaskLifecycleService},
};
use rstest::{fixture, rstest};

use crate::in_memory::helpers::{FrozenClock, instant};

type TestService =
    TaskLifecycleService<InMemoryTaskRepository, InMemoryAssignmentRepository, FrozenClock>;

struct Stack {
    tasks: Arc<InMemoryTaskRepository>,
    assignments: Arc<InMemoryAssignmentRepository>,
    service: TestService,
}

fn stack_with(policy: LifecyclePolicy) -> Stack {
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let assignments = Arc::new(InMemoryAssignmentRepository::new());
    let service = TaskLifecycleService::new(
        Arc::clone(&tasks),
        Arc::clone(&assignments),
        Arc::new(FrozenClock::at("2025-03-01T09:00:00Z")),
        policy,
    );
    Stack {
        tasks,
        assignments,
        service,
    }
}

#[fixture]
fn stack() -> Stack {
    stack_with(LifecyclePolicy::default())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_single_report_completes_the_task_under_any_completed(stack: Stack) {
    let alice = EmployeeId::new();
    let bob = EmployeeId::new();
    let request = CreateTaskRequest::new(
        "Deep clean the walk-in",
        Recurrence::Weekly,
        instant("2025-03-01T22:00:00Z"),
    )
    .with_assignees([alice, bob]);
    let task = stack
        .service
        .create_task(request)
        .await
        .expect("create should succeed");

    let photo = PhotoRef::new("photos/walk-in/after.jpg").expect("valid photo reference");
    stack
        .service
        .report_status(task.id(), alice, AssignmentStatus::Completed, vec![photo])
        .await
        .expect("report should succeed");
    let refreshed = stack
        .service
        .refresh_task_status(task.id())
        .await
        .expect("refresh should succeed");

    assert_eq!(refreshed.status(), TaskStatus::Completed);
    let stored = stack
        .tasks
        .find_by_id(task.id())
        .await
        .expect("lookup should succeed")
        .expect("task should exist");
    assert_eq!(stored.status(), TaskStatus::Completed);
    assert_eq!(stored.photos().len(), 1);
    let untouched = stack
        .assignments
        .find(task.id(), bob)
        .await
        .expect("lookup should succeed")
        .expect("assignment should exist");
    assert_eq!(untouched.status(), AssignmentStatus::Pending);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn all_completed_holds_the_task_open_until_every_report_lands() {
    let policy = LifecyclePolicy {
        completion_rule: CompletionRule::AllCompleted,
        ..LifecyclePolicy::default()
    };
    let stack = stack_with(policy);
    let alice = EmployeeId::new();
    let bob = EmployeeId::new();
    let request = CreateTaskRequest::new(
        "Deep clean the walk-in",
        Recurrence::Weekly,
        instant("2025-03-01T22:00:00Z"),
    )
    .with_assignees([alice, bob]);
    let task = stack
        .service
        .create_task(request)
        .await
        .expect("create should succeed");

    stack
        .service
        .report_status(task.id(), alice, AssignmentStatus::Completed, Vec::new())
        .await
        .expect("first report should succeed");
    let after_first = stack
        .service
        .refresh_task_status(task.id())
        .await
        .expect("refresh should succeed");
    assert_eq!(after_first.status(), TaskStatus::Pending);

    stack
        .service
        .report_status(task.id(), bob, AssignmentStatus::Completed, Vec::new())
        .await
        .expect("second report should succeed");
    let after_second = stack
        .service
        .refresh_task_status(task.id())
        .await
        .expect("refresh should succeed");
    assert_eq!(after_second.status(), TaskStatus::Completed);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_requested_task_flows_through_the_same_cycle(stack: Stack) {
    let alice = EmployeeId::new();
    let request = RequestTaskRequest::new(
        "Swap the fryer oil",
        Recurrence::Once,
        instant("2025-03-02T18:00:00Z"),
        alice,
    );
    let task = stack
        .service
        .request_task(request)
        .await
        .expect("request should succeed");
    assert_eq!(task.status(), TaskStatus::Requested);

    stack
        .service
        .report_status(task.id(), alice, AssignmentStatus::Completed, Vec::new())
        .await
        .expect("report should succeed");
    let refreshed = stack
        .service
        .refresh_task_status(task.id())
        .await
        .expect("refresh should succeed");

    assert_eq!(refreshed.status(), TaskStatus::Completed);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reassignment_hands_the_work_to_the_new_crew(stack: Stack) {
    let alice = EmployeeId::new();
    let bob = EmployeeId::new();
    let request = CreateTaskRequest::new(
        "Deep clean the walk-in",
        Recurrence::Weekly,
        instant("2025-03-01T22:00:00Z"),
    )
    .with_assignees([alice]);
    let task = stack
        .service
        .create_task(request)
        .await
        .expect("create should succeed");

    stack
        .service
        .reassign(task.id(), alice, vec![bob], None)
        .await
        .expect("reassign should succeed");

    stack
        .service
        .report_status(task.id(), bob, AssignmentStatus::Completed, Vec::new())
        .await
        .expect("the new assignee should be able to report");
    let stale = stack
        .service
        .report_status(task.id(), alice, AssignmentStatus::Completed, Vec::new())
        .await;
    assert!(matches!(
        stale,
        Err(TaskLifecycleError::NotAssigned { .. })
    ));
}
