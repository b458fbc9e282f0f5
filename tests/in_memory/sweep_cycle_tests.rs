//! In-memory integration tests for the scheduled pass cycle.
//!
//! Runs the warning, expiration and reset passes against shared adapters
//! at successive instants, the way the scheduler drives them in
//! production.

use std::sync::Arc;

use rota::task::{
    adapters::memory::{
        InMemoryAssignmentRepository, InMemoryEmployeeDirectory, InMemoryTaskRepository,
        RecordingNotifier,
    },
    domain::{
        Assignment, AssignmentStatus, EmployeeId, LifecyclePolicy, Notification,
        NotificationKind, Recurrence, ResetTrigger, Task, TaskStatus,
    },
    ports::{AssignmentRepository, TaskRepository},
    services::SweepService,
};
use rstest::{fixture, rstest};

use crate::in_memory::helpers::{FrozenClock, instant, pending_task, reachable_employee};

type MemorySweeps = SweepService<
    InMemoryTaskRepository,
    InMemoryAssignmentRepository,
    InMemoryEmployeeDirectory,
    RecordingNotifier,
    FrozenClock,
>;

struct Stack {
    tasks: Arc<InMemoryTaskRepository>,
    assignments: Arc<InMemoryAssignmentRepository>,
    directory: Arc<InMemoryEmployeeDirectory>,
    notifier: Arc<RecordingNotifier>,
}

impl Stack {
    fn new() -> Self {
        Self {
            tasks: Arc::new(InMemoryTaskRepository::new()),
            assignments: Arc::new(InMemoryAssignmentRepository::new()),
            directory: Arc::new(InMemoryEmployeeDirectory::new()),
            notifier: Arc::new(RecordingNotifier::new()),
        }
    }

    /// Builds a sweep service over the shared adapters, running at the
    /// given instant.
    fn sweeps_at(&self, timestamp: &str, policy: LifecyclePolicy) -> MemorySweeps {
        SweepService::new(
            Arc::clone(&self.tasks),
            Arc::clone(&self.assignments),
            Arc::clone(&self.directory),
            Arc::clone(&self.notifier),
            Arc::new(FrozenClock::at(timestamp)),
            policy,
        )
    }

    async fn seed_task(&self, name: &str, recurrence: Recurrence, deadline: &str) -> Task {
        let clock = FrozenClock::at("2025-03-09T08:00:00Z");
        let task = pending_task(name, recurrence, deadline, &clock);
        self.tasks
            .store(&task)
            .await
            .expect("task store should succeed");
        task
    }

    async fn seed_assignee(&self, task: &Task) -> EmployeeId {
        let employee_id = EmployeeId::new();
        self.directory
            .insert(reachable_employee(employee_id))
            .expect("directory insert should succeed");
        let clock = FrozenClock::at("2025-03-09T08:00:00Z");
        self.assignments
            .store(&Assignment::new(task.id(), employee_id, &clock))
            .await
            .expect("assignment store should succeed");
        employee_id
    }

    async fn stored_task(&self, task: &Task) -> Task {
        self.tasks
            .find_by_id(task.id())
            .await
            .expect("lookup should succeed")
            .expect("task should exist")
    }

    async fn assignment(&self, task: &Task, employee_id: EmployeeId) -> Assignment {
        self.assignments
            .find(task.id(), employee_id)
            .await
            .expect("lookup should succeed")
            .expect("assignment should exist")
    }
}

#[fixture]
fn stack() -> Stack {
    Stack::new()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_full_day_runs_warning_expiry_and_reset_in_order(stack: Stack) {
    let task = stack
        .seed_task(
            "Close out the registers",
            Recurrence::Daily,
            "2025-03-10T12:30:00Z",
        )
        .await;
    let alice = stack.seed_assignee(&task).await;
    let policy = LifecyclePolicy::default();

    let warnings = stack
        .sweeps_at("2025-03-10T12:00:00Z", policy)
        .notify_expiring()
        .await
        .expect("warning pass should succeed");
    assert_eq!(warnings.notified, 1);
    let warned = stack.assignment(&task, alice).await;
    assert!(warned.expiry_notified_at().is_some());

    let expirations = stack
        .sweeps_at("2025-03-10T13:30:00Z", policy)
        .expire_overdue()
        .await
        .expect("expiration pass should succeed");
    assert_eq!(expirations.tasks_expired, 1);
    let expired = stack.stored_task(&task).await;
    assert_eq!(expired.status(), TaskStatus::Expired);
    assert_eq!(expired.expired_count(), 1);

    let resets = stack
        .sweeps_at("2025-03-10T13:30:00Z", policy)
        .reset_recurring()
        .await
        .expect("reset pass should succeed");
    assert_eq!(resets.reset, 1);
    let rewound = stack.stored_task(&task).await;
    assert_eq!(rewound.status(), TaskStatus::Pending);
    assert_eq!(rewound.deadline(), Some(instant("2025-03-11T23:59:59Z")));
    assert_eq!(rewound.expired_count(), 1);
    let fresh = stack.assignment(&task, alice).await;
    assert_eq!(fresh.status(), AssignmentStatus::Pending);
    assert!(fresh.expiry_notified_at().is_none());

    let kinds: Vec<NotificationKind> = stack
        .notifier
        .recorded()
        .iter()
        .map(Notification::kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            NotificationKind::TaskExpiringSoon,
            NotificationKind::TaskExpired,
            NotificationKind::TaskReset,
        ]
    );
    assert!(
        stack
            .notifier
            .recorded()
            .iter()
            .all(|notice| notice.recipient() == alice)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completed_work_rides_through_the_passes_untouched(stack: Stack) {
    let task = stack
        .seed_task(
            "Close out the registers",
            Recurrence::Daily,
            "2025-03-10T12:30:00Z",
        )
        .await;
    let alice = stack.seed_assignee(&task).await;
    let mut assignment = stack.assignment(&task, alice).await;
    assignment
        .transition_to(
            AssignmentStatus::Completed,
            &FrozenClock::at("2025-03-10T11:00:00Z"),
        )
        .expect("transition should succeed");
    stack
        .assignments
        .update(&assignment)
        .await
        .expect("update should succeed");
    let policy = LifecyclePolicy::default();

    let expirations = stack
        .sweeps_at("2025-03-10T13:30:00Z", policy)
        .expire_overdue()
        .await
        .expect("expiration pass should succeed");
    let resets = stack
        .sweeps_at("2025-03-10T13:30:00Z", policy)
        .reset_recurring()
        .await
        .expect("reset pass should succeed");

    assert_eq!(expirations.tasks_expired, 0);
    assert_eq!(expirations.assignments_expired, 0);
    assert_eq!(resets.reset, 0);
    let stored = stack.stored_task(&task).await;
    assert_eq!(stored.status(), TaskStatus::Completed);
    assert_eq!(stored.expired_count(), 0);
    assert_eq!(stored.deadline(), Some(instant("2025-03-10T12:30:00Z")));
    assert!(stack.notifier.recorded().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deadline_passed_reset_rolls_a_slipped_week_forward(stack: Stack) {
    let task = stack
        .seed_task("Stocktake", Recurrence::Weekly, "2025-03-08T23:59:59Z")
        .await;
    let alice = stack.seed_assignee(&task).await;
    let mut assignment = stack.assignment(&task, alice).await;
    assignment
        .transition_to(
            AssignmentStatus::Completed,
            &FrozenClock::at("2025-03-08T20:00:00Z"),
        )
        .expect("transition should succeed");
    stack
        .assignments
        .update(&assignment)
        .await
        .expect("update should succeed");
    let policy = LifecyclePolicy {
        reset_trigger: ResetTrigger::DeadlinePassed,
        ..LifecyclePolicy::default()
    };

    let resets = stack
        .sweeps_at("2025-03-10T12:00:00Z", policy)
        .reset_recurring()
        .await
        .expect("reset pass should succeed");

    assert_eq!(resets.reset, 1);
    let rewound = stack.stored_task(&task).await;
    assert_eq!(rewound.status(), TaskStatus::Pending);
    assert_eq!(rewound.deadline(), Some(instant("2025-03-15T23:59:59Z")));
    assert_eq!(rewound.expired_count(), 0);
    let fresh = stack.assignment(&task, alice).await;
    assert_eq!(fresh.status(), AssignmentStatus::Pending);
}
