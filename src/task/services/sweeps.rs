//! Scheduled passes that drive the recurring-task lifecycle.
//!
//! Three batch operations cover the lifecycle of recurring work: warning
//! assignees shortly before a deadline, expiring overdue work, and
//! rescheduling recurring tasks for their next cycle. Each pass reads the
//! clock once, absorbs per-task and per-recipient failures with a warning,
//! and reports summary counters; only the initial batch query can abort a
//! pass.

use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::templates::NotificationCopy;
use crate::task::{
    domain::{
        Assignment, AssignmentStatus, EmployeeId, LifecyclePolicy, Notification,
        NotificationKind, Recurrence, ResetTrigger, Task, TaskStatus,
    },
    ports::{
        AssignmentRepository, DeadlineFilter, EmployeeDirectory, Notifier, TaskRepository,
        TaskRepositoryError,
    },
};

/// How far ahead of a deadline the expiring-soon warning fires.
const EXPIRY_WARNING_WINDOW: TimeDelta = TimeDelta::hours(1);

/// Error aborting a scheduled pass before any per-task work happens.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct SweepError(#[from] TaskRepositoryError);

/// Result type for scheduled pass operations.
pub type SweepResult<T> = Result<T, SweepError>;

/// Outcome counters for the expiry warning pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpiryNoticeSummary {
    /// Warnings delivered.
    pub notified: usize,
    /// Deliveries attempted but refused by the notifier.
    pub delivery_failures: usize,
    /// Tasks abandoned because their assignments could not be loaded.
    pub skipped_tasks: usize,
}

/// Outcome counters for the expiration pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpirationSummary {
    /// Tasks whose aggregate status transitioned into expired.
    pub tasks_expired: usize,
    /// Assignments moved to expired.
    pub assignments_expired: usize,
    /// Expiry notices delivered.
    pub notified: usize,
    /// Deliveries attempted but refused by the notifier.
    pub delivery_failures: usize,
    /// Tasks abandoned part-way through because persistence failed.
    pub skipped_tasks: usize,
}

/// Outcome counters for the recurrence reset pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResetSummary {
    /// Tasks moved onto their next cycle.
    pub reset: usize,
    /// Reset notices delivered.
    pub notified: usize,
    /// Deliveries attempted but refused by the notifier.
    pub delivery_failures: usize,
    /// Tasks abandoned because scheduling or persistence failed.
    pub skipped_tasks: usize,
}

/// Per-recipient delivery outcome inside a pass.
enum DeliveryOutcome {
    Delivered,
    Skipped,
    Failed,
}

/// Scheduled pass service over tasks, assignments and notifications.
#[derive(Clone)]
pub struct SweepService<T, A, D, N, C>
where
    T: TaskRepository,
    A: AssignmentRepository,
    D: EmployeeDirectory,
    N: Notifier,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    assignments: Arc<A>,
    directory: Arc<D>,
    notifier: Arc<N>,
    clock: Arc<C>,
    policy: LifecyclePolicy,
    copy: NotificationCopy,
}

impl<T, A, D, N, C> SweepService<T, A, D, N, C>
where
    T: TaskRepository,
    A: AssignmentRepository,
    D: EmployeeDirectory,
    N: Notifier,
    C: Clock + Send + Sync,
{
    /// Creates a sweep service with the built-in notification copy.
    #[must_use]
    pub fn new(
        tasks: Arc<T>,
        assignments: Arc<A>,
        directory: Arc<D>,
        notifier: Arc<N>,
        clock: Arc<C>,
        policy: LifecyclePolicy,
    ) -> Self {
        Self {
            tasks,
            assignments,
            directory,
            notifier,
            clock,
            policy,
            copy: NotificationCopy::default(),
        }
    }

    /// Replaces the notification copy templates.
    #[must_use]
    pub fn with_copy(mut self, copy: NotificationCopy) -> Self {
        self.copy = copy;
        self
    }

    /// Warns awaiting assignees whose task deadline falls within the next
    /// hour.
    ///
    /// A successful delivery is marked on the assignment so repeat runs
    /// inside the warning window stay quiet; a failed delivery leaves the
    /// mark unset and retries on the next run. Task state is never mutated
    /// here.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError`] when the batch query for tasks entering the
    /// window fails.
    pub async fn notify_expiring(&self) -> SweepResult<ExpiryNoticeSummary> {
        let now = self.clock.utc();
        let until = now + EXPIRY_WARNING_WINDOW;
        let tasks = self
            .tasks
            .find_by_recurrence_and_deadline(
                &Recurrence::ALL,
                DeadlineFilter::Within { from: now, until },
            )
            .await?;

        let mut summary = ExpiryNoticeSummary::default();
        for task in tasks {
            self.warn_task_assignees(&task, &mut summary).await;
        }
        info!(
            notified = summary.notified,
            delivery_failures = summary.delivery_failures,
            skipped_tasks = summary.skipped_tasks,
            "expiry warning pass finished"
        );
        Ok(summary)
    }

    /// Expires overdue work and refreshes each scanned task's aggregate
    /// status.
    ///
    /// Every assignment still awaiting action on an overdue task becomes
    /// expired, with a notice to assignees carrying a device token. The
    /// aggregate status is then recomputed for every scanned task, and the
    /// expiry counter advances at most once per task per pass, only when
    /// the task transitions into expired.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError`] when the batch query for overdue tasks fails.
    pub async fn expire_overdue(&self) -> SweepResult<ExpirationSummary> {
        let now = self.clock.utc();
        let tasks = self
            .tasks
            .find_by_recurrence_and_deadline(&Recurrence::ALL, DeadlineFilter::AtOrBefore(now))
            .await?;

        let mut summary = ExpirationSummary::default();
        for task in tasks {
            self.expire_task(task, &mut summary).await;
        }
        info!(
            tasks_expired = summary.tasks_expired,
            assignments_expired = summary.assignments_expired,
            notified = summary.notified,
            delivery_failures = summary.delivery_failures,
            skipped_tasks = summary.skipped_tasks,
            "expiration pass finished"
        );
        Ok(summary)
    }

    /// Reschedules recurring tasks for their next cycle.
    ///
    /// Selection follows the configured [`ResetTrigger`]; in both modes a
    /// task keeps its current cycle until the stored deadline has passed,
    /// which makes repeat runs within one period no-ops. A reset moves
    /// every assignment back to pending, clears expiry-warning marks,
    /// schedules the next deadline and announces it to the assignees.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError`] when the batch query for reset candidates
    /// fails.
    pub async fn reset_recurring(&self) -> SweepResult<ResetSummary> {
        let now = self.clock.utc();
        let tasks = match self.policy.reset_trigger {
            ResetTrigger::StatusExpired => self.tasks.find_by_status(TaskStatus::Expired).await?,
            ResetTrigger::DeadlinePassed => {
                self.tasks
                    .find_by_recurrence_and_deadline(
                        &Recurrence::RECURRING,
                        DeadlineFilter::AtOrBefore(now),
                    )
                    .await?
            }
        };

        let mut summary = ResetSummary::default();
        for task in tasks {
            self.reset_task(task, now, &mut summary).await;
        }
        info!(
            reset = summary.reset,
            notified = summary.notified,
            delivery_failures = summary.delivery_failures,
            skipped_tasks = summary.skipped_tasks,
            "reset pass finished"
        );
        Ok(summary)
    }

    async fn warn_task_assignees(&self, task: &Task, summary: &mut ExpiryNoticeSummary) {
        let assignments = match self.assignments.find_by_task(task.id()).await {
            Ok(assignments) => assignments,
            Err(error) => {
                warn!(
                    task_id = %task.id(),
                    error = %error,
                    "failed to load assignments; task skipped"
                );
                summary.skipped_tasks += 1;
                return;
            }
        };

        for mut assignment in assignments {
            if !assignment.status().is_awaiting() || assignment.expiry_notified_at().is_some() {
                continue;
            }
            match self
                .deliver(
                    NotificationKind::TaskExpiringSoon,
                    task,
                    task.deadline(),
                    assignment.employee_id(),
                )
                .await
            {
                DeliveryOutcome::Delivered => {
                    summary.notified += 1;
                    assignment.mark_expiry_notified(&*self.clock);
                    if let Err(error) = self.assignments.update(&assignment).await {
                        warn!(
                            task_id = %task.id(),
                            employee_id = %assignment.employee_id(),
                            error = %error,
                            "failed to record the warning; it will repeat next run"
                        );
                    }
                }
                DeliveryOutcome::Failed => summary.delivery_failures += 1,
                DeliveryOutcome::Skipped => {}
            }
        }
    }

    async fn expire_task(&self, mut task: Task, summary: &mut ExpirationSummary) {
        let task_id = task.id();
        let assignments = match self.assignments.find_by_task(task_id).await {
            Ok(assignments) => assignments,
            Err(error) => {
                warn!(
                    task_id = %task_id,
                    error = %error,
                    "failed to load assignments; task skipped"
                );
                summary.skipped_tasks += 1;
                return;
            }
        };

        let statuses = self.expire_assignments(&task, assignments, summary).await;
        let aggregate = TaskStatus::aggregate(statuses, self.policy.completion_rule);
        if aggregate == task.status() {
            return;
        }

        task.set_status(aggregate, &*self.clock);
        if let Err(error) = self.tasks.update(&task).await {
            warn!(
                task_id = %task_id,
                error = %error,
                "failed to persist the aggregate status"
            );
            summary.skipped_tasks += 1;
            return;
        }
        if aggregate == TaskStatus::Expired {
            summary.tasks_expired += 1;
            // Counter after status: a failed status write retries the whole
            // task next pass, while a failed counter write only loses one
            // bump instead of double counting.
            match self.tasks.increment_expired_count(task_id).await {
                Ok(count) => {
                    debug!(task_id = %task_id, expired_count = count, "advanced the expiry counter");
                }
                Err(error) => {
                    warn!(
                        task_id = %task_id,
                        error = %error,
                        "failed to advance the expiry counter"
                    );
                }
            }
        }
    }

    /// Expires awaiting assignments and returns every assignment's status
    /// for aggregation.
    async fn expire_assignments(
        &self,
        task: &Task,
        assignments: Vec<Assignment>,
        summary: &mut ExpirationSummary,
    ) -> Vec<AssignmentStatus> {
        let mut statuses = Vec::with_capacity(assignments.len());
        for mut assignment in assignments {
            if assignment.status().is_awaiting() {
                self.expire_assignment(task, &mut assignment, summary).await;
            }
            statuses.push(assignment.status());
        }
        statuses
    }

    async fn expire_assignment(
        &self,
        task: &Task,
        assignment: &mut Assignment,
        summary: &mut ExpirationSummary,
    ) {
        let employee_id = assignment.employee_id();
        if let Err(error) = assignment.transition_to(AssignmentStatus::Expired, &*self.clock) {
            warn!(
                task_id = %task.id(),
                employee_id = %employee_id,
                error = %error,
                "assignment refused the expiry transition"
            );
            return;
        }
        if let Err(error) = self.assignments.update(assignment).await {
            warn!(
                task_id = %task.id(),
                employee_id = %employee_id,
                error = %error,
                "failed to persist the expired assignment"
            );
            return;
        }
        summary.assignments_expired += 1;
        match self
            .deliver(
                NotificationKind::TaskExpired,
                task,
                task.deadline(),
                employee_id,
            )
            .await
        {
            DeliveryOutcome::Delivered => summary.notified += 1,
            DeliveryOutcome::Failed => summary.delivery_failures += 1,
            DeliveryOutcome::Skipped => {}
        }
    }

    async fn reset_task(&self, mut task: Task, now: DateTime<Utc>, summary: &mut ResetSummary) {
        let task_id = task.id();
        if !task.recurrence().is_recurring() {
            debug!(task_id = %task_id, "one-off task never restarts");
            return;
        }
        let Some(current_deadline) = task.deadline() else {
            warn!(task_id = %task_id, "task has no deadline to reschedule from");
            summary.skipped_tasks += 1;
            return;
        };
        if current_deadline > now {
            debug!(task_id = %task_id, "deadline still ahead; cycle untouched");
            return;
        }
        let Some(next_deadline) =
            task.recurrence()
                .next_deadline(current_deadline, now, self.policy.daily_reset_time)
        else {
            warn!(
                task_id = %task_id,
                recurrence = %task.recurrence(),
                "next deadline is unrepresentable"
            );
            summary.skipped_tasks += 1;
            return;
        };

        if let Err(error) = self
            .assignments
            .update_all_for_task(task_id, AssignmentStatus::Pending, now)
            .await
        {
            warn!(
                task_id = %task_id,
                error = %error,
                "failed to reset assignments; task skipped"
            );
            summary.skipped_tasks += 1;
            return;
        }
        task.reset_for_next_cycle(next_deadline, &*self.clock);
        if let Err(error) = self.tasks.update(&task).await {
            warn!(
                task_id = %task_id,
                error = %error,
                "failed to persist the task reset"
            );
            summary.skipped_tasks += 1;
            return;
        }
        summary.reset += 1;
        self.announce_reset(&task, next_deadline, summary).await;
    }

    async fn announce_reset(
        &self,
        task: &Task,
        next_deadline: DateTime<Utc>,
        summary: &mut ResetSummary,
    ) {
        let assignments = match self.assignments.find_by_task(task.id()).await {
            Ok(assignments) => assignments,
            Err(error) => {
                warn!(
                    task_id = %task.id(),
                    error = %error,
                    "failed to load assignees for reset notices"
                );
                return;
            }
        };
        for assignment in assignments {
            match self
                .deliver(
                    NotificationKind::TaskReset,
                    task,
                    Some(next_deadline),
                    assignment.employee_id(),
                )
                .await
            {
                DeliveryOutcome::Delivered => summary.notified += 1,
                DeliveryOutcome::Failed => summary.delivery_failures += 1,
                DeliveryOutcome::Skipped => {}
            }
        }
    }

    /// Renders and sends one notification, shielding the pass from every
    /// per-recipient failure.
    async fn deliver(
        &self,
        kind: NotificationKind,
        task: &Task,
        deadline: Option<DateTime<Utc>>,
        employee_id: EmployeeId,
    ) -> DeliveryOutcome {
        let employee = match self.directory.find(employee_id).await {
            Ok(Some(employee)) => employee,
            Ok(None) => {
                debug!(employee_id = %employee_id, "assignee is not in the directory");
                return DeliveryOutcome::Skipped;
            }
            Err(error) => {
                warn!(employee_id = %employee_id, error = %error, "directory lookup failed");
                return DeliveryOutcome::Skipped;
            }
        };
        if employee.device_token().is_none() {
            debug!(employee_id = %employee_id, "assignee has no registered device");
            return DeliveryOutcome::Skipped;
        }

        let copy = match self.copy.render(kind, task, deadline) {
            Ok(copy) => copy,
            Err(error) => {
                warn!(
                    task_id = %task.id(),
                    error = %error,
                    "failed to render notification copy"
                );
                return DeliveryOutcome::Skipped;
            }
        };
        let (title, body) = copy.into_parts();
        let notification = Notification::new(employee_id, kind, title, body, task.id());
        match self.notifier.notify(&notification).await {
            Ok(()) => DeliveryOutcome::Delivered,
            Err(error) => {
                warn!(
                    employee_id = %employee_id,
                    task_id = %task.id(),
                    error = %error,
                    "notification delivery failed"
                );
                DeliveryOutcome::Failed
            }
        }
    }
}
