//! Service layer for interactive task and assignment mutations.
//!
//! The scheduled passes live in [`super::sweeps`]; this service covers the
//! operations people trigger: creating and requesting tasks, self-reported
//! progress, admin overrides and reassignment. Per the lifecycle contract,
//! self-reports touch only the reporter's assignment; the aggregate task
//! status is recomputed lazily via [`TaskLifecycleService::refresh_task_status`].

use chrono::{DateTime, Utc};
use mockable::Clock;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

use crate::task::{
    domain::{
        Assignment, AssignmentStatus, EmployeeId, LifecyclePolicy, PhotoRef, Recurrence, Task,
        TaskDomainError, TaskId, TaskName, TaskStatus,
    },
    ports::{
        AssignmentRepository, AssignmentRepositoryError, TaskRepository, TaskRepositoryError,
    },
};

/// Request payload for creating a task with its initial assignments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    name: String,
    recurrence: Recurrence,
    deadline: DateTime<Utc>,
    description: Option<String>,
    assignees: Vec<EmployeeId>,
    created_by: Option<EmployeeId>,
}

impl CreateTaskRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, recurrence: Recurrence, deadline: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            recurrence,
            deadline,
            description: None,
            assignees: Vec::new(),
            created_by: None,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the employees the task is assigned to.
    #[must_use]
    pub fn with_assignees(mut self, assignees: impl IntoIterator<Item = EmployeeId>) -> Self {
        self.assignees = assignees.into_iter().collect();
        self
    }

    /// Records the creating employee, who also becomes the assigner.
    #[must_use]
    pub const fn with_creator(mut self, creator: EmployeeId) -> Self {
        self.created_by = Some(creator);
        self
    }
}

/// Request payload for an employee-initiated task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTaskRequest {
    name: String,
    recurrence: Recurrence,
    deadline: DateTime<Utc>,
    description: Option<String>,
    requested_by: EmployeeId,
}

impl RequestTaskRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        recurrence: Recurrence,
        deadline: DateTime<Utc>,
        requested_by: EmployeeId,
    ) -> Self {
        Self {
            name: name.into(),
            recurrence,
            deadline,
            description: None,
            requested_by,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Service-level errors for interactive lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Task repository operation failed.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),
    /// Assignment repository operation failed.
    #[error(transparent)]
    Assignments(#[from] AssignmentRepositoryError),
    /// No task exists with the requested identifier.
    #[error("task {0} was not found")]
    TaskNotFound(TaskId),
    /// The employee has no assignment for the task.
    #[error("employee {employee_id} is not assigned to task {task_id}")]
    NotAssigned {
        /// Task the lookup ran against.
        task_id: TaskId,
        /// Employee without an assignment.
        employee_id: EmployeeId,
    },
    /// A created task needs at least one assignee.
    #[error("a task needs at least one assignee")]
    NoAssignees,
}

/// Result type for interactive lifecycle operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Interactive task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<T, A, C>
where
    T: TaskRepository,
    A: AssignmentRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    assignments: Arc<A>,
    clock: Arc<C>,
    policy: LifecyclePolicy,
}

impl<T, A, C> TaskLifecycleService<T, A, C>
where
    T: TaskRepository,
    A: AssignmentRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(
        tasks: Arc<T>,
        assignments: Arc<A>,
        clock: Arc<C>,
        policy: LifecyclePolicy,
    ) -> Self {
        Self {
            tasks,
            assignments,
            clock,
            policy,
        }
    }

    /// Creates a task and assigns it to the requested employees.
    ///
    /// Duplicate assignees collapse to one assignment each; the creator,
    /// when given, is recorded as the assigner on every assignment.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NoAssignees`] when the request names
    /// no assignees, a domain error when validation fails, or a repository
    /// error when persistence rejects the new records.
    pub async fn create_task(&self, request: CreateTaskRequest) -> TaskLifecycleResult<Task> {
        let CreateTaskRequest {
            name,
            recurrence,
            deadline,
            description,
            assignees,
            created_by,
        } = request;

        let unique_assignees = dedupe(assignees);
        if unique_assignees.is_empty() {
            return Err(TaskLifecycleError::NoAssignees);
        }

        let task_name = TaskName::new(name)?;
        let mut task = Task::new(task_name, recurrence, deadline, &*self.clock);
        if let Some(text) = description {
            task = task.with_description(text);
        }
        if let Some(creator) = created_by {
            task = task.with_creator(creator);
        }
        self.tasks.store(&task).await?;

        for employee_id in unique_assignees {
            let assignment = new_assignment(task.id(), employee_id, created_by, &*self.clock);
            self.assignments.store(&assignment).await?;
        }
        Ok(task)
    }

    /// Creates a task an employee requested for themselves.
    ///
    /// The task starts in `Requested` with a single `Requested` assignment
    /// for the requester, awaiting completion or an admin decision.
    ///
    /// # Errors
    ///
    /// Returns a domain error when validation fails or a repository error
    /// when persistence rejects the new records.
    pub async fn request_task(&self, request: RequestTaskRequest) -> TaskLifecycleResult<Task> {
        let RequestTaskRequest {
            name,
            recurrence,
            deadline,
            description,
            requested_by,
        } = request;

        let task_name = TaskName::new(name)?;
        let mut task =
            Task::new(task_name, recurrence, deadline, &*self.clock).with_creator(requested_by);
        if let Some(text) = description {
            task = task.with_description(text);
        }
        task.set_status(TaskStatus::Requested, &*self.clock);
        self.tasks.store(&task).await?;

        let mut assignment =
            Assignment::new(task.id(), requested_by, &*self.clock).with_assigned_by(requested_by);
        assignment.transition_to(AssignmentStatus::Requested, &*self.clock)?;
        self.assignments.store(&assignment).await?;
        Ok(task)
    }

    /// Applies an employee's self-reported status to their own assignment.
    ///
    /// Only the reporter's assignment changes; the task aggregate stays
    /// untouched until [`Self::refresh_task_status`] runs. Photos, when
    /// given, are appended to the task in upload order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotAssigned`] when the employee has no
    /// assignment for the task, a domain error when the transition is not
    /// allowed, or a repository error when persistence fails.
    pub async fn report_status(
        &self,
        task_id: TaskId,
        employee_id: EmployeeId,
        status: AssignmentStatus,
        photos: Vec<PhotoRef>,
    ) -> TaskLifecycleResult<Assignment> {
        let mut assignment = self
            .assignments
            .find(task_id, employee_id)
            .await?
            .ok_or(TaskLifecycleError::NotAssigned {
                task_id,
                employee_id,
            })?;
        assignment.transition_to(status, &*self.clock)?;
        self.assignments.update(&assignment).await?;

        if !photos.is_empty() {
            let mut task = self.require_task(task_id).await?;
            for photo in photos {
                task.append_photo(photo, &*self.clock);
            }
            self.tasks.update(&task).await?;
        }
        Ok(assignment)
    }

    /// Recomputes the task's aggregate status from its assignments and
    /// persists it when it changed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] when the task does not
    /// exist, or a repository error when persistence fails.
    pub async fn refresh_task_status(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        let mut task = self.require_task(task_id).await?;
        let assignments = self.assignments.find_by_task(task_id).await?;
        let aggregate = TaskStatus::aggregate(
            assignments.iter().map(Assignment::status),
            self.policy.completion_rule,
        );
        if aggregate != task.status() {
            task.set_status(aggregate, &*self.clock);
            self.tasks.update(&task).await?;
        }
        Ok(task)
    }

    /// Forces a task's stored status without consulting the aggregate.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] when the task does not
    /// exist, or a repository error when persistence fails.
    pub async fn override_task_status(
        &self,
        task_id: TaskId,
        status: TaskStatus,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.require_task(task_id).await?;
        task.set_status(status, &*self.clock);
        self.tasks.update(&task).await?;
        Ok(task)
    }

    /// Forces an assignment's status, bypassing transition validation.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotAssigned`] when the employee has no
    /// assignment for the task, or a repository error when persistence
    /// fails.
    pub async fn override_assignment_status(
        &self,
        task_id: TaskId,
        employee_id: EmployeeId,
        status: AssignmentStatus,
    ) -> TaskLifecycleResult<Assignment> {
        let mut assignment = self
            .assignments
            .find(task_id, employee_id)
            .await?
            .ok_or(TaskLifecycleError::NotAssigned {
                task_id,
                employee_id,
            })?;
        assignment.force_status(status, &*self.clock);
        self.assignments.update(&assignment).await?;
        Ok(assignment)
    }

    /// Moves a task from one employee to one or more others.
    ///
    /// The source employee's assignment is removed; each target employee
    /// gains a fresh pending assignment unless one already exists. Returns
    /// the task's assignment set after the move.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] when the task does not
    /// exist, [`TaskLifecycleError::NotAssigned`] when the source employee
    /// has no assignment, or a repository error when persistence fails.
    pub async fn reassign(
        &self,
        task_id: TaskId,
        from: EmployeeId,
        to: Vec<EmployeeId>,
        assigned_by: Option<EmployeeId>,
    ) -> TaskLifecycleResult<Vec<Assignment>> {
        self.require_task(task_id).await?;
        self.assignments
            .find(task_id, from)
            .await?
            .ok_or(TaskLifecycleError::NotAssigned {
                task_id,
                employee_id: from,
            })?;
        self.assignments.remove(task_id, from).await?;

        for employee_id in dedupe(to) {
            if self.assignments.find(task_id, employee_id).await?.is_some() {
                continue;
            }
            let assignment = new_assignment(task_id, employee_id, assigned_by, &*self.clock);
            self.assignments.store(&assignment).await?;
        }
        Ok(self.assignments.find_by_task(task_id).await?)
    }

    async fn require_task(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.tasks
            .find_by_id(task_id)
            .await?
            .ok_or(TaskLifecycleError::TaskNotFound(task_id))
    }
}

fn new_assignment(
    task_id: TaskId,
    employee_id: EmployeeId,
    assigned_by: Option<EmployeeId>,
    clock: &impl Clock,
) -> Assignment {
    let assignment = Assignment::new(task_id, employee_id, clock);
    match assigned_by {
        Some(assigner) => assignment.with_assigned_by(assigner),
        None => assignment,
    }
}

/// Collapses duplicate employee ids, keeping first-seen order.
fn dedupe(employee_ids: Vec<EmployeeId>) -> Vec<EmployeeId> {
    let mut seen = HashSet::new();
    employee_ids
        .into_iter()
        .filter(|employee_id| seen.insert(*employee_id))
        .collect()
}
