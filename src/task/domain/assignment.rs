//! Assignment join entity binding one employee to one task.

use super::{AssignmentStatus, EmployeeId, TaskDomainError, TaskId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Per-employee assignment record for one task.
///
/// Identity is the `(task, employee)` pair; stores enforce its uniqueness,
/// and reassignment detaches one pair and attaches another rather than
/// mutating employee identity in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    task_id: TaskId,
    employee_id: EmployeeId,
    assigned_by: Option<EmployeeId>,
    status: AssignmentStatus,
    expiry_notified_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedAssignmentData {
    /// Task the assignment belongs to.
    pub task_id: TaskId,
    /// Employee holding the assignment.
    pub employee_id: EmployeeId,
    /// Employee who made the assignment, if recorded.
    pub assigned_by: Option<EmployeeId>,
    /// Persisted per-employee status.
    pub status: AssignmentStatus,
    /// When an expiry warning was last delivered, if ever.
    pub expiry_notified_at: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Assignment {
    /// Creates a pending assignment for an employee.
    #[must_use]
    pub fn new(task_id: TaskId, employee_id: EmployeeId, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            task_id,
            employee_id,
            assigned_by: None,
            status: AssignmentStatus::Pending,
            expiry_notified_at: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Sets the assigning employee.
    #[must_use]
    pub const fn with_assigned_by(mut self, assigned_by: EmployeeId) -> Self {
        self.assigned_by = Some(assigned_by);
        self
    }

    /// Reconstructs an assignment from persisted storage.
    #[must_use]
    pub const fn from_persisted(data: PersistedAssignmentData) -> Self {
        Self {
            task_id: data.task_id,
            employee_id: data.employee_id,
            assigned_by: data.assigned_by,
            status: data.status,
            expiry_notified_at: data.expiry_notified_at,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task the assignment belongs to.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the employee holding the assignment.
    #[must_use]
    pub const fn employee_id(&self) -> EmployeeId {
        self.employee_id
    }

    /// Returns the employee who made the assignment, if recorded.
    #[must_use]
    pub const fn assigned_by(&self) -> Option<EmployeeId> {
        self.assigned_by
    }

    /// Returns the per-employee status.
    #[must_use]
    pub const fn status(&self) -> AssignmentStatus {
        self.status
    }

    /// Returns when an expiry warning was last delivered, if ever.
    #[must_use]
    pub const fn expiry_notified_at(&self) -> Option<DateTime<Utc>> {
        self.expiry_notified_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Applies a validated status transition.
    ///
    /// Rewinding to pending clears the expiry-warning mark so the next
    /// cycle may warn again.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatusTransition`] when the status
    /// machine forbids moving to `next`.
    pub fn transition_to(
        &mut self,
        next: AssignmentStatus,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if !self.status.can_transition_to(next) {
            return Err(TaskDomainError::InvalidStatusTransition {
                task_id: self.task_id,
                employee_id: self.employee_id,
                from: self.status,
                to: next,
            });
        }
        self.apply_status(next);
        self.touch(clock);
        Ok(())
    }

    /// Forces a status without transition validation.
    ///
    /// Reserved for admin overrides and bulk resets; everything else goes
    /// through [`Assignment::transition_to`].
    pub fn force_status(&mut self, status: AssignmentStatus, clock: &impl Clock) {
        self.apply_status(status);
        self.touch(clock);
    }

    /// Records that an expiry warning was delivered to the assignee.
    pub fn mark_expiry_notified(&mut self, clock: &impl Clock) {
        let timestamp = clock.utc();
        self.expiry_notified_at = Some(timestamp);
        self.updated_at = timestamp;
    }

    fn apply_status(&mut self, status: AssignmentStatus) {
        self.status = status;
        if status == AssignmentStatus::Pending {
            self.expiry_notified_at = None;
        }
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

impl From<&Assignment> for PersistedAssignmentData {
    fn from(assignment: &Assignment) -> Self {
        Self {
            task_id: assignment.task_id,
            employee_id: assignment.employee_id,
            assigned_by: assignment.assigned_by,
            status: assignment.status,
            expiry_notified_at: assignment.expiry_notified_at,
            created_at: assignment.created_at,
            updated_at: assignment.updated_at,
        }
    }
}
