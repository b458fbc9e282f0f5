//! Task aggregate root for recurring workforce assignments.

use super::{EmployeeId, PhotoRef, Recurrence, TaskId, TaskName, TaskStatus};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Task aggregate root.
///
/// The overall status is a deterministic function of the task's assignment
/// statuses after every lifecycle pass; employee self-service updates touch
/// only their assignment and leave the aggregate to a lazy recompute. The
/// expiry counter is excluded from blanket updates and only advances through
/// the store's atomic increment operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    name: TaskName,
    description: Option<String>,
    recurrence: Recurrence,
    deadline: Option<DateTime<Utc>>,
    status: TaskStatus,
    expired_count: u32,
    photos: Vec<PhotoRef>,
    created_by: Option<EmployeeId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted task name.
    pub name: TaskName,
    /// Persisted free-text description, if any.
    pub description: Option<String>,
    /// Persisted recurrence cadence.
    pub recurrence: Recurrence,
    /// Persisted deadline; `None` only transiently for legacy records.
    pub deadline: Option<DateTime<Utc>>,
    /// Persisted task-level status.
    pub status: TaskStatus,
    /// Persisted count of expiry cycles.
    pub expired_count: u32,
    /// Persisted photo references in report order.
    pub photos: Vec<PhotoRef>,
    /// Persisted creator reference, if any.
    pub created_by: Option<EmployeeId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a pending task with the given cadence and deadline.
    #[must_use]
    pub fn new(
        name: TaskName,
        recurrence: Recurrence,
        deadline: DateTime<Utc>,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            name,
            description: None,
            recurrence,
            deadline: Some(deadline),
            status: TaskStatus::Pending,
            expired_count: 0,
            photos: Vec::new(),
            created_by: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Sets the free-text description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the creating employee.
    #[must_use]
    pub const fn with_creator(mut self, created_by: EmployeeId) -> Self {
        self.created_by = Some(created_by);
        self
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            description: data.description,
            recurrence: data.recurrence,
            deadline: data.deadline,
            status: data.status,
            expired_count: data.expired_count,
            photos: data.photos,
            created_by: data.created_by,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task name.
    #[must_use]
    pub const fn name(&self) -> &TaskName {
        &self.name
    }

    /// Returns the free-text description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the recurrence cadence.
    #[must_use]
    pub const fn recurrence(&self) -> Recurrence {
        self.recurrence
    }

    /// Returns the current deadline; `None` only transiently for legacy
    /// records.
    #[must_use]
    pub const fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    /// Returns the task-level status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns how many times the task has expired.
    #[must_use]
    pub const fn expired_count(&self) -> u32 {
        self.expired_count
    }

    /// Returns the photo references in report order.
    #[must_use]
    pub fn photos(&self) -> &[PhotoRef] {
        &self.photos
    }

    /// Returns the creating employee, if recorded.
    #[must_use]
    pub const fn created_by(&self) -> Option<EmployeeId> {
        self.created_by
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

    /// Applies a task-level status: an aggregate result or an admin
    /// override.
    pub fn set_status(&mut self, status: TaskStatus, clock: &impl Clock) {
        self.status = status;
        self.touch(clock);
    }

    /// Rewinds the task for its next recurrence cycle: the deadline moves
    /// to `next_deadline` and the status returns to pending.
    pub fn reset_for_next_cycle(&mut self, next_deadline: DateTime<Utc>, clock: &impl Clock) {
        self.deadline = Some(next_deadline);
        self.status = TaskStatus::Pending;
        self.touch(clock);
    }

    /// Appends a photo reference reported against the task.
    pub fn append_photo(&mut self, photo: PhotoRef, clock: &impl Clock) {
        self.photos.push(photo);
        self.touch(clock);
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

impl From<&Task> for PersistedTaskData {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            name: task.name.clone(),
            description: task.description.clone(),
            recurrence: task.recurrence,
            deadline: task.deadline,
            status: task.status,
            expired_count: task.expired_count,
            photos: task.photos.clone(),
            created_by: task.created_by,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}
