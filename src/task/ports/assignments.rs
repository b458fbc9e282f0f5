//! Repository port for assignment persistence and bulk status updates.

use crate::task::domain::{Assignment, AssignmentStatus, EmployeeId, TaskId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for assignment repository operations.
pub type AssignmentRepositoryResult<T> = Result<T, AssignmentRepositoryError>;

/// Assignment persistence contract.
///
/// Implementations enforce uniqueness of the `(task, employee)` pair.
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// Stores a new assignment.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentRepositoryError::DuplicateAssignment`] when the
    /// pair is already assigned.
    async fn store(&self, assignment: &Assignment) -> AssignmentRepositoryResult<()>;

    /// Persists changes to an existing assignment (status, expiry-warning
    /// mark, timestamps).
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentRepositoryError::NotFound`] when the pair is not
    /// assigned.
    async fn update(&self, assignment: &Assignment) -> AssignmentRepositoryResult<()>;

    /// Finds the assignment for one `(task, employee)` pair.
    ///
    /// Returns `None` when the pair is not assigned.
    async fn find(
        &self,
        task_id: TaskId,
        employee_id: EmployeeId,
    ) -> AssignmentRepositoryResult<Option<Assignment>>;

    /// Returns every assignment of the task, ordered by creation time then
    /// employee identifier.
    async fn find_by_task(&self, task_id: TaskId) -> AssignmentRepositoryResult<Vec<Assignment>>;

    /// Sets every assignment of the task to `status` with `updated_at` at
    /// the given instant, returning how many records changed. A reset to
    /// [`AssignmentStatus::Pending`] also clears expiry-warning marks.
    async fn update_all_for_task(
        &self,
        task_id: TaskId,
        status: AssignmentStatus,
        at: DateTime<Utc>,
    ) -> AssignmentRepositoryResult<usize>;

    /// Counts the task's assignments holding the given status.
    async fn count_by_status(
        &self,
        task_id: TaskId,
        status: AssignmentStatus,
    ) -> AssignmentRepositoryResult<usize>;

    /// Removes the assignment for one `(task, employee)` pair.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentRepositoryError::NotFound`] when the pair is not
    /// assigned.
    async fn remove(&self, task_id: TaskId, employee_id: EmployeeId)
    -> AssignmentRepositoryResult<()>;
}

/// Errors returned by assignment repository implementations.
#[derive(Debug, Clone, Error)]
pub enum AssignmentRepositoryError {
    /// The `(task, employee)` pair is already assigned.
    #[error("duplicate assignment of employee {employee_id} to task {task_id}")]
    DuplicateAssignment {
        /// Task side of the duplicate pair.
        task_id: TaskId,
        /// Employee side of the duplicate pair.
        employee_id: EmployeeId,
    },

    /// The `(task, employee)` pair is not assigned.
    #[error("no assignment of employee {employee_id} to task {task_id}")]
    NotFound {
        /// Task side of the missing pair.
        task_id: TaskId,
        /// Employee side of the missing pair.
        employee_id: EmployeeId,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl AssignmentRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
