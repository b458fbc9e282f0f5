//! Repository port for task persistence and batch lookup.

use crate::task::domain::{Recurrence, Task, TaskId, TaskStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Deadline window selector for batch queries.
///
/// Tasks without a deadline never match either filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineFilter {
    /// Deadlines at or before the given instant.
    AtOrBefore(DateTime<Utc>),
    /// Deadlines within a closed range.
    Within {
        /// Earliest matching deadline.
        from: DateTime<Utc>,
        /// Latest matching deadline.
        until: DateTime<Utc>,
    },
}

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID
    /// already exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists changes to an existing task (status, deadline, photos,
    /// timestamps). The expiry counter is deliberately excluded; it only
    /// advances through [`TaskRepository::increment_expired_count`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns tasks of the given cadences whose deadline matches the
    /// filter, ordered by creation time.
    async fn find_by_recurrence_and_deadline(
        &self,
        types: &[Recurrence],
        filter: DeadlineFilter,
    ) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns tasks with the given stored status, ordered by creation
    /// time.
    async fn find_by_status(&self, status: TaskStatus) -> TaskRepositoryResult<Vec<Task>>;

    /// Atomically increments the task's expiry counter and returns the new
    /// value.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn increment_expired_count(&self, id: TaskId) -> TaskRepositoryResult<u32>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
