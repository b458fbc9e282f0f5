//! In-memory repository for task lifecycle tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{PersistedTaskData, Recurrence, Task, TaskId, TaskStatus},
    ports::{DeadlineFilter, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_deadline(task: &Task, filter: DeadlineFilter) -> bool {
    task.deadline().is_some_and(|deadline| match filter {
        DeadlineFilter::AtOrBefore(limit) => deadline <= limit,
        DeadlineFilter::Within { from, until } => deadline >= from && deadline <= until,
    })
}

/// Sorts scan results into the stable order the queries promise.
fn sorted_by_creation(mut tasks: Vec<Task>) -> Vec<Task> {
    tasks.sort_by_key(|task| (task.created_at(), task.id().into_inner()));
    tasks
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let stored = state
            .tasks
            .get_mut(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;

        // The expiry counter only moves through `increment_expired_count`,
        // so a stale snapshot in `task` cannot roll it back.
        let mut data = PersistedTaskData::from(task);
        data.expired_count = stored.expired_count();
        *stored = Task::from_persisted(data);
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn find_by_recurrence_and_deadline(
        &self,
        types: &[Recurrence],
        filter: DeadlineFilter,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let tasks = state
            .tasks
            .values()
            .filter(|task| types.contains(&task.recurrence()))
            .filter(|task| matches_deadline(task, filter))
            .cloned()
            .collect();
        Ok(sorted_by_creation(tasks))
    }

    async fn find_by_status(&self, status: TaskStatus) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let tasks = state
            .tasks
            .values()
            .filter(|task| task.status() == status)
            .cloned()
            .collect();
        Ok(sorted_by_creation(tasks))
    }

    async fn increment_expired_count(&self, id: TaskId) -> TaskRepositoryResult<u32> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let stored = state
            .tasks
            .get_mut(&id)
            .ok_or(TaskRepositoryError::NotFound(id))?;

        let bumped = stored.expired_count().saturating_add(1);
        let mut data = PersistedTaskData::from(&*stored);
        data.expired_count = bumped;
        *stored = Task::from_persisted(data);
        Ok(bumped)
    }
}
