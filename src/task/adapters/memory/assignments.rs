//! In-memory repository for assignment rows.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{Assignment, AssignmentStatus, EmployeeId, PersistedAssignmentData, TaskId},
    ports::{AssignmentRepository, AssignmentRepositoryError, AssignmentRepositoryResult},
};

/// Thread-safe in-memory assignment repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAssignmentRepository {
    state: Arc<RwLock<InMemoryAssignmentState>>,
}

#[derive(Debug, Default)]
struct InMemoryAssignmentState {
    assignments: HashMap<(TaskId, EmployeeId), Assignment>,
}

impl InMemoryAssignmentRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AssignmentRepository for InMemoryAssignmentRepository {
    async fn store(&self, assignment: &Assignment) -> AssignmentRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            AssignmentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let key = (assignment.task_id(), assignment.employee_id());
        if state.assignments.contains_key(&key) {
            return Err(AssignmentRepositoryError::DuplicateAssignment {
                task_id: assignment.task_id(),
                employee_id: assignment.employee_id(),
            });
        }
        state.assignments.insert(key, assignment.clone());
        Ok(())
    }

    async fn update(&self, assignment: &Assignment) -> AssignmentRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            AssignmentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let key = (assignment.task_id(), assignment.employee_id());
        let stored =
            state
                .assignments
                .get_mut(&key)
                .ok_or(AssignmentRepositoryError::NotFound {
                    task_id: assignment.task_id(),
                    employee_id: assignment.employee_id(),
                })?;
        *stored = assignment.clone();
        Ok(())
    }

    async fn find(
        &self,
        task_id: TaskId,
        employee_id: EmployeeId,
    ) -> AssignmentRepositoryResult<Option<Assignment>> {
        let state = self.state.read().map_err(|err| {
            AssignmentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.assignments.get(&(task_id, employee_id)).cloned())
    }

    async fn find_by_task(&self, task_id: TaskId) -> AssignmentRepositoryResult<Vec<Assignment>> {
        let state = self.state.read().map_err(|err| {
            AssignmentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let mut assignments: Vec<Assignment> = state
            .assignments
            .values()
            .filter(|assignment| assignment.task_id() == task_id)
            .cloned()
            .collect();
        assignments
            .sort_by_key(|assignment| (assignment.created_at(), assignment.employee_id()));
        Ok(assignments)
    }

    async fn update_all_for_task(
        &self,
        task_id: TaskId,
        status: AssignmentStatus,
        at: DateTime<Utc>,
    ) -> AssignmentRepositoryResult<usize> {
        let mut state = self.state.write().map_err(|err| {
            AssignmentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let mut updated = 0_usize;
        for assignment in state
            .assignments
            .values_mut()
            .filter(|assignment| assignment.task_id() == task_id)
        {
            let mut data = PersistedAssignmentData::from(&*assignment);
            data.status = status;
            data.updated_at = at;
            // A reset back to pending starts a fresh cycle, so the
            // expiry-warning mark must not carry over.
            if status == AssignmentStatus::Pending {
                data.expiry_notified_at = None;
            }
            *assignment = Assignment::from_persisted(data);
            updated = updated.saturating_add(1);
        }
        Ok(updated)
    }

    async fn count_by_status(
        &self,
        task_id: TaskId,
        status: AssignmentStatus,
    ) -> AssignmentRepositoryResult<usize> {
        let state = self.state.read().map_err(|err| {
            AssignmentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let count = state
            .assignments
            .values()
            .filter(|assignment| {
                assignment.task_id() == task_id && assignment.status() == status
            })
            .count();
        Ok(count)
    }

    async fn remove(
        &self,
        task_id: TaskId,
        employee_id: EmployeeId,
    ) -> AssignmentRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            AssignmentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        state
            .assignments
            .remove(&(task_id, employee_id))
            .ok_or(AssignmentRepositoryError::NotFound {
                task_id,
                employee_id,
            })?;
        Ok(())
    }
}
