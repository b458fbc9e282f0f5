//! `PostgreSQL` repository implementation for assignment storage.

use super::{
    models::{AssignmentRow, NewAssignmentRow},
    schema::task_assignments,
    tasks::TaskPgPool,
};
use crate::task::{
    domain::{Assignment, AssignmentStatus, EmployeeId, PersistedAssignmentData, TaskId},
    ports::{AssignmentRepository, AssignmentRepositoryError, AssignmentRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed assignment repository.
#[derive(Debug, Clone)]
pub struct PostgresAssignmentRepository {
    pool: TaskPgPool,
}

impl PostgresAssignmentRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> AssignmentRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> AssignmentRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool
                .get()
                .map_err(AssignmentRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(AssignmentRepositoryError::persistence)?
    }
}

#[async_trait]
impl AssignmentRepository for PostgresAssignmentRepository {
    async fn store(&self, assignment: &Assignment) -> AssignmentRepositoryResult<()> {
        let task_id = assignment.task_id();
        let employee_id = assignment.employee_id();
        let new_row = to_new_row(assignment);

        self.run_blocking(move |connection| {
            diesel::insert_into(task_assignments::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        AssignmentRepositoryError::DuplicateAssignment {
                            task_id,
                            employee_id,
                        }
                    }
                    _ => AssignmentRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, assignment: &Assignment) -> AssignmentRepositoryResult<()> {
        let task_id = assignment.task_id();
        let employee_id = assignment.employee_id();
        let assigned_by = assignment.assigned_by().map(EmployeeId::into_inner);
        let status = assignment.status().as_str().to_owned();
        let expiry_notified_at = assignment.expiry_notified_at();
        let updated_at = assignment.updated_at();

        self.run_blocking(move |connection| {
            let affected = diesel::update(
                task_assignments::table
                    .find((task_id.into_inner(), employee_id.into_inner())),
            )
            .set((
                task_assignments::assigned_by.eq(assigned_by),
                task_assignments::status.eq(status),
                task_assignments::expiry_notified_at.eq(expiry_notified_at),
                task_assignments::updated_at.eq(updated_at),
            ))
            .execute(connection)
            .map_err(AssignmentRepositoryError::persistence)?;
            if affected == 0 {
                return Err(AssignmentRepositoryError::NotFound {
                    task_id,
                    employee_id,
                });
            }
            Ok(())
        })
        .await
    }

    async fn find(
        &self,
        task_id: TaskId,
        employee_id: EmployeeId,
    ) -> AssignmentRepositoryResult<Option<Assignment>> {
        self.run_blocking(move |connection| {
            let row = task_assignments::table
                .find((task_id.into_inner(), employee_id.into_inner()))
                .select(AssignmentRow::as_select())
                .first::<AssignmentRow>(connection)
                .optional()
                .map_err(AssignmentRepositoryError::persistence)?;
            row.map(row_to_assignment).transpose()
        })
        .await
    }

    async fn find_by_task(&self, task_id: TaskId) -> AssignmentRepositoryResult<Vec<Assignment>> {
        self.run_blocking(move |connection| {
            let rows = task_assignments::table
                .filter(task_assignments::task_id.eq(task_id.into_inner()))
                .order((
                    task_assignments::created_at.asc(),
                    task_assignments::employee_id.asc(),
                ))
                .select(AssignmentRow::as_select())
                .load::<AssignmentRow>(connection)
                .map_err(AssignmentRepositoryError::persistence)?;
            rows.into_iter().map(row_to_assignment).collect()
        })
        .await
    }

    async fn update_all_for_task(
        &self,
        task_id: TaskId,
        status: AssignmentStatus,
        at: DateTime<Utc>,
    ) -> AssignmentRepositoryResult<usize> {
        let status_value = status.as_str().to_owned();
        self.run_blocking(move |connection| {
            let scope = task_assignments::table
                .filter(task_assignments::task_id.eq(task_id.into_inner()));
            // A reset back to pending starts a fresh cycle, so the
            // expiry-warning mark must not carry over.
            let affected = if status == AssignmentStatus::Pending {
                diesel::update(scope)
                    .set((
                        task_assignments::status.eq(status_value),
                        task_assignments::expiry_notified_at.eq(None::<DateTime<Utc>>),
                        task_assignments::updated_at.eq(at),
                    ))
                    .execute(connection)
            } else {
                diesel::update(scope)
                    .set((
                        task_assignments::status.eq(status_value),
                        task_assignments::updated_at.eq(at),
                    ))
                    .execute(connection)
            }
            .map_err(AssignmentRepositoryError::persistence)?;
            Ok(affected)
        })
        .await
    }

    async fn count_by_status(
        &self,
        task_id: TaskId,
        status: AssignmentStatus,
    ) -> AssignmentRepositoryResult<usize> {
        let status_value = status.as_str().to_owned();
        self.run_blocking(move |connection| {
            let count = task_assignments::table
                .filter(task_assignments::task_id.eq(task_id.into_inner()))
                .filter(task_assignments::status.eq(status_value))
                .count()
                .get_result::<i64>(connection)
                .map_err(AssignmentRepositoryError::persistence)?;
            usize::try_from(count).map_err(AssignmentRepositoryError::persistence)
        })
        .await
    }

    async fn remove(
        &self,
        task_id: TaskId,
        employee_id: EmployeeId,
    ) -> AssignmentRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let affected = diesel::delete(
                task_assignments::table
                    .find((task_id.into_inner(), employee_id.into_inner())),
            )
            .execute(connection)
            .map_err(AssignmentRepositoryError::persistence)?;
            if affected == 0 {
                return Err(AssignmentRepositoryError::NotFound {
                    task_id,
                    employee_id,
                });
            }
            Ok(())
        })
        .await
    }
}

fn to_new_row(assignment: &Assignment) -> NewAssignmentRow {
    NewAssignmentRow {
        task_id: assignment.task_id().into_inner(),
        employee_id: assignment.employee_id().into_inner(),
        assigned_by: assignment.assigned_by().map(EmployeeId::into_inner),
        status: assignment.status().as_str().to_owned(),
        expiry_notified_at: assignment.expiry_notified_at(),
        created_at: assignment.created_at(),
        updated_at: assignment.updated_at(),
    }
}

fn row_to_assignment(row: AssignmentRow) -> AssignmentRepositoryResult<Assignment> {
    let AssignmentRow {
        task_id,
        employee_id,
        assigned_by,
        status: persisted_status,
        expiry_notified_at,
        created_at,
        updated_at,
    } = row;

    let status = AssignmentStatus::try_from(persisted_status.as_str())
        .map_err(AssignmentRepositoryError::persistence)?;

    let data = PersistedAssignmentData {
        task_id: TaskId::from_uuid(task_id),
        employee_id: EmployeeId::from_uuid(employee_id),
        assigned_by: assigned_by.map(EmployeeId::from_uuid),
        status,
        expiry_notified_at,
        created_at,
        updated_at,
    };
    Ok(Assignment::from_persisted(data))
}
