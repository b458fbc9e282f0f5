//! `PostgreSQL` repository implementation for task storage.

use super::{
    models::{NewTaskRow, TaskRow},
    schema::tasks,
};
use crate::task::{
    domain::{
        EmployeeId, PersistedTaskData, PhotoRef, Recurrence, Task, TaskId, TaskName, TaskStatus,
    },
    ports::{DeadlineFilter, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by the lifecycle adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_new_row(task)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let name = task.name().as_str().to_owned();
        let description = task.description().map(ToOwned::to_owned);
        let recurrence = task.recurrence().as_str().to_owned();
        let deadline = task.deadline();
        let status = task.status().as_str().to_owned();
        let photos =
            serde_json::to_value(task.photos()).map_err(TaskRepositoryError::persistence)?;
        let updated_at = task.updated_at();

        self.run_blocking(move |connection| {
            // The expiry counter is deliberately absent from the change set;
            // it only moves through `increment_expired_count`.
            let affected =
                diesel::update(tasks::table.filter(tasks::id.eq(task_id.into_inner())))
                    .set((
                        tasks::name.eq(name),
                        tasks::description.eq(description),
                        tasks::recurrence.eq(recurrence),
                        tasks::deadline.eq(deadline),
                        tasks::status.eq(status),
                        tasks::photos.eq(photos),
                        tasks::updated_at.eq(updated_at),
                    ))
                    .execute(connection)
                    .map_err(TaskRepositoryError::persistence)?;
            if affected == 0 {
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn find_by_recurrence_and_deadline(
        &self,
        types: &[Recurrence],
        filter: DeadlineFilter,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let recurrences: Vec<String> = types
            .iter()
            .map(|recurrence| recurrence.as_str().to_owned())
            .collect();

        self.run_blocking(move |connection| {
            let mut query = tasks::table
                .select(TaskRow::as_select())
                .filter(tasks::recurrence.eq_any(recurrences))
                .into_boxed();
            // Comparisons against a NULL deadline are never true, so tasks
            // without a deadline fall outside every filter.
            query = match filter {
                DeadlineFilter::AtOrBefore(limit) => query.filter(tasks::deadline.le(limit)),
                DeadlineFilter::Within { from, until } => query
                    .filter(tasks::deadline.ge(from))
                    .filter(tasks::deadline.le(until)),
            };
            let rows = query
                .order(tasks::created_at.asc())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn find_by_status(&self, status: TaskStatus) -> TaskRepositoryResult<Vec<Task>> {
        let status_value = status.as_str().to_owned();
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::status.eq(status_value))
                .order(tasks::created_at.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn increment_expired_count(&self, id: TaskId) -> TaskRepositoryResult<u32> {
        self.run_blocking(move |connection| {
            let bumped =
                diesel::update(tasks::table.filter(tasks::id.eq(id.into_inner())))
                    .set(tasks::expired_count.eq(tasks::expired_count + 1))
                    .returning(tasks::expired_count)
                    .get_result::<i32>(connection)
                    .optional()
                    .map_err(TaskRepositoryError::persistence)?
                    .ok_or(TaskRepositoryError::NotFound(id))?;
            u32::try_from(bumped).map_err(TaskRepositoryError::persistence)
        })
        .await
    }
}

fn to_new_row(task: &Task) -> TaskRepositoryResult<NewTaskRow> {
    let expired_count =
        i32::try_from(task.expired_count()).map_err(TaskRepositoryError::persistence)?;
    let photos = serde_json::to_value(task.photos()).map_err(TaskRepositoryError::persistence)?;

    Ok(NewTaskRow {
        id: task.id().into_inner(),
        name: task.name().as_str().to_owned(),
        description: task.description().map(ToOwned::to_owned),
        recurrence: task.recurrence().as_str().to_owned(),
        deadline: task.deadline(),
        status: task.status().as_str().to_owned(),
        expired_count,
        photos,
        created_by: task.created_by().map(EmployeeId::into_inner),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        name: persisted_name,
        description,
        recurrence: persisted_recurrence,
        deadline,
        status: persisted_status,
        expired_count: persisted_expired_count,
        photos: persisted_photos,
        created_by,
        created_at,
        updated_at,
    } = row;

    let name = TaskName::new(persisted_name).map_err(TaskRepositoryError::persistence)?;
    let recurrence = Recurrence::try_from(persisted_recurrence.as_str())
        .map_err(TaskRepositoryError::persistence)?;
    let status = TaskStatus::try_from(persisted_status.as_str())
        .map_err(TaskRepositoryError::persistence)?;
    let expired_count =
        u32::try_from(persisted_expired_count).map_err(TaskRepositoryError::persistence)?;
    let photos = serde_json::from_value::<Vec<PhotoRef>>(persisted_photos)
        .map_err(TaskRepositoryError::persistence)?;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        name,
        description,
        recurrence,
        deadline,
        status,
        expired_count,
        photos,
        created_by: created_by.map(EmployeeId::from_uuid),
        created_at,
        updated_at,
    };
    Ok(Task::from_persisted(data))
}
