//! `PostgreSQL` employee directory used for notification routing.

use super::{models::EmployeeRow, schema::employees, tasks::TaskPgPool};
use crate::task::{
    domain::{DeviceToken, Employee, EmployeeId, EmployeeRole},
    ports::{DirectoryError, DirectoryResult, EmployeeDirectory},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;

/// `PostgreSQL`-backed employee directory.
#[derive(Debug, Clone)]
pub struct PostgresEmployeeDirectory {
    pool: TaskPgPool,
}

impl PostgresEmployeeDirectory {
    /// Creates a new directory from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> DirectoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> DirectoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(DirectoryError::lookup)?;
            f(&mut connection)
        })
        .await
        .map_err(DirectoryError::lookup)?
    }
}

#[async_trait]
impl EmployeeDirectory for PostgresEmployeeDirectory {
    async fn find(&self, id: EmployeeId) -> DirectoryResult<Option<Employee>> {
        self.run_blocking(move |connection| {
            let row = employees::table
                .filter(employees::id.eq(id.into_inner()))
                .select(EmployeeRow::as_select())
                .first::<EmployeeRow>(connection)
                .optional()
                .map_err(DirectoryError::lookup)?;
            row.map(row_to_employee).transpose()
        })
        .await
    }
}

fn row_to_employee(row: EmployeeRow) -> DirectoryResult<Employee> {
    let EmployeeRow {
        id,
        role: persisted_role,
        device_token,
    } = row;

    let role = EmployeeRole::try_from(persisted_role.as_str()).map_err(DirectoryError::lookup)?;
    let employee = Employee::new(EmployeeId::from_uuid(id), role);
    match device_token {
        Some(raw) => {
            let token = DeviceToken::new(raw).map_err(DirectoryError::lookup)?;
            Ok(employee.with_device_token(token))
        }
        None => Ok(employee),
    }
}
