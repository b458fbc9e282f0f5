//! In-memory employee directory for tests and embedding.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{Employee, EmployeeId},
    ports::{DirectoryError, DirectoryResult, EmployeeDirectory},
};

/// Thread-safe in-memory employee directory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEmployeeDirectory {
    state: Arc<RwLock<HashMap<EmployeeId, Employee>>>,
}

impl InMemoryEmployeeDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an employee, replacing any previous record with the same id.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Lookup`] when the directory state is
    /// inaccessible.
    pub fn insert(&self, employee: Employee) -> DirectoryResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| DirectoryError::lookup(std::io::Error::other(err.to_string())))?;
        state.insert(employee.id(), employee);
        Ok(())
    }
}

#[async_trait]
impl EmployeeDirectory for InMemoryEmployeeDirectory {
    async fn find(&self, id: EmployeeId) -> DirectoryResult<Option<Employee>> {
        let state = self
            .state
            .read()
            .map_err(|err| DirectoryError::lookup(std::io::Error::other(err.to_string())))?;
        Ok(state.get(&id).cloned())
    }
}
