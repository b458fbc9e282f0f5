//! In-memory location store for tests and lightweight embedding.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::location::{
    domain::LocationPing,
    ports::{LocationStore, LocationStoreError, LocationStoreResult},
};
use crate::task::domain::EmployeeId;

/// Thread-safe in-memory location store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLocationStore {
    state: Arc<RwLock<Vec<LocationPing>>>,
}

impl InMemoryLocationStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LocationStore for InMemoryLocationStore {
    async fn record(&self, ping: &LocationPing) -> LocationStoreResult<()> {
        let mut state = self.state.write().map_err(|err| {
            LocationStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.iter().any(|stored| stored.id() == ping.id()) {
            return Err(LocationStoreError::DuplicatePing(ping.id()));
        }
        state.push(ping.clone());
        Ok(())
    }

    async fn latest_for_employee(
        &self,
        employee_id: EmployeeId,
    ) -> LocationStoreResult<Option<LocationPing>> {
        let state = self.state.read().map_err(|err| {
            LocationStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state
            .iter()
            .filter(|ping| ping.employee_id() == employee_id)
            .max_by_key(|ping| ping.recorded_at())
            .cloned())
    }

    async fn purge_all(&self) -> LocationStoreResult<usize> {
        let mut state = self.state.write().map_err(|err| {
            LocationStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let purged = state.len();
        state.clear();
        Ok(purged)
    }
}
