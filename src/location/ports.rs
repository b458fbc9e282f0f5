//! Port contract for location ping storage.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use super::domain::{LocationPing, PingId};
use crate::task::domain::EmployeeId;

/// Result type for location store operations.
pub type LocationStoreResult<T> = Result<T, LocationStoreError>;

/// Persistence contract for location pings.
#[async_trait]
pub trait LocationStore: Send + Sync {
    /// Records a new ping.
    ///
    /// # Errors
    ///
    /// Returns [`LocationStoreError::DuplicatePing`] when the ping
    /// identifier is already stored.
    async fn record(&self, ping: &LocationPing) -> LocationStoreResult<()>;

    /// Returns the employee's most recent ping, when any exists.
    async fn latest_for_employee(
        &self,
        employee_id: EmployeeId,
    ) -> LocationStoreResult<Option<LocationPing>>;

    /// Deletes every stored ping and returns how many were removed.
    async fn purge_all(&self) -> LocationStoreResult<usize>;
}

/// Errors returned by location store implementations.
#[derive(Debug, Clone, Error)]
pub enum LocationStoreError {
    /// A ping with the same identifier already exists.
    #[error("duplicate ping identifier: {0}")]
    DuplicatePing(PingId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl LocationStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
