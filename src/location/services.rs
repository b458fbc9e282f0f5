//! Service layer for employee location tracking.

use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use super::domain::{GeoPoint, LocationDomainError, LocationPing};
use super::ports::{LocationStore, LocationStoreError};
use crate::task::domain::EmployeeId;

/// Service-level errors for location operations.
#[derive(Debug, Error)]
pub enum LocationError {
    /// Coordinate validation failed.
    #[error(transparent)]
    Domain(#[from] LocationDomainError),
    /// Ping storage failed.
    #[error(transparent)]
    Store(#[from] LocationStoreError),
}

/// Result type for location service operations.
pub type LocationResult<T> = Result<T, LocationError>;

/// Employee location tracking service.
#[derive(Clone)]
pub struct LocationService<S, C>
where
    S: LocationStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> LocationService<S, C>
where
    S: LocationStore,
    C: Clock + Send + Sync,
{
    /// Creates a new location service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Records a location ping for an employee.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::Domain`] when the coordinates are out of
    /// range, or [`LocationError::Store`] when persistence fails.
    pub async fn record_ping(
        &self,
        employee_id: EmployeeId,
        latitude: f64,
        longitude: f64,
        address: Option<String>,
    ) -> LocationResult<LocationPing> {
        let point = GeoPoint::new(latitude, longitude)?;
        let ping = match address {
            Some(label) => LocationPing::new(employee_id, point, &*self.clock).with_address(label),
            None => LocationPing::new(employee_id, point, &*self.clock),
        };
        self.store.record(&ping).await?;
        Ok(ping)
    }

    /// Returns the employee's most recent ping, when any exists.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::Store`] when the lookup fails.
    pub async fn latest_for_employee(
        &self,
        employee_id: EmployeeId,
    ) -> LocationResult<Option<LocationPing>> {
        Ok(self.store.latest_for_employee(employee_id).await?)
    }

    /// Deletes the entire ping history, returning the removed count.
    ///
    /// Scheduled history truncation runs through here.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::Store`] when the purge fails.
    pub async fn purge_all(&self) -> LocationResult<usize> {
        let purged = self.store.purge_all().await?;
        info!(purged, "location history cleared");
        Ok(purged)
    }
}
