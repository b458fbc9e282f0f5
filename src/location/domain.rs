//! Domain types for employee location pings.

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use thiserror::Error;
use uuid::Uuid;

use crate::task::domain::EmployeeId;

/// Latitude range accepted for a geographic point, in degrees.
const LATITUDE_RANGE: RangeInclusive<f64> = -90.0..=90.0;

/// Longitude range accepted for a geographic point, in degrees.
const LONGITUDE_RANGE: RangeInclusive<f64> = -180.0..=180.0;

/// Validation errors for location ping values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationDomainError {
    /// Latitude must lie within [-90, 90] degrees.
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    /// Longitude must lie within [-180, 180] degrees.
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// Unique identifier for a location ping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PingId(Uuid);

impl PingId {
    /// Generates a new random ping identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for PingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated geographic coordinate pair.
///
/// `NaN` coordinates fail both range checks, so a constructed point always
/// carries finite, comparable values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    /// Creates a point after range-checking both coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`LocationDomainError`] when either coordinate falls
    /// outside its valid range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, LocationDomainError> {
        if !LATITUDE_RANGE.contains(&latitude) {
            return Err(LocationDomainError::LatitudeOutOfRange(latitude));
        }
        if !LONGITUDE_RANGE.contains(&longitude) {
            return Err(LocationDomainError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Returns the latitude in degrees.
    #[must_use]
    pub const fn latitude(self) -> f64 {
        self.latitude
    }

    /// Returns the longitude in degrees.
    #[must_use]
    pub const fn longitude(self) -> f64 {
        self.longitude
    }
}

/// A time-stamped employee location report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationPing {
    id: PingId,
    employee_id: EmployeeId,
    point: GeoPoint,
    address: Option<String>,
    recorded_at: DateTime<Utc>,
}

/// Persisted ping state used to reconstruct [`LocationPing`] instances.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedPingData {
    /// Ping identifier.
    pub id: PingId,
    /// Employee the ping belongs to.
    pub employee_id: EmployeeId,
    /// Reported coordinates.
    pub point: GeoPoint,
    /// Optional reverse-geocoded address label.
    pub address: Option<String>,
    /// When the ping was reported.
    pub recorded_at: DateTime<Utc>,
}

impl LocationPing {
    /// Creates a ping for an employee at the clock's current time.
    #[must_use]
    pub fn new(employee_id: EmployeeId, point: GeoPoint, clock: &impl Clock) -> Self {
        Self {
            id: PingId::new(),
            employee_id,
            point,
            address: None,
            recorded_at: clock.utc(),
        }
    }

    /// Attaches a reverse-geocoded address label.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Reconstructs a ping from persisted state.
    #[must_use]
    pub fn from_persisted(data: PersistedPingData) -> Self {
        Self {
            id: data.id,
            employee_id: data.employee_id,
            point: data.point,
            address: data.address,
            recorded_at: data.recorded_at,
        }
    }

    /// Returns the ping identifier.
    #[must_use]
    pub const fn id(&self) -> PingId {
        self.id
    }

    /// Returns the employee the ping belongs to.
    #[must_use]
    pub const fn employee_id(&self) -> EmployeeId {
        self.employee_id
    }

    /// Returns the reported coordinates.
    #[must_use]
    pub const fn point(&self) -> GeoPoint {
        self.point
    }

    /// Returns the address label, when one was attached.
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// Returns when the ping was reported.
    #[must_use]
    pub const fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}
