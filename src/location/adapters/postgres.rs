//! `PostgreSQL` location store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::location::{
    domain::{GeoPoint, LocationPing, PersistedPingData, PingId},
    ports::{LocationStore, LocationStoreError, LocationStoreResult},
};
use crate::task::domain::EmployeeId;

diesel::table! {
    /// Time-stamped employee location reports.
    location_pings (id) {
        /// Ping identifier.
        id -> Uuid,
        /// Employee the ping belongs to.
        employee_id -> Uuid,
        /// Reported latitude in degrees.
        latitude -> Float8,
        /// Reported longitude in degrees.
        longitude -> Float8,
        /// Optional reverse-geocoded address label.
        address -> Nullable<Text>,
        /// When the ping was reported.
        recorded_at -> Timestamptz,
    }
}

/// `PostgreSQL` connection pool type used by the location store.
pub type LocationPgPool = Pool<ConnectionManager<PgConnection>>;

/// Query result and insert row for ping records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = location_pings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct PingRow {
    id: uuid::Uuid,
    employee_id: uuid::Uuid,
    latitude: f64,
    longitude: f64,
    address: Option<String>,
    recorded_at: DateTime<Utc>,
}

/// `PostgreSQL`-backed location store.
#[derive(Debug, Clone)]
pub struct PostgresLocationStore {
    pool: LocationPgPool,
}

impl PostgresLocationStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: LocationPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> LocationStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> LocationStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(LocationStoreError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(LocationStoreError::persistence)?
    }
}

#[async_trait]
impl LocationStore for PostgresLocationStore {
    async fn record(&self, ping: &LocationPing) -> LocationStoreResult<()> {
        let ping_id = ping.id();
        let new_row = to_row(ping);

        self.run_blocking(move |connection| {
            diesel::insert_into(location_pings::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        LocationStoreError::DuplicatePing(ping_id)
                    }
                    _ => LocationStoreError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn latest_for_employee(
        &self,
        employee_id: EmployeeId,
    ) -> LocationStoreResult<Option<LocationPing>> {
        self.run_blocking(move |connection| {
            let row = location_pings::table
                .filter(location_pings::employee_id.eq(employee_id.into_inner()))
                .order(location_pings::recorded_at.desc())
                .select(PingRow::as_select())
                .first::<PingRow>(connection)
                .optional()
                .map_err(LocationStoreError::persistence)?;
            row.map(row_to_ping).transpose()
        })
        .await
    }

    async fn purge_all(&self) -> LocationStoreResult<usize> {
        self.run_blocking(move |connection| {
            diesel::delete(location_pings::table)
                .execute(connection)
                .map_err(LocationStoreError::persistence)
        })
        .await
    }
}

fn to_row(ping: &LocationPing) -> PingRow {
    PingRow {
        id: ping.id().into_inner(),
        employee_id: ping.employee_id().into_inner(),
        latitude: ping.point().latitude(),
        longitude: ping.point().longitude(),
        address: ping.address().map(ToOwned::to_owned),
        recorded_at: ping.recorded_at(),
    }
}

fn row_to_ping(row: PingRow) -> LocationStoreResult<LocationPing> {
    let PingRow {
        id,
        employee_id,
        latitude,
        longitude,
        address,
        recorded_at,
    } = row;

    let point = GeoPoint::new(latitude, longitude).map_err(LocationStoreError::persistence)?;
    let data = PersistedPingData {
        id: PingId::from_uuid(id),
        employee_id: EmployeeId::from_uuid(employee_id),
        point,
        address,
        recorded_at,
    };
    Ok(LocationPing::from_persisted(data))
}
