//! Adapter implementations of the location store port.

mod memory;
mod postgres;

pub use memory::InMemoryLocationStore;
pub use postgres::PostgresLocationStore;
