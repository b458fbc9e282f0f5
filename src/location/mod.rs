//! Employee location tracking for Rota.
//!
//! A small sibling to the task lifecycle: employees report time-stamped
//! location pings, supervisors read the latest ping per employee, and a
//! scheduled job truncates the history. The module follows the same
//! hexagonal layout as [`crate::task`], scaled down to one aggregate.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
