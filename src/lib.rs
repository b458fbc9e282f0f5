//! Rota: recurring-task lifecycle engine for workforce tracking.
//!
//! This crate provides the task half of a workforce-tracking backend:
//! per-assignee status tracking, deterministic status aggregation,
//! recurrence-driven deadline scheduling, and the scheduled passes that
//! warn, expire and reset tasks as their deadlines come and go.
//!
//! # Architecture
//!
//! Rota follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`task`]: Task lifecycle, assignment tracking and scheduled passes
//! - [`location`]: Employee location pings and history truncation

pub mod location;
pub mod task;
