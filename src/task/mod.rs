//! Task lifecycle management for Rota.
//!
//! This module owns the recurring-task lifecycle: per-assignee status
//! tracking, deterministic aggregation of assignment statuses into a task
//! status, deadline scheduling across daily, weekly, monthly and yearly
//! cadences, and the three scheduled passes that warn assignees before a
//! deadline, expire overdue work and reset recurring tasks for their next
//! cycle. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
