//! Port contracts for the task lifecycle engine.
//!
//! Ports define infrastructure-agnostic interfaces used by the lifecycle
//! services: durable task and assignment storage, the employee directory,
//! and notification delivery.

pub mod assignments;
pub mod directory;
pub mod notifier;
pub mod tasks;

pub use assignments::{AssignmentRepository, AssignmentRepositoryError, AssignmentRepositoryResult};
pub use directory::{DirectoryError, DirectoryResult, EmployeeDirectory};
pub use notifier::{Notifier, NotifyError};
pub use tasks::{DeadlineFilter, TaskRepository, TaskRepositoryError, TaskRepositoryResult};
