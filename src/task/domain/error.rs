//! Error types for task domain validation and parsing.

use super::{AssignmentStatus, EmployeeId, TaskId};
use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task name is empty after trimming.
    #[error("task name must not be empty")]
    EmptyTaskName,

    /// The task name exceeds the persisted column width.
    #[error("task name must not exceed {max} characters, got {length}")]
    TaskNameTooLong {
        /// Length of the rejected name in characters.
        length: usize,
        /// Largest accepted length.
        max: usize,
    },

    /// The photo reference is empty after trimming.
    #[error("photo reference must not be empty")]
    EmptyPhotoRef,

    /// The device token is empty after trimming.
    #[error("device token must not be empty")]
    EmptyDeviceToken,

    /// The assignment status machine forbids the requested transition.
    #[error(
        "invalid status transition from {from} to {to} \
         for assignment of employee {employee_id} on task {task_id}"
    )]
    InvalidStatusTransition {
        /// Task the assignment belongs to.
        task_id: TaskId,
        /// Employee holding the assignment.
        employee_id: EmployeeId,
        /// Status before the rejected transition.
        from: AssignmentStatus,
        /// Requested target status.
        to: AssignmentStatus,
    },
}

/// Error returned while parsing assignment statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown assignment status: {0}")]
pub struct ParseAssignmentStatusError(pub String);

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing recurrence cadences from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown recurrence type: {0}")]
pub struct ParseRecurrenceError(pub String);

/// Error returned while parsing employee roles from the directory backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown employee role: {0}")]
pub struct ParseEmployeeRoleError(pub String);
