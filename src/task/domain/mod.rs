//! Domain model for the task lifecycle and recurrence engine.
//!
//! The task domain models recurring and one-off tasks, the per-employee
//! assignments binding them to the workforce, the status machine and the
//! aggregation rule joining the two, and the recurrence scheduler that
//! computes each next deadline. Infrastructure concerns stay outside the
//! domain boundary.

mod assignment;
mod employee;
mod error;
mod ids;
mod notification;
mod policy;
mod recurrence;
mod status;
mod task;

pub use assignment::{Assignment, PersistedAssignmentData};
pub use employee::{DeviceToken, Employee, EmployeeRole};
pub use error::{
    ParseAssignmentStatusError, ParseEmployeeRoleError, ParseRecurrenceError, ParseTaskStatusError,
    TaskDomainError,
};
pub use ids::{EmployeeId, PhotoRef, TaskId, TaskName};
pub use notification::{Notification, NotificationKind};
pub use policy::{CompletionRule, LifecyclePolicy, ResetTrigger};
pub use recurrence::Recurrence;
pub use status::{AssignmentStatus, TaskStatus};
pub use task::{PersistedTaskData, Task};
