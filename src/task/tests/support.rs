//! Shared fixtures and builders for task lifecycle tests.

use chrono::{DateTime, Local, Utc};
use mockable::Clock;

use crate::task::domain::{
    DeviceToken, Employee, EmployeeId, EmployeeRole, Recurrence, Task, TaskName,
};

/// Clock pinned to a fixed instant for deterministic timestamps.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    /// Creates a clock pinned to the given RFC 3339 instant.
    pub fn at(timestamp: &str) -> Self {
        Self(utc(timestamp))
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Parses an RFC 3339 timestamp into a UTC instant.
pub fn utc(timestamp: &str) -> DateTime<Utc> {
    timestamp.parse().expect("valid RFC 3339 timestamp")
}

/// Builds a pending task with a validated name at the clock's instant.
pub fn task_named(
    name: &str,
    recurrence: Recurrence,
    deadline: DateTime<Utc>,
    clock: &FixedClock,
) -> Task {
    let task_name = TaskName::new(name).expect("valid task name");
    Task::new(task_name, recurrence, deadline, clock)
}

/// Builds a directory employee carrying a registered device token.
pub fn employee_with_token(id: EmployeeId) -> Employee {
    let token = DeviceToken::new(format!("device-{id}")).expect("valid device token");
    Employee::new(id, EmployeeRole::Employee).with_device_token(token)
}
