//! Shared test helpers for in-memory adapter integration tests.

use chrono::{DateTime, Local, Utc};
use mockable::Clock;
use rota::task::domain::{
    DeviceToken, Employee, EmployeeId, EmployeeRole, Recurrence, Task, TaskName,
};

/// Clock pinned to a fixed instant so each pass runs at a chosen time.
#[derive(Debug, Clone, Copy)]
pub struct FrozenClock(DateTime<Utc>);

impl FrozenClock {
    /// Creates a clock pinned to the given RFC 3339 instant.
    pub fn at(timestamp: &str) -> Self {
        Self(instant(timestamp))
    }
}

impl Clock for FrozenClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Parses an RFC 3339 timestamp into a UTC instant.
pub fn instant(timestamp: &str) -> DateTime<Utc> {
    timestamp.parse().expect("valid RFC 3339 timestamp")
}

/// Builds a pending task with a validated name at the clock's instant.
pub fn pending_task(
    name: &str,
    recurrence: Recurrence,
    deadline: &str,
    clock: &FrozenClock,
) -> Task {
    let task_name = TaskName::new(name).expect("valid task name");
    Task::new(task_name, recurrence, instant(deadline), clock)
}

/// Builds a directory employee carrying a registered device token.
pub fn reachable_employee(id: EmployeeId) -> Employee {
    let token = DeviceToken::new(format!("device-{id}")).expect("valid device token");
    Employee::new(id, EmployeeRole::Employee).with_device_token(token)
}
