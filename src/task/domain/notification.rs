//! Notification payloads handed to the notifier port.

use super::{EmployeeId, TaskId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of lifecycle notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Deadline falls within the warning window.
    TaskExpiringSoon,
    /// Assignment expired in the overdue pass.
    TaskExpired,
    /// Recurring task was rewound with a fresh deadline.
    TaskReset,
}

impl NotificationKind {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TaskExpiringSoon => "task_expiring_soon",
            Self::TaskExpired => "task_expired",
            Self::TaskReset => "task_reset",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendered notification addressed to one employee.
///
/// The notifier implementation persists a record of every notification it
/// receives, whether or not delivery succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    recipient: EmployeeId,
    kind: NotificationKind,
    title: String,
    body: String,
    task_id: TaskId,
}

impl Notification {
    /// Creates a notification for one recipient.
    #[must_use]
    pub fn new(
        recipient: EmployeeId,
        kind: NotificationKind,
        title: impl Into<String>,
        body: impl Into<String>,
        task_id: TaskId,
    ) -> Self {
        Self {
            recipient,
            kind,
            title: title.into(),
            body: body.into(),
            task_id,
        }
    }

    /// Returns the recipient employee.
    #[must_use]
    pub const fn recipient(&self) -> EmployeeId {
        self.recipient
    }

    /// Returns the notification category.
    #[must_use]
    pub const fn kind(&self) -> NotificationKind {
        self.kind
    }

    /// Returns the rendered title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the rendered body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the task the notification concerns.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }
}
