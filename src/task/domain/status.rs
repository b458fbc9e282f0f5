//! Assignment and task status enumerations with the aggregation rule.

use super::{CompletionRule, ParseAssignmentStatusError, ParseTaskStatusError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-employee status held in the assignment joining a task and an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    /// Work is outstanding.
    Pending,
    /// Employee-initiated assignment awaiting admin confirmation.
    Requested,
    /// Employee reported the work done.
    Completed,
    /// Deadline passed without completion.
    Expired,
}

impl AssignmentStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Requested => "requested",
            Self::Completed => "completed",
            Self::Expired => "expired",
        }
    }

    /// Returns `true` when the assignment still awaits completion.
    ///
    /// Requested assignments count as awaiting: they expire exactly like
    /// pending ones.
    #[must_use]
    pub const fn is_awaiting(self) -> bool {
        matches!(self, Self::Pending | Self::Requested)
    }

    /// Returns `true` when the status machine permits moving to `next`.
    ///
    /// Completed assignments accept no validated transition; expired
    /// assignments may only be rewound to pending by a recurrence reset.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Requested | Self::Completed | Self::Expired)
                | (Self::Requested, Self::Pending | Self::Completed | Self::Expired)
                | (Self::Expired, Self::Pending)
        )
    }
}

impl TryFrom<&str> for AssignmentStatus {
    type Error = ParseAssignmentStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "requested" => Ok(Self::Requested),
            "completed" => Ok(Self::Completed),
            "expired" => Ok(Self::Expired),
            _ => Err(ParseAssignmentStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task-level status derived from the task's assignment statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// At least one assignment is still open.
    Pending,
    /// Employee-initiated task awaiting admin confirmation.
    Requested,
    /// The task counts as fulfilled under the completion rule.
    Completed,
    /// Every assignment expired.
    Expired,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Requested => "requested",
            Self::Completed => "completed",
            Self::Expired => "expired",
        }
    }

    /// Derives the task-level status from its assignment statuses.
    ///
    /// An empty multiset yields [`TaskStatus::Pending`]. Under
    /// [`CompletionRule::AnyCompleted`] a single completed
    /// assignment completes the task; under
    /// [`CompletionRule::AllCompleted`] every assignment must be completed.
    /// Either way the task only expires when every assignment expired, and
    /// the aggregate never yields [`TaskStatus::Requested`].
    #[must_use]
    pub fn aggregate<I>(statuses: I, rule: CompletionRule) -> Self
    where
        I: IntoIterator<Item = AssignmentStatus>,
    {
        let mut total = 0_usize;
        let mut completed = 0_usize;
        let mut expired = 0_usize;
        for status in statuses {
            total += 1;
            match status {
                AssignmentStatus::Completed => completed += 1,
                AssignmentStatus::Expired => expired += 1,
                AssignmentStatus::Pending | AssignmentStatus::Requested => {}
            }
        }

        if total == 0 {
            return Self::Pending;
        }
        let fulfilled = match rule {
            CompletionRule::AnyCompleted => completed > 0,
            CompletionRule::AllCompleted => completed == total,
        };
        if fulfilled {
            Self::Completed
        } else if expired == total {
            Self::Expired
        } else {
            Self::Pending
        }
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "requested" => Ok(Self::Requested),
            "completed" => Ok(Self::Completed),
            "expired" => Ok(Self::Expired),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
