//! Diesel row models for task lifecycle persistence.

use super::schema::{employees, task_assignments, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Human-readable task name.
    pub name: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Recurrence cadence.
    pub recurrence: String,
    /// Deadline for the current cycle.
    pub deadline: Option<DateTime<Utc>>,
    /// Aggregated lifecycle status.
    pub status: String,
    /// Number of expired cycles.
    pub expired_count: i32,
    /// Completion photo references as a JSON array.
    pub photos: Value,
    /// Employee who created the task, when known.
    pub created_by: Option<uuid::Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Human-readable task name.
    pub name: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Recurrence cadence.
    pub recurrence: String,
    /// Deadline for the current cycle.
    pub deadline: Option<DateTime<Utc>>,
    /// Aggregated lifecycle status.
    pub status: String,
    /// Number of expired cycles.
    pub expired_count: i32,
    /// Completion photo references as a JSON array.
    pub photos: Value,
    /// Employee who created the task, when known.
    pub created_by: Option<uuid::Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for assignment records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task_assignments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AssignmentRow {
    /// Task the assignment belongs to.
    pub task_id: uuid::Uuid,
    /// Employee the task is assigned to.
    pub employee_id: uuid::Uuid,
    /// Employee who made the assignment, when known.
    pub assigned_by: Option<uuid::Uuid>,
    /// Per-assignee lifecycle status.
    pub status: String,
    /// When the current cycle's expiry warning was delivered.
    pub expiry_notified_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for assignment records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_assignments)]
pub struct NewAssignmentRow {
    /// Task the assignment belongs to.
    pub task_id: uuid::Uuid,
    /// Employee the task is assigned to.
    pub employee_id: uuid::Uuid,
    /// Employee who made the assignment, when known.
    pub assigned_by: Option<uuid::Uuid>,
    /// Per-assignee lifecycle status.
    pub status: String,
    /// When the current cycle's expiry warning was delivered.
    pub expiry_notified_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for employee directory lookups.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = employees)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct EmployeeRow {
    /// Internal employee identifier.
    pub id: uuid::Uuid,
    /// Access role.
    pub role: String,
    /// Push delivery token, when registered.
    pub device_token: Option<String>,
}
