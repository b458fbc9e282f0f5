//! Diesel schema for task lifecycle persistence.

diesel::table! {
    /// Task records tracked by the lifecycle engine.
    tasks (id) {
        /// Internal task identifier.
        id -> Uuid,
        /// Human-readable task name.
        #[max_length = 255]
        name -> Varchar,
        /// Optional free-form description.
        description -> Nullable<Text>,
        /// Recurrence cadence driving reset scheduling.
        #[max_length = 20]
        recurrence -> Varchar,
        /// Deadline for the current cycle.
        deadline -> Nullable<Timestamptz>,
        /// Aggregated lifecycle status.
        #[max_length = 20]
        status -> Varchar,
        /// Number of cycles the task has ended in without completion.
        expired_count -> Integer,
        /// Completion photo references in upload order.
        photos -> Jsonb,
        /// Employee who created the task, when known.
        created_by -> Nullable<Uuid>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Per-employee assignment rows for each task.
    task_assignments (task_id, employee_id) {
        /// Task the assignment belongs to.
        task_id -> Uuid,
        /// Employee the task is assigned to.
        employee_id -> Uuid,
        /// Employee who made the assignment, when known.
        assigned_by -> Nullable<Uuid>,
        /// Per-assignee lifecycle status.
        #[max_length = 20]
        status -> Varchar,
        /// When the pre-expiry warning for the current cycle was delivered.
        expiry_notified_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Employee records consulted for notification routing.
    employees (id) {
        /// Internal employee identifier.
        id -> Uuid,
        /// Access role.
        #[max_length = 20]
        role -> Varchar,
        /// Push delivery token for the employee's device, when registered.
        device_token -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(task_assignments -> tasks (task_id));

diesel::allow_tables_to_appear_in_same_query!(employees, task_assignments, tasks);
