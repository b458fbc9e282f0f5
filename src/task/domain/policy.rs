//! Policy knobs governing aggregation, reset triggering, and reset times.
//!
//! Deployments disagree on these rules, so they are explicit configuration
//! with documented defaults rather than hard-coded behaviour.

use super::Recurrence;
use chrono::NaiveTime;

/// Rule deciding when a task counts as completed at the aggregate level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompletionRule {
    /// A single completed assignment fulfils the task.
    #[default]
    AnyCompleted,
    /// Every assignment must be completed.
    AllCompleted,
}

/// Condition selecting which recurring tasks the reset pass rewinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResetTrigger {
    /// Reset tasks whose stored status is expired.
    #[default]
    StatusExpired,
    /// Reset tasks whose deadline has passed regardless of status.
    DeadlinePassed,
}

/// Tunable lifecycle behaviour applied by the services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecyclePolicy {
    /// Aggregation rule for the task-level status.
    pub completion_rule: CompletionRule,
    /// Trigger condition for the recurrence reset pass.
    pub reset_trigger: ResetTrigger,
    /// Time of day daily tasks reset to.
    pub daily_reset_time: NaiveTime,
}

impl Default for LifecyclePolicy {
    fn default() -> Self {
        Self {
            completion_rule: CompletionRule::default(),
            reset_trigger: ResetTrigger::default(),
            daily_reset_time: Recurrence::END_OF_DAY,
        }
    }
}
