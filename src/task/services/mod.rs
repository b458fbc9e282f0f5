//! Application services for task lifecycle orchestration.

mod lifecycle;
mod sweeps;
mod templates;

pub use lifecycle::{
    CreateTaskRequest, RequestTaskRequest, TaskLifecycleError, TaskLifecycleResult,
    TaskLifecycleService,
};
pub use sweeps::{
    ExpirationSummary, ExpiryNoticeSummary, ResetSummary, SweepError, SweepResult, SweepService,
};
pub use templates::{
    NotificationCopy, NotificationTemplate, RenderedCopy, TemplateError,
};
