//! Notification copy rendering for lifecycle events.

use chrono::{DateTime, Utc};
use minijinja::Environment;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::task::domain::{NotificationKind, Task};

/// Timestamp format used for deadlines in notification copy.
const DEADLINE_FORMAT: &str = "%d %b %Y %H:%M";

/// Rendering failure for one notification template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to render {kind} copy: {reason}")]
pub struct TemplateError {
    /// Notification kind whose template failed.
    pub kind: NotificationKind,
    /// Renderer failure message.
    pub reason: String,
}

/// Title and body template pair for one notification kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationTemplate {
    title: String,
    body: String,
}

impl NotificationTemplate {
    /// Creates a template from title and body sources.
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Template set covering every notification kind.
///
/// The defaults carry the built-in copy; embedders can swap individual
/// templates for localisation. Templates see `task_name`, `deadline`
/// (pre-formatted) and `recurrence` in their context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationCopy {
    expiring_soon: NotificationTemplate,
    expired: NotificationTemplate,
    reset: NotificationTemplate,
}

impl Default for NotificationCopy {
    fn default() -> Self {
        Self {
            expiring_soon: NotificationTemplate::new(
                "Task Expiring Soon",
                "{{ task_name }} is due by {{ deadline }}.",
            ),
            expired: NotificationTemplate::new(
                "Task Expired",
                "{{ task_name }} passed its deadline of {{ deadline }} and has expired.",
            ),
            reset: NotificationTemplate::new(
                "Task Reset",
                "{{ task_name }} has started a new {{ recurrence }} cycle ending {{ deadline }}.",
            ),
        }
    }
}

impl NotificationCopy {
    /// Creates the built-in template set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the expiring-soon template.
    #[must_use]
    pub fn with_expiring_soon(mut self, template: NotificationTemplate) -> Self {
        self.expiring_soon = template;
        self
    }

    /// Replaces the expired template.
    #[must_use]
    pub fn with_expired(mut self, template: NotificationTemplate) -> Self {
        self.expired = template;
        self
    }

    /// Replaces the reset template.
    #[must_use]
    pub fn with_reset(mut self, template: NotificationTemplate) -> Self {
        self.reset = template;
        self
    }

    /// Renders the title and body for a lifecycle event.
    ///
    /// The deadline is passed explicitly because reset notices announce the
    /// next cycle's deadline rather than the one stored on the task.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] when the template for `kind` fails to
    /// render.
    pub fn render(
        &self,
        kind: NotificationKind,
        task: &Task,
        deadline: Option<DateTime<Utc>>,
    ) -> Result<RenderedCopy, TemplateError> {
        let template = self.template_for(kind);
        let context = build_context(task, deadline);
        let title = render_part(kind, &template.title, &context)?;
        let body = render_part(kind, &template.body, &context)?;
        Ok(RenderedCopy { title, body })
    }

    const fn template_for(&self, kind: NotificationKind) -> &NotificationTemplate {
        match kind {
            NotificationKind::TaskExpiringSoon => &self.expiring_soon,
            NotificationKind::TaskExpired => &self.expired,
            NotificationKind::TaskReset => &self.reset,
        }
    }
}

/// Rendered title and body for one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCopy {
    title: String,
    body: String,
}

impl RenderedCopy {
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

    /// Splits the copy into its title and body.
    #[must_use]
    pub fn into_parts(self) -> (String, String) {
        (self.title, self.body)
    }
}

fn render_part(
    kind: NotificationKind,
    template: &str,
    context: &Map<String, Value>,
) -> Result<String, TemplateError> {
    let environment = Environment::new();
    environment
        .render_str(template, context)
        .map_err(|error| TemplateError {
            kind,
            reason: error.to_string(),
        })
}

fn build_context(task: &Task, deadline: Option<DateTime<Utc>>) -> Map<String, Value> {
    let mut context = Map::new();
    context.insert(
        "task_name".to_owned(),
        Value::String(task.name().as_str().to_owned()),
    );
    context.insert(
        "deadline".to_owned(),
        Value::String(format_deadline(deadline)),
    );
    context.insert(
        "recurrence".to_owned(),
        Value::String(task.recurrence().as_str().to_owned()),
    );
    context
}

fn format_deadline(deadline: Option<DateTime<Utc>>) -> String {
    deadline.map_or_else(
        || "unscheduled".to_owned(),
        |when| when.format(DEADLINE_FORMAT).to_string(),
    )
}
