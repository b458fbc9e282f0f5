//! Notifier port delivering and recording lifecycle notifications.

use crate::task::domain::Notification;
use async_trait::async_trait;
use thiserror::Error;

/// Delivery contract for lifecycle notifications.
///
/// Implementations persist a record of every notification regardless of
/// delivery outcome. Callers in this crate treat a delivery error as
/// non-fatal everywhere: state mutations never wait on, and never roll back
/// for, notification delivery.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers a notification to its recipient and records it.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] when delivery fails; the record is persisted
    /// either way.
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Delivery failure reported by a notifier implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("notification delivery failed: {0}")]
pub struct NotifyError(pub String);
