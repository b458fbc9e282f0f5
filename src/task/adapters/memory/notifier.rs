//! Recording notifier used by tests and the in-memory wiring.

use async_trait::async_trait;
use std::sync::{Arc, PoisonError, RwLock};

use crate::task::{
    domain::Notification,
    ports::{Notifier, NotifyError},
};

/// Notifier that records every notification instead of delivering it.
///
/// The failing variant still records before reporting a delivery error,
/// mirroring a push gateway that persists the notification row even when
/// the downstream send fails.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    state: Arc<RwLock<RecordingState>>,
}

#[derive(Debug, Default)]
struct RecordingState {
    recorded: Vec<Notification>,
    failing: bool,
}

impl RecordingNotifier {
    /// Creates a notifier whose deliveries all succeed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a notifier whose deliveries all fail after recording.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            state: Arc::new(RwLock::new(RecordingState {
                recorded: Vec::new(),
                failing: true,
            })),
        }
    }

    /// Returns the notifications recorded so far, in delivery order.
    #[must_use]
    pub fn recorded(&self) -> Vec<Notification> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.recorded.clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.recorded.push(notification.clone());
        if state.failing {
            return Err(NotifyError("simulated delivery failure".to_owned()));
        }
        Ok(())
    }
}
