use std::sync::Arc;

use uuid::Uuid;

use crate::Reminder;

/// Somewhere to deliver "this reminder is overdue" notifications.
///
/// The engine decides what to notify and when; the sink decides how it is
/// shown. Each call is independent, and a failure must be reported through
/// the return value rather than by panicking.
pub trait NotificationSink: Send + Sync {
    /// Deliver a single notification.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationDispatchError`] if the notification could not be
    /// shown.
    fn notify(&self, reminder: &Reminder) -> Result<(), NotificationDispatchError>;
}

impl<T: NotificationSink + ?Sized> NotificationSink for Arc<T> {
    fn notify(&self, reminder: &Reminder) -> Result<(), NotificationDispatchError> {
        (**self).notify(reminder)
    }
}

/// A sink that writes each notification to the `tracing` log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, reminder: &Reminder) -> Result<(), NotificationDispatchError> {
        tracing::info!(id = %reminder.id(), "Reminder overdue: {reminder}");
        Ok(())
    }
}

/// A notification could not be delivered.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("failed to notify reminder {id}: {reason}")]
pub struct NotificationDispatchError {
    id: Uuid,
    reason: String,
}

impl NotificationDispatchError {
    /// Create an error for the reminder with the given identity.
    #[must_use]
    pub fn new(id: Uuid, reason: impl Into<String>) -> Self {
        Self {
            id,
            reason: reason.into(),
        }
    }

    /// The reminder whose notification failed.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Why delivery failed.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}
