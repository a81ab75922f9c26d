//! Access to the set of known reminders.
//!
//! The engine only ever reads from a [`ReminderStore`]; adding, editing and
//! deleting reminders happens elsewhere, and the engine picks those changes up
//! on its next read.

use std::sync::Arc;

use uuid::Uuid;

use crate::Reminder;

/// An in-process store of reminders.
pub mod memory;
pub use memory::{MemoryStore, NotFound};

/// A source of reminders.
///
/// Implementations must be safe to read from the scheduler's background task
/// while other threads write to them.
pub trait ReminderStore: Send + Sync {
    /// A consistent snapshot of every known reminder, in store order.
    ///
    /// An empty store returns an empty list, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreUnavailableError`] if the underlying storage cannot be
    /// read.
    fn get_all(&self) -> Result<Vec<Reminder>, StoreUnavailableError>;

    /// Look up a single reminder by identity.
    ///
    /// The default implementation scans [`ReminderStore::get_all`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreUnavailableError`] if the underlying storage cannot be
    /// read.
    fn get(&self, id: Uuid) -> Result<Option<Reminder>, StoreUnavailableError> {
        Ok(self
            .get_all()?
            .into_iter()
            .find(|reminder| reminder.id() == id))
    }
}

impl<T: ReminderStore + ?Sized> ReminderStore for Arc<T> {
    fn get_all(&self) -> Result<Vec<Reminder>, StoreUnavailableError> {
        (**self).get_all()
    }

    fn get(&self, id: Uuid) -> Result<Option<Reminder>, StoreUnavailableError> {
        (**self).get(id)
    }
}

/// The reminder store could not be read.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("reminder store unavailable: {reason}")]
pub struct StoreUnavailableError {
    reason: String,
}

impl StoreUnavailableError {
    /// Create an error describing why the store could not be read.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Why the store could not be read.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}
