use std::sync::{PoisonError, RwLock};

use uuid::Uuid;

use crate::{
    Reminder,
    storage::{ReminderStore, StoreUnavailableError},
};

/// A [`ReminderStore`] held in memory.
///
/// Reminders are kept in insertion order, which is the order the engine
/// reports them in.
#[derive(Debug, Default)]
pub struct MemoryStore {
    reminders: RwLock<Vec<Reminder>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a reminder to the end of the store, returning its identity.
    ///
    /// If a reminder with the same identity is already present it is replaced
    /// in place instead.
    pub fn add(&self, reminder: Reminder) -> Uuid {
        let id = reminder.id();
        let mut reminders = self.write();
        if let Some(existing) = reminders.iter_mut().find(|r| r.id() == id) {
            *existing = reminder;
        } else {
            reminders.push(reminder);
        }
        id
    }

    /// Replace the stored reminder that has the same identity.
    ///
    /// The reminder keeps its position in the store.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound`] if no reminder with that identity is stored.
    pub fn update(&self, reminder: Reminder) -> Result<(), NotFound> {
        let id = reminder.id();
        let mut reminders = self.write();
        let existing = reminders
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or(NotFound(id))?;
        *existing = reminder;
        Ok(())
    }

    /// Remove a reminder, returning it if it was present.
    pub fn remove(&self, id: Uuid) -> Option<Reminder> {
        let mut reminders = self.write();
        let index = reminders.iter().position(|r| r.id() == id)?;
        Some(reminders.remove(index))
    }

    /// Replace the whole contents of the store.
    pub fn replace_all(&self, reminders: impl IntoIterator<Item = Reminder>) {
        *self.write() = reminders.into_iter().collect();
    }

    /// The number of stored reminders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the store holds no reminders.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<Reminder>> {
        self.reminders.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Vec<Reminder>> {
        self.reminders
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl FromIterator<Reminder> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = Reminder>>(iter: I) -> Self {
        Self {
            reminders: RwLock::new(iter.into_iter().collect()),
        }
    }
}

impl ReminderStore for MemoryStore {
    fn get_all(&self) -> Result<Vec<Reminder>, StoreUnavailableError> {
        Ok(self.read().clone())
    }

    fn get(&self, id: Uuid) -> Result<Option<Reminder>, StoreUnavailableError> {
        Ok(self.read().iter().find(|r| r.id() == id).cloned())
    }
}

/// No reminder with the given identity is stored.
#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq, Eq)]
#[error("no reminder with id {0}")]
pub struct NotFound(pub Uuid);
