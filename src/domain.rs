//! Domain models for reminders.
//!
//! This module contains the core domain types: reminders, the fixed set of
//! reminder groups and the classifier that sorts one into the other, and
//! configuration.

/// Reminder domain model.
pub mod reminder;
pub use reminder::{EmptyNameError, MalformedReminderError, MissingField, Reminder};

/// Named groups of reminders and their display labels.
pub mod group;
pub use group::{InvalidGroupError, ReminderGroup};

mod classify;
pub use classify::{classify, classify_label};

mod config;
pub use config::Config;
