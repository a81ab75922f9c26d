//! Reminder classification and overdue notifications
//!
//! Reminders are sorted into named groups for display, and a background
//! scheduler announces each reminder once as it becomes overdue.

pub mod domain;
pub use domain::{
    Config, EmptyNameError, InvalidGroupError, MalformedReminderError, Reminder, ReminderGroup,
    classify, classify_label,
};

pub mod engine;
pub use engine::{
    Clock, ManualClock, NotificationDispatchError, NotificationSink, OverdueTracker, Scheduler,
    StartError, SystemClock, TickEvent, TickOutcome, TickReport, TracingSink,
};

/// Reminder store abstraction and an in-memory implementation.
pub mod storage;
pub use storage::{MemoryStore, ReminderStore, StoreUnavailableError};

pub mod logging;
