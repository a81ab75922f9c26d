//! The overdue-notification engine.
//!
//! A [`Scheduler`] periodically reads a [`ReminderStore`](crate::ReminderStore),
//! asks an [`OverdueTracker`] which reminders have newly become overdue, and
//! passes those to a [`NotificationSink`].

mod clock;
pub use clock::{Clock, ManualClock, SystemClock};

mod sink;
pub use sink::{NotificationDispatchError, NotificationSink, TracingSink};

/// Per-reminder record of which overdue notifications have been sent.
pub mod tracker;
pub use tracker::{OverdueCheck, OverdueTracker};

/// The background scheduling loop.
pub mod scheduler;
pub use scheduler::{Scheduler, StartError, TickEvent, TickOutcome, TickReport};
