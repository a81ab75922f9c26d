use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use non_empty_string::NonEmptyString;
use uuid::Uuid;

/// A personal reminder.
///
/// A reminder becomes *due* once its due instant (date + time) is reached, and
/// is *overdue* while it is due and not yet completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    /// Globally unique, perpetually stable identifier
    id: Uuid,
    /// Short human-readable label.
    name: NonEmptyString,
    /// Calendar date the reminder falls due.
    date: Option<NaiveDate>,
    /// Time of day the reminder falls due.
    time: Option<NaiveTime>,
    priority: bool,
    completed: bool,
}

impl Reminder {
    /// Construct a new [`Reminder`] due at the given date and time.
    ///
    /// A new UUID is automatically generated.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyNameError`] if the name is empty or only whitespace.
    pub fn new(
        name: impl Into<String>,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<Self, EmptyNameError> {
        Self::with_id(Uuid::new_v4(), name, date, time)
    }

    /// Construct a reminder with an identity assigned elsewhere (usually by a
    /// store).
    ///
    /// # Errors
    ///
    /// Returns [`EmptyNameError`] if the name is empty or only whitespace.
    pub fn with_id(
        id: Uuid,
        name: impl Into<String>,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<Self, EmptyNameError> {
        Self::from_parts(id, name, Some(date), Some(time))
    }

    /// Construct a reminder from possibly incomplete stored fields.
    ///
    /// Stores that cannot guarantee a date and time for every record use this
    /// to hand records over anyway. A reminder without both fields is never
    /// overdue and is reported as malformed by the overdue tracker.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyNameError`] if the name is empty or only whitespace.
    pub fn from_parts(
        id: Uuid,
        name: impl Into<String>,
        date: Option<NaiveDate>,
        time: Option<NaiveTime>,
    ) -> Result<Self, EmptyNameError> {
        Ok(Self {
            id,
            name: parse_name(name.into())?,
            date,
            time,
            priority: false,
            completed: false,
        })
    }

    /// Builder-style variant of [`Reminder::set_priority`].
    #[must_use]
    pub fn with_priority(mut self, priority: bool) -> Self {
        self.priority = priority;
        self
    }

    /// Builder-style variant of [`Reminder::set_completed`].
    #[must_use]
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    /// The unique, stable identifier of this reminder
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// The reminder's label.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// The date the reminder falls due, if known.
    #[must_use]
    pub const fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// The time of day the reminder falls due, if known.
    #[must_use]
    pub const fn time(&self) -> Option<NaiveTime> {
        self.time
    }

    /// Whether the reminder is flagged as a priority.
    #[must_use]
    pub const fn is_priority(&self) -> bool {
        self.priority
    }

    /// Whether the reminder has been completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Change the reminder's label.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyNameError`] (leaving the old name in place) if the new
    /// name is empty or only whitespace.
    pub fn rename(&mut self, name: impl Into<String>) -> Result<(), EmptyNameError> {
        self.name = parse_name(name.into())?;
        Ok(())
    }

    /// Move the reminder to a new due instant.
    pub const fn reschedule(&mut self, date: NaiveDate, time: NaiveTime) {
        self.date = Some(date);
        self.time = Some(time);
    }

    /// Flag or unflag the reminder as a priority.
    pub const fn set_priority(&mut self, priority: bool) {
        self.priority = priority;
    }

    /// Mark the reminder as completed (or not).
    pub const fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }

    /// The instant the reminder falls due.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedReminderError`] if either the date or the time is
    /// missing.
    pub fn due_instant(&self) -> Result<NaiveDateTime, MalformedReminderError> {
        match (self.date, self.time) {
            (Some(date), Some(time)) => Ok(date.and_time(time)),
            (None, _) => Err(MalformedReminderError::new(self.id, MissingField::Date)),
            (Some(_), None) => Err(MalformedReminderError::new(self.id, MissingField::Time)),
        }
    }

    /// Whether the due instant has been reached at `now`.
    ///
    /// The comparison is inclusive: a reminder due at exactly `now` is due.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedReminderError`] if the due instant is incomplete.
    pub fn is_due(&self, now: NaiveDateTime) -> Result<bool, MalformedReminderError> {
        Ok(self.due_instant()? <= now)
    }

    /// Whether the reminder is due at `now` and has not been completed.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedReminderError`] if the due instant is incomplete.
    pub fn is_overdue(&self, now: NaiveDateTime) -> Result<bool, MalformedReminderError> {
        Ok(!self.completed && self.is_due(now)?)
    }
}

impl fmt::Display for Reminder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (", self.name)?;
        match self.date {
            Some(date) => write!(f, "{}", date.format("%m/%d/%Y"))?,
            None => f.write_str("--")?,
        }
        f.write_str(" ")?;
        match self.time {
            Some(time) => write!(f, "{}", time.format("%H:%M"))?,
            None => f.write_str("--")?,
        }
        f.write_str(")")
    }
}

fn parse_name(name: String) -> Result<NonEmptyString, EmptyNameError> {
    if name.trim().is_empty() {
        return Err(EmptyNameError);
    }
    NonEmptyString::new(name).map_err(|_| EmptyNameError)
}

/// Error returned when a reminder is given an empty name.
#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq, Eq)]
#[error("reminder name must not be empty")]
pub struct EmptyNameError;

/// A required field that a stored reminder is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MissingField {
    /// The due date.
    Date,
    /// The due time of day.
    Time,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date => f.write_str("date"),
            Self::Time => f.write_str("time"),
        }
    }
}

/// A reminder failed required-field validation.
///
/// The offending reminder is skipped; other reminders are unaffected.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("reminder {id} is malformed: missing {missing}")]
pub struct MalformedReminderError {
    id: Uuid,
    missing: MissingField,
}

impl MalformedReminderError {
    pub(crate) const fn new(id: Uuid, missing: MissingField) -> Self {
        Self { id, missing }
    }

    /// The identity of the skipped reminder.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Which field was missing.
    #[must_use]
    pub const fn missing(&self) -> MissingField {
        self.missing
    }
}
