use std::{fmt, str::FromStr};

use chrono::NaiveDate;

/// A named view over a set of reminders.
///
/// Group membership is not exclusive: an unfinished reminder due earlier today
/// belongs to both [`ReminderGroup::Today`] and [`ReminderGroup::Overdue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReminderGroup {
    /// Every reminder.
    All,
    /// Reminders dated on the reference date.
    Today,
    /// Reminders dated the day after the reference date.
    Tomorrow,
    /// Reminders dated after the reference date.
    Upcoming,
    /// Unfinished reminders whose due instant has been reached.
    Overdue,
    /// Reminders flagged as a priority.
    Priority,
    /// Completed reminders.
    Completed,
}

impl ReminderGroup {
    /// Every group, in the order they are presented to the user.
    pub const ORDERED: [Self; 7] = [
        Self::All,
        Self::Today,
        Self::Tomorrow,
        Self::Upcoming,
        Self::Overdue,
        Self::Priority,
        Self::Completed,
    ];

    /// The bare name of the group.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Today => "Today",
            Self::Tomorrow => "Tomorrow",
            Self::Upcoming => "Upcoming",
            Self::Overdue => "Overdue",
            Self::Priority => "Priority",
            Self::Completed => "Completed",
        }
    }

    /// The text shown to the user for this group.
    ///
    /// Date-relative groups carry the date they refer to, for example
    /// `"Tomorrow (01/02)"` when `today` is the first of January.
    #[must_use]
    pub fn label(self, today: NaiveDate) -> String {
        let date = match self {
            Self::Today => Some(today),
            Self::Tomorrow => today.succ_opt(),
            _ => None,
        };

        match date {
            Some(date) => format!("{} ({})", self.name(), date.format("%m/%d")),
            None => self.name().to_string(),
        }
    }

    /// Labels for every group, in display order.
    #[must_use]
    pub fn labels(today: NaiveDate) -> Vec<String> {
        Self::ORDERED.iter().map(|group| group.label(today)).collect()
    }

    /// Resolve a display label (or bare group name) back to a group.
    ///
    /// Matching is case-insensitive, and any parenthesised suffix such as the
    /// date in `"Tomorrow (01/02)"` is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidGroupError`] if the label names no group.
    pub fn from_label(label: &str) -> Result<Self, InvalidGroupError> {
        let name = label
            .split_once('(')
            .map_or(label, |(name, _)| name)
            .trim();

        Self::ORDERED
            .into_iter()
            .find(|group| group.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| InvalidGroupError(label.to_string()))
    }
}

impl fmt::Display for ReminderGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReminderGroup {
    type Err = InvalidGroupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s)
    }
}

/// Error returned when a group selector names none of the known groups.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("Unrecognised reminder group '{0}'")]
pub struct InvalidGroupError(String);

impl InvalidGroupError {
    /// The selector that failed to resolve.
    #[must_use]
    pub fn selector(&self) -> &str {
        &self.0
    }
}
