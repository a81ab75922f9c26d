//! Remembering which overdue reminders have already been announced.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::domain::{MalformedReminderError, Reminder};

/// Tracks which reminders have had their "now overdue" notification.
///
/// A reminder is announced once per overdue stretch. When it stops being
/// overdue (completed, deleted, or moved into the future) it is forgotten,
/// so that it will be announced again if it later becomes overdue anew.
///
/// Nothing here is persisted; a fresh tracker announces everything that is
/// currently overdue.
#[derive(Debug, Default, Clone)]
pub struct OverdueTracker {
    /// Identities of reminders announced during the current overdue stretch.
    notified: HashSet<Uuid>,
    /// The `now` passed to the most recent check.
    last_checked: Option<NaiveDateTime>,
}

/// The outcome of a single [`OverdueTracker::compute_newly_overdue`] call.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OverdueCheck {
    /// Reminders that became overdue since the last check, in input order.
    pub newly_overdue: Vec<Reminder>,
    /// Reminders that were skipped because they lack a date or time.
    pub malformed: Vec<MalformedReminderError>,
}

impl OverdueTracker {
    /// Create a tracker that has announced nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the reminders that need a notification at `now`, and record them
    /// as notified.
    ///
    /// `reminders` is the complete current set. Any tracked reminder that is
    /// not overdue in it (including one that is absent) is forgotten before
    /// the new set is worked out.
    ///
    /// Calling this twice with the same reminders and the same `now` returns
    /// nothing the second time.
    pub fn compute_newly_overdue(
        &mut self,
        reminders: &[Reminder],
        now: NaiveDateTime,
    ) -> OverdueCheck {
        if let Some(previous) = self.last_checked {
            if now < previous {
                tracing::warn!(%previous, %now, "Clock went backwards between overdue checks");
            }
        }
        self.last_checked = Some(now);

        let mut malformed = Vec::new();
        let overdue: Vec<&Reminder> = reminders
            .iter()
            .filter(|reminder| match reminder.is_overdue(now) {
                Ok(overdue) => overdue,
                Err(error) => {
                    malformed.push(error);
                    false
                }
            })
            .collect();

        let overdue_ids: HashSet<Uuid> = overdue.iter().map(|r| r.id()).collect();
        self.notified.retain(|id| {
            let still_overdue = overdue_ids.contains(id);
            if !still_overdue {
                tracing::debug!(%id, "Reminder no longer overdue, re-arming");
            }
            still_overdue
        });

        let newly_overdue = overdue
            .into_iter()
            .filter(|reminder| self.notified.insert(reminder.id()))
            .cloned()
            .collect();

        OverdueCheck {
            newly_overdue,
            malformed,
        }
    }

    /// Whether the reminder has been announced during its current overdue
    /// stretch.
    #[must_use]
    pub fn is_notified(&self, id: Uuid) -> bool {
        self.notified.contains(&id)
    }

    /// The number of reminders currently recorded as announced.
    #[must_use]
    pub fn tracked_count(&self) -> usize {
        self.notified.len()
    }

    /// The `now` of the most recent check, if any.
    #[must_use]
    pub const fn last_checked(&self) -> Option<NaiveDateTime> {
        self.last_checked
    }

    /// Forget everything, as if freshly created.
    pub fn reset(&mut self) {
        self.notified.clear();
        self.last_checked = None;
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime, TimeDelta};

    use super::*;
    use crate::domain::MissingField;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap())
    }

    fn due_at(name: &str, due: NaiveDateTime) -> Reminder {
        Reminder::new(name, due.date(), due.time()).unwrap()
    }

    fn ids(reminders: &[Reminder]) -> Vec<Uuid> {
        reminders.iter().map(Reminder::id).collect()
    }

    #[test]
    fn second_identical_check_is_empty() {
        let reminders = vec![due_at("Pay rent", at(9, 0))];
        let mut tracker = OverdueTracker::new();

        let first = tracker.compute_newly_overdue(&reminders, at(9, 0));
        assert_eq!(ids(&first.newly_overdue), ids(&reminders));

        let second = tracker.compute_newly_overdue(&reminders, at(9, 0));
        assert!(second.newly_overdue.is_empty());
        assert!(tracker.is_notified(reminders[0].id()));
    }

    #[test]
    fn future_reminders_wait_until_due() {
        let reminders = vec![due_at("later", at(10, 0))];
        let mut tracker = OverdueTracker::new();

        assert!(tracker
            .compute_newly_overdue(&reminders, at(9, 59))
            .newly_overdue
            .is_empty());
        assert_eq!(
            tracker
                .compute_newly_overdue(&reminders, at(10, 0))
                .newly_overdue
                .len(),
            1
        );
    }

    #[test]
    fn results_keep_input_order() {
        let reminders = vec![
            due_at("c", at(8, 0)),
            due_at("a", at(6, 0)),
            due_at("b", at(7, 0)),
        ];
        let mut tracker = OverdueTracker::new();

        let check = tracker.compute_newly_overdue(&reminders, at(12, 0));
        assert_eq!(ids(&check.newly_overdue), ids(&reminders));
    }

    #[test]
    fn rescheduled_reminder_is_notified_again() {
        let mut reminder = due_at("Pay rent", at(9, 0));
        let mut tracker = OverdueTracker::new();

        let check = tracker.compute_newly_overdue(std::slice::from_ref(&reminder), at(9, 0));
        assert_eq!(check.newly_overdue.len(), 1);

        // Pushed back an hour: no longer overdue, so tracking is dropped.
        reminder.reschedule(at(10, 0).date(), at(10, 0).time());
        let check = tracker.compute_newly_overdue(std::slice::from_ref(&reminder), at(9, 30));
        assert!(check.newly_overdue.is_empty());
        assert!(!tracker.is_notified(reminder.id()));

        let check = tracker.compute_newly_overdue(std::slice::from_ref(&reminder), at(10, 0));
        assert_eq!(ids(&check.newly_overdue), [reminder.id()]);

        let check = tracker.compute_newly_overdue(std::slice::from_ref(&reminder), at(10, 1));
        assert!(check.newly_overdue.is_empty());
    }

    #[test]
    fn completion_suppresses_and_forgets() {
        let mut reminder = due_at("Pay rent", at(9, 0));
        let mut tracker = OverdueTracker::new();
        tracker.compute_newly_overdue(std::slice::from_ref(&reminder), at(9, 0));

        reminder.set_completed(true);
        let check = tracker.compute_newly_overdue(std::slice::from_ref(&reminder), at(9, 1));
        assert!(check.newly_overdue.is_empty());
        assert_eq!(tracker.tracked_count(), 0);
    }

    #[test]
    fn completed_before_first_check_is_never_notified() {
        let reminders = vec![due_at("done", at(9, 0)).with_completed(true)];
        let mut tracker = OverdueTracker::new();

        let check = tracker.compute_newly_overdue(&reminders, at(12, 0));
        assert!(check.newly_overdue.is_empty());
    }

    #[test]
    fn deleted_reminders_are_forgotten() {
        let reminders = vec![due_at("a", at(9, 0)), due_at("b", at(9, 0))];
        let mut tracker = OverdueTracker::new();
        tracker.compute_newly_overdue(&reminders, at(9, 0));
        assert_eq!(tracker.tracked_count(), 2);

        tracker.compute_newly_overdue(&reminders[1..], at(9, 1));
        assert_eq!(tracker.tracked_count(), 1);
        assert!(!tracker.is_notified(reminders[0].id()));

        // Restored under the same identity: a fresh overdue stretch.
        let check = tracker.compute_newly_overdue(&reminders, at(9, 2));
        assert_eq!(ids(&check.newly_overdue), [reminders[0].id()]);
    }

    #[test]
    fn malformed_reminders_are_skipped_not_fatal() {
        let broken = Reminder::from_parts(Uuid::new_v4(), "broken", Some(at(9, 0).date()), None)
            .unwrap();
        let fine = due_at("fine", at(9, 0));
        let reminders = vec![broken.clone(), fine.clone()];
        let mut tracker = OverdueTracker::new();

        let check = tracker.compute_newly_overdue(&reminders, at(10, 0));
        assert_eq!(ids(&check.newly_overdue), [fine.id()]);
        assert_eq!(check.malformed.len(), 1);
        assert_eq!(check.malformed[0].id(), broken.id());
        assert_eq!(check.malformed[0].missing(), MissingField::Time);
    }

    #[test]
    fn duplicate_identities_are_notified_once() {
        let reminder = due_at("twice", at(9, 0));
        let reminders = vec![reminder.clone(), reminder];
        let mut tracker = OverdueTracker::new();

        let check = tracker.compute_newly_overdue(&reminders, at(9, 0));
        assert_eq!(check.newly_overdue.len(), 1);
    }

    #[test]
    fn same_inputs_same_outputs() {
        let reminders = vec![due_at("a", at(8, 0)), due_at("b", at(11, 0))];
        let mut left = OverdueTracker::new();
        let mut right = left.clone();

        let now = at(9, 0);
        assert_eq!(
            left.compute_newly_overdue(&reminders, now),
            right.compute_newly_overdue(&reminders, now)
        );
    }

    #[test]
    fn records_last_check_and_tolerates_clock_regression() {
        let reminders = vec![due_at("a", at(9, 0))];
        let mut tracker = OverdueTracker::new();
        assert_eq!(tracker.last_checked(), None);

        tracker.compute_newly_overdue(&reminders, at(9, 0));
        let earlier = at(9, 0) - TimeDelta::hours(1);
        let check = tracker.compute_newly_overdue(&reminders, earlier);

        assert_eq!(tracker.last_checked(), Some(earlier));
        assert!(check.newly_overdue.is_empty());
        assert_eq!(tracker.tracked_count(), 0);
    }

    #[test]
    fn reset_forgets_everything() {
        let reminders = vec![due_at("a", at(9, 0))];
        let mut tracker = OverdueTracker::new();
        tracker.compute_newly_overdue(&reminders, at(9, 0));

        tracker.reset();
        assert_eq!(tracker.tracked_count(), 0);
        assert_eq!(tracker.last_checked(), None);
        assert_eq!(
            tracker.compute_newly_overdue(&reminders, at(9, 0)).newly_overdue.len(),
            1
        );
    }
}
