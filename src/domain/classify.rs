//! Sorting reminders into their display groups.

use chrono::NaiveDateTime;

use crate::domain::{InvalidGroupError, Reminder, ReminderGroup};

impl ReminderGroup {
    /// Whether `reminder` belongs to this group at `now`.
    ///
    /// The calendar groups (today, tomorrow, upcoming) compare dates only,
    /// against `now.date()`. [`ReminderGroup::Overdue`] compares the full due
    /// instant, inclusive of `now`.
    ///
    /// A reminder without a date belongs to no calendar group, and a reminder
    /// without both a date and a time is never overdue.
    #[must_use]
    pub fn contains(self, reminder: &Reminder, now: NaiveDateTime) -> bool {
        let today = now.date();
        match self {
            Self::All => true,
            Self::Today => reminder.date() == Some(today),
            Self::Tomorrow => reminder.date().is_some() && reminder.date() == today.succ_opt(),
            Self::Upcoming => reminder.date().is_some_and(|date| date > today),
            Self::Overdue => reminder.is_overdue(now).unwrap_or(false),
            Self::Priority => reminder.is_priority(),
            Self::Completed => reminder.is_completed(),
        }
    }
}

/// Select the reminders belonging to `group` at `now`.
///
/// This is a stable filter: the result keeps the relative order of
/// `reminders`.
#[must_use]
pub fn classify(
    reminders: &[Reminder],
    group: ReminderGroup,
    now: NaiveDateTime,
) -> Vec<&Reminder> {
    reminders
        .iter()
        .filter(|reminder| group.contains(reminder, now))
        .collect()
}

/// Select the reminders belonging to the group named by a display label.
///
/// # Errors
///
/// Returns [`InvalidGroupError`] if the label names no group.
pub fn classify_label<'a>(
    reminders: &'a [Reminder],
    label: &str,
    now: NaiveDateTime,
) -> Result<Vec<&'a Reminder>, InvalidGroupError> {
    let group = ReminderGroup::from_label(label)?;
    Ok(classify(reminders, group, now))
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};
    use uuid::Uuid;

    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(h, min, 0).unwrap())
    }

    fn reminder(name: &str, due: NaiveDateTime) -> Reminder {
        Reminder::new(name, due.date(), due.time()).unwrap()
    }

    fn names(reminders: &[&Reminder]) -> Vec<String> {
        reminders.iter().map(|r| r.name().to_string()).collect()
    }

    /// A fixed set of reminders around 2024-01-01 12:00.
    fn fixture() -> Vec<Reminder> {
        vec![
            reminder("yesterday", at(2023, 12, 31, 18, 0)),
            reminder("this morning", at(2024, 1, 1, 9, 0)).with_priority(true),
            reminder("this evening", at(2024, 1, 1, 20, 0)),
            reminder("tomorrow", at(2024, 1, 2, 8, 0)),
            reminder("next week", at(2024, 1, 8, 8, 0)).with_priority(true),
            reminder("done", at(2023, 12, 30, 8, 0)).with_completed(true),
        ]
    }

    fn noon() -> NaiveDateTime {
        at(2024, 1, 1, 12, 0)
    }

    #[test]
    fn empty_input_gives_empty_output() {
        for group in ReminderGroup::ORDERED {
            assert!(classify(&[], group, noon()).is_empty());
        }
    }

    #[test]
    fn all_keeps_everything_in_order() {
        let reminders = fixture();
        let all = classify(&reminders, ReminderGroup::All, noon());
        assert_eq!(
            names(&all),
            [
                "yesterday",
                "this morning",
                "this evening",
                "tomorrow",
                "next week",
                "done"
            ]
        );
    }

    #[test]
    fn calendar_groups_ignore_time_of_day() {
        let reminders = fixture();
        let now = noon();

        assert_eq!(
            names(&classify(&reminders, ReminderGroup::Today, now)),
            ["this morning", "this evening"]
        );
        assert_eq!(
            names(&classify(&reminders, ReminderGroup::Tomorrow, now)),
            ["tomorrow"]
        );
        assert_eq!(
            names(&classify(&reminders, ReminderGroup::Upcoming, now)),
            ["tomorrow", "next week"]
        );
    }

    #[test]
    fn midnight_belongs_to_its_calendar_date() {
        let reminders = vec![reminder("midnight", at(2024, 1, 2, 0, 0))];
        let late = at(2024, 1, 1, 23, 59);

        assert!(classify(&reminders, ReminderGroup::Today, late).is_empty());
        assert_eq!(classify(&reminders, ReminderGroup::Tomorrow, late).len(), 1);
    }

    #[test]
    fn overdue_compares_instants_and_skips_completed() {
        let reminders = fixture();
        assert_eq!(
            names(&classify(&reminders, ReminderGroup::Overdue, noon())),
            ["yesterday", "this morning"]
        );
    }

    #[test]
    fn overdue_includes_reminders_due_exactly_now() {
        let reminders = vec![reminder("Pay rent", at(2024, 1, 1, 9, 0))];
        let overdue = classify(&reminders, ReminderGroup::Overdue, at(2024, 1, 1, 9, 0));
        assert_eq!(overdue.len(), 1);
    }

    #[test]
    fn membership_is_not_exclusive() {
        let reminders = fixture();
        let this_morning = &reminders[1];
        for group in [
            ReminderGroup::All,
            ReminderGroup::Today,
            ReminderGroup::Overdue,
            ReminderGroup::Priority,
        ] {
            assert!(group.contains(this_morning, noon()), "{group}");
        }
    }

    #[test]
    fn priority_and_completed_ignore_dates() {
        let reminders = fixture();
        let far_future = at(2099, 1, 1, 0, 0);

        assert_eq!(
            names(&classify(&reminders, ReminderGroup::Priority, far_future)),
            ["this morning", "next week"]
        );
        assert_eq!(
            names(&classify(&reminders, ReminderGroup::Completed, far_future)),
            ["done"]
        );
    }

    #[test]
    fn undated_reminders_only_appear_in_flag_groups() {
        let undated = Reminder::from_parts(Uuid::new_v4(), "someday", None, None)
            .unwrap()
            .with_priority(true);

        let member_of: Vec<_> = ReminderGroup::ORDERED
            .into_iter()
            .filter(|group| group.contains(&undated, noon()))
            .collect();

        assert_eq!(member_of, [ReminderGroup::All, ReminderGroup::Priority]);
    }

    #[test]
    fn classify_by_label() {
        let reminders = fixture();
        let tomorrow = classify_label(&reminders, "Tomorrow (01/02)", noon()).unwrap();
        assert_eq!(names(&tomorrow), ["tomorrow"]);

        let error = classify_label(&reminders, "Later", noon()).unwrap_err();
        assert_eq!(error.selector(), "Later");
    }
}
