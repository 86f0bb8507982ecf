//! Filtered, due-date-ordered projection of the collection.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::types::{Filter, Reminder};

/// Selects the reminders matching `filter` and stable-sorts them by due date.
///
/// Dated reminders come first in ascending date order; undated reminders
/// follow. Equal keys keep their collection order.
pub fn project(reminders: &[Reminder], filter: Filter) -> Vec<Reminder> {
    let mut visible: Vec<Reminder> = reminders
        .iter()
        .filter(|r| filter.matches(r))
        .cloned()
        .collect();
    // `sort_by` is stable.
    visible.sort_by(|a, b| compare_due(a.due_date, b.due_date));
    visible
}

/// Due-date comparator: present before absent, then ascending.
pub fn compare_due(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (Some(a), Some(b)) => a.cmp(&b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    fn reminder(id: &str, due: Option<NaiveDate>, completed: bool) -> Reminder {
        let mut r = Reminder::with_id(id, id, due);
        r.completed = completed;
        r
    }

    fn ids(view: &[Reminder]) -> Vec<&str> {
        view.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn dated_first_then_undated_in_insertion_order() {
        let reminders = vec![
            reminder("none-1", None, false),
            reminder("mar", date(2024, 3, 1), false),
            reminder("none-2", None, false),
            reminder("jan", date(2024, 1, 15), false),
        ];
        let view = project(&reminders, Filter::All);
        assert_eq!(ids(&view), ["jan", "mar", "none-1", "none-2"]);
    }

    #[test]
    fn equal_dates_keep_insertion_order() {
        let reminders = vec![
            reminder("b", date(2024, 5, 1), false),
            reminder("a", date(2024, 5, 1), false),
            reminder("c", date(2024, 4, 1), false),
        ];
        let view = project(&reminders, Filter::All);
        assert_eq!(ids(&view), ["c", "b", "a"]);
    }

    #[test]
    fn active_and_completed_partition_the_collection() {
        let reminders = vec![
            reminder("a", None, true),
            reminder("b", date(2024, 1, 1), false),
            reminder("c", date(2023, 1, 1), true),
            reminder("d", None, false),
        ];
        assert_eq!(ids(&project(&reminders, Filter::Active)), ["b", "d"]);
        assert_eq!(ids(&project(&reminders, Filter::Completed)), ["c", "a"]);
    }

    #[test]
    fn projection_leaves_input_untouched() {
        let reminders = vec![
            reminder("late", date(2025, 1, 1), false),
            reminder("early", date(2024, 1, 1), false),
        ];
        let before = reminders.clone();
        let first = project(&reminders, Filter::All);
        let second = project(&reminders, Filter::All);
        assert_eq!(first, second);
        assert_eq!(reminders, before);
    }

    #[test]
    fn comparator_orders_presence_before_value() {
        assert_eq!(compare_due(None, None), Ordering::Equal);
        assert_eq!(compare_due(date(2030, 1, 1), None), Ordering::Less);
        assert_eq!(compare_due(None, date(2000, 1, 1)), Ordering::Greater);
        assert_eq!(
            compare_due(date(2024, 1, 1), date(2024, 1, 2)),
            Ordering::Less
        );
    }
}
