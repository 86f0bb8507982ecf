//! Domain types for the reminder list.
//!
//! # Design
//! `Reminder` is a plain value record. Its wire shape lives in `codec` so the
//! in-memory type can hold a real `NaiveDate` while the persisted JSON keeps
//! the textual `dueDate` field the browser build wrote.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ParseFilterError;

/// Opaque reminder identifier. Generated ids are UUID v4 strings; hydrated
/// ids are kept verbatim.
pub type ReminderId = String;

/// A single to-do entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub id: ReminderId,
    pub text: String,
    pub completed: bool,
    pub due_date: Option<NaiveDate>,
}

impl Reminder {
    /// Creates an uncompleted reminder with a freshly generated id.
    ///
    /// Does not trim or validate `text`; `ReminderStore::add` does that.
    pub fn new(text: impl Into<String>, due_date: Option<NaiveDate>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), text, due_date)
    }

    /// Creates an uncompleted reminder with a caller-provided id.
    pub fn with_id(
        id: impl Into<ReminderId>,
        text: impl Into<String>,
        due_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            completed: false,
            due_date,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.completed
    }
}

/// View selector applied on top of the collection. Session-only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    /// Whether `reminder` belongs to this filter's subset.
    pub fn matches(self, reminder: &Reminder) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !reminder.completed,
            Filter::Completed => reminder.completed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Active => "active",
            Filter::Completed => "completed",
        }
    }

    /// Capitalized name for buttons and headings.
    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Active => "Active",
            Filter::Completed => "Completed",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Filter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Filter::All),
            "active" => Ok(Filter::Active),
            "completed" => Ok(Filter::Completed),
            _ => Err(ParseFilterError(s.to_string())),
        }
    }
}

/// Counts over the whole collection, independent of the active filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

impl Summary {
    pub fn from_reminders(reminders: &[Reminder]) -> Self {
        let active = reminders.iter().filter(|r| r.is_active()).count();
        Self {
            total: reminders.len(),
            active,
            completed: reminders.len() - active,
        }
    }

    /// Drives the "Clear completed" affordance.
    pub fn has_completed(&self) -> bool {
        self.completed > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_reminder_starts_active_with_uuid_id() {
        let reminder = Reminder::new("Buy milk", None);
        assert!(!reminder.completed);
        assert!(reminder.is_active());
        assert!(Uuid::parse_str(&reminder.id).is_ok());
    }

    #[test]
    fn generated_ids_differ() {
        let a = Reminder::new("a", None);
        let b = Reminder::new("a", None);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn filter_parses_case_insensitively() {
        assert_eq!("Active".parse::<Filter>().unwrap(), Filter::Active);
        assert_eq!(" completed ".parse::<Filter>().unwrap(), Filter::Completed);
        assert!("done".parse::<Filter>().is_err());
    }

    #[test]
    fn filter_display_matches_serde() {
        for filter in Filter::ALL {
            let json = serde_json::to_value(filter).unwrap();
            assert_eq!(json, filter.to_string());
        }
    }

    #[test]
    fn filter_labels_are_capitalized_names() {
        let labels: Vec<&str> = Filter::ALL.iter().map(|f| f.label()).collect();
        assert_eq!(labels, ["All", "Active", "Completed"]);
        for filter in Filter::ALL {
            assert_eq!(filter.label().to_lowercase(), filter.as_str());
        }
    }

    #[test]
    fn filter_default_is_all() {
        assert_eq!(Filter::default(), Filter::All);
    }

    #[test]
    fn summary_counts_active_and_completed() {
        let mut done = Reminder::new("done", None);
        done.completed = true;
        let reminders = vec![Reminder::new("a", None), done, Reminder::new("b", None)];
        let summary = Summary::from_reminders(&reminders);
        assert_eq!(
            summary,
            Summary {
                total: 3,
                active: 2,
                completed: 1
            }
        );
        assert!(summary.has_completed());
        assert!(!Summary::default().has_completed());
    }
}
