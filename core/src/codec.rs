//! Persisted representation of the reminder collection.
//!
//! # Design
//! The value is a JSON array of `{id, text, completed, dueDate?}` objects.
//! Encoding always writes `dueDate` as `YYYY-MM-DD`. Decoding is lenient
//! about dates only: the browser build serialized `Date` objects as RFC 3339
//! timestamps, so both forms are accepted and anything else decodes as "no
//! due date". A structurally broken document is rejected as a whole.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::StoreError;
use crate::types::Reminder;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StoredReminderRef<'a> {
    id: &'a str,
    text: &'a str,
    completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    due_date: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredReminder {
    id: String,
    text: String,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    due_date: Option<serde_json::Value>,
}

/// Parses a due date from a date picker value or a persisted field.
///
/// Accepts `YYYY-MM-DD` and RFC 3339 timestamps; timestamps are reduced to
/// their UTC calendar day. Blank or unrecognized input yields `None`.
pub fn parse_due_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, DATE_FORMAT) {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).date_naive())
}

pub fn format_due_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Encodes the full collection for a whole-value overwrite.
pub fn encode_collection(reminders: &[Reminder]) -> Result<String, StoreError> {
    let stored: Vec<StoredReminderRef<'_>> = reminders
        .iter()
        .map(|r| StoredReminderRef {
            id: &r.id,
            text: &r.text,
            completed: r.completed,
            due_date: r.due_date.map(format_due_date),
        })
        .collect();
    serde_json::to_string(&stored).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Decodes a persisted collection.
///
/// Records with blank text and records repeating an earlier id are dropped,
/// so ids stay unique and every text is non-blank. Kept text is not trimmed.
pub fn decode_collection(raw: &str) -> Result<Vec<Reminder>, StoreError> {
    let stored: Vec<StoredReminder> =
        serde_json::from_str(raw).map_err(|e| StoreError::HydrationDecode(e.to_string()))?;

    let mut seen = HashSet::with_capacity(stored.len());
    let mut reminders = Vec::with_capacity(stored.len());
    for (index, record) in stored.into_iter().enumerate() {
        if record.text.trim().is_empty() {
            warn!(index, id = %record.id, "dropping persisted reminder with blank text");
            continue;
        }
        if !seen.insert(record.id.clone()) {
            warn!(index, id = %record.id, "dropping persisted reminder with duplicate id");
            continue;
        }
        let due_date = decode_due_date(&record.id, record.due_date);
        reminders.push(Reminder {
            id: record.id,
            text: record.text,
            completed: record.completed,
            due_date,
        });
    }
    Ok(reminders)
}

fn decode_due_date(id: &str, value: Option<serde_json::Value>) -> Option<NaiveDate> {
    match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(text)) => {
            let date = parse_due_date(&text);
            if date.is_none() {
                warn!(id, value = %text, "ignoring undecodable due date");
            }
            date
        }
        Some(other) => {
            warn!(id, value = %other, "ignoring non-string due date");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parse_due_date_accepts_date_picker_value() {
        assert_eq!(parse_due_date("2024-03-01"), Some(date(2024, 3, 1)));
        assert_eq!(parse_due_date("  2024-03-01 "), Some(date(2024, 3, 1)));
    }

    #[test]
    fn parse_due_date_reduces_timestamps_to_utc_day() {
        assert_eq!(
            parse_due_date("2024-01-15T00:00:00.000Z"),
            Some(date(2024, 1, 15))
        );
        assert_eq!(
            parse_due_date("2024-01-15T23:30:00-02:00"),
            Some(date(2024, 1, 16))
        );
    }

    #[test]
    fn parse_due_date_rejects_garbage() {
        assert_eq!(parse_due_date(""), None);
        assert_eq!(parse_due_date("tomorrow"), None);
        assert_eq!(parse_due_date("2024-02-30"), None);
    }

    #[test]
    fn encode_omits_absent_due_date() {
        let reminders = vec![
            Reminder::with_id("a", "undated", None),
            Reminder::with_id("b", "dated", Some(date(2024, 3, 1))),
        ];
        let json: serde_json::Value =
            serde_json::from_str(&encode_collection(&reminders).unwrap()).unwrap();
        assert!(json[0].get("dueDate").is_none());
        assert_eq!(json[1]["dueDate"], "2024-03-01");
        assert_eq!(json[1]["id"], "b");
        assert_eq!(json[1]["completed"], false);
    }

    #[test]
    fn decode_empty_array() {
        assert!(decode_collection("[]").unwrap().is_empty());
    }

    #[test]
    fn decode_rejects_non_array() {
        let err = decode_collection(r#"{"id":"a"}"#).unwrap_err();
        assert!(matches!(err, StoreError::HydrationDecode(_)));
    }

    #[test]
    fn decode_rejects_record_without_text() {
        let err = decode_collection(r#"[{"id":"a","completed":false}]"#).unwrap_err();
        assert!(matches!(err, StoreError::HydrationDecode(_)));
    }

    #[test]
    fn decode_treats_bad_dates_as_absent() {
        let raw = r#"[
            {"id":"a","text":"null date","completed":false,"dueDate":null},
            {"id":"b","text":"bad date","completed":false,"dueDate":"someday"},
            {"id":"c","text":"numeric date","completed":true,"dueDate":17}
        ]"#;
        let reminders = decode_collection(raw).unwrap();
        assert_eq!(reminders.len(), 3);
        assert!(reminders.iter().all(|r| r.due_date.is_none()));
        assert!(reminders[2].completed);
    }

    #[test]
    fn decode_drops_blank_text_and_duplicate_ids() {
        let raw = r#"[
            {"id":"a","text":"first","completed":false},
            {"id":"b","text":"   ","completed":false},
            {"id":"a","text":"again","completed":true}
        ]"#;
        let reminders = decode_collection(raw).unwrap();
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].text, "first");
    }

    #[test]
    fn decode_keeps_stored_text_verbatim() {
        let raw = r#"[{"id":"a","text":"  indented note ","completed":false}]"#;
        let reminders = decode_collection(raw).unwrap();
        assert_eq!(reminders[0].text, "  indented note ");
        assert_eq!(
            encode_collection(&reminders).unwrap(),
            r#"[{"id":"a","text":"  indented note ","completed":false}]"#
        );
    }
}
