// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::task::{Priority, Task, TaskId};

/// Title given to records that arrive without one.
pub const UNTITLED_TASK: &str = "Untitled Task";

/// A task record exactly as the backend sent it.
///
/// Nothing here is trusted: every field may be missing, and dates and
/// priority are kept as raw strings until [`TaskRecord::normalize`] admits
/// the record into the typed model.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskRecord {
    pub id: Option<TaskId>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<String>,
    pub due_date: Option<String>,
    pub category: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl TaskRecord {
    /// Fills every missing or malformed field with its default.
    ///
    /// Returns `None` for a record without an `id`: ids only ever come from
    /// the backend. `now` stands in for a missing creation time.
    pub fn normalize(self, now: DateTime<Utc>) -> Option<Task> {
        let id = self.id?;

        let title = self
            .title
            .filter(|title| !title.trim().is_empty())
            .unwrap_or_else(|| UNTITLED_TASK.to_string());

        let priority = self
            .priority
            .and_then(|raw| raw.parse::<Priority>().ok())
            .unwrap_or_default();

        let due_date = self.due_date.as_deref().and_then(parse_date);
        let created_at = self
            .created_at
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or(now);
        let updated_at = self
            .updated_at
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or(created_at);

        Some(Task {
            id,
            title,
            description: self.description.unwrap_or_default(),
            completed: self.completed.unwrap_or(false),
            priority,
            due_date,
            category: self.category.unwrap_or_default(),
            created_at,
            updated_at,
        })
    }
}

/// Accepts `YYYY-MM-DD`, or a full timestamp whose date part is kept.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp(raw).map(|ts| ts.date_naive()))
}

/// Accepts RFC 3339, or a naive `YYYY-MM-DDTHH:MM:SS[.f]` read as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        "2025-06-01T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_full_record_is_kept_as_is() {
        let record: TaskRecord = serde_json::from_str(
            r#"{
                "id": 4,
                "title": "Ship release",
                "description": "tag and publish",
                "completed": true,
                "priority": "high",
                "dueDate": "2025-06-10",
                "category": "work",
                "createdAt": "2025-05-30T08:15:00Z",
                "updatedAt": "2025-05-31T08:15:00Z"
            }"#,
        )
        .unwrap();

        let task = record.normalize(now()).unwrap();

        assert_eq!(task.id, 4);
        assert_eq!(task.title, "Ship release");
        assert_eq!(task.description, "tag and publish");
        assert!(task.completed);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2025, 6, 10));
        assert_eq!(task.category, "work");
        assert_eq!(task.created_at, "2025-05-30T08:15:00Z".parse::<DateTime<Utc>>().unwrap());
        assert_eq!(task.updated_at, "2025-05-31T08:15:00Z".parse::<DateTime<Utc>>().unwrap());
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let record: TaskRecord = serde_json::from_str(r#"{"id": 9}"#).unwrap();

        let task = record.normalize(now()).unwrap();

        assert_eq!(task.title, UNTITLED_TASK);
        assert_eq!(task.description, "");
        assert!(!task.completed);
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.due_date, None);
        assert_eq!(task.category, "");
        assert_eq!(task.created_at, now());
        assert_eq!(task.updated_at, now());
    }

    #[test]
    fn test_record_without_id_is_rejected() {
        let record = TaskRecord {
            title: Some("Orphan".to_string()),
            ..TaskRecord::default()
        };

        assert!(record.normalize(now()).is_none());
    }

    #[test]
    fn test_null_and_malformed_values_fall_back() {
        let record: TaskRecord = serde_json::from_str(
            r#"{
                "id": 1,
                "title": "   ",
                "description": null,
                "priority": "critical",
                "dueDate": "next tuesday",
                "createdAt": "yesterday"
            }"#,
        )
        .unwrap();

        let task = record.normalize(now()).unwrap();

        assert_eq!(task.title, UNTITLED_TASK);
        assert_eq!(task.description, "");
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.due_date, None);
        assert_eq!(task.created_at, now());
    }

    #[test]
    fn test_upper_case_priority_and_naive_timestamps() {
        let record: TaskRecord = serde_json::from_str(
            r#"{
                "id": 2,
                "title": "Legacy",
                "priority": "LOW",
                "dueDate": "2025-07-01T00:00:00Z",
                "createdAt": "2025-05-30T08:15:00.123456"
            }"#,
        )
        .unwrap();

        let task = record.normalize(now()).unwrap();

        assert_eq!(task.priority, Priority::Low);
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2025, 7, 1));
        assert_eq!(task.created_at.date_naive(), NaiveDate::from_ymd_opt(2025, 5, 30).unwrap());
    }
}
