//! Task model and wire format
//!
//! The persisted JSON shape is `{id, name, isDone, priority, deadline}`
//! with `priority` as a bare 1/2/3 integer and `deadline` as an
//! RFC 3339 string or null.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Task priority. Smaller value = higher priority.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum Priority {
    High,
    Medium,
    #[default]
    Low,
}

impl Priority {
    /// Numeric wire value (1 = highest).
    pub fn value(&self) -> u8 {
        match self {
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }
}

impl From<Priority> for u8 {
    fn from(p: Priority) -> u8 {
        p.value()
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(Priority::High),
            2 => Ok(Priority::Medium),
            3 => Ok(Priority::Low),
            other => Err(format!("priority out of range: {other}")),
        }
    }
}

/// A single task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque unique id, assigned at creation.
    pub id: String,
    pub name: String,
    pub is_done: bool,
    pub priority: Priority,
    /// Optional deadline; missing, null and empty-string stored values
    /// all load as `None`.
    #[serde(default, deserialize_with = "deadline_from_wire")]
    pub deadline: Option<DateTime<Utc>>,
}

impl Task {
    /// Create a new incomplete task with a fresh id.
    pub fn new(name: &str, priority: Priority, deadline: Option<DateTime<Utc>>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            is_done: false,
            priority,
            deadline,
        }
    }
}

/// Tolerant deadline decoding: the stored value may be an RFC 3339
/// string, null, or an empty string. Unparseable strings load as `None`
/// rather than poisoning the whole list.
fn deadline_from_wire<'de, D>(de: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(de)?;
    Ok(raw
        .as_deref()
        .filter(|s| !s.is_empty())
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc)))
}

/// Seed set used when storage is absent or corrupted.
pub fn default_tasks() -> Vec<Task> {
    let now = Utc::now();
    vec![
        Task::new("Reply to the landlord", Priority::High, Some(now + Duration::days(1))),
        Task::new("Book dentist appointment", Priority::Medium, Some(now + Duration::days(3))),
        Task::new("Water the plants", Priority::Medium, None),
        Task::new("Sort old photos", Priority::Low, None),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_priority_wire_values() {
        assert_eq!(Priority::High.value(), 1);
        assert_eq!(Priority::Low.value(), 3);
        assert_eq!(Priority::try_from(2), Ok(Priority::Medium));
        assert!(Priority::try_from(0).is_err());
        assert!(Priority::try_from(4).is_err());
    }

    #[test]
    fn test_priority_ordering_matches_numeric() {
        assert!(Priority::High < Priority::Medium);
        assert!(Priority::Medium < Priority::Low);
    }

    #[test]
    fn test_task_wire_shape() {
        let deadline = Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap();
        let task = Task {
            id: "abc".to_string(),
            name: "Write report".to_string(),
            is_done: false,
            priority: Priority::Medium,
            deadline: Some(deadline),
        };
        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("\"isDone\":false"));
        assert!(json.contains("\"priority\":2"));
        assert!(json.contains("2026-03-01T12:30:00"));
    }

    #[test]
    fn test_deadline_null_and_empty_load_as_none() {
        let with_null = r#"{"id":"a","name":"aa","isDone":false,"priority":1,"deadline":null}"#;
        let task: Task = serde_json::from_str(with_null).unwrap();
        assert_eq!(task.deadline, None);

        let with_empty = r#"{"id":"a","name":"aa","isDone":false,"priority":1,"deadline":""}"#;
        let task: Task = serde_json::from_str(with_empty).unwrap();
        assert_eq!(task.deadline, None);

        let missing = r#"{"id":"a","name":"aa","isDone":false,"priority":1}"#;
        let task: Task = serde_json::from_str(missing).unwrap();
        assert_eq!(task.deadline, None);
    }

    #[test]
    fn test_garbage_deadline_loads_as_none() {
        let json = r#"{"id":"a","name":"aa","isDone":true,"priority":3,"deadline":"not a date"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.deadline, None);
        assert!(task.is_done);
    }

    #[test]
    fn test_new_task_defaults() {
        let task = Task::new("Buy milk", Priority::Low, None);
        assert!(!task.is_done);
        assert!(!task.id.is_empty());

        let other = Task::new("Buy milk", Priority::Low, None);
        assert_ne!(task.id, other.id);
    }

    #[test]
    fn test_default_tasks_are_incomplete() {
        let seed = default_tasks();
        assert!(!seed.is_empty());
        assert!(seed.iter().all(|t| !t.is_done));
    }
}
