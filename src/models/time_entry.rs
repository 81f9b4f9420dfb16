// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Toggl time entry as returned by `GET /me/time_entries`.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One tracked interval. Read-only to this service.
#[derive(Debug, Clone, Deserialize)]
pub struct TimeEntry {
    #[serde(default)]
    pub id: u64,
    pub start: DateTime<Utc>,
    /// `None` while the timer is still running
    #[serde(default)]
    pub stop: Option<DateTime<Utc>>,
    /// Seconds; negative while running
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub project_id: Option<u64>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// Set when the entry was deleted on the Toggl side
    #[serde(default)]
    pub server_deleted_at: Option<DateTime<Utc>>,
}

impl TimeEntry {
    /// Whether the entry is still being timed.
    pub fn is_running(&self) -> bool {
        self.stop.is_none() || self.duration < 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_running_entry() {
        let json = r#"{
            "id": 42,
            "workspace_id": 7,
            "project_id": null,
            "start": "2024-03-05T14:00:00+00:00",
            "stop": null,
            "duration": -1709647200,
            "description": "Standup",
            "tags": [],
            "duronly": true
        }"#;

        let entry: TimeEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id, 42);
        assert!(entry.stop.is_none());
        assert!(entry.is_running());
        assert_eq!(entry.description.as_deref(), Some("Standup"));
    }

    #[test]
    fn test_deserialize_closed_entry_with_nulls() {
        let json = r#"{
            "start": "2024-03-05T14:00:00Z",
            "stop": "2024-03-05T15:30:00Z",
            "duration": 5400,
            "description": null,
            "tags": null
        }"#;

        let entry: TimeEntry = serde_json::from_str(json).unwrap();
        assert!(!entry.is_running());
        assert_eq!(entry.duration, 5400);
        assert_eq!(entry.id, 0);
        assert!(entry.description.is_none());
        assert!(entry.tags.is_none());
        assert!(entry.server_deleted_at.is_none());
    }

    #[test]
    fn test_deserialize_deleted_entry() {
        let json = r#"{
            "start": "2024-03-05T14:00:00Z",
            "stop": "2024-03-05T15:00:00Z",
            "duration": 3600,
            "server_deleted_at": "2024-03-05T16:00:00Z"
        }"#;

        let entry: TimeEntry = serde_json::from_str(json).unwrap();
        assert!(entry.server_deleted_at.is_some());
    }
}
