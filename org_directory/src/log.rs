//! Directory: Operation Log
//!
//! Append-only audit trail. Entries are pure data: once written they
//! are never mutated, reordered or removed for the life of the log.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::{EntityType, OperationType, Operator};

/// Before/after values of one changed field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldChange {
    pub old: Value,
    pub new: Value,
}

/// Changed fields keyed by their data-model name (`parentId`, `status`, ...).
pub type ChangeSet = BTreeMap<String, FieldChange>;

/// One recorded mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct LogEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub op_type: OperationType,
    pub entity_type: EntityType,
    pub entity_id: String,
    pub operator_name: String,
    pub operator_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes: Option<ChangeSet>,
    pub description: String,
}

/// Everything an entry carries except the generated id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLogEntry {
    pub op_type: OperationType,
    pub entity_type: EntityType,
    pub entity_id: String,
    pub operator: Operator,
    pub description: String,
    pub changes: Option<ChangeSet>,
}

/// The append-only log. No removal or mutation is exposed.
#[derive(Debug, Clone, Default)]
pub struct OperationLog {
    entries: Vec<LogEntry>,
}

impl OperationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt previously recorded entries, oldest-appended first.
    pub fn from_entries(entries: Vec<LogEntry>) -> Self {
        Self { entries }
    }

    /// Append with the current wall-clock timestamp. Always succeeds.
    pub fn append(&mut self, draft: NewLogEntry) -> &LogEntry {
        self.append_at(draft, Utc::now())
    }

    /// Append with an explicit timestamp.
    pub fn append_at(&mut self, draft: NewLogEntry, timestamp: DateTime<Utc>) -> &LogEntry {
        let index = self.entries.len();
        self.entries.push(LogEntry {
            id: Uuid::new_v4().to_string(),
            op_type: draft.op_type,
            entity_type: draft.entity_type,
            entity_id: draft.entity_id,
            operator_name: draft.operator.name,
            operator_id: draft.operator.id,
            timestamp,
            changes: draft.changes,
            description: draft.description,
        });
        &self.entries[index]
    }

    /// The `n` most recently appended entries, newest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &LogEntry> + '_ {
        self.entries.iter().rev().take(n)
    }

    /// Entries whose timestamp is at or after `cutoff`.
    pub fn count_since(&self, cutoff: DateTime<Utc>) -> usize {
        self.entries.iter().filter(|e| e.timestamp >= cutoff).count()
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn draft(entity_id: &str) -> NewLogEntry {
        NewLogEntry {
            op_type: OperationType::Create,
            entity_type: EntityType::Organization,
            entity_id: entity_id.to_string(),
            operator: Operator::new("user_001", "Admin"),
            description: format!("created {}", entity_id),
            changes: None,
        }
    }

    #[test]
    fn test_append_then_recent_one_returns_it() {
        let mut log = OperationLog::new();
        log.append(draft("a"));
        let appended = log.append(draft("b")).clone();

        let recent: Vec<&LogEntry> = log.recent(1).collect();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0], &appended);
        assert_eq!(recent[0].operator_id, "user_001");
    }

    #[test]
    fn test_recent_is_newest_first_and_bounded() {
        let mut log = OperationLog::new();
        for id in ["a", "b", "c"] {
            log.append(draft(id));
        }
        let ids: Vec<&str> = log.recent(10).map(|e| e.entity_id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
        assert_eq!(log.recent(2).count(), 2);
        assert_eq!(log.recent(0).count(), 0);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let mut log = OperationLog::new();
        let first = log.append(draft("a")).id.clone();
        let second = log.append(draft("a")).id.clone();
        assert_ne!(first, second);
    }

    #[test]
    fn test_count_since() {
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let mut log = OperationLog::new();
        log.append_at(draft("old"), base - Duration::hours(30));
        log.append_at(draft("new"), base - Duration::hours(1));
        assert_eq!(log.count_since(base - Duration::hours(24)), 1);
        assert_eq!(log.count_since(base - Duration::hours(48)), 2);
    }
}
