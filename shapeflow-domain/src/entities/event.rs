// Event entities
// Loosely-typed activity-log rows as received from the document store

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::value_objects::ActionType;

/// One record in a log collection: an uploaded file name plus its events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredLog {
    #[serde(rename = "fileName", default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub data: Vec<Value>,
}

/// A single user action. Every logical column is optional; the source is
/// semi-structured JSON and rows routinely miss fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventRow {
    /// Raw `Time` string as received.
    pub time: Option<String>,
    /// Normalized timestamp; `None` marks a missing or unparsable value.
    pub timestamp: Option<DateTime<Utc>>,
    /// Calendar date extracted from `timestamp` on the working table.
    pub date: Option<NaiveDate>,
    pub user: Option<String>,
    pub document: Option<String>,
    pub tab: Option<String>,
    pub description: Option<String>,
    /// Coarse category derived from `description`.
    pub action: Option<String>,
    pub action_type: Option<ActionType>,
}

/// Which logical columns the source records actually carried. Every
/// column-dependent pipeline step and report builder checks these flags
/// instead of assuming the field is populated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSet {
    pub time: bool,
    pub user: bool,
    pub document: bool,
    pub tab: bool,
    pub description: bool,
    pub action: bool,
    pub action_type: bool,
    pub date: bool,
}

/// An in-memory event table: rows plus the set of columns present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventFrame {
    pub rows: Vec<EventRow>,
    pub columns: ColumnSet,
}

impl EventFrame {
    /// Builds a frame from raw store records. Column presence is the union
    /// of keys observed across all records; non-object records are skipped.
    pub fn from_records(records: &[Value]) -> Self {
        let mut columns = ColumnSet::default();
        let mut rows = Vec::with_capacity(records.len());
        for record in records {
            let Some(map) = record.as_object() else {
                continue;
            };
            columns.time |= map.contains_key("Time");
            columns.user |= map.contains_key("User");
            columns.document |= map.contains_key("Document");
            columns.tab |= map.contains_key("Tab");
            columns.description |= map.contains_key("Description");
            rows.push(EventRow {
                time: string_field(map, "Time"),
                user: string_field(map, "User"),
                document: string_field(map, "Document"),
                tab: string_field(map, "Tab"),
                description: string_field(map, "Description"),
                ..EventRow::default()
            });
        }
        Self { rows, columns }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn string_field(map: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(value) => Some(value.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
