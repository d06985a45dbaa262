// Derived report rows
// One row type per chart-ready table

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::ActionType;

/// Event count per calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityOverTimeRow {
    pub date: NaiveDate,
    pub activity_count: u64,
}

/// Event count per document, count-descending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentUsageRow {
    pub document: String,
    pub usage_count: u64,
}

/// Event count per user, count-descending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserActivityRow {
    pub user: String,
    pub activity_count: u64,
}

/// Date-picker bounds: latest and earliest timestamps plus a suggested
/// range start seven days before the latest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRangeBounds {
    pub max: DateTime<Utc>,
    pub min: DateTime<Utc>,
    pub start: DateTime<Utc>,
}

/// Total time attributed to a tab from consecutive-action gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectTimeRow {
    pub tab: String,
    pub seconds: f64,
    pub hours: f64,
}

/// Event count per (user, action type) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionTypeCountRow {
    pub user: String,
    pub action_type: ActionType,
    pub action_count: u64,
}

/// Event count per (weekday, hour-of-day) cell of the heatmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkPatternRow {
    pub day: String,
    pub hour: u32,
    pub action_count: u64,
    /// Formatted `"H:00 - H+1:00"`.
    pub time_interval: String,
}

/// Repetition count per (action, user, description).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatedActionRow {
    pub action: String,
    pub user: String,
    pub description: String,
    pub count: u64,
}

/// Event count per (user, hour-of-day).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHoursRow {
    pub user: String,
    pub hour: u32,
    pub activity_count: u64,
}
