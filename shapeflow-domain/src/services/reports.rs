// Report builders
// Stateless functions from a frame (or a filtered view of it) to one
// chart-ready table each. A failed precondition yields an empty result of
// the right shape, never an error.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Timelike, Utc};

use crate::entities::{
    ActionTypeCountRow, EventFrame, ProjectTimeRow, RepeatedActionRow, Selection,
    TimeRangeBounds, WorkPatternRow, WorkingHoursRow,
};
use crate::ports::ActionCategorizer;
use crate::utils::{default_max_date, default_min_date, parse_event_time, weekday_name};
use crate::value_objects::ActionType;

/// Session break cutoff: consecutive-action gaps above this are ignored.
const SESSION_GAP_SECONDS: f64 = 1800.0;

fn row_timestamp(row: &crate::entities::EventRow) -> Option<DateTime<Utc>> {
    row.timestamp
        .or_else(|| row.time.as_deref().and_then(parse_event_time))
}

/// Copy of `frame` with the `action` column filled from the categorizer.
pub fn action_labeled_frame(frame: &EventFrame, categorizer: &dyn ActionCategorizer) -> EventFrame {
    let mut labeled = frame.clone();
    for row in &mut labeled.rows {
        let description = row.description.as_deref().unwrap_or("");
        row.action = Some(categorizer.categorize(description));
    }
    labeled.columns.action = true;
    labeled
}

/// Graph-layout view: parses `time`, drops rows where it is unparsable, and
/// classifies each action as advanced or basic. The remaining columns pass
/// through so later builders can still group on them.
pub fn graph_layout_frame(frame: &EventFrame) -> EventFrame {
    if !(frame.columns.time && frame.columns.action) {
        return EventFrame {
            rows: Vec::new(),
            columns: frame.columns,
        };
    }
    let mut out = EventFrame {
        rows: Vec::new(),
        columns: frame.columns,
    };
    out.columns.action_type = true;
    for row in &frame.rows {
        let Some(timestamp) = row_timestamp(row) else {
            continue;
        };
        let mut row = row.clone();
        row.timestamp = Some(timestamp);
        row.action_type = Some(ActionType::classify(row.action.as_deref().unwrap_or("")));
        out.rows.push(row);
    }
    out
}

/// Latest/earliest timestamps and a suggested range start seven days before
/// the latest. Empty input falls back to the documented default dates.
pub fn time_range_bounds(frame: &EventFrame) -> TimeRangeBounds {
    let mut min = None;
    let mut max = None;
    for row in &frame.rows {
        let Some(timestamp) = row_timestamp(row) else {
            continue;
        };
        min = Some(min.map_or(timestamp, |current: DateTime<Utc>| current.min(timestamp)));
        max = Some(max.map_or(timestamp, |current: DateTime<Utc>| current.max(timestamp)));
    }
    match (min, max) {
        (Some(min), Some(max)) => TimeRangeBounds {
            max,
            min,
            start: max - Duration::days(7),
        },
        _ => {
            let max = default_max_date();
            TimeRangeBounds {
                max,
                min: default_min_date(),
                start: max - Duration::days(7),
            }
        }
    }
}

/// Ad-hoc dashboard filter: document/user selections (scalar or list) and an
/// inclusive time window. The window only applies when both bounds are set;
/// rows whose time cannot be parsed fall out of a windowed view.
pub fn filter_frame(
    frame: &EventFrame,
    document: Option<&Selection>,
    user: Option<&Selection>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> EventFrame {
    let mut out = frame.clone();
    if let Some(selection) = document {
        out.rows
            .retain(|row| row.document.as_deref().is_some_and(|value| selection.matches(value)));
    }
    if let Some(selection) = user {
        out.rows
            .retain(|row| row.user.as_deref().is_some_and(|value| selection.matches(value)));
    }
    if let (Some(start), Some(end)) = (start, end) {
        out.rows.retain(|row| {
            row_timestamp(row).is_some_and(|timestamp| timestamp >= start && timestamp <= end)
        });
    }
    out
}

/// Time attributed to each tab: consecutive-action gaps within a tab,
/// keeping only gaps in (0, 1800] seconds, summed per tab.
pub fn project_time_distribution(frame: &EventFrame) -> Vec<ProjectTimeRow> {
    if !(frame.columns.time && frame.columns.tab) {
        return Vec::new();
    }
    let mut sequenced: Vec<(&str, DateTime<Utc>)> = frame
        .rows
        .iter()
        .filter_map(|row| Some((row.tab.as_deref()?, row_timestamp(row)?)))
        .collect();
    sequenced.sort_by(|a, b| a.0.cmp(b.0).then(a.1.cmp(&b.1)));

    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for pair in sequenced.windows(2) {
        let (previous_tab, previous_time) = pair[0];
        let (tab, time) = pair[1];
        if tab != previous_tab {
            continue;
        }
        let gap = (time - previous_time).num_milliseconds() as f64 / 1000.0;
        if gap > 0.0 && gap <= SESSION_GAP_SECONDS {
            *totals.entry(tab).or_default() += gap;
        }
    }

    totals
        .into_iter()
        .map(|(tab, seconds)| ProjectTimeRow {
            tab: tab.to_string(),
            seconds,
            hours: (seconds / 3600.0 * 100.0).round() / 100.0,
        })
        .collect()
}

/// Event count per (user, action type) pair.
pub fn advanced_basic_counts(frame: &EventFrame) -> Vec<ActionTypeCountRow> {
    if !(frame.columns.user && frame.columns.action_type) {
        return Vec::new();
    }
    let mut counts: BTreeMap<(&str, ActionType), u64> = BTreeMap::new();
    for row in &frame.rows {
        let (Some(user), Some(action_type)) = (row.user.as_deref(), row.action_type) else {
            continue;
        };
        *counts.entry((user, action_type)).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|((user, action_type), action_count)| ActionTypeCountRow {
            user: user.to_string(),
            action_type,
            action_count,
        })
        .collect()
}

/// Rows inside the inclusive [start, end] window, unaggregated.
pub fn action_frequency_frame(
    frame: &EventFrame,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> EventFrame {
    if !(frame.columns.time && frame.columns.user) {
        return EventFrame {
            rows: Vec::new(),
            columns: frame.columns,
        };
    }
    let mut out = frame.clone();
    out.rows.retain(|row| {
        row_timestamp(row).is_some_and(|timestamp| timestamp >= start && timestamp <= end)
    });
    out
}

/// Work-pattern heatmap cells: count per (weekday name, hour-of-day).
pub fn work_patterns(frame: &EventFrame) -> Vec<WorkPatternRow> {
    if !frame.columns.time {
        return Vec::new();
    }
    let mut counts: BTreeMap<(String, u32), u64> = BTreeMap::new();
    for row in &frame.rows {
        let Some(timestamp) = row_timestamp(row) else {
            continue;
        };
        *counts
            .entry((weekday_name(timestamp), timestamp.hour()))
            .or_default() += 1;
    }
    counts
        .into_iter()
        .map(|((day, hour), action_count)| WorkPatternRow {
            day,
            hour,
            action_count,
            time_interval: format!("{}:00 - {}:00", hour, hour + 1),
        })
        .collect()
}

/// Repetition count per (action, user, description). The (user, time) sort
/// is part of the documented contract even though it cannot change counts.
pub fn repeated_actions_by_user(frame: &EventFrame) -> Vec<RepeatedActionRow> {
    if !(frame.columns.user && frame.columns.time) {
        return Vec::new();
    }
    let mut rows: Vec<_> = frame.rows.iter().collect();
    rows.sort_by(|a, b| {
        a.user
            .cmp(&b.user)
            .then_with(|| row_timestamp(a).cmp(&row_timestamp(b)))
    });

    let mut counts: BTreeMap<(&str, &str, &str), u64> = BTreeMap::new();
    for row in rows {
        let (Some(action), Some(user), Some(description)) = (
            row.action.as_deref(),
            row.user.as_deref(),
            row.description.as_deref(),
        ) else {
            continue;
        };
        *counts.entry((action, user, description)).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|((action, user, description), count)| RepeatedActionRow {
            action: action.to_string(),
            user: user.to_string(),
            description: description.to_string(),
            count,
        })
        .collect()
}

/// Working-hour histogram: count per (user, hour-of-day).
pub fn working_hours_histogram(frame: &EventFrame) -> Vec<WorkingHoursRow> {
    if !frame.columns.time {
        return Vec::new();
    }
    let mut counts: BTreeMap<(&str, u32), u64> = BTreeMap::new();
    for row in &frame.rows {
        let (Some(user), Some(timestamp)) = (row.user.as_deref(), row_timestamp(row)) else {
            continue;
        };
        *counts.entry((user, timestamp.hour())).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|((user, hour), activity_count)| WorkingHoursRow {
            user: user.to_string(),
            hour,
            activity_count,
        })
        .collect()
}
