// Undo/redo burst detector
// Pure batch rule over the raw table; the alerts table is a function of it

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

use crate::entities::{AlertRow, EventFrame, ALERT_DESCRIPTION};
use crate::utils::{floor_to_window, format_window_start};
use crate::value_objects::AlertStatus;

/// Emits one alert per (user, document, window) group whose undo/redo count
/// strictly exceeds `threshold`. Rows missing the timestamp, user, or
/// document never join a group.
pub fn detect_undo_redo_bursts(
    frame: &EventFrame,
    window: Duration,
    threshold: u64,
) -> Vec<AlertRow> {
    if !(frame.columns.description
        && frame.columns.time
        && frame.columns.user
        && frame.columns.document)
    {
        return Vec::new();
    }

    let mut groups: BTreeMap<(String, String, DateTime<Utc>), u64> = BTreeMap::new();
    for row in &frame.rows {
        let Some(description) = &row.description else {
            continue;
        };
        let lowered = description.to_lowercase();
        if !lowered.contains("undo") && !lowered.contains("redo") {
            continue;
        }
        let (Some(timestamp), Some(user), Some(document)) =
            (row.timestamp, &row.user, &row.document)
        else {
            continue;
        };
        let window_start = floor_to_window(timestamp, window);
        *groups
            .entry((user.clone(), document.clone(), window_start))
            .or_default() += 1;
    }

    groups
        .into_iter()
        .filter(|(_, count)| *count > threshold)
        .map(|((user, document, window_start), _)| AlertRow {
            time: format_window_start(window_start),
            user,
            description: ALERT_DESCRIPTION.to_string(),
            document,
            status: AlertStatus::Unread,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::parse_event_time;
    use serde_json::json;

    fn frame(times: &[&str]) -> EventFrame {
        let records: Vec<_> = times
            .iter()
            .map(|time| {
                json!({
                    "Time": time,
                    "User": "ana",
                    "Document": "Bracket",
                    "Description": "Undo move"
                })
            })
            .collect();
        let mut frame = EventFrame::from_records(&records);
        for row in &mut frame.rows {
            row.timestamp = row.time.as_deref().and_then(parse_event_time);
        }
        frame
    }

    #[test]
    fn burst_within_one_window_raises_one_alert() {
        let frame = frame(&[
            "2024-05-01 10:00:10",
            "2024-05-01 10:01:20",
            "2024-05-01 10:03:30",
        ]);
        let alerts = detect_undo_redo_bursts(&frame, Duration::minutes(5), 2);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].user, "ana");
        assert_eq!(alerts[0].document, "Bracket");
        assert_eq!(alerts[0].time, "10:00:00 01-05-2024");
        assert_eq!(alerts[0].status, AlertStatus::Unread);
    }

    #[test]
    fn events_split_across_windows_do_not_alert() {
        let frame = frame(&["2024-05-01 10:01:00", "2024-05-01 10:07:00"]);
        let alerts = detect_undo_redo_bursts(&frame, Duration::minutes(5), 1);
        assert!(alerts.is_empty());
    }

    #[test]
    fn count_equal_to_threshold_does_not_alert() {
        let frame = frame(&["2024-05-01 10:00:00", "2024-05-01 10:01:00"]);
        let alerts = detect_undo_redo_bursts(&frame, Duration::minutes(5), 2);
        assert!(alerts.is_empty());
    }

    #[test]
    fn matching_is_case_insensitive_and_substring() {
        let records = vec![
            json!({"Time": "2024-05-01 10:00:00", "User": "bo", "Document": "Gear", "Description": "REDO sketch"}),
            json!({"Time": "2024-05-01 10:00:30", "User": "bo", "Document": "Gear", "Description": "redo extrude"}),
            json!({"Time": "2024-05-01 10:01:00", "User": "bo", "Document": "Gear", "Description": "Move part"}),
        ];
        let mut frame = EventFrame::from_records(&records);
        for row in &mut frame.rows {
            row.timestamp = row.time.as_deref().and_then(parse_event_time);
        }
        let alerts = detect_undo_redo_bursts(&frame, Duration::minutes(5), 1);
        assert_eq!(alerts.len(), 1);
    }

    #[test]
    fn rows_without_parsed_time_never_group() {
        let records = vec![
            json!({"Time": "garbage", "User": "cy", "Document": "Plate", "Description": "Undo"}),
            json!({"Time": "also garbage", "User": "cy", "Document": "Plate", "Description": "Undo"}),
        ];
        let frame = EventFrame::from_records(&records);
        let alerts = detect_undo_redo_bursts(&frame, Duration::minutes(5), 0);
        assert!(alerts.is_empty());
    }

    #[test]
    fn missing_required_column_yields_no_alerts() {
        let records = vec![json!({"Time": "2024-05-01 10:00:00", "Description": "Undo"})];
        let frame = EventFrame::from_records(&records);
        assert!(detect_undo_redo_bursts(&frame, Duration::minutes(5), 0).is_empty());
    }
}
