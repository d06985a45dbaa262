// Transform engine
// Owns the raw/working tables and every table derived from them. Callers
// hold it behind a lock and serialize ingestion against report building.

use std::collections::{BTreeMap, HashSet};

use chrono::Duration;

use crate::entities::{
    ActivityOverTimeRow, AlertRow, DocumentUsageRow, EventFrame, FilterOptions, StoredLog,
    UserActivityRow, DEFAULT_LOG_OPTION,
};
use crate::services::detector::detect_undo_redo_bursts;
use crate::utils::parse_event_time;
use crate::value_objects::AlertStatus;

#[derive(Debug)]
pub struct TransformEngine {
    raw: Option<EventFrame>,
    working: Option<EventFrame>,
    filters: FilterOptions,
    activity_over_time: Vec<ActivityOverTimeRow>,
    document_usage: Vec<DocumentUsageRow>,
    user_activity: Vec<UserActivityRow>,
    alerts: Vec<AlertRow>,
    alert_window: Duration,
    undo_redo_threshold: u64,
}

impl TransformEngine {
    pub fn new(alert_window: Duration, undo_redo_threshold: u64) -> Self {
        Self {
            raw: None,
            working: None,
            filters: FilterOptions::default(),
            activity_over_time: Vec::new(),
            document_usage: Vec::new(),
            user_activity: Vec::new(),
            alerts: Vec::new(),
            alert_window,
            undo_redo_threshold,
        }
    }

    /// Replaces the raw and working tables from one entry of `sources` and
    /// re-derives everything. With a file name the matching entry is chosen;
    /// otherwise the first key wins. An empty map degrades to the no-data
    /// state instead of erroring.
    ///
    /// Returns the number of ingested rows.
    pub fn ingest(
        &mut self,
        sources: &BTreeMap<String, StoredLog>,
        selected_file_name: Option<&str>,
    ) -> usize {
        let Some(frame) = select_source(sources, selected_file_name) else {
            self.clear();
            return 0;
        };
        let row_count = frame.len();
        self.raw = Some(frame);
        self.process();
        row_count
    }

    /// Rebuilds the uploaded-logs option list. Reads from whichever
    /// collection the caller just fetched; the sentinel entry always leads.
    pub fn set_uploaded_log_options(&mut self, uploads: Option<&BTreeMap<String, StoredLog>>) {
        let mut logs = vec![DEFAULT_LOG_OPTION.to_string()];
        if let Some(uploads) = uploads {
            for record in uploads.values() {
                if let Some(file_name) = &record.file_name {
                    logs.push(file_name.clone());
                }
            }
        }
        self.filters.uploaded_logs = logs;
    }

    /// Derivation pipeline, fixed order. Each step no-ops when the column it
    /// needs is absent; a skipped step never aborts the rest.
    fn process(&mut self) {
        self.normalize_time();
        self.extract_date();
        self.populate_filters();
        self.group_activity_over_time();
        self.group_document_usage();
        self.group_user_activity();
        self.generate_alerts();
    }

    fn clear(&mut self) {
        self.raw = None;
        self.working = None;
        self.filters.documents.clear();
        self.filters.users.clear();
        self.filters.descriptions.clear();
        self.activity_over_time.clear();
        self.document_usage.clear();
        self.user_activity.clear();
        self.alerts.clear();
    }

    fn normalize_time(&mut self) {
        let Some(raw) = &mut self.raw else {
            return;
        };
        if !raw.columns.time {
            return;
        }
        for row in &mut raw.rows {
            row.timestamp = row.time.as_deref().and_then(parse_event_time);
        }
    }

    fn extract_date(&mut self) {
        let Some(raw) = &self.raw else {
            return;
        };
        let mut working = raw.clone();
        if working.columns.time {
            for row in &mut working.rows {
                row.date = row.timestamp.map(|timestamp| timestamp.date_naive());
            }
            working.columns.date = true;
        }
        self.working = Some(working);
    }

    fn populate_filters(&mut self) {
        let Some(raw) = &self.raw else {
            return;
        };
        if raw.columns.document {
            self.filters.documents = distinct(raw.rows.iter().map(|row| row.document.as_deref()));
        }
        if raw.columns.user {
            self.filters.users = distinct(raw.rows.iter().map(|row| row.user.as_deref()));
        }
        if raw.columns.description {
            self.filters.descriptions =
                distinct(raw.rows.iter().map(|row| row.description.as_deref()));
        }
    }

    fn group_activity_over_time(&mut self) {
        let Some(working) = &self.working else {
            return;
        };
        if !working.columns.date {
            return;
        }
        let mut counts = BTreeMap::new();
        for row in &working.rows {
            if let Some(date) = row.date {
                *counts.entry(date).or_default() += 1;
            }
        }
        self.activity_over_time = counts
            .into_iter()
            .map(|(date, activity_count)| ActivityOverTimeRow {
                date,
                activity_count,
            })
            .collect();
    }

    fn group_document_usage(&mut self) {
        let Some(working) = &self.working else {
            return;
        };
        if !working.columns.document {
            return;
        }
        self.document_usage =
            value_counts(working.rows.iter().map(|row| row.document.as_deref()))
                .into_iter()
                .map(|(document, usage_count)| DocumentUsageRow {
                    document,
                    usage_count,
                })
                .collect();
    }

    fn group_user_activity(&mut self) {
        let Some(working) = &self.working else {
            return;
        };
        if !working.columns.user {
            return;
        }
        self.user_activity = value_counts(working.rows.iter().map(|row| row.user.as_deref()))
            .into_iter()
            .map(|(user, activity_count)| UserActivityRow {
                user,
                activity_count,
            })
            .collect();
    }

    fn generate_alerts(&mut self) {
        let Some(raw) = &self.raw else {
            return;
        };
        self.alerts = detect_undo_redo_bursts(raw, self.alert_window, self.undo_redo_threshold);
    }

    pub fn raw(&self) -> Option<&EventFrame> {
        self.raw.as_ref()
    }

    pub fn working(&self) -> Option<&EventFrame> {
        self.working.as_ref()
    }

    pub fn has_data(&self) -> bool {
        self.raw.is_some()
    }

    pub fn filters(&self) -> &FilterOptions {
        &self.filters
    }

    pub fn activity_over_time(&self) -> &[ActivityOverTimeRow] {
        &self.activity_over_time
    }

    pub fn document_usage(&self) -> &[DocumentUsageRow] {
        &self.document_usage
    }

    pub fn user_activity(&self) -> &[UserActivityRow] {
        &self.user_activity
    }

    pub fn alerts(&self) -> &[AlertRow] {
        &self.alerts
    }

    pub fn unread_alerts_count(&self) -> usize {
        self.alerts
            .iter()
            .filter(|alert| alert.status == AlertStatus::Unread)
            .count()
    }
}

fn select_source(
    sources: &BTreeMap<String, StoredLog>,
    selected_file_name: Option<&str>,
) -> Option<EventFrame> {
    let key = selected_file_name
        .and_then(|file_name| {
            sources
                .iter()
                .find(|(_, record)| record.file_name.as_deref() == Some(file_name))
                .map(|(key, _)| key.clone())
        })
        .or_else(|| sources.keys().next().cloned())?;
    sources
        .get(&key)
        .map(|record| EventFrame::from_records(&record.data))
}

/// Distinct non-null values in first-seen order.
fn distinct<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for value in values.flatten() {
        if seen.insert(value) {
            out.push(value.to_string());
        }
    }
    out
}

/// Count per distinct non-null value, count-descending with key-ascending
/// tiebreak so the ordering is deterministic.
fn value_counts<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<(String, u64)> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for value in values.flatten() {
        *counts.entry(value).or_default() += 1;
    }
    let mut out: Vec<(String, u64)> = counts
        .into_iter()
        .map(|(value, count)| (value.to_string(), count))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stored_log(file_name: Option<&str>, data: Vec<serde_json::Value>) -> StoredLog {
        StoredLog {
            file_name: file_name.map(ToString::to_string),
            data,
        }
    }

    fn sample_sources() -> BTreeMap<String, StoredLog> {
        let mut sources = BTreeMap::new();
        sources.insert(
            "a-first".to_string(),
            stored_log(
                Some("first.json"),
                vec![
                    json!({"Time": "2024-05-06 09:00:00", "User": "ana", "Document": "A", "Description": "Edit sketch"}),
                    json!({"Time": "2024-05-06 09:10:00", "User": "ana", "Document": "A", "Description": "Undo"}),
                    json!({"Time": "2024-05-07 11:00:00", "User": "bo", "Document": "B", "Description": "Edit sketch"}),
                    json!({"Time": "bogus", "User": "bo", "Document": "B", "Description": "Move"}),
                ],
            ),
        );
        sources.insert(
            "b-second".to_string(),
            stored_log(
                Some("second.json"),
                vec![json!({"Time": "2024-06-01 08:00:00", "User": "cy", "Document": "C", "Description": "Delete part"})],
            ),
        );
        sources
    }

    fn engine() -> TransformEngine {
        TransformEngine::new(Duration::minutes(5), 5)
    }

    #[test]
    fn first_key_wins_without_a_file_name() {
        let mut engine = engine();
        engine.ingest(&sample_sources(), None);
        let raw = engine.raw().expect("raw table");
        assert_eq!(raw.len(), 4);
        assert_eq!(raw.rows[0].user.as_deref(), Some("ana"));
    }

    #[test]
    fn file_name_selects_the_matching_entry() {
        let mut engine = engine();
        engine.ingest(&sample_sources(), Some("second.json"));
        let raw = engine.raw().expect("raw table");
        assert_eq!(raw.len(), 1);
        assert_eq!(raw.rows[0].user.as_deref(), Some("cy"));
    }

    #[test]
    fn unknown_file_name_falls_back_to_the_first_entry() {
        let mut engine = engine();
        engine.ingest(&sample_sources(), Some("missing.json"));
        assert_eq!(engine.raw().expect("raw table").len(), 4);
    }

    #[test]
    fn empty_sources_degrade_to_no_data() {
        let mut engine = engine();
        engine.ingest(&sample_sources(), None);
        assert!(engine.has_data());

        let ingested = engine.ingest(&BTreeMap::new(), None);
        assert_eq!(ingested, 0);
        assert!(!engine.has_data());
        assert!(engine.working().is_none());
        assert!(engine.activity_over_time().is_empty());
        assert!(engine.filters().documents.is_empty());
    }

    #[test]
    fn raw_and_working_row_counts_never_diverge() {
        let mut engine = engine();
        engine.ingest(&sample_sources(), None);
        assert_eq!(
            engine.raw().expect("raw").len(),
            engine.working().expect("working").len()
        );
    }

    #[test]
    fn working_table_gains_dates_and_drops_bad_timestamps_from_grouping() {
        let mut engine = engine();
        engine.ingest(&sample_sources(), None);
        let working = engine.working().expect("working table");
        assert!(working.columns.date);
        assert_eq!(working.rows.iter().filter(|row| row.date.is_some()).count(), 3);

        let grouped: u64 = engine
            .activity_over_time()
            .iter()
            .map(|row| row.activity_count)
            .sum();
        assert_eq!(grouped, 3);
    }

    #[test]
    fn usage_groupings_sum_to_the_working_row_count() {
        let mut engine = engine();
        engine.ingest(&sample_sources(), None);
        let total = engine.working().expect("working").len() as u64;
        let documents: u64 = engine.document_usage().iter().map(|row| row.usage_count).sum();
        let users: u64 = engine.user_activity().iter().map(|row| row.activity_count).sum();
        assert_eq!(documents, total);
        assert_eq!(users, total);
    }

    #[test]
    fn value_counts_order_is_count_descending() {
        let mut engine = engine();
        engine.ingest(&sample_sources(), None);
        let usage = engine.document_usage();
        assert_eq!(usage[0].document, "A");
        assert_eq!(usage[0].usage_count, 2);
        assert_eq!(usage[1].document, "B");
    }

    #[test]
    fn filters_hold_distinct_values_in_first_seen_order() {
        let mut engine = engine();
        engine.ingest(&sample_sources(), None);
        let filters = engine.filters();
        assert_eq!(filters.documents, vec!["A", "B"]);
        assert_eq!(filters.users, vec!["ana", "bo"]);
        assert_eq!(
            filters.descriptions,
            vec!["Edit sketch", "Undo", "Move"]
        );
    }

    #[test]
    fn uploaded_log_options_always_lead_with_the_sentinel() {
        let mut engine = engine();
        engine.set_uploaded_log_options(None);
        assert_eq!(engine.filters().uploaded_logs, vec![DEFAULT_LOG_OPTION]);

        let mut uploads = BTreeMap::new();
        uploads.insert("k1".to_string(), stored_log(Some("march.json"), vec![]));
        uploads.insert("k2".to_string(), stored_log(None, vec![]));
        engine.set_uploaded_log_options(Some(&uploads));
        assert_eq!(
            engine.filters().uploaded_logs,
            vec![DEFAULT_LOG_OPTION, "march.json"]
        );
    }

    #[test]
    fn reingesting_the_same_source_is_idempotent() {
        let sources = sample_sources();
        let mut engine = engine();
        engine.ingest(&sources, None);
        let first = engine.working().expect("working").clone();
        engine.ingest(&sources, None);
        assert_eq!(engine.working().expect("working"), &first);
    }

    #[test]
    fn alerts_rebuild_on_every_ingestion() {
        let mut sources = BTreeMap::new();
        sources.insert(
            "k".to_string(),
            stored_log(
                Some("bursts.json"),
                (0..7)
                    .map(|i| {
                        json!({
                            "Time": format!("2024-05-06 09:0{}:00", i),
                            "User": "ana",
                            "Document": "A",
                            "Description": "Undo"
                        })
                    })
                    .collect(),
            ),
        );
        let mut engine = TransformEngine::new(Duration::minutes(10), 5);
        engine.ingest(&sources, None);
        assert_eq!(engine.alerts().len(), 1);
        assert_eq!(engine.unread_alerts_count(), 1);

        engine.ingest(&sample_sources(), None);
        assert!(engine.alerts().is_empty());
        assert_eq!(engine.unread_alerts_count(), 0);
    }
}
