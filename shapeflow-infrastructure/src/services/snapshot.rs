// Dashboard snapshot writer
// Renders every derived table and report into one JSON document under the
// report directory, named by the current local date.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Local;
use serde::Serialize;
use tokio::fs;
use tracing::info;

use shapeflow_application::queries::report_queries::{self, GraphFilter};
use shapeflow_application::queries::{alert_queries, filter_queries};
use shapeflow_application::AppState;
use shapeflow_domain::{
    ActionTypeCountRow, ActivityOverTimeRow, AlertRow, DocumentUsageRow, FilterOptions,
    ProjectTimeRow, RepeatedActionRow, UserActivityRow, WorkPatternRow, WorkingHoursRow,
};

#[derive(Debug, Serialize)]
struct DashboardSnapshot {
    generated_at: String,
    filters: FilterOptions,
    activity_over_time: Vec<ActivityOverTimeRow>,
    document_usage: Vec<DocumentUsageRow>,
    user_activity: Vec<UserActivityRow>,
    project_time_distribution: Vec<ProjectTimeRow>,
    advanced_basic_counts: Vec<ActionTypeCountRow>,
    work_patterns: Vec<WorkPatternRow>,
    repeated_actions: Vec<RepeatedActionRow>,
    working_hours: Vec<WorkingHoursRow>,
    alerts: Vec<AlertRow>,
    unread_alerts: usize,
}

pub async fn write_snapshot(state: &AppState) -> Result<PathBuf> {
    let filter = GraphFilter::default();
    let snapshot = DashboardSnapshot {
        generated_at: Local::now().to_rfc3339(),
        filters: filter_queries::filter_options(state).await,
        activity_over_time: report_queries::activity_over_time(state).await,
        document_usage: report_queries::document_usage(state).await,
        user_activity: report_queries::user_activity(state).await,
        project_time_distribution: report_queries::project_time_distribution(state, &filter)
            .await?,
        advanced_basic_counts: report_queries::advanced_basic_counts(state, &filter).await?,
        work_patterns: report_queries::work_patterns(state, &filter).await?,
        repeated_actions: report_queries::repeated_actions_by_user(state, &filter).await?,
        working_hours: report_queries::working_hours(state, &filter).await?,
        alerts: alert_queries::list_alerts(state).await,
        unread_alerts: alert_queries::unread_alerts_count(state).await,
    };

    let report_dir = Path::new(&state.config.report_dir);
    fs::create_dir_all(report_dir).await?;
    let date = Local::now().format("%Y-%m-%d");
    let path = report_dir.join(format!("shapeflow-dashboard-{}.json", date));
    let content = serde_json::to_string_pretty(&snapshot)?;
    fs::write(&path, content).await?;
    info!("dashboard snapshot written to {}", path.display());
    Ok(path)
}
