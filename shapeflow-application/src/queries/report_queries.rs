use chrono::{DateTime, Utc};

use shapeflow_domain::services::reports;
use shapeflow_domain::utils::parse_event_time;
use shapeflow_domain::{
    ActionTypeCountRow, ActivityOverTimeRow, DocumentUsageRow, EventFrame, ProjectTimeRow,
    RepeatedActionRow, Selection, TimeRangeBounds, UserActivityRow, WorkPatternRow,
    WorkingHoursRow,
};

use crate::{AppError, AppState};

/// Ad-hoc filters a dashboard graph may apply on top of the working table.
/// Bounds are strings straight from the UI; both must be set for the time
/// window to apply.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct GraphFilter {
    pub document: Option<Selection>,
    pub user: Option<Selection>,
    pub start: Option<String>,
    pub end: Option<String>,
}

fn parse_bound(value: Option<&str>, name: &str) -> Result<Option<DateTime<Utc>>, AppError> {
    match value {
        None => Ok(None),
        Some(raw) => parse_event_time(raw)
            .map(Some)
            .ok_or_else(|| AppError::BadRequest(format!("unparsable {} bound: '{}'", name, raw))),
    }
}

async fn working_frame(state: &AppState) -> EventFrame {
    state
        .engine
        .read()
        .await
        .working()
        .cloned()
        .unwrap_or_default()
}

/// Working table with the action column filled and the graph layout applied:
/// parsed times, advanced/basic classification, then the ad-hoc filter.
pub async fn graph_layout(state: &AppState, filter: &GraphFilter) -> Result<EventFrame, AppError> {
    let frame = working_frame(state).await;
    let labeled = reports::action_labeled_frame(&frame, state.categorizer.as_ref());
    let layout = reports::graph_layout_frame(&labeled);
    let start = parse_bound(filter.start.as_deref(), "start")?;
    let end = parse_bound(filter.end.as_deref(), "end")?;
    Ok(reports::filter_frame(
        &layout,
        filter.document.as_ref(),
        filter.user.as_ref(),
        start,
        end,
    ))
}

pub async fn activity_over_time(state: &AppState) -> Vec<ActivityOverTimeRow> {
    state.engine.read().await.activity_over_time().to_vec()
}

pub async fn document_usage(state: &AppState) -> Vec<DocumentUsageRow> {
    state.engine.read().await.document_usage().to_vec()
}

pub async fn user_activity(state: &AppState) -> Vec<UserActivityRow> {
    state.engine.read().await.user_activity().to_vec()
}

pub async fn time_range_bounds(state: &AppState) -> TimeRangeBounds {
    reports::time_range_bounds(&working_frame(state).await)
}

pub async fn project_time_distribution(
    state: &AppState,
    filter: &GraphFilter,
) -> Result<Vec<ProjectTimeRow>, AppError> {
    let frame = graph_layout(state, filter).await?;
    Ok(reports::project_time_distribution(&frame))
}

pub async fn advanced_basic_counts(
    state: &AppState,
    filter: &GraphFilter,
) -> Result<Vec<ActionTypeCountRow>, AppError> {
    let frame = graph_layout(state, filter).await?;
    Ok(reports::advanced_basic_counts(&frame))
}

/// Unaggregated rows inside [start, end] for the frequency scatter. Both
/// bounds are required here.
pub async fn action_frequency(
    state: &AppState,
    start: &str,
    end: &str,
) -> Result<EventFrame, AppError> {
    let start = parse_event_time(start)
        .ok_or_else(|| AppError::BadRequest(format!("unparsable start bound: '{}'", start)))?;
    let end = parse_event_time(end)
        .ok_or_else(|| AppError::BadRequest(format!("unparsable end bound: '{}'", end)))?;
    let frame = working_frame(state).await;
    Ok(reports::action_frequency_frame(&frame, start, end))
}

pub async fn work_patterns(
    state: &AppState,
    filter: &GraphFilter,
) -> Result<Vec<WorkPatternRow>, AppError> {
    let frame = graph_layout(state, filter).await?;
    Ok(reports::work_patterns(&frame))
}

pub async fn repeated_actions_by_user(
    state: &AppState,
    filter: &GraphFilter,
) -> Result<Vec<RepeatedActionRow>, AppError> {
    let frame = graph_layout(state, filter).await?;
    Ok(reports::repeated_actions_by_user(&frame))
}

pub async fn working_hours(
    state: &AppState,
    filter: &GraphFilter,
) -> Result<Vec<WorkingHoursRow>, AppError> {
    let frame = graph_layout(state, filter).await?;
    Ok(reports::working_hours_histogram(&frame))
}
