use shapeflow_domain::AlertRow;

use crate::AppState;

pub async fn list_alerts(state: &AppState) -> Vec<AlertRow> {
    state.engine.read().await.alerts().to_vec()
}

pub async fn unread_alerts_count(state: &AppState) -> usize {
    state.engine.read().await.unread_alerts_count()
}
