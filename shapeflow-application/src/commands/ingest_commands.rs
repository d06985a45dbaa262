use tracing::{error, info};

use shapeflow_domain::value_objects::CollectionPath;
use shapeflow_domain::DEFAULT_LOG_OPTION;

use crate::{AppError, AppState};

/// Startup ingestion from the default log source. A store failure here is
/// fatal and propagates to the caller.
pub async fn initialize_engine(state: &AppState) -> Result<(), AppError> {
    let data = state.store.read(CollectionPath::OnshapeLogs).await?;
    let uploads = state.store.read(CollectionPath::UploadedLogs).await?;

    let mut engine = state.engine.write().await;
    engine.set_uploaded_log_options(uploads.as_ref());
    match data {
        Some(sources) => {
            let rows = engine.ingest(&sources, None);
            state.metrics.record_ingest(rows);
            state.metrics.record_alerts(engine.alerts().len());
            info!("initialized engine from default log source ({} rows)", rows);
        }
        None => info!("default log source is empty; starting in no-data state"),
    }
    Ok(())
}

/// Incremental refresh after a collection changed. Always rebuilds the
/// uploaded-log options from the collection just read; switches the active
/// source only for the default collection or while no data has been
/// processed yet. Store errors here are logged, not propagated.
pub async fn update_with_new_data(state: &AppState, collection: CollectionPath) {
    let data = match state.store.read(collection).await {
        Ok(data) => data,
        Err(err) => {
            state.metrics.record_ingest_error();
            error!("error updating with new data: {}", err);
            return;
        }
    };

    let mut engine = state.engine.write().await;
    engine.set_uploaded_log_options(data.as_ref());
    if let Some(sources) = &data {
        if collection == CollectionPath::OnshapeLogs || !engine.has_data() {
            let rows = engine.ingest(sources, None);
            state.metrics.record_ingest(rows);
            state.metrics.record_alerts(engine.alerts().len());
            info!("reprocessed {} with {} rows", collection, rows);
        }
    }
}

/// Switches the active log source: the sentinel (or no selection) brings
/// back the default source, any other name selects that uploaded file.
pub async fn switch_log_source(
    state: &AppState,
    file_name: Option<&str>,
) -> Result<(), AppError> {
    let (collection, selected) = match file_name {
        None => (CollectionPath::OnshapeLogs, None),
        Some(name) if name == DEFAULT_LOG_OPTION => (CollectionPath::OnshapeLogs, None),
        Some(name) => (CollectionPath::UploadedLogs, Some(name)),
    };

    let data = state.store.read(collection).await?;
    let uploads = if collection == CollectionPath::UploadedLogs {
        data.clone()
    } else {
        state.store.read(CollectionPath::UploadedLogs).await?
    };

    let mut engine = state.engine.write().await;
    engine.set_uploaded_log_options(uploads.as_ref());
    match data {
        Some(sources) => {
            let rows = engine.ingest(&sources, selected);
            state.metrics.record_ingest(rows);
            state.metrics.record_alerts(engine.alerts().len());
            info!("switched log source to {} ({} rows)", collection, rows);
        }
        None => {
            engine.ingest(&Default::default(), None);
            info!("selected source {} holds no data", collection);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::Duration;
    use serde_json::json;
    use tokio::sync::RwLock;

    use shapeflow_domain::{
        ActionCategorizer, RuntimeConfig, StoreGateway, StoredLog, TransformEngine,
    };

    use crate::Metrics;

    struct FakeStore {
        logs: Option<BTreeMap<String, StoredLog>>,
        uploads: Option<BTreeMap<String, StoredLog>>,
        fail: bool,
    }

    #[async_trait]
    impl StoreGateway for FakeStore {
        async fn read(
            &self,
            collection: CollectionPath,
        ) -> anyhow::Result<Option<BTreeMap<String, StoredLog>>> {
            if self.fail {
                return Err(anyhow::anyhow!("store unavailable"));
            }
            Ok(match collection {
                CollectionPath::OnshapeLogs => self.logs.clone(),
                CollectionPath::UploadedLogs => self.uploads.clone(),
                CollectionPath::GlossaryWords => None,
            })
        }
    }

    struct NoopCategorizer;

    impl ActionCategorizer for NoopCategorizer {
        fn categorize(&self, _description: &str) -> String {
            "Other".to_string()
        }
    }

    fn sources(user: &str) -> BTreeMap<String, StoredLog> {
        let mut sources = BTreeMap::new();
        sources.insert(
            "k".to_string(),
            StoredLog {
                file_name: Some("upload.json".to_string()),
                data: vec![json!({"Time": "2024-05-06 09:00:00", "User": user, "Document": "A", "Description": "Edit"})],
            },
        );
        sources
    }

    fn state(store: FakeStore) -> AppState {
        AppState {
            config: RuntimeConfig {
                data_dir: "./data".to_string(),
                report_dir: "./reports".to_string(),
                vocabulary_path: "./vocabulary.yaml".to_string(),
                alert_timewindow: "5min".to_string(),
                undo_redo_threshold: 5,
            },
            store: Arc::new(store),
            categorizer: Arc::new(NoopCategorizer),
            engine: Arc::new(RwLock::new(TransformEngine::new(Duration::minutes(5), 5))),
            metrics: Arc::new(Metrics::default()),
        }
    }

    #[tokio::test]
    async fn initialize_ingests_the_default_source() {
        let state = state(FakeStore {
            logs: Some(sources("ana")),
            uploads: None,
            fail: false,
        });
        initialize_engine(&state).await.expect("initialize");
        let engine = state.engine.read().await;
        assert!(engine.has_data());
        assert_eq!(engine.filters().uploaded_logs, vec![DEFAULT_LOG_OPTION]);
    }

    #[tokio::test]
    async fn initialize_propagates_store_failure() {
        let state = state(FakeStore {
            logs: None,
            uploads: None,
            fail: true,
        });
        let err = initialize_engine(&state).await.expect_err("must fail");
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[tokio::test]
    async fn update_swallows_store_failure() {
        let state = state(FakeStore {
            logs: None,
            uploads: None,
            fail: true,
        });
        update_with_new_data(&state, CollectionPath::UploadedLogs).await;
        assert!(!state.engine.read().await.has_data());
        assert!(state
            .metrics
            .render_prometheus()
            .contains("shapeflow_ingest_errors_total 1"));
    }

    #[tokio::test]
    async fn upload_update_does_not_replace_an_active_source() {
        let state = state(FakeStore {
            logs: Some(sources("ana")),
            uploads: Some(sources("cy")),
            fail: false,
        });
        initialize_engine(&state).await.expect("initialize");
        update_with_new_data(&state, CollectionPath::UploadedLogs).await;

        let engine = state.engine.read().await;
        assert_eq!(engine.filters().users, vec!["ana"]);
        assert_eq!(
            engine.filters().uploaded_logs,
            vec![DEFAULT_LOG_OPTION, "upload.json"]
        );
    }

    #[tokio::test]
    async fn upload_update_fills_an_empty_engine() {
        let state = state(FakeStore {
            logs: None,
            uploads: Some(sources("cy")),
            fail: false,
        });
        update_with_new_data(&state, CollectionPath::UploadedLogs).await;
        assert_eq!(state.engine.read().await.filters().users, vec!["cy"]);
    }

    #[tokio::test]
    async fn switch_selects_the_named_upload_and_back() {
        let state = state(FakeStore {
            logs: Some(sources("ana")),
            uploads: Some(sources("cy")),
            fail: false,
        });
        initialize_engine(&state).await.expect("initialize");

        switch_log_source(&state, Some("upload.json"))
            .await
            .expect("switch to upload");
        assert_eq!(state.engine.read().await.filters().users, vec!["cy"]);

        switch_log_source(&state, Some(DEFAULT_LOG_OPTION))
            .await
            .expect("switch back");
        assert_eq!(state.engine.read().await.filters().users, vec!["ana"]);
    }
}
