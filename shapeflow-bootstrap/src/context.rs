use std::sync::Arc;

use anyhow::Result;
use tokio::sync::RwLock;

use shapeflow_application::{AppState, Metrics};
use shapeflow_domain::TransformEngine;
use shapeflow_infrastructure::{AppConfig, JsonFileStore, KeywordCategorizer};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new() -> Result<Self> {
        let config = AppConfig::load().await?;
        let runtime_config = config.to_runtime_config();

        let store = Arc::new(JsonFileStore::new(&runtime_config.data_dir));
        let categorizer =
            Arc::new(KeywordCategorizer::load_or_default(&runtime_config.vocabulary_path).await);
        let engine = TransformEngine::new(
            runtime_config.alert_window(),
            runtime_config.undo_redo_threshold,
        );

        let state = AppState {
            config: runtime_config,
            store,
            categorizer,
            engine: Arc::new(RwLock::new(engine)),
            metrics: Arc::new(Metrics::default()),
        };

        Ok(Self { state })
    }
}
