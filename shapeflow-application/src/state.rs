use std::sync::Arc;

use tokio::sync::RwLock;

use shapeflow_domain::ports::{ActionCategorizer, StoreGateway};
use shapeflow_domain::services::TransformEngine;
use shapeflow_domain::RuntimeConfig;

use crate::Metrics;

/// Shared handles for every command and query. The engine sits behind a
/// read-write lock so a report built during a source switch never sees a
/// half-replaced table.
#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub store: Arc<dyn StoreGateway>,
    pub categorizer: Arc<dyn ActionCategorizer>,
    pub engine: Arc<RwLock<TransformEngine>>,
    pub metrics: Arc<Metrics>,
}
