use shapeflow_domain::FilterOptions;

use crate::AppState;

pub async fn filter_options(state: &AppState) -> FilterOptions {
    state.engine.read().await.filters().clone()
}
