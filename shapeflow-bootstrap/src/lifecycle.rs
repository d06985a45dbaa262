use anyhow::Result;
use tracing::{info, warn};

use shapeflow_application::commands::ingest_commands;
use shapeflow_application::queries::alert_queries;
use shapeflow_infrastructure::write_snapshot;

use crate::context::AppContext;

/// One-shot run: load everything, ingest the default log source, write the
/// dashboard snapshot. Startup ingestion failure is fatal.
pub async fn run_standalone() -> Result<()> {
    let context = AppContext::new().await?;
    let state = context.state;

    ingest_commands::initialize_engine(&state).await?;

    let path = write_snapshot(&state).await?;
    info!("snapshot available at {}", path.display());

    let unread = alert_queries::unread_alerts_count(&state).await;
    if unread > 0 {
        warn!("{} unread alerts detected", unread);
    }
    Ok(())
}
