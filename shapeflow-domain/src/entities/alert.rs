// Alert entity
// One row per detected undo/redo burst

use serde::{Deserialize, Serialize};

use crate::value_objects::AlertStatus;

/// Fixed description attached to every generated alert.
pub const ALERT_DESCRIPTION: &str = "Many redos/undos detected within a short time period";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertRow {
    /// Window start formatted `%H:%M:%S %d-%m-%Y`.
    pub time: String,
    pub user: String,
    pub description: String,
    pub document: String,
    pub status: AlertStatus,
}
