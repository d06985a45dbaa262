// Runtime configuration handed from infrastructure to the app layer

use chrono::Duration;

use crate::utils::parse_offset;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub data_dir: String,
    pub report_dir: String,
    pub vocabulary_path: String,
    /// Alert window size as an offset string, e.g. "5min".
    pub alert_timewindow: String,
    /// Undo/redo count a window group must exceed to raise an alert.
    pub undo_redo_threshold: u64,
}

impl RuntimeConfig {
    /// Parsed alert window. Config validation guarantees the string parses;
    /// the fallback covers hand-built configs.
    pub fn alert_window(&self) -> Duration {
        parse_offset(&self.alert_timewindow).unwrap_or_else(|_| Duration::minutes(5))
    }
}
