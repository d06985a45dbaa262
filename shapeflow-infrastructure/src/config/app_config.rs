use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use shapeflow_domain::utils::parse_offset;
use shapeflow_domain::RuntimeConfig;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub data_dir: String,
    pub report_dir: String,
    pub vocabulary_path: String,
    pub alert_timewindow: String,
    pub undo_redo_threshold: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
            report_dir: "./reports".to_string(),
            vocabulary_path: "./vocabulary.yaml".to_string(),
            alert_timewindow: "5min".to_string(),
            undo_redo_threshold: 5,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var("SHAPEFLOW_CONFIG").unwrap_or_else(|_| "./config.toml".to_string());
        let file_path = Path::new(&path);
        let base_dir = file_path.parent();
        if !file_path.exists() {
            warn!("config.toml not found, using defaults");
            let mut config = AppConfig::default();
            config.apply_env_overrides();
            config.resolve_paths(base_dir);
            config.validate()?;
            return Ok(config);
        }
        let content = fs::read_to_string(file_path).await?;
        let mut config: AppConfig = toml::from_str(&content)?;
        config.apply_env_overrides();
        config.resolve_paths(base_dir);
        config.validate()?;
        Ok(config)
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        self.data_dir = resolve_path(base, &self.data_dir);
        self.report_dir = resolve_path(base, &self.report_dir);
        self.vocabulary_path = resolve_path(base, &self.vocabulary_path);
    }

    pub fn validate(&self) -> Result<()> {
        if self.data_dir.trim().is_empty() {
            return Err(anyhow!("data_dir must not be empty"));
        }
        if self.undo_redo_threshold == 0 {
            return Err(anyhow!("undo_redo_threshold must be greater than 0"));
        }
        parse_offset(&self.alert_timewindow)
            .map_err(|err| anyhow!("invalid alert_timewindow: {}", err))?;
        Ok(())
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            data_dir: self.data_dir.clone(),
            report_dir: self.report_dir.clone(),
            vocabulary_path: self.vocabulary_path.clone(),
            alert_timewindow: self.alert_timewindow.clone(),
            undo_redo_threshold: self.undo_redo_threshold,
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("SHAPEFLOW_DATA_DIR") {
            self.data_dir = value;
        }
        if let Ok(value) = env::var("SHAPEFLOW_REPORT_DIR") {
            self.report_dir = value;
        }
        if let Ok(value) = env::var("SHAPEFLOW_VOCABULARY_PATH") {
            self.vocabulary_path = value;
        }
        if let Ok(value) = env::var("ALERT_TIMEWINDOW") {
            self.alert_timewindow = value;
        }
        if let Ok(value) = env::var("UNDO_REDO_THRESHOLD") {
            self.undo_redo_threshold = value.parse().unwrap_or(self.undo_redo_threshold);
        }
    }
}

fn resolve_path(base: &Path, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }
    let path = Path::new(trimmed);
    if path.is_absolute() {
        trimmed.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}
