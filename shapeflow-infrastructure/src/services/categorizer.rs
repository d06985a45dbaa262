// Keyword-table action categorizer
// The vocabulary lives outside the code: a YAML list of keyword/label
// pairs, checked in order with first match winning.

use anyhow::Result;
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use shapeflow_domain::ports::ActionCategorizer;

/// Label used when no keyword matches.
pub const FALLBACK_ACTION: &str = "Other";

#[derive(Debug, Clone, Deserialize)]
pub struct VocabularyEntry {
    pub keyword: String,
    pub label: String,
}

pub struct KeywordCategorizer {
    /// Lowercased keyword, label. Order matters.
    entries: Vec<(String, String)>,
}

impl KeywordCategorizer {
    pub fn new(entries: Vec<VocabularyEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|entry| (entry.keyword.to_lowercase(), entry.label))
                .collect(),
        }
    }

    /// Built-in vocabulary covering the stock Onshape action descriptions.
    pub fn with_default_vocabulary() -> Self {
        let defaults = [
            ("undo", "Undo"),
            ("redo", "Redo"),
            ("edit", "Edit"),
            ("delete", "Delete"),
            ("remove", "Delete"),
            ("create", "Create"),
            ("new sketch", "Create"),
            ("insert", "Add"),
            ("add", "Add"),
            ("export", "Export"),
            ("import", "Add"),
            ("rename", "Rename"),
            ("move", "Move"),
            ("open", "View"),
            ("close", "View"),
        ];
        Self {
            entries: defaults
                .into_iter()
                .map(|(keyword, label)| (keyword.to_string(), label.to_string()))
                .collect(),
        }
    }

    pub async fn from_yaml_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        let entries: Vec<VocabularyEntry> = serde_yaml::from_str(&content)?;
        Ok(Self::new(entries))
    }

    /// Loads the vocabulary file, falling back to the built-in table when it
    /// is missing or malformed.
    pub async fn load_or_default(path: &str) -> Self {
        match Self::from_yaml_file(path).await {
            Ok(categorizer) => categorizer,
            Err(err) => {
                warn!("vocabulary file {} unavailable, using built-in vocabulary: {}", path, err);
                Self::with_default_vocabulary()
            }
        }
    }
}

impl ActionCategorizer for KeywordCategorizer {
    fn categorize(&self, description: &str) -> String {
        let lowered = description.to_lowercase();
        self.entries
            .iter()
            .find(|(keyword, _)| lowered.contains(keyword))
            .map(|(_, label)| label.clone())
            .unwrap_or_else(|| FALLBACK_ACTION.to_string())
    }
}
