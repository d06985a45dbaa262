// Filter options and ad-hoc graph filters

use serde::{Deserialize, Serialize};

/// Sentinel heading the uploaded-logs option list; selects the default source.
pub const DEFAULT_LOG_OPTION: &str = "Default Log";

/// Distinct-value option lists for the dashboard dropdowns. Order is
/// first-seen order within the source data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub documents: Vec<String>,
    pub users: Vec<String>,
    pub descriptions: Vec<String>,
    pub uploaded_logs: Vec<String>,
}

/// A dropdown selection that may be a single value or a list of values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Selection {
    One(String),
    Many(Vec<String>),
}

impl Selection {
    /// Equality for a scalar, membership for a list.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Selection::One(selected) => selected == value,
            Selection::Many(selected) => selected.iter().any(|item| item == value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_selection_is_exact_match() {
        let selection = Selection::One("A".to_string());
        assert!(selection.matches("A"));
        assert!(!selection.matches("AB"));
    }

    #[test]
    fn list_selection_is_membership() {
        let selection = Selection::Many(vec!["A".to_string(), "B".to_string()]);
        assert!(selection.matches("A"));
        assert!(selection.matches("B"));
        assert!(!selection.matches("C"));
    }
}
