// Action type value object

use serde::{Deserialize, Serialize};

/// Action labels counted as advanced; everything else is basic.
pub const ADVANCED_ACTIONS: [&str; 4] = ["Edit", "Create", "Delete", "Add"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActionType {
    Advanced,
    Basic,
}

impl ActionType {
    pub fn classify(action: &str) -> Self {
        if ADVANCED_ACTIONS.contains(&action) {
            ActionType::Advanced
        } else {
            ActionType::Basic
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Advanced => "Advanced",
            ActionType::Basic => "Basic",
        }
    }
}
