// Store collection paths

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionPath {
    /// Default log source.
    OnshapeLogs,
    /// User-uploaded log files.
    UploadedLogs,
    /// Glossary content; declared for completeness, unused by the transform core.
    GlossaryWords,
}

impl CollectionPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionPath::OnshapeLogs => "/onShapeLogs",
            CollectionPath::UploadedLogs => "/uploaded-jsons",
            CollectionPath::GlossaryWords => "/base-glossary-words",
        }
    }

    /// Path without the leading slash, usable as a file stem.
    pub fn file_stem(&self) -> &'static str {
        match self {
            CollectionPath::OnshapeLogs => "onShapeLogs",
            CollectionPath::UploadedLogs => "uploaded-jsons",
            CollectionPath::GlossaryWords => "base-glossary-words",
        }
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
