//! Source locations for diagnostics

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A line inside a header file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path
    pub file: PathBuf,
    /// Line number (1-based)
    pub line: u32,
}

impl Location {
    /// Create a new location
    pub fn new(file: impl Into<PathBuf>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// File path of this location
    pub fn file(&self) -> &Path {
        &self.file
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.line)
    }
}
