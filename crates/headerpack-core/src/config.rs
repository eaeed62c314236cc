//! Configuration types

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// HeaderPack configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackConfig {
    /// Extension of the files indexed by the registry (without the dot)
    pub header_extension: String,

    /// Token in the output binary path replaced by the output extension
    pub binary_placeholder: String,

    /// Directory that nested quoted includes are resolved against
    pub resolve_mode: ResolveMode,

    /// How entry-point headers are selected
    pub entry_points: EntryPointMode,

    /// Drop a UTF-8 byte-order mark at the start of each header
    pub strip_bom: bool,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            header_extension: "h".into(),
            binary_placeholder: "{gen_type}".into(),
            resolve_mode: ResolveMode::default(),
            entry_points: EntryPointMode::default(),
            strip_bom: true,
        }
    }
}

impl PackConfig {
    /// Parse a configuration from YAML text. Missing fields take their defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(text)
            .map_err(|e| Error::Config(format!("invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io_at(path, e))?;
        Self::from_yaml_str(&text)
    }

    /// Reject values no run could work with
    pub fn validate(&self) -> Result<()> {
        let ext = self.header_extension.trim_start_matches('.');
        if ext.is_empty() {
            return Err(Error::Config("header_extension must not be empty".into()));
        }
        if self.binary_placeholder.is_empty() {
            return Err(Error::Config("binary_placeholder must not be empty".into()));
        }
        Ok(())
    }

    /// Header extension without a leading dot
    pub fn extension(&self) -> &str {
        self.header_extension.trim_start_matches('.')
    }
}

/// Base directory for resolving a quoted include
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveMode {
    /// Relative to the entry header that started the traversal.
    /// Correct for flat, single-directory projects.
    #[default]
    EntryRoot,
    /// Relative to the file that contains the directive
    Includer,
}

/// Entry-point selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryPointMode {
    /// A header is an entry point when no other header includes it
    #[default]
    InDegree,
    /// Every header is an entry point; only the loaded flag orders output
    All,
}
