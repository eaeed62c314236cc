//! Core data types

use crate::{Error, PackConfig, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Kind of project whose outputs are being packaged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectKind {
    /// A final executable; nothing is published
    Application,
    StaticLibrary,
    DynamicLibrary,
}

impl ProjectKind {
    /// Whether a merged header and binary are published for this kind
    pub fn publishes_header(&self) -> bool {
        !matches!(self, ProjectKind::Application)
    }
}

impl FromStr for ProjectKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "application" | "app" => Ok(ProjectKind::Application),
            "staticlibrary" | "static" | "library" | "lib" => Ok(ProjectKind::StaticLibrary),
            "dynamiclibrary" | "dynamic" | "shared" => Ok(ProjectKind::DynamicLibrary),
            _ => Err(Error::UnknownProjectKind(s.to_string())),
        }
    }
}

impl std::fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ProjectKind::Application => "Application",
            ProjectKind::StaticLibrary => "StaticLibrary",
            ProjectKind::DynamicLibrary => "DynamicLibrary",
        };
        f.write_str(name)
    }
}

/// A fully resolved packaging request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackRequest {
    pub project_kind: ProjectKind,
    /// Prebuilt binary copied next to the merged header
    pub binary_path: PathBuf,
    /// Directory whose headers are merged
    pub input_dir: PathBuf,
    /// Merged header file to write
    pub output_header: PathBuf,
    /// Binary destination with the placeholder already substituted
    pub output_binary: PathBuf,
    /// Output extension without its leading separator
    pub output_extension: String,
}

impl PackRequest {
    /// Build a request from raw invocation values.
    ///
    /// `output_extension` loses one leading `.`; every occurrence of the
    /// configured placeholder in `output_binary` is replaced by it.
    pub fn new(
        project_kind: &str,
        binary_path: impl Into<PathBuf>,
        input_dir: impl Into<PathBuf>,
        output_header: impl Into<PathBuf>,
        output_binary: &str,
        output_extension: &str,
        config: &PackConfig,
    ) -> Result<Self> {
        let project_kind = project_kind.parse()?;

        let ext = strip_extension_separator(output_extension);
        if ext.is_empty() {
            return Err(Error::Config(format!(
                "output extension '{}' is empty",
                output_extension
            )));
        }

        let output_binary = output_binary.replace(config.binary_placeholder.as_str(), ext);

        Ok(Self {
            project_kind,
            binary_path: binary_path.into(),
            input_dir: input_dir.into(),
            output_header: output_header.into(),
            output_binary: PathBuf::from(output_binary),
            output_extension: ext.to_string(),
        })
    }

    /// Check the inputs exist before anything is written
    pub fn validate(&self) -> Result<()> {
        if !self.binary_path.is_file() {
            return Err(Error::Config(format!(
                "binary artifact not found: {}",
                self.binary_path.display()
            )));
        }
        if !self.input_dir.is_dir() {
            return Err(Error::Config(format!(
                "input directory not found: {}",
                self.input_dir.display()
            )));
        }
        if self.output_header.file_name().is_none() {
            return Err(Error::Config(format!(
                "output header path has no file name: {}",
                self.output_header.display()
            )));
        }
        if self.output_binary.file_name().is_none() {
            return Err(Error::Config(format!(
                "output binary path has no file name: {}",
                self.output_binary.display()
            )));
        }
        Ok(())
    }
}

fn strip_extension_separator(ext: &str) -> &str {
    let ext = ext.trim();
    ext.strip_prefix('.').unwrap_or(ext)
}
