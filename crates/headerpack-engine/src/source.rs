//! Header sources
//!
//! The engine reads headers only through [`HeaderSource`], so traversal can
//! run against the file system or against in-memory text.

use crate::registry::{HeaderFile, HeaderRegistry};
use headerpack_core::{EntryPointMode, Error, Result};
use headerpack_parser::IncludeScanner;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};

/// Opens line readers for registry paths
pub trait HeaderSource {
    type Reader: BufRead;

    /// Open a header for reading from its first line
    fn open(&self, path: &Path) -> Result<Self::Reader>;

    /// Canonical form of `path`, if the source can tell
    fn canonical(&self, _path: &Path) -> Option<PathBuf> {
        None
    }
}

/// Reads headers from disk
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSource;

impl HeaderSource for FsSource {
    type Reader = BufReader<File>;

    fn open(&self, path: &Path) -> Result<Self::Reader> {
        match File::open(path) {
            Ok(file) => Ok(BufReader::new(file)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::HeaderVanished(path.to_path_buf()))
            }
            Err(e) => Err(Error::io_at(path, e)),
        }
    }

    fn canonical(&self, path: &Path) -> Option<PathBuf> {
        std::fs::canonicalize(path).ok()
    }
}

/// Serves header bytes held in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: BTreeMap<PathBuf, Vec<u8>>,
}

impl MemorySource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a header
    pub fn insert(&mut self, path: impl Into<PathBuf>, text: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), text.into());
    }

    /// Builder form of [`MemorySource::insert`]
    pub fn with(mut self, path: impl Into<PathBuf>, text: impl Into<Vec<u8>>) -> Self {
        self.insert(path, text);
        self
    }

    /// Remove a header, as if it was deleted after scanning
    pub fn remove(&mut self, path: &Path) -> Option<Vec<u8>> {
        self.files.remove(path)
    }

    /// Scan every held header into a registry, ordered by path
    pub fn build_registry(&self, mode: EntryPointMode) -> HeaderRegistry {
        let scanner = IncludeScanner::new();
        let headers = self
            .files
            .iter()
            .map(|(path, text)| HeaderFile::new(path.clone(), scanner.scan_bytes(text)))
            .collect();
        HeaderRegistry::from_headers(headers, mode)
    }
}

impl HeaderSource for MemorySource {
    type Reader = Cursor<Vec<u8>>;

    fn open(&self, path: &Path) -> Result<Self::Reader> {
        self.files
            .get(path)
            .map(|text| Cursor::new(text.clone()))
            .ok_or_else(|| Error::HeaderVanished(path.to_path_buf()))
    }
}
