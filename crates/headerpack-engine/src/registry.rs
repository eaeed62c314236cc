//! Header Registry
//!
//! Indexes every header of the input directory by path and keeps the
//! per-header traversal state.

use headerpack_core::{EntryPointMode, Error, PackConfig, Result};
use headerpack_parser::{resolver::resolve_from, IncludeScanner};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// One discovered header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderFile {
    /// Absolute path, unique within the registry
    pub path: PathBuf,
    /// Quoted include targets as written, in file order
    pub raw_includes: Vec<String>,
    /// No other header includes this one
    pub is_entry_point: bool,
    /// Content has started being copied to the output
    pub loaded: bool,
}

impl HeaderFile {
    /// Create an unloaded header. Entry-point status is settled by the registry.
    pub fn new(path: PathBuf, raw_includes: Vec<String>) -> Self {
        Self {
            path,
            raw_includes,
            is_entry_point: true,
            loaded: false,
        }
    }

    /// Scan a header on disk
    pub fn scan(path: &Path, scanner: &IncludeScanner) -> Result<Self> {
        let raw_includes = scanner.scan_file(path)?;
        Ok(Self::new(path.to_path_buf(), raw_includes))
    }

    /// Include targets resolved against this header's own directory
    pub fn resolved_includes(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.raw_includes
            .iter()
            .map(move |target| resolve_from(&self.path, target))
    }
}

/// Path-indexed set of headers, in directory order
#[derive(Debug, Default)]
pub struct HeaderRegistry {
    headers: Vec<HeaderFile>,
    index: HashMap<PathBuf, usize>,
    /// Other paths naming an indexed header: its canonical path and symlinks to it
    aliases: HashMap<PathBuf, usize>,
}

impl HeaderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from already-scanned headers and classify entry points
    pub fn from_headers(headers: Vec<HeaderFile>, mode: EntryPointMode) -> Self {
        let mut registry = Self::new();
        for header in headers {
            registry.insert(header);
        }
        registry.classify_entry_points(mode);
        registry
    }

    /// Index every header directly inside `dir` (no recursion).
    ///
    /// Headers are ordered by file name. Entries resolving to the same
    /// file are one header: the first in directory order is kept and the
    /// rest become aliases of it. `exclude` drops a path from the scan,
    /// used to keep a previous merged output out of its own input.
    pub fn scan_dir(dir: &Path, config: &PackConfig, exclude: Option<&Path>) -> Result<Self> {
        let dir = std::fs::canonicalize(dir).map_err(|e| Error::io_at(dir, e))?;
        let extension = config.extension();

        let mut seen = HashSet::new();
        let mut paths = Vec::new();
        let mut duplicates = Vec::new();
        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| Error::Io(e.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let matches = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext == extension)
                .unwrap_or(false);
            if !matches || exclude == Some(path) {
                continue;
            }
            let canonical = std::fs::canonicalize(path).map_err(|e| Error::io_at(path, e))?;
            if exclude == Some(canonical.as_path()) {
                continue;
            }
            if seen.insert(canonical.clone()) {
                paths.push((path.to_path_buf(), canonical));
            } else {
                debug!("{:?} names the same file as an earlier header", path);
                duplicates.push((path.to_path_buf(), canonical));
            }
        }

        info!("Found {} headers in {:?}", paths.len(), dir);

        let scanner = IncludeScanner::new();
        let headers = paths
            .par_iter()
            .map(|(path, _)| HeaderFile::scan(path, &scanner))
            .collect::<Result<Vec<_>>>()?;

        let mut registry = Self::new();
        for header in headers {
            registry.insert(header);
        }
        for (path, canonical) in paths {
            if path != canonical {
                registry.add_alias(canonical, &path);
            }
        }
        for (path, canonical) in duplicates {
            registry.add_alias(path, &canonical);
        }
        registry.classify_entry_points(config.entry_points);
        Ok(registry)
    }

    /// Let `alias` name the header already indexed under `target`.
    /// Returns that header's index, or `None` if `target` is unknown.
    pub fn add_alias(&mut self, alias: PathBuf, target: &Path) -> Option<usize> {
        let idx = self.index_of(target)?;
        if !self.index.contains_key(&alias) {
            self.aliases.insert(alias, idx);
        }
        Some(idx)
    }

    /// Add a header, replacing any header with the same path. Returns its index.
    pub fn insert(&mut self, header: HeaderFile) -> usize {
        if let Some(&idx) = self.index.get(&header.path) {
            self.headers[idx] = header;
            return idx;
        }
        let idx = self.headers.len();
        self.index.insert(header.path.clone(), idx);
        self.headers.push(header);
        idx
    }

    /// Recompute `is_entry_point` for every header. Returns the entry-point count.
    ///
    /// With [`EntryPointMode::InDegree`] a header stops being an entry point
    /// as soon as another header's resolved include names it.
    pub fn classify_entry_points(&mut self, mode: EntryPointMode) -> usize {
        for header in &mut self.headers {
            header.is_entry_point = true;
        }

        if mode == EntryPointMode::InDegree {
            let mut included = vec![false; self.headers.len()];
            for (from, header) in self.headers.iter().enumerate() {
                for target in header.resolved_includes() {
                    match self.index_of(&target) {
                        Some(to) if to != from => included[to] = true,
                        _ => {}
                    }
                }
            }
            for (header, included) in self.headers.iter_mut().zip(included) {
                header.is_entry_point = !included;
            }
        }

        let count = self.headers.iter().filter(|h| h.is_entry_point).count();
        if count == 0 && !self.headers.is_empty() {
            warn!(
                "No entry-point header among {} headers: likely circular include structure",
                self.headers.len()
            );
        } else {
            debug!("{} of {} headers are entry points", count, self.headers.len());
        }
        count
    }

    /// Index of a header by path or alias
    pub fn index_of(&self, path: &Path) -> Option<usize> {
        self.index
            .get(path)
            .or_else(|| self.aliases.get(path))
            .copied()
    }

    /// Get a header by path
    pub fn get(&self, path: &Path) -> Option<&HeaderFile> {
        self.index_of(path).map(|idx| &self.headers[idx])
    }

    /// Get a header by index
    pub fn header(&self, idx: usize) -> &HeaderFile {
        &self.headers[idx]
    }

    /// Whether the header at `idx` has been emitted
    pub fn is_loaded(&self, idx: usize) -> bool {
        self.headers[idx].loaded
    }

    /// Mark a header loaded. Returns false if it already was.
    pub fn mark_loaded(&mut self, idx: usize) -> bool {
        let header = &mut self.headers[idx];
        if header.loaded {
            return false;
        }
        header.loaded = true;
        true
    }

    /// Clear every loaded flag so the registry can drive another run
    pub fn reset_loaded(&mut self) {
        for header in &mut self.headers {
            header.loaded = false;
        }
    }

    /// Entry-point indices in directory order
    pub fn entry_points(&self) -> Vec<usize> {
        self.indices_where(|h| h.is_entry_point)
    }

    /// Indices of headers not yet emitted, in directory order
    pub fn unloaded(&self) -> Vec<usize> {
        self.indices_where(|h| !h.loaded)
    }

    /// Every header has been emitted
    pub fn all_loaded(&self) -> bool {
        self.headers.iter().all(|h| h.loaded)
    }

    /// Iterate headers in directory order
    pub fn iter(&self) -> impl Iterator<Item = &HeaderFile> {
        self.headers.iter()
    }

    /// Number of headers
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    fn indices_where(&self, pred: impl Fn(&HeaderFile) -> bool) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .filter(|(_, h)| pred(h))
            .map(|(idx, _)| idx)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn header(path: &str, includes: &[&str]) -> HeaderFile {
        HeaderFile::new(
            PathBuf::from(path),
            includes.iter().map(|s| s.to_string()).collect(),
        )
    }

    fn entry_names(registry: &HeaderRegistry) -> Vec<String> {
        registry
            .entry_points()
            .into_iter()
            .map(|idx| registry.header(idx).path.display().to_string())
            .collect()
    }

    #[test]
    fn test_in_degree_classification() {
        let registry = HeaderRegistry::from_headers(
            vec![
                header("/p/a.h", &["b.h", "missing.h"]),
                header("/p/b.h", &["c.h"]),
                header("/p/c.h", &[]),
                header("/p/d.h", &["./c.h"]),
            ],
            EntryPointMode::InDegree,
        );
        assert_eq!(entry_names(&registry), vec!["/p/a.h", "/p/d.h"]);
    }

    #[test]
    fn test_self_include_keeps_entry_point() {
        let registry =
            HeaderRegistry::from_headers(vec![header("/p/a.h", &["a.h"])], EntryPointMode::InDegree);
        assert_eq!(entry_names(&registry), vec!["/p/a.h"]);
    }

    #[test]
    fn test_full_cycle_has_no_entry_point() {
        let mut registry = HeaderRegistry::from_headers(
            vec![header("/p/a.h", &["b.h"]), header("/p/b.h", &["a.h"])],
            EntryPointMode::InDegree,
        );
        assert!(registry.entry_points().is_empty());
        assert_eq!(registry.classify_entry_points(EntryPointMode::All), 2);
    }

    #[test]
    fn test_loaded_transitions_once() {
        let mut registry =
            HeaderRegistry::from_headers(vec![header("/p/a.h", &[])], EntryPointMode::InDegree);
        assert!(registry.mark_loaded(0));
        assert!(!registry.mark_loaded(0));
        assert!(registry.all_loaded());
        registry.reset_loaded();
        assert_eq!(registry.unloaded(), vec![0]);
    }

    #[test]
    fn test_scan_dir_is_flat_and_sorted() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("nested")).unwrap();
        fs::write(root.join("zeta.h"), "#include \"alpha.h\"\n").unwrap();
        fs::write(root.join("alpha.h"), "int alpha;\n").unwrap();
        fs::write(root.join("notes.txt"), "#include \"alpha.h\"\n").unwrap();
        fs::write(root.join("nested/deep.h"), "int deep;\n").unwrap();

        let registry = HeaderRegistry::scan_dir(root, &PackConfig::default(), None).unwrap();
        let names: Vec<_> = registry
            .iter()
            .map(|h| h.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["alpha.h", "zeta.h"]);

        let canonical = fs::canonicalize(root).unwrap();
        assert!(registry.get(&canonical.join("zeta.h")).unwrap().is_entry_point);
        assert!(!registry.get(&canonical.join("alpha.h")).unwrap().is_entry_point);
    }

    #[test]
    fn test_scan_dir_excludes_output() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.h"), "int a;\n").unwrap();
        fs::write(dir.path().join("merged.h"), "int a;\n").unwrap();

        let canonical = fs::canonicalize(dir.path()).unwrap();
        let merged = canonical.join("merged.h");
        let registry =
            HeaderRegistry::scan_dir(dir.path(), &PackConfig::default(), Some(&merged)).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.get(&merged).is_none());
    }

    #[test]
    fn test_scan_dir_missing() {
        let err = HeaderRegistry::scan_dir(Path::new("/nonexistent/headers"), &PackConfig::default(), None)
            .unwrap_err();
        assert!(matches!(err, Error::PathIo { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_dir_symlink_alias_is_one_header() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::write(root.join("a.h"), "#include \"common.h\"\n").unwrap();
        fs::write(root.join("b.h"), "#include \"compat.h\"\n").unwrap();
        fs::write(root.join("common.h"), "int common;\n").unwrap();
        std::os::unix::fs::symlink(root.join("common.h"), root.join("compat.h")).unwrap();

        let registry = HeaderRegistry::scan_dir(root, &PackConfig::default(), None).unwrap();
        assert_eq!(registry.len(), 3);

        let canonical = fs::canonicalize(root).unwrap();
        let common = registry.index_of(&canonical.join("common.h")).unwrap();
        assert_eq!(registry.index_of(&canonical.join("compat.h")), Some(common));
        assert!(!registry.header(common).is_entry_point);
        assert_eq!(
            entry_names(&registry),
            vec![
                canonical.join("a.h").display().to_string(),
                canonical.join("b.h").display().to_string(),
            ]
        );
    }

    #[test]
    fn test_alias_requires_known_target() {
        let mut registry =
            HeaderRegistry::from_headers(vec![header("/p/a.h", &[])], EntryPointMode::InDegree);
        assert_eq!(registry.add_alias(PathBuf::from("/p/alias.h"), Path::new("/p/a.h")), Some(0));
        assert_eq!(registry.add_alias(PathBuf::from("/p/x.h"), Path::new("/p/none.h")), None);
        assert_eq!(registry.index_of(Path::new("/p/alias.h")), Some(0));
        assert_eq!(registry.len(), 1);
    }
}
