//! Include Path Resolver
//!
//! Joins a quoted include target onto its base directory. Resolution is
//! purely lexical so it can run against paths that no longer (or never did)
//! exist on disk.

use headerpack_core::ResolveMode;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Resolves quoted include targets to registry paths
#[derive(Debug, Clone, Copy, Default)]
pub struct IncludeResolver {
    mode: ResolveMode,
}

impl IncludeResolver {
    /// Create a resolver with the given base-directory policy
    pub fn new(mode: ResolveMode) -> Self {
        Self { mode }
    }

    /// Get the resolution mode
    pub fn mode(&self) -> ResolveMode {
        self.mode
    }

    /// Resolve `target` as written inside `includer`, during a traversal
    /// that started at `root`.
    pub fn resolve(&self, target: &str, root: &Path, includer: &Path) -> PathBuf {
        let anchor = match self.mode {
            ResolveMode::EntryRoot => root,
            ResolveMode::Includer => includer,
        };
        let resolved = resolve_from(anchor, target);
        debug!("Resolved \"{}\" from {:?} to {:?}", target, anchor, resolved);
        resolved
    }
}

/// Resolve `target` relative to the directory containing `file`
pub fn resolve_from(file: &Path, target: &str) -> PathBuf {
    let base = file.parent().unwrap_or_else(|| Path::new(""));
    normalize_path(&base.join(target))
}

/// Fold `.` and `..` components without touching the file system
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `..` above the root stays at the root
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }

    out.iter().map(|c| c.as_os_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_path(Path::new("/a/./b/../c.h")), PathBuf::from("/a/c.h"));
        assert_eq!(normalize_path(Path::new("/../a.h")), PathBuf::from("/a.h"));
        assert_eq!(normalize_path(Path::new("../x/a.h")), PathBuf::from("../x/a.h"));
    }

    #[test]
    fn test_entry_root_mode_ignores_includer_dir() {
        let resolver = IncludeResolver::new(ResolveMode::EntryRoot);
        let resolved = resolver.resolve("b.h", Path::new("/p/a.h"), Path::new("/p/sub/c.h"));
        assert_eq!(resolved, PathBuf::from("/p/b.h"));
    }

    #[test]
    fn test_includer_mode_follows_open_file() {
        let resolver = IncludeResolver::new(ResolveMode::Includer);
        let resolved = resolver.resolve("b.h", Path::new("/p/a.h"), Path::new("/p/sub/c.h"));
        assert_eq!(resolved, PathBuf::from("/p/sub/b.h"));
    }
}
