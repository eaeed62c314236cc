//! Include Directive Scanner
//!
//! Extracts the targets of local (`"quoted"`) include directives from header
//! text. Angle-bracket includes are recognised but never resolved.
//!
//! Lines are matched as raw bytes: headers in legacy encodings scan the same
//! as UTF-8 ones, and only a target name is ever decoded.

use headerpack_core::{Error, Result};
use regex::bytes::Regex;
use std::borrow::Cow;
use std::path::Path;
use tracing::debug;

/// UTF-8 byte-order mark
pub const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// An include directive found on a single line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncludeDirective<'a> {
    /// `#include "target"`
    Local(Cow<'a, str>),
    /// `#include <target>`
    System(Cow<'a, str>),
}

/// Scanner for include directives
#[derive(Debug, Clone)]
pub struct IncludeScanner {
    pattern: Regex,
}

impl IncludeScanner {
    /// Create a new scanner
    pub fn new() -> Self {
        Self {
            // Directive must open the line; anything after the first target is ignored
            pattern: Regex::new(r#"(?-u)^\s*#\s*include\s*(?:"([^"]+)"|<([^>]+)>)"#)
                .expect("include pattern is a valid regex"),
        }
    }

    /// Classify a single line
    pub fn parse_line<'a, L>(&self, line: &'a L) -> Option<IncludeDirective<'a>>
    where
        L: AsRef<[u8]> + ?Sized,
    {
        let line = line.as_ref();
        let line = line.strip_prefix(UTF8_BOM).unwrap_or(line);
        let caps = self.pattern.captures(line)?;
        if let Some(local) = caps.get(1) {
            return Some(IncludeDirective::Local(String::from_utf8_lossy(
                local.as_bytes(),
            )));
        }
        caps.get(2)
            .map(|system| IncludeDirective::System(String::from_utf8_lossy(system.as_bytes())))
    }

    /// Target of a quoted include on this line, if any
    pub fn local_target<'a, L>(&self, line: &'a L) -> Option<Cow<'a, str>>
    where
        L: AsRef<[u8]> + ?Sized,
    {
        match self.parse_line(line)? {
            IncludeDirective::Local(target) => Some(target),
            IncludeDirective::System(_) => None,
        }
    }

    /// Quoted include targets in file order
    pub fn scan_bytes(&self, text: &[u8]) -> Vec<String> {
        text.split(|&b| b == b'\n')
            .filter_map(|line| self.local_target(line))
            .map(Cow::into_owned)
            .collect()
    }

    /// Quoted include targets of UTF-8 text
    pub fn scan_str(&self, text: &str) -> Vec<String> {
        self.scan_bytes(text.as_bytes())
    }

    /// Quoted include targets of a header on disk
    pub fn scan_file(&self, path: &Path) -> Result<Vec<String>> {
        let bytes = std::fs::read(path).map_err(|e| Error::io_at(path, e))?;
        let includes = self.scan_bytes(&bytes);
        debug!("Scanned {:?}: {} local includes", path, includes.len());
        Ok(includes)
    }
}

impl Default for IncludeScanner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_and_system() {
        let scanner = IncludeScanner::new();
        assert_eq!(
            scanner.parse_line("#include \"b.h\""),
            Some(IncludeDirective::Local("b.h".into()))
        );
        assert_eq!(
            scanner.parse_line("#include <stdio.h>"),
            Some(IncludeDirective::System("stdio.h".into()))
        );
        assert_eq!(scanner.parse_line("int x;"), None);
    }

    #[test]
    fn test_scan_file_missing() {
        let scanner = IncludeScanner::new();
        let err = scanner.scan_file(Path::new("/nonexistent/dir/a.h")).unwrap_err();
        assert!(matches!(err, Error::PathIo { .. }));
    }
}
