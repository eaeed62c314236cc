//! Amalgamation Engine
//!
//! Two passes over the registry: entry points first, then a sweep of
//! whatever is still unloaded, so headers caught in a cycle with no
//! outside root still make it into the output exactly once.

use crate::registry::HeaderRegistry;
use crate::report::AmalgamationReport;
use crate::sink::OutputSink;
use crate::source::HeaderSource;
use crate::traversal::Traversal;
use headerpack_core::{Error, PackConfig, Result};
use headerpack_parser::{IncludeResolver, IncludeScanner};
use std::io::Write;
use tracing::{debug, info};

/// Merges registry headers into an output sink
pub struct Amalgamator {
    scanner: IncludeScanner,
    resolver: IncludeResolver,
    strip_bom: bool,
}

impl Amalgamator {
    /// Create an amalgamator with the default configuration
    pub fn new() -> Self {
        Self::with_config(&PackConfig::default())
    }

    /// Create an amalgamator for a configuration
    pub fn with_config(config: &PackConfig) -> Self {
        Self {
            scanner: IncludeScanner::new(),
            resolver: IncludeResolver::new(config.resolve_mode),
            strip_bom: config.strip_bom,
        }
    }

    /// Write every registry header into `sink`.
    ///
    /// Fails only on I/O errors; unresolved includes and a missing entry
    /// point are reported, not fatal.
    pub fn amalgamate<S, W>(
        &self,
        registry: &mut HeaderRegistry,
        source: &S,
        sink: &mut OutputSink<W>,
    ) -> Result<AmalgamationReport>
    where
        S: HeaderSource,
        W: Write,
    {
        let lines_before = sink.lines_written();
        let entry_points = registry.entry_points();
        let no_entry_point = entry_points.is_empty() && !registry.is_empty();

        let mut traversal = Traversal::new(
            registry,
            source,
            sink,
            &self.scanner,
            self.resolver,
            self.strip_bom,
        );

        // Entry pass
        for &idx in &entry_points {
            traversal.inline(idx)?;
        }

        // Sweep pass
        for idx in traversal.registry().unloaded() {
            let path = traversal.registry().header(idx).path.clone();
            if traversal.inline(idx)? {
                debug!("Swept unreached header {:?}", path);
                traversal.report_mut().swept.push(path);
            }
        }

        if !traversal.registry().all_loaded() {
            return Err(Error::Other(
                "amalgamation finished with headers left unemitted".into(),
            ));
        }

        let mut report = traversal.into_report();
        report.entry_points = entry_points
            .iter()
            .map(|&idx| registry.header(idx).path.clone())
            .collect();
        report.no_entry_point = no_entry_point;
        report.lines_written = sink.lines_written() - lines_before;

        info!(
            "Merged {} headers ({} entry points, {} swept), {} lines written",
            report.headers_emitted(),
            report.entry_points.len(),
            report.swept.len(),
            report.lines_written
        );

        Ok(report)
    }
}

impl Default for Amalgamator {
    fn default() -> Self {
        Self::new()
    }
}
