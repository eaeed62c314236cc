//! Inlining traversal
//!
//! Splices headers into the output with an explicit stack of paused
//! readers. Meeting an unloaded local include pauses the current reader,
//! pushes it back, and starts the included header; once that header (and
//! anything it pulls in) is exhausted, the paused reader resumes on the
//! line after the directive.

use crate::registry::HeaderRegistry;
use crate::report::{AmalgamationReport, UnresolvedInclude};
use crate::sink::OutputSink;
use crate::source::HeaderSource;
use headerpack_core::{Error, Location, Result};
use headerpack_parser::include::UTF8_BOM;
use headerpack_parser::{IncludeResolver, IncludeScanner};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A header being read, with its resume point
struct Frame<R> {
    path: PathBuf,
    reader: R,
    line_no: u32,
}

impl<R: BufRead> Frame<R> {
    fn new(path: PathBuf, reader: R) -> Self {
        Self {
            path,
            reader,
            line_no: 0,
        }
    }

    /// Next raw line without its `\n` or `\r\n` terminator.
    /// Bytes are not required to be UTF-8.
    fn next_line(&mut self, strip_bom: bool) -> Result<Option<Vec<u8>>> {
        let mut line = Vec::new();
        let read = self
            .reader
            .read_until(b'\n', &mut line)
            .map_err(|e| Error::io_at(&self.path, e))?;
        if read == 0 {
            return Ok(None);
        }
        self.line_no += 1;

        if line.last() == Some(&b'\n') {
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
        }
        if strip_bom && self.line_no == 1 && line.starts_with(UTF8_BOM) {
            line.drain(..UTF8_BOM.len());
        }
        Ok(Some(line))
    }
}

/// Traversal state for one amalgamation run
pub(crate) struct Traversal<'a, S: HeaderSource, W: Write> {
    registry: &'a mut HeaderRegistry,
    source: &'a S,
    sink: &'a mut OutputSink<W>,
    scanner: &'a IncludeScanner,
    resolver: IncludeResolver,
    strip_bom: bool,
    stack: Vec<Frame<S::Reader>>,
    report: AmalgamationReport,
}

impl<'a, S: HeaderSource, W: Write> Traversal<'a, S, W> {
    pub(crate) fn new(
        registry: &'a mut HeaderRegistry,
        source: &'a S,
        sink: &'a mut OutputSink<W>,
        scanner: &'a IncludeScanner,
        resolver: IncludeResolver,
        strip_bom: bool,
    ) -> Self {
        Self {
            registry,
            source,
            sink,
            scanner,
            resolver,
            strip_bom,
            stack: Vec::new(),
            report: AmalgamationReport::default(),
        }
    }

    pub(crate) fn registry(&self) -> &HeaderRegistry {
        &*self.registry
    }

    pub(crate) fn report_mut(&mut self) -> &mut AmalgamationReport {
        &mut self.report
    }

    pub(crate) fn into_report(self) -> AmalgamationReport {
        self.report
    }

    /// Emit `root` and, transitively, every unloaded header it includes.
    /// Returns false if `root` was already loaded.
    pub(crate) fn inline(&mut self, root: usize) -> Result<bool> {
        if !self.registry.mark_loaded(root) {
            return Ok(false);
        }
        let root_path = self.registry.header(root).path.clone();
        debug!("Inlining from {:?}", root_path);
        self.push_header(root_path.clone())?;

        'frames: while let Some(mut frame) = self.stack.pop() {
            while let Some(line) = frame.next_line(self.strip_bom)? {
                let Some(target) = self.scanner.local_target(&line[..]) else {
                    self.sink.write_line(&line)?;
                    continue;
                };

                let resolved = self.resolver.resolve(&target, &root_path, &frame.path);
                match self.lookup(&resolved) {
                    Some(idx) if !self.registry.is_loaded(idx) => {
                        self.registry.mark_loaded(idx);
                        self.stack.push(frame);
                        let path = self.registry.header(idx).path.clone();
                        self.push_header(path)?;
                        continue 'frames;
                    }
                    Some(_) => {
                        debug!(
                            "{}:{}: dropping include of already emitted {:?}",
                            frame.path.display(),
                            frame.line_no,
                            resolved
                        );
                        self.report.dropped_includes += 1;
                    }
                    None => {
                        let location = Location::new(frame.path.clone(), frame.line_no);
                        warn!(
                            "{}: unresolved include \"{}\" ({}) kept verbatim",
                            location,
                            target,
                            resolved.display()
                        );
                        self.report.unresolved.push(UnresolvedInclude {
                            location,
                            target: target.into_owned(),
                            resolved,
                        });
                        self.sink.write_line(&line)?;
                    }
                }
            }
            // Exhausted: the frame and its reader are dropped here
        }

        Ok(true)
    }

    /// Registry index of a resolved include. Falls back to the canonical
    /// path so a symlinked alias finds the header it points at.
    fn lookup(&self, resolved: &Path) -> Option<usize> {
        self.registry.index_of(resolved).or_else(|| {
            self.source
                .canonical(resolved)
                .and_then(|canonical| self.registry.index_of(&canonical))
        })
    }

    fn push_header(&mut self, path: PathBuf) -> Result<()> {
        let reader = self.source.open(&path)?;
        self.report.emitted.push(path.clone());
        self.stack.push(Frame::new(path, reader));
        Ok(())
    }

    /// Current include nesting depth
    #[cfg(test)]
    pub(crate) fn depth(&self) -> usize {
        self.stack.len()
    }
}
