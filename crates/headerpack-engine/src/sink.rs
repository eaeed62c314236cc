//! Output Sink
//!
//! Ordered line stream receiving the merged header.

use headerpack_core::{Error, Result};
use std::io::{BufWriter, Write};

/// Writes lines in call order, each terminated by `\n`
pub struct OutputSink<W: Write> {
    writer: BufWriter<W>,
    lines_written: usize,
}

impl<W: Write> OutputSink<W> {
    /// Wrap a writer
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            lines_written: 0,
        }
    }

    /// Append one line verbatim
    pub fn write_line(&mut self, line: &[u8]) -> Result<()> {
        self.writer.write_all(line)?;
        self.writer.write_all(b"\n")?;
        self.lines_written += 1;
        Ok(())
    }

    /// Lines written so far
    pub fn lines_written(&self) -> usize {
        self.lines_written
    }

    /// Flush and hand back the underlying writer
    pub fn finish(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))
    }
}
