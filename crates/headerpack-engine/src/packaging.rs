//! Packaging
//!
//! File-system side effects of a run: output directories, the binary
//! copy, and opening the merged header. These all happen before the
//! engine starts so traversal itself only moves lines.

use crate::engine::Amalgamator;
use crate::registry::HeaderRegistry;
use crate::report::AmalgamationReport;
use crate::sink::OutputSink;
use crate::source::FsSource;
use headerpack_core::{Error, PackConfig, PackRequest, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// What a pack run did
#[derive(Debug)]
pub enum PackOutcome {
    /// Applications publish nothing
    Skipped,
    /// Header merged and binary copied
    Packed(AmalgamationReport),
}

/// Run a complete packaging request
///
/// The request is validated for every project kind, so a bad invocation
/// fails the same way whether or not it would publish anything.
pub fn pack(request: &PackRequest, config: &PackConfig) -> Result<PackOutcome> {
    config.validate()?;
    request.validate()?;

    if !request.project_kind.publishes_header() {
        info!("{} project: nothing to package", request.project_kind);
        return Ok(PackOutcome::Skipped);
    }

    let exclude = output_in_input(request);
    let mut registry =
        HeaderRegistry::scan_dir(&request.input_dir, config, exclude.as_deref())?;

    let mut sink = prepare_outputs(request)?;
    let report = Amalgamator::with_config(config).amalgamate(&mut registry, &FsSource, &mut sink)?;
    sink.finish()?;

    info!("Wrote {:?}", request.output_header);
    Ok(PackOutcome::Packed(report))
}

/// Create output directories, copy the binary, and open the merged header
pub fn prepare_outputs(request: &PackRequest) -> Result<OutputSink<File>> {
    create_parent_dir(&request.output_header)?;
    create_parent_dir(&request.output_binary)?;

    if same_file(&request.binary_path, &request.output_binary) {
        debug!("Binary already at {:?}, not copying", request.output_binary);
    } else {
        fs::copy(&request.binary_path, &request.output_binary)
            .map_err(|e| Error::io_at(&request.output_binary, e))?;
        info!(
            "Copied {:?} to {:?}",
            request.binary_path, request.output_binary
        );
    }

    let file = File::create(&request.output_header)
        .map_err(|e| Error::io_at(&request.output_header, e))?;
    Ok(OutputSink::new(file))
}

fn create_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| Error::io_at(parent, e))
        }
        _ => Ok(()),
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Registry path of the output header, if it would land in the input directory
fn output_in_input(request: &PackRequest) -> Option<PathBuf> {
    let name = request.output_header.file_name()?;
    let parent = match request.output_header.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let parent = fs::canonicalize(parent).ok()?;
    let input = fs::canonicalize(&request.input_dir).ok()?;
    (parent == input).then(|| parent.join(name))
}
