//! Run report

use headerpack_core::Location;
use serde::Serialize;
use std::path::PathBuf;

/// An include whose target is not in the registry; kept verbatim in the output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedInclude {
    /// Where the directive was written
    pub location: Location,
    /// Target as written between the quotes
    pub target: String,
    /// Path it resolved to
    pub resolved: PathBuf,
}

/// Summary of one amalgamation run
#[derive(Debug, Clone, Default, Serialize)]
pub struct AmalgamationReport {
    /// Entry-point headers, in directory order
    pub entry_points: Vec<PathBuf>,
    /// Headers only reached by the sweep pass
    pub swept: Vec<PathBuf>,
    /// Every header in the order its content started in the output
    pub emitted: Vec<PathBuf>,
    pub unresolved: Vec<UnresolvedInclude>,
    /// Include lines dropped because their target was already emitted
    pub dropped_includes: usize,
    pub lines_written: usize,
    /// The registry had headers but none qualified as an entry point
    pub no_entry_point: bool,
}

impl AmalgamationReport {
    /// Number of headers emitted
    pub fn headers_emitted(&self) -> usize {
        self.emitted.len()
    }

    /// Pretty JSON rendering
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
