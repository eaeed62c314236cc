//! HeaderPack Engine
//!
//! Merges every header of a project directory into one self-contained
//! header. Local includes are spliced in at the line that names them and
//! each header's content is emitted exactly once.
//!
//! ## Modules
//!
//! - `registry` - Header discovery and entry-point classification
//! - `engine` - Two-pass amalgamation driver
//! - `traversal` - Explicit-stack inlining state machine
//! - `source` - Line readers for registry paths (disk or memory)
//! - `sink` - Ordered line output
//! - `packaging` - Output directories, binary copy, full pack pipeline
//! - `report` - Run summary

pub mod engine;
pub mod packaging;
pub mod registry;
pub mod report;
pub mod sink;
pub mod source;
mod traversal;

pub use engine::Amalgamator;
pub use packaging::{pack, prepare_outputs, PackOutcome};
pub use registry::{HeaderFile, HeaderRegistry};
pub use report::{AmalgamationReport, UnresolvedInclude};
pub use sink::OutputSink;
pub use source::{FsSource, HeaderSource, MemorySource};
