//! HeaderPack Parser
//!
//! Line-level understanding of header files: which lines are include
//! directives, and where a quoted include points on disk.
//!
//! ## Modules
//!
//! - `include` - Include directive scanner
//! - `resolver` - Include path resolution

pub mod include;
pub mod resolver;

pub use include::{IncludeDirective, IncludeScanner};
pub use resolver::{normalize_path, IncludeResolver};

#[cfg(test)]
mod tests;
