//! HeaderPack Core
//!
//! Core types shared by the header amalgamation engine and its CLI.

pub mod config;
pub mod error;
pub mod location;
pub mod types;

pub use config::{EntryPointMode, PackConfig, ResolveMode};
pub use error::{Error, Result};
pub use location::Location;
pub use types::*;
