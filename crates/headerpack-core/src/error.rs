//! Error types for HeaderPack

use std::path::PathBuf;
use thiserror::Error;

/// HeaderPack error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("IO error on {}: {source}", .path.display())]
    PathIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown project kind: {0}")]
    UnknownProjectKind(String),

    #[error("Header disappeared after scanning: {}", .0.display())]
    HeaderVanished(PathBuf),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Attach the path an I/O operation was acting on
    pub fn io_at(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::PathIo {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for HeaderPack
pub type Result<T> = std::result::Result<T, Error>;
