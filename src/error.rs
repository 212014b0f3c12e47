use std::path::PathBuf;

use thiserror::Error;

/// Failures of the SQLite catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to create catalog directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open catalog at {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("catalog query failed: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("catalog task panicked: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Failures that end a scan.
///
/// Unreadable subdirectories below the root never surface here; the walker
/// skips them and keeps going.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("cannot read scan root {path:?}: {source}")]
    Root {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("scan root {path:?} is not a directory")]
    NotADirectory { path: PathBuf },

    #[error("catalog write failed during scan: {0}")]
    Catalog(#[from] CatalogError),

    #[error("scan task panicked: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ScanError {
    /// Catalog write failures leave the index in an unknown state and must
    /// stop the process.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Catalog(_))
    }
}
