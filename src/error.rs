//! Error types for scanning.

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by a registry availability check.
#[derive(Error, Debug)]
pub enum OracleError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid registry URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("registry request for \"{name}\" failed: {source}")]
    Network {
        name: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected registry response for \"{name}\": HTTP {status}")]
    Protocol {
        name: String,
        status: reqwest::StatusCode,
    },
}

/// Errors that abort a scan.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("failed to parse manifest {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to walk {}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl ScanError {
    /// True for filesystem failures while listing, walking or reading.
    pub fn is_traversal(&self) -> bool {
        matches!(self, ScanError::Walk { .. } | ScanError::Io { .. })
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
