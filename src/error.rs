use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Catalog errors – fatal, raised before the prompt loop starts
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("metadata file not found at {}", .0.display())]
    MetadataNotFound(PathBuf),

    #[error("records directory not found at {}", .0.display())]
    RecordsDirNotFound(PathBuf),

    #[error("metadata table has no '{0}' column")]
    MissingKeyColumn(String),

    #[error("failed to read metadata table {}: {cause:#}", path.display())]
    Metadata { path: PathBuf, cause: anyhow::Error },

    #[error("failed to list {}: {source}", path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// WFDB record errors – recoverable, reported at the prompt
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum WfdbError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed header line {line}: {reason}")]
    Header { line: usize, reason: String },

    #[error("unsupported record: {0}")]
    Unsupported(String),

    #[error("{} holds {available} frames, header declares {expected}", path.display())]
    Truncated {
        path: PathBuf,
        expected: usize,
        available: usize,
    },

    #[error("record has {found} leads, expected {expected}")]
    LeadCountMismatch { expected: usize, found: usize },
}

pub type WfdbResult<T> = std::result::Result<T, WfdbError>;
