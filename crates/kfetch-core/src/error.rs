//! Typed failures that callers may want to match on.
//!
//! I/O, JSON, zip and curl failures are not listed here; they travel as
//! `anyhow::Error` with context attached at the call site.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// More than one file was requested from a competition.
    #[error("downloading more than one competition file is not supported (requested: {})", .0.join(", "))]
    MultipleFilesUnsupported(Vec<String>),

    /// Datasets are downloaded whole; a file filter has no meaning for them.
    #[error("dataset {dataset} cannot be filtered to a single file ({file:?})")]
    DatasetFileFilter { dataset: String, file: String },

    /// A data identifier had no usable path segments.
    #[error("invalid data identifier {0:?}: {1}")]
    InvalidIdentifier(String, &'static str),

    /// Kernel reference was not of the form `owner/slug`.
    #[error("invalid kernel reference {0:?}: expected owner/slug")]
    InvalidKernelRef(String),

    /// Competition download finished but the expected archive is absent.
    #[error("expected archive not found at {0}")]
    MissingArchive(String),

    #[error("Kaggle credentials not found: set KAGGLE_USERNAME and KAGGLE_KEY or create {0}")]
    MissingCredentials(String),

    #[error("GET {url} returned HTTP {status}")]
    Http { status: u32, url: String },

    #[error("no index entry named {name:?} (available: {})", .available.join(", "))]
    UnknownIndexEntry { name: String, available: Vec<String> },
}
