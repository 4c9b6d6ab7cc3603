//! Error types for install orchestration.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::egg::NamingError;
use crate::installed::ProbeError;

/// Errors that can occur while planning or executing install actions.
#[derive(Debug, Error)]
pub enum InstallError {
    /// Target prefix failed the pre-flight write check. Fatal; nothing has
    /// been fetched, removed, or installed.
    #[error("cannot write into prefix {path}: {source}")]
    PrefixNotWritable {
        path: PathBuf,
        source: io::Error,
    },

    /// Local egg cache directory could not be created.
    #[error("failed to create local egg cache {path}: {source}")]
    CacheDirFailed {
        path: PathBuf,
        source: io::Error,
    },

    /// A distribution could not be downloaded.
    #[error("failed to fetch {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    /// A downloaded egg did not match its published checksum.
    #[error("checksum mismatch for {filename}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        filename: String,
        expected: String,
        actual: String,
    },

    /// The external installer tool failed.
    #[error("installer failed for {filename}: {reason}")]
    ToolFailed { filename: String, reason: String },

    /// The history journal could not be opened or written.
    #[error("failed to write history journal at {path}: {source}")]
    HistoryFailed {
        path: PathBuf,
        source: io::Error,
    },

    /// A target distribution has a malformed filename.
    #[error(transparent)]
    Naming(#[from] NamingError),

    /// The installed set could not be read.
    #[error(transparent)]
    Probe(#[from] ProbeError),
}
