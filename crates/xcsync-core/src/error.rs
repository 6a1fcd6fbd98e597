//! Error types for xcsync-core

use std::path::PathBuf;

/// Result type for xcsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in xcsync-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The manifest or source root does not exist
    #[error("{what} not found at {path}")]
    MissingPath { what: &'static str, path: PathBuf },

    /// A required setting was given neither in config nor on the command line
    #[error("No {setting} configured")]
    MissingSetting { setting: &'static str },

    /// A configuration value is unusable
    #[error("Invalid configuration value {value:?}: {reason}")]
    InvalidConfig { value: String, reason: String },

    /// Walking the source root failed
    #[error("Failed to scan {path}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from xcsync-fs
    #[error(transparent)]
    Fs(#[from] xcsync_fs::Error),

    /// Manifest error from xcsync-pbx
    #[error(transparent)]
    Manifest(#[from] xcsync_pbx::Error),
}
