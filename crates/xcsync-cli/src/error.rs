//! Error types for xcsync-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from xcsync-core
    #[error(transparent)]
    Core(#[from] xcsync_core::Error),

    /// Error from xcsync-fs
    #[error(transparent)]
    Fs(#[from] xcsync_fs::Error),

    /// Error from xcsync-pbx
    #[error(transparent)]
    Manifest(#[from] xcsync_pbx::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON output error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
