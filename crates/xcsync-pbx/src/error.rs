//! Error types for xcsync-pbx

/// Result type for xcsync-pbx operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing or editing a manifest
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to parse manifest at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid object identifier {value:?}: expected 24 hexadecimal characters")]
    InvalidIdentifier { value: String },

    #[error("Object identifier {id} is already present in the manifest")]
    DuplicateIdentifier { id: String },
}

impl Error {
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}
