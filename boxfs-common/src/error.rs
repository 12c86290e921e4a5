#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("remote error (HTTP {code}): {message}")]
    Remote { code: u16, message: String },
    #[error("unsupported operation: {0}")]
    Unsupported(String),
    #[error("listing of {path} failed: {reason}")]
    Listing { path: String, reason: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    pub fn remote(code: u16, message: impl Into<String>) -> Self {
        Self::Remote { code, message: message.into() }
    }

    pub fn listing(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Listing { path: path.into(), reason: reason.into() }
    }

    /// True for failures reported by the remote service itself.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;
