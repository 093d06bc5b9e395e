use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Sidecar file could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Sidecar file is not valid UTF-8
    #[error("Sidecar for '{0}' is not valid UTF-8")]
    InvalidEncoding(String),
}

/// Type alias for cleaner function signatures
pub type Result<T> = std::result::Result<T, StoreError>;
