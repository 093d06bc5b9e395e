use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    /// Corpus file could not be opened or read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Corpus is structurally unreadable as CSV
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Corpus file does not exist
    #[error("Corpus file not found: {0}")]
    NotFound(String),
}

/// Type alias for cleaner function signatures
pub type Result<T> = std::result::Result<T, LoadError>;
