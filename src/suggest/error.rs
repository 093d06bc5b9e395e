use thiserror::Error;

/// Autocomplete-specific errors
///
/// "No matches" is not an error: [`crate::suggest::Engine::suggest`] returns
/// an empty sequence. The only failure is asking for suggestions before any
/// corpus has been loaded.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SuggestError {
    /// No tag index is available (no successful load yet)
    #[error("Tag index unavailable: no corpus has been loaded")]
    IndexUnavailable,
}

/// Type alias for cleaner function signatures
pub type Result<T> = std::result::Result<T, SuggestError>;
