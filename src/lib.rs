//! Tagdex - tag dictionary index and autocomplete engine
//!
//! This library implements the core of an image-tagging application: it loads
//! a large reference tag corpus (imageboard-style CSV), builds an immutable
//! queryable index over it, and answers interactive autocomplete queries with
//! ranked, deduplicated suggestions.
//!
//! The pieces, leaf first:
//!
//! - [`corpus`]: CSV corpus loader with row-level skip diagnostics
//! - [`index`]: normalized-key, prefix, and linear lookup structures
//! - [`suggest`]: the stateless ranking engine and similarity trait
//! - [`dictionary`]: the swappable application-level index handle
//! - [`store`]: the per-image sidecar tag collaborator
//!
//! Image display, keystroke handling, and window layout belong to the
//! embedding application; this crate never renders anything.

use thiserror::Error;

pub mod cli;
pub mod config;
pub mod corpus;
pub mod dictionary;
pub mod index;
pub mod output;
pub mod store;
pub mod suggest;

#[cfg(test)]
pub mod testing;

pub use dictionary::Dictionary;
pub use index::{NormalizedKey, TagCategory, TagIndex, TagRecord};
pub use suggest::{Engine, MatchKind, Query, Suggestion};

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum TagdexError {
    /// Corpus load error
    #[error("Load error: {0}")]
    Load(#[from] corpus::LoadError),
    /// Autocomplete error
    #[error("Suggest error: {0}")]
    Suggest(#[from] suggest::SuggestError),
    /// Sidecar store error
    #[error("Store error: {0}")]
    Store(#[from] store::StoreError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
