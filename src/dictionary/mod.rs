//! Swappable dictionary handle
//!
//! Owns the "currently loaded dictionary" for the application: a single
//! [`Arc<TagIndex>`] reference that a reload replaces wholesale. Queries
//! clone the `Arc` and then run lock-free against a fully-consistent index,
//! so a query concurrent with a reload sees either the old or the new index,
//! never a mix.
//!
//! The handle also caches ranked results per query, as the reference tagger
//! caches suggestions per typed prefix. The cache lives inside the swapped
//! generation, next to the index its entries were computed from: a query that
//! raced a reload can only ever write into the generation it read, which the
//! swap already made unreachable, so post-reload queries never see pre-reload
//! results.

use crate::corpus::{self, LoadError, LoadReport};
use crate::index::{NormalizedKey, TagIndex};
use crate::suggest::error::Result as SuggestResult;
use crate::suggest::{Engine, Query, SuggestError, Suggestion};
use moka::sync::Cache;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

/// Cached query results per handle
const QUERY_CACHE_CAPACITY: u64 = 1024;

/// One installed index generation and the result cache keyed against it
struct LoadedIndex {
    index: Arc<TagIndex>,
    cache: Cache<String, Arc<Vec<Suggestion>>>,
}

/// Application-level owner of the current tag index
///
/// Starts empty; [`suggest`](Self::suggest) reports
/// [`SuggestError::IndexUnavailable`] until the first successful
/// [`load`](Self::load). A failed load leaves the previous index in place.
pub struct Dictionary {
    engine: Engine,
    generation: RwLock<Option<Arc<LoadedIndex>>>,
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new(Engine::default())
    }
}

impl Dictionary {
    /// Empty dictionary using the given engine
    #[must_use]
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            generation: RwLock::new(None),
        }
    }

    /// Load (or reload) the corpus from a CSV file and swap it in
    ///
    /// All-or-nothing: the swap happens only after the new index is fully
    /// built, and a failure leaves any previously-loaded index untouched.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` if the corpus source is unreadable.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<LoadReport, LoadError> {
        let outcome = corpus::load_path(path)?;
        let report = outcome.report;
        self.install(outcome.index);
        Ok(report)
    }

    /// Swap in an already-built index
    ///
    /// The new generation starts with an empty cache; the old generation's
    /// cache becomes unreachable along with the old index.
    pub fn install(&self, index: TagIndex) {
        let records = index.len();
        let generation = Arc::new(LoadedIndex {
            index: Arc::new(index),
            cache: Cache::new(QUERY_CACHE_CAPACITY),
        });
        *self
            .generation
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(generation);
        info!(records, "tag index swapped in");
    }

    /// A reference to the current index, if one has been loaded
    #[must_use]
    pub fn current(&self) -> Option<Arc<TagIndex>> {
        self.generation
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|generation| Arc::clone(&generation.index))
    }

    /// Whether a corpus has been successfully loaded
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.current().is_some()
    }

    /// Rank suggestions against the current index
    ///
    /// # Errors
    ///
    /// Returns [`SuggestError::IndexUnavailable`] before the first successful
    /// load. "No matches" is a successful empty result.
    pub fn suggest(&self, query: &Query, limit: usize) -> SuggestResult<Vec<Suggestion>> {
        let generation = self
            .generation
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(SuggestError::IndexUnavailable)?;

        let key = cache_key(query, limit);
        if let Some(hit) = generation.cache.get(&key) {
            return Ok(hit.as_ref().clone());
        }

        let suggestions = Arc::new(self.engine.suggest(query, &generation.index, limit));
        generation.cache.insert(key, Arc::clone(&suggestions));
        Ok(suggestions.as_ref().clone())
    }
}

/// Deterministic cache key over the normalized partial, limit, and exclusions
fn cache_key(query: &Query, limit: usize) -> String {
    let mut excluded: Vec<&str> = query.excluded.iter().map(NormalizedKey::as_str).collect();
    excluded.sort_unstable();
    format!(
        "{}\u{1f}{}\u{1f}{}",
        NormalizedKey::new(&query.partial),
        limit,
        excluded.join(",")
    )
}
