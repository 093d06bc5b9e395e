//! Testing utilities for tagdex
//!
//! This module provides helper types for writing tests, including a
//! `TempCorpus` wrapper that materializes a CSV corpus in a temporary
//! directory and cleans up on drop.
//!
//! Only available when compiled with `cfg(test)`.

use std::path::{Path, PathBuf};

/// The three-tag corpus used across the test suite
pub const SAMPLE_CSV: &str = "cat,0,100,\ncaterpillar,0,5,\ndog,0,50,\n";

/// A corpus CSV written to a temporary directory
///
/// The directory (and the corpus file in it) is removed when the wrapper
/// goes out of scope.
pub struct TempCorpus {
    _dir: tempfile::TempDir,
    path: PathBuf,
}

impl TempCorpus {
    /// Write `csv` to a fresh temporary corpus file
    ///
    /// # Panics
    /// Panics if the temporary directory or file cannot be created.
    #[must_use]
    pub fn new(csv: &str) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("tags.csv");
        std::fs::write(&path, csv).expect("Failed to write temp corpus");
        Self { _dir: dir, path }
    }

    /// The sample three-tag corpus
    #[must_use]
    pub fn sample() -> Self {
        Self::new(SAMPLE_CSV)
    }

    /// Path to the corpus file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
