//! Per-image tag record store
//!
//! External collaborator of the autocomplete engine: the set of tags already
//! applied to an image lives in a plain-text sidecar file next to the image
//! (`photo.jpg` → `photo.txt`). The first block of the file is a
//! comma-separated tag list; an optional free-text description follows a
//! separator line.
//!
//! The engine itself never touches these files; it only receives the applied
//! set through the [`RecordStore`] trait to build its exclusion list.

pub mod error;

pub use error::StoreError;

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

/// Separator line between the tag block and the description block
pub const DESCRIPTION_SEPARATOR: &str = "###DESCRIPTION###";

/// Tags and optional description associated with one image
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageTags {
    /// Applied tags, in file order
    pub tags: Vec<String>,
    /// Free-text description block, if any
    pub description: Option<String>,
}

impl ImageTags {
    /// Record with tags only
    #[must_use]
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            description: None,
        }
    }

    /// Whether there is nothing worth persisting
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.description.is_none()
    }

    /// Parse sidecar file content
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let (tag_block, description) = match content.split_once(DESCRIPTION_SEPARATOR) {
            Some((tags, desc)) => {
                let desc = desc.trim();
                (tags, (!desc.is_empty()).then(|| desc.to_string()))
            }
            None => (content, None),
        };

        let tags = tag_block
            .split([',', '\n'])
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect();

        Self { tags, description }
    }

    /// Render to sidecar file content
    #[must_use]
    pub fn render(&self) -> String {
        let tags = self.tags.join(", ");
        match &self.description {
            Some(desc) => format!("{tags}\n{DESCRIPTION_SEPARATOR}\n{desc}"),
            None => tags,
        }
    }
}

/// Source of the applied-tag set for the active image
///
/// This is all the autocomplete engine needs from tag storage; it is never
/// given write access.
pub trait RecordStore {
    /// Tags currently applied to `image` (raw, un-normalized)
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing storage cannot be read.
    fn applied_tags(&self, image: &Path) -> error::Result<HashSet<String>>;
}

/// Sidecar-file implementation: `<image stem>.txt` next to the image
#[derive(Debug, Clone, Copy, Default)]
pub struct SidecarStore;

impl SidecarStore {
    /// Path of the sidecar file for an image
    #[must_use]
    pub fn sidecar_path(image: &Path) -> PathBuf {
        image.with_extension("txt")
    }

    /// Load the record for an image; a missing sidecar is an empty record
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the sidecar exists but cannot be read.
    pub fn load(&self, image: &Path) -> error::Result<ImageTags> {
        let path = Self::sidecar_path(image);
        if !path.exists() {
            debug!(image = %image.display(), "no sidecar, empty record");
            return Ok(ImageTags::default());
        }

        let bytes = std::fs::read(&path)?;
        let content = String::from_utf8(bytes)
            .map_err(|_| StoreError::InvalidEncoding(path.display().to_string()))?;
        Ok(ImageTags::parse(&content))
    }

    /// Save the record for an image
    ///
    /// An empty record deletes the sidecar instead of leaving an empty file.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the sidecar cannot be written or removed.
    pub fn save(&self, image: &Path, record: &ImageTags) -> error::Result<()> {
        let path = Self::sidecar_path(image);

        if record.is_empty() {
            if path.exists() {
                std::fs::remove_file(&path)?;
                info!(sidecar = %path.display(), "removed empty sidecar");
            }
            return Ok(());
        }

        std::fs::write(&path, record.render())?;
        info!(sidecar = %path.display(), tags = record.tags.len(), "saved sidecar");
        Ok(())
    }
}

impl RecordStore for SidecarStore {
    fn applied_tags(&self, image: &Path) -> error::Result<HashSet<String>> {
        Ok(self.load(image)?.tags.into_iter().collect())
    }
}

/// In-memory store for tests and headless embedding
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<PathBuf, ImageTags>>,
}

impl MemoryStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the record for an image
    pub fn set(&self, image: impl Into<PathBuf>, record: ImageTags) {
        self.records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(image.into(), record);
    }
}

impl RecordStore for MemoryStore {
    fn applied_tags(&self, image: &Path) -> error::Result<HashSet<String>> {
        Ok(self
            .records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(image)
            .map(|r| r.tags.iter().cloned().collect())
            .unwrap_or_default())
    }
}
