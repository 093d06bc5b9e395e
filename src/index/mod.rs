//! Tag dictionary index
//!
//! Builds read-only lookup structures over a loaded tag corpus:
//! - Exact lookup from normalized key to record (names and aliases)
//! - Prefix lookup over a sorted key table (binary search + range scan)
//! - The full record sequence, ordered by frequency, for fuzzy fallback scans
//!
//! The index is immutable once built. A reload constructs a fresh index and
//! swaps it in wholesale (see [`crate::dictionary::Dictionary`]).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Canonical separator that space and hyphen fold into
pub const CANONICAL_SEPARATOR: char = '_';

/// Normalized, comparable form of a tag name
///
/// Derived from a raw tag by lower-casing and folding runs of separator
/// characters (space, underscore, hyphen) into a single underscore. Two raw
/// tags that normalize identically (e.g. `"Blue Sky"` and `"blue_sky"`) are
/// considered the same tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedKey(String);

impl NormalizedKey {
    /// Normalize a raw tag string
    #[must_use]
    pub fn new(raw: &str) -> Self {
        let mut folded = String::with_capacity(raw.len());
        let mut pending_separator = false;

        for ch in raw.trim().chars() {
            if ch == ' ' || ch == '-' || ch == CANONICAL_SEPARATOR {
                pending_separator = true;
            } else {
                if pending_separator && !folded.is_empty() {
                    folded.push(CANONICAL_SEPARATOR);
                }
                pending_separator = false;
                folded.extend(ch.to_lowercase());
            }
        }

        Self(folded)
    }

    /// The normalized text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the key folded down to nothing (empty or separator-only input)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length in characters, used for score ratios
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    /// Whether this key starts with another normalized key
    #[must_use]
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.0.starts_with(prefix.as_str())
    }
}

impl fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Corpus category label, following the imageboard CSV convention
///
/// The corpus encodes categories as numeric codes; code 2 is unused upstream
/// and unknown codes map to no category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagCategory {
    General,
    Artist,
    Copyright,
    Character,
    Meta,
}

impl TagCategory {
    /// Decode the numeric category column of the corpus
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::General),
            1 => Some(Self::Artist),
            3 => Some(Self::Copyright),
            4 => Some(Self::Character),
            5 => Some(Self::Meta),
            _ => None,
        }
    }

    /// Display name for CLI output
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Artist => "artist",
            Self::Copyright => "copyright",
            Self::Character => "character",
            Self::Meta => "meta",
        }
    }
}

/// One entry of the tag corpus
///
/// Immutable once loaded. Uniquely identified within an index by the
/// normalized form of `name`; raw variants that normalize identically are
/// merged into `aliases` by the loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRecord {
    /// Raw tag name as it appeared in the corpus (trimmed, non-empty)
    pub name: String,
    /// Alternative spellings that resolve to this record
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Usage count in the source corpus; advisory ranking input only
    #[serde(default)]
    pub frequency: u64,
    /// Optional corpus category
    #[serde(default)]
    pub category: Option<TagCategory>,
}

impl TagRecord {
    /// Create a record with no aliases or category
    #[must_use]
    pub fn new(name: impl Into<String>, frequency: u64) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            frequency,
            category: None,
        }
    }

    /// Normalized identity of this record
    #[must_use]
    pub fn key(&self) -> NormalizedKey {
        NormalizedKey::new(&self.name)
    }
}

/// Read-only lookup structure over a loaded corpus
///
/// Holds three views of the same record set:
/// - `by_key`: exact normalized-key lookup (names and aliases)
/// - `sorted_keys`: key table sorted for prefix range scans
/// - `records`: the full sequence, ordered by frequency desc then name asc,
///   scanned linearly by the fuzzy pass
pub struct TagIndex {
    records: Vec<TagRecord>,
    by_key: HashMap<NormalizedKey, usize>,
    sorted_keys: Vec<(NormalizedKey, usize)>,
}

impl TagIndex {
    /// Build the index from a record set
    ///
    /// Construction is deterministic: the same record set always produces the
    /// same query results. Records whose normalized name collides with an
    /// earlier record, or folds to an empty key, are ignored here; the loader
    /// merges collisions into aliases before calling this.
    #[must_use]
    pub fn build(mut records: Vec<TagRecord>) -> Self {
        records.sort_by(|a, b| {
            b.frequency
                .cmp(&a.frequency)
                .then_with(|| a.name.cmp(&b.name))
        });

        let mut by_key: HashMap<NormalizedKey, usize> = HashMap::with_capacity(records.len());
        let mut kept: Vec<TagRecord> = Vec::with_capacity(records.len());

        // Name keys first so an alias can never shadow a real record's name
        for record in records {
            let key = record.key();
            if key.is_empty() || by_key.contains_key(&key) {
                continue;
            }
            by_key.insert(key, kept.len());
            kept.push(record);
        }

        for (idx, record) in kept.iter().enumerate() {
            for alias in &record.aliases {
                let alias_key = NormalizedKey::new(alias);
                if !alias_key.is_empty() {
                    by_key.entry(alias_key).or_insert(idx);
                }
            }
        }

        let mut sorted_keys: Vec<(NormalizedKey, usize)> =
            by_key.iter().map(|(k, &i)| (k.clone(), i)).collect();
        sorted_keys.sort_by(|a, b| a.0.cmp(&b.0));

        Self {
            records: kept,
            by_key,
            sorted_keys,
        }
    }

    /// Exact lookup by normalized key (matches names and aliases)
    #[must_use]
    pub fn get(&self, key: &NormalizedKey) -> Option<&TagRecord> {
        self.by_key.get(key).map(|&i| &self.records[i])
    }

    /// All records whose normalized key (name or alias) starts with `prefix`
    ///
    /// Runs in O(log n + k) over the sorted key table. A record reachable
    /// through several matching keys is yielded once per key; callers that
    /// need distinct records deduplicate by normalized name.
    pub fn prefix_matches<'a>(
        &'a self,
        prefix: &'a NormalizedKey,
    ) -> impl Iterator<Item = (&'a NormalizedKey, &'a TagRecord)> + 'a {
        let start = self
            .sorted_keys
            .partition_point(|(k, _)| k.as_str() < prefix.as_str());

        self.sorted_keys[start..]
            .iter()
            .take_while(move |(k, _)| k.starts_with(prefix))
            .map(move |(k, i)| (k, &self.records[*i]))
    }

    /// The full record sequence, ordered by frequency desc then name asc
    #[must_use]
    pub fn records(&self) -> &[TagRecord] {
        &self.records
    }

    /// Number of distinct records in the index
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the index holds no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lowercases_and_folds_separators() {
        assert_eq!(NormalizedKey::new("Blue Sky").as_str(), "blue_sky");
        assert_eq!(NormalizedKey::new("blue-sky").as_str(), "blue_sky");
        assert_eq!(NormalizedKey::new("blue_sky").as_str(), "blue_sky");
        assert_eq!(NormalizedKey::new("  Blue   Sky  ").as_str(), "blue_sky");
        assert_eq!(NormalizedKey::new("a - b").as_str(), "a_b");
    }

    #[test]
    fn test_normalize_empty_and_separator_only() {
        assert!(NormalizedKey::new("").is_empty());
        assert!(NormalizedKey::new("   ").is_empty());
        assert!(NormalizedKey::new("_-_").is_empty());
    }

    #[test]
    fn test_category_codes() {
        assert_eq!(TagCategory::from_code(0), Some(TagCategory::General));
        assert_eq!(TagCategory::from_code(4), Some(TagCategory::Character));
        assert_eq!(TagCategory::from_code(2), None);
        assert_eq!(TagCategory::from_code(99), None);
    }

    #[test]
    fn test_build_orders_by_frequency_then_name() {
        let index = TagIndex::build(vec![
            TagRecord::new("beta", 10),
            TagRecord::new("alpha", 10),
            TagRecord::new("gamma", 99),
        ]);

        let names: Vec<&str> = index.records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["gamma", "alpha", "beta"]);
    }

    #[test]
    fn test_exact_lookup_via_alias() {
        let mut record = TagRecord::new("javascript", 500);
        record.aliases.push("js".into());
        let index = TagIndex::build(vec![record]);

        let hit = index.get(&NormalizedKey::new("js")).unwrap();
        assert_eq!(hit.name, "javascript");
    }

    #[test]
    fn test_alias_never_shadows_a_real_record() {
        let mut popular = TagRecord::new("canine", 1000);
        popular.aliases.push("dog".into());
        let index = TagIndex::build(vec![popular, TagRecord::new("dog", 10)]);

        assert_eq!(index.len(), 2);
        assert_eq!(index.get(&NormalizedKey::new("dog")).unwrap().name, "dog");
    }

    #[test]
    fn test_prefix_matches_range() {
        let index = TagIndex::build(vec![
            TagRecord::new("cat", 100),
            TagRecord::new("caterpillar", 5),
            TagRecord::new("dog", 50),
            TagRecord::new("cattle", 7),
        ]);

        let prefix = NormalizedKey::new("cat");
        let mut hits: Vec<&str> = index
            .prefix_matches(&prefix)
            .map(|(_, r)| r.name.as_str())
            .collect();
        hits.sort_unstable();
        assert_eq!(hits, vec!["cat", "caterpillar", "cattle"]);
    }

    #[test]
    fn test_prefix_matches_is_case_and_separator_insensitive() {
        let index = TagIndex::build(vec![TagRecord::new("Blue Sky", 1)]);

        let prefix = NormalizedKey::new("BLUE-S");
        let hits: Vec<&str> = index
            .prefix_matches(&prefix)
            .map(|(_, r)| r.name.as_str())
            .collect();
        assert_eq!(hits, vec!["Blue Sky"]);
    }

    #[test]
    fn test_build_skips_colliding_and_empty_names() {
        let index = TagIndex::build(vec![
            TagRecord::new("Blue Sky", 10),
            TagRecord::new("blue_sky", 3),
            TagRecord::new("   ", 1),
        ]);

        assert_eq!(index.len(), 1);
        // Higher frequency record wins the build-order slot
        assert_eq!(
            index.get(&NormalizedKey::new("blue sky")).unwrap().name,
            "Blue Sky"
        );
    }
}
