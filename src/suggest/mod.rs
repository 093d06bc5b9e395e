//! Autocomplete engine
//!
//! Stateless ranking over an immutable [`TagIndex`]: a prefix pass over the
//! sorted key table, then a fuzzy pass over the frequency-ordered record
//! sequence when the prefix pass under-fills the requested limit. The fuzzy
//! pass admits a record either by similarity ratio above the threshold or by
//! mid-string containment, so typing `sky` still surfaces `night_sky`.
//!
//! Scoring keeps the match kinds strictly ordered: an Exact match always
//! scores 1.0, a Prefix match lands in `[0.5, 0.99)` plus a small capped
//! frequency bonus, and a Fuzzy match is the similarity ratio (or a
//! containment base below the Prefix band) with a lower bonus cap, clamped
//! below Exact.

pub mod error;
pub mod similarity;

pub use error::SuggestError;
pub use similarity::{LcsRatio, Similarity};

use crate::index::{CANONICAL_SEPARATOR, NormalizedKey, TagIndex};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Score bases for containment matches, kept strictly below the Prefix band
/// so a tag containing the partial never outranks a tag starting with it.
/// Word-start occurrences (right after a separator) band above embedded
/// substrings, as the reference tagger ranks them.
const WORD_START_BASE: f64 = 0.35;
const SUBSTRING_BASE: f64 = 0.25;
const CONTAINMENT_SPAN: f64 = 0.1;

/// How a suggestion matched the typed partial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// Normalized key equals the normalized partial
    Exact,
    /// Normalized key starts with the normalized partial
    Prefix,
    /// Selected by similarity above the configured threshold, or by
    /// containing the partial mid-string
    Fuzzy,
}

impl MatchKind {
    /// Display name for CLI output
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Prefix => "prefix",
            Self::Fuzzy => "fuzzy",
        }
    }
}

/// One ranked autocomplete candidate
///
/// Produced fresh per query, never persisted. `frequency` is carried along
/// for display next to the tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Canonical tag name from the corpus
    pub tag: String,
    /// Composite score in `[0, 1]`
    pub score: f64,
    /// Which pass produced this candidate
    pub kind: MatchKind,
    /// Corpus usage count
    pub frequency: u64,
}

/// An autocomplete request: the typed partial plus tags to leave out
#[derive(Debug, Clone, Default)]
pub struct Query {
    /// Partial user-typed string; normalized before matching
    pub partial: String,
    /// Normalized tags already applied to the active image
    pub excluded: HashSet<NormalizedKey>,
}

impl Query {
    /// Query with no exclusions
    #[must_use]
    pub fn new(partial: impl Into<String>) -> Self {
        Self {
            partial: partial.into(),
            excluded: HashSet::new(),
        }
    }

    /// Add already-applied tags to exclude from the results
    #[must_use]
    pub fn with_excluded<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for tag in tags {
            self.exclude(tag.as_ref());
        }
        self
    }

    /// Exclude a single tag
    pub fn exclude(&mut self, tag: &str) {
        let key = NormalizedKey::new(tag);
        if !key.is_empty() {
            self.excluded.insert(key);
        }
    }
}

/// Tunable scoring knobs
///
/// The defaults mirror the reference tagger: fuzzy cutoff 0.6 and seven
/// suggestions per keystroke. The bonus caps guarantee the kind ordering:
/// no frequency bonus can push a Prefix match to 1.0 or a Fuzzy match above
/// the Prefix band for the same base score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestConfig {
    /// Minimum similarity for the fuzzy pass
    pub fuzzy_threshold: f64,
    /// How many frequency-ordered records the fuzzy pass scans; 0 = all
    pub fuzzy_scan_cap: usize,
    /// Upper bound of the frequency bonus for Prefix matches
    pub prefix_bonus_cap: f64,
    /// Upper bound of the frequency bonus for Fuzzy matches
    pub fuzzy_bonus_cap: f64,
    /// Frequency at which the bonus reaches half of its cap
    pub frequency_pivot: u64,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 0.6,
            fuzzy_scan_cap: 50_000,
            prefix_bonus_cap: 0.009,
            fuzzy_bonus_cap: 0.004,
            frequency_pivot: 1_000,
        }
    }
}

impl SuggestConfig {
    /// Saturating frequency bonus: `cap * freq / (freq + pivot)`
    fn frequency_bonus(&self, frequency: u64, cap: f64) -> f64 {
        if frequency == 0 {
            return 0.0;
        }
        cap * frequency as f64 / frequency.saturating_add(self.frequency_pivot) as f64
    }
}

/// The autocomplete engine
///
/// Stateless across calls; all state lives in the [`TagIndex`] passed to
/// [`suggest`](Self::suggest). The similarity measure sits behind the
/// [`Similarity`] trait so an edit-distance or n-gram implementation can be
/// swapped in.
pub struct Engine {
    config: SuggestConfig,
    similarity: Box<dyn Similarity>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(SuggestConfig::default())
    }
}

impl Engine {
    /// Engine with the default LCS-ratio similarity
    #[must_use]
    pub fn new(config: SuggestConfig) -> Self {
        Self {
            config,
            similarity: Box::new(LcsRatio),
        }
    }

    /// Engine with a custom similarity measure
    #[must_use]
    pub fn with_similarity(config: SuggestConfig, similarity: Box<dyn Similarity>) -> Self {
        Self { config, similarity }
    }

    /// The active scoring configuration
    #[must_use]
    pub const fn config(&self) -> &SuggestConfig {
        &self.config
    }

    /// Rank autocomplete candidates for a query against an index
    ///
    /// Returns at most `limit` suggestions, sorted by score desc, frequency
    /// desc, name asc. An empty partial, a zero limit, or an empty index all
    /// yield an empty sequence; "no matches" is never an error.
    #[must_use]
    pub fn suggest(&self, query: &Query, index: &TagIndex, limit: usize) -> Vec<Suggestion> {
        let partial = NormalizedKey::new(&query.partial);
        if partial.is_empty() || limit == 0 || index.is_empty() {
            return Vec::new();
        }

        // Best candidate per normalized tag name, across both passes
        let mut best: HashMap<NormalizedKey, Suggestion> = HashMap::new();

        for (key, record) in index.prefix_matches(&partial) {
            let name_key = record.key();
            if query.excluded.contains(&name_key) {
                continue;
            }

            let (kind, score) = if *key == partial {
                (MatchKind::Exact, 1.0)
            } else {
                let tightness = partial.char_len() as f64 / key.char_len().max(1) as f64;
                let base = 0.5 + 0.49 * tightness;
                let bonus = self
                    .config
                    .frequency_bonus(record.frequency, self.config.prefix_bonus_cap);
                (MatchKind::Prefix, base + bonus)
            };

            merge_candidate(
                &mut best,
                name_key,
                Suggestion {
                    tag: record.name.clone(),
                    score,
                    kind,
                    frequency: record.frequency,
                },
            );
        }

        if best.len() < limit {
            self.fuzzy_pass(&partial, query, index, &mut best);
        }

        let mut suggestions: Vec<Suggestion> = best.into_values().collect();
        suggestions.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| b.frequency.cmp(&a.frequency))
                .then_with(|| a.tag.cmp(&b.tag))
        });
        suggestions.truncate(limit);

        debug!(
            partial = %partial,
            results = suggestions.len(),
            "suggest"
        );
        suggestions
    }

    /// Similarity and containment scan over the frequency-ordered records
    ///
    /// Prefix-matching records are skipped; the prefix pass already covered
    /// them with a kind-consistent score. A record qualifies either by
    /// similarity ratio above the threshold or by containing the partial
    /// mid-string; whichever base scores higher wins.
    fn fuzzy_pass(
        &self,
        partial: &NormalizedKey,
        query: &Query,
        index: &TagIndex,
        best: &mut HashMap<NormalizedKey, Suggestion>,
    ) {
        use rayon::prelude::*;

        let records = index.records();
        let scan = if self.config.fuzzy_scan_cap == 0 {
            records
        } else {
            &records[..records.len().min(self.config.fuzzy_scan_cap)]
        };

        let candidates: Vec<(NormalizedKey, Suggestion)> = scan
            .par_iter()
            .filter_map(|record| {
                let name_key = record.key();
                if name_key.starts_with(partial) || query.excluded.contains(&name_key) {
                    return None;
                }

                let ratio = self.similarity.ratio(partial.as_str(), name_key.as_str());
                let mut base = (ratio >= self.config.fuzzy_threshold).then_some(ratio);
                if let Some(containment) = containment_base(partial, &name_key) {
                    base = Some(base.map_or(containment, |b| b.max(containment)));
                }
                let base = base?;

                let bonus = self
                    .config
                    .frequency_bonus(record.frequency, self.config.fuzzy_bonus_cap);
                let score = (base + bonus).min(0.995);

                Some((
                    name_key,
                    Suggestion {
                        tag: record.name.clone(),
                        score,
                        kind: MatchKind::Fuzzy,
                        frequency: record.frequency,
                    },
                ))
            })
            .collect();

        for (key, candidate) in candidates {
            merge_candidate(best, key, candidate);
        }
    }
}

/// Score base for a key that contains the partial mid-string
///
/// Shorter keys (a tighter fit around the partial) score higher within each
/// band. Callers skip prefix-matching keys, so any occurrence found here
/// starts past position zero.
fn containment_base(partial: &NormalizedKey, key: &NormalizedKey) -> Option<f64> {
    let pos = key.as_str().find(partial.as_str())?;
    let tightness = partial.char_len() as f64 / key.char_len().max(1) as f64;
    let word_start = pos > 0 && key.as_str().as_bytes()[pos - 1] == CANONICAL_SEPARATOR as u8;
    let band = if word_start {
        WORD_START_BASE
    } else {
        SUBSTRING_BASE
    };
    Some(band + CONTAINMENT_SPAN * tightness)
}

/// Keep the higher-scoring entry for a normalized tag
fn merge_candidate(
    best: &mut HashMap<NormalizedKey, Suggestion>,
    key: NormalizedKey,
    candidate: Suggestion,
) {
    best.entry(key)
        .and_modify(|existing| {
            if candidate.score > existing.score {
                *existing = candidate.clone();
            }
        })
        .or_insert(candidate);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{TagIndex, TagRecord};

    fn sample_index() -> TagIndex {
        TagIndex::build(vec![
            TagRecord::new("cat", 100),
            TagRecord::new("caterpillar", 5),
            TagRecord::new("dog", 50),
        ])
    }

    #[test]
    fn test_empty_partial_yields_nothing() {
        let engine = Engine::default();
        let index = sample_index();

        assert!(engine.suggest(&Query::new(""), &index, 5).is_empty());
        assert!(engine.suggest(&Query::new("   "), &index, 5).is_empty());
    }

    #[test]
    fn test_exact_then_prefix_ordering() {
        let engine = Engine::default();
        let index = sample_index();

        let results = engine.suggest(&Query::new("cat"), &index, 5);
        assert_eq!(results.len(), 2);

        assert_eq!(results[0].tag, "cat");
        assert_eq!(results[0].kind, MatchKind::Exact);
        assert_eq!(results[0].score, 1.0);

        assert_eq!(results[1].tag, "caterpillar");
        assert_eq!(results[1].kind, MatchKind::Prefix);
        assert!(results[1].score < 1.0);

        assert!(!results.iter().any(|s| s.tag == "dog"));
    }

    #[test]
    fn test_fuzzy_match_above_threshold() {
        let engine = Engine::default();
        let index = sample_index();

        // lcs("kat", "cat") ratio = 2/3, above the 0.6 default cutoff
        let results = engine.suggest(&Query::new("kat"), &index, 5);
        assert!(
            results
                .iter()
                .any(|s| s.tag == "cat" && s.kind == MatchKind::Fuzzy)
        );
    }

    #[test]
    fn test_fuzzy_respects_threshold() {
        let config = SuggestConfig {
            fuzzy_threshold: 0.9,
            ..SuggestConfig::default()
        };
        let engine = Engine::new(config);
        let index = sample_index();

        let results = engine.suggest(&Query::new("kat"), &index, 5);
        assert!(results.is_empty());
    }

    #[test]
    fn test_excluded_tags_never_returned() {
        let engine = Engine::default();
        let index = sample_index();

        let query = Query::new("cat").with_excluded(["cat"]);
        let results = engine.suggest(&query, &index, 5);
        assert!(!results.iter().any(|s| s.tag == "cat"));

        // Exclusion folds the same way tag names do
        let query = Query::new("cat").with_excluded(["CAT"]);
        assert!(
            !engine
                .suggest(&query, &index, 5)
                .iter()
                .any(|s| s.tag == "cat")
        );
    }

    #[test]
    fn test_deterministic_output() {
        let engine = Engine::default();
        let index = sample_index();
        let query = Query::new("ca");

        let first = engine.suggest(&query, &index, 5);
        let second = engine.suggest(&query, &index, 5);
        assert_eq!(first, second);
    }

    #[test]
    fn test_ties_break_by_frequency_then_name() {
        let index = TagIndex::build(vec![
            TagRecord::new("cab", 10),
            TagRecord::new("cat", 10),
            TagRecord::new("car", 99),
        ]);
        let engine = Engine::default();

        let results = engine.suggest(&Query::new("ca"), &index, 5);
        let tags: Vec<&str> = results.iter().map(|s| s.tag.as_str()).collect();
        // Same tightness for all three; the frequency bonus lifts "car",
        // the remaining tie falls back to alphabetical order
        assert_eq!(tags, vec!["car", "cab", "cat"]);
    }

    #[test]
    fn test_exact_outranks_everything() {
        let index = TagIndex::build(vec![
            TagRecord::new("sky", 1),
            TagRecord::new("skyline", 1_000_000),
            TagRecord::new("skye", 1_000_000),
        ]);
        let engine = Engine::default();

        let results = engine.suggest(&Query::new("sky"), &index, 5);
        assert_eq!(results[0].tag, "sky");
        assert_eq!(results[0].kind, MatchKind::Exact);
        for other in &results[1..] {
            assert!(other.score < results[0].score);
        }
    }

    #[test]
    fn test_shorter_prefix_candidates_score_higher() {
        let index = TagIndex::build(vec![
            TagRecord::new("cats", 10),
            TagRecord::new("caterpillar", 10),
        ]);
        let engine = Engine::default();

        let results = engine.suggest(&Query::new("cat"), &index, 5);
        assert_eq!(results[0].tag, "cats");
        assert_eq!(results[1].tag, "caterpillar");
        assert!(results[0].score > results[1].score);
    }

    #[test]
    fn test_containment_surfaces_compound_tags() {
        let index = TagIndex::build(vec![
            TagRecord::new("night_sky", 5_000),
            TagRecord::new("sky", 100),
            TagRecord::new("cat", 10),
        ]);
        let engine = Engine::default();

        let results = engine.suggest(&Query::new("sky"), &index, 7);
        assert_eq!(results[0].tag, "sky");
        assert_eq!(results[0].kind, MatchKind::Exact);

        let compound = results
            .iter()
            .find(|s| s.tag == "night_sky")
            .expect("compound tag surfaced");
        assert_eq!(compound.kind, MatchKind::Fuzzy);
        // Containment stays below the Prefix band
        assert!(compound.score < 0.5);

        assert!(!results.iter().any(|s| s.tag == "cat"));
    }

    #[test]
    fn test_word_start_outranks_embedded_substring() {
        let index = TagIndex::build(vec![
            TagRecord::new("night_sky", 10),
            TagRecord::new("cityskyline", 10),
        ]);
        let engine = Engine::default();

        let results = engine.suggest(&Query::new("sky"), &index, 5);
        let tags: Vec<&str> = results.iter().map(|s| s.tag.as_str()).collect();
        assert_eq!(tags, vec!["night_sky", "cityskyline"]);
    }

    #[test]
    fn test_fuzzy_pass_skipped_when_prefix_fills_limit() {
        let index = TagIndex::build(vec![
            TagRecord::new("cat", 100),
            TagRecord::new("cats", 90),
            TagRecord::new("kat", 80),
        ]);
        let engine = Engine::default();

        let results = engine.suggest(&Query::new("cat"), &index, 2);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|s| s.kind != MatchKind::Fuzzy));
    }

    #[test]
    fn test_limit_truncates() {
        let engine = Engine::default();
        let index = sample_index();

        let results = engine.suggest(&Query::new("ca"), &index, 1);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_alias_prefix_suggests_canonical_once() {
        let mut record = TagRecord::new("javascript", 500);
        record.aliases.push("js".into());
        let index = TagIndex::build(vec![record]);
        let engine = Engine::default();

        let results = engine.suggest(&Query::new("j"), &index, 5);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].tag, "javascript");
    }

    #[test]
    fn test_empty_index_is_cheap_noop() {
        let engine = Engine::default();
        let index = TagIndex::build(Vec::new());
        assert!(engine.suggest(&Query::new("cat"), &index, 5).is_empty());
    }
}
