//! Pluggable string similarity for the fuzzy pass
//!
//! Any implementation returning a ratio in `[0, 1]` where more shared
//! structure means a higher score is conformant. The default is a longest
//! common subsequence ratio, `2 * lcs(a, b) / (|a| + |b|)`, which matches the
//! shape of the classic sequence-matcher ratio.

/// A normalized string-similarity measure
///
/// `ratio` must be symmetric in spirit (a, b order does not change the
/// contract) and return `1.0` only for equal inputs.
pub trait Similarity: Send + Sync {
    /// Similarity of two strings in `[0, 1]`
    fn ratio(&self, a: &str, b: &str) -> f64;
}

/// Longest-common-subsequence similarity ratio
#[derive(Debug, Clone, Copy, Default)]
pub struct LcsRatio;

impl Similarity for LcsRatio {
    fn ratio(&self, a: &str, b: &str) -> f64 {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();

        match (a.len(), b.len()) {
            (0, 0) => 1.0,
            (0, _) | (_, 0) => 0.0,
            (la, lb) => 2.0 * lcs_len(&a, &b) as f64 / (la + lb) as f64,
        }
    }
}

/// Longest common subsequence length, single-row dynamic programming
fn lcs_len(a: &[char], b: &[char]) -> usize {
    // Keep the shorter string as the row to bound memory
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    let mut row = vec![0usize; short.len() + 1];
    for &lc in long {
        let mut diagonal = 0;
        for (j, &sc) in short.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if lc == sc {
                diagonal + 1
            } else {
                above.max(row[j])
            };
            diagonal = above;
        }
    }
    row[short.len()]
}
