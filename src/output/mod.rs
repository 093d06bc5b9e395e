//! Output formatting for CLI display
//!
//! This module provides utilities for formatting output in the CLI:
//! suggestion lines, corpus statistics, and sidecar tag listings.

use crate::corpus::LoadReport;
use crate::suggest::{MatchKind, Suggestion};
use colored::Colorize;

/// Format a single suggestion line
///
/// Quiet mode prints only the tag, one per line, for scripting. Normal mode
/// adds the match kind, score, and corpus frequency.
#[must_use]
pub fn suggestion_line(suggestion: &Suggestion, quiet: bool) -> String {
    if quiet {
        return suggestion.tag.clone();
    }

    let tag = match suggestion.kind {
        MatchKind::Exact => suggestion.tag.green().bold().to_string(),
        MatchKind::Prefix => suggestion.tag.normal().to_string(),
        MatchKind::Fuzzy => suggestion.tag.yellow().to_string(),
    };

    format!(
        "  {tag} ({kind}, {score:.2}, used {freq}x)",
        kind = suggestion.kind.as_str(),
        score = suggestion.score,
        freq = suggestion.frequency,
    )
}

/// Format the load report shown by `tagdex info`
#[must_use]
pub fn load_summary(report: &LoadReport, quiet: bool) -> String {
    if quiet {
        return report.records.to_string();
    }

    let mut lines = vec![
        format!("  records:  {}", report.records),
        format!("  rows:     {}", report.rows_read),
    ];
    if report.skipped_total() > 0 {
        lines.push(format!("  skipped:  {}", report.skipped_total()));
    }
    if report.collisions > 0 {
        lines.push(format!("  merged:   {}", report.collisions));
    }
    if report.bad_frequency > 0 {
        lines.push(format!("  bad freq: {}", report.bad_frequency));
    }
    lines.join("\n")
}

/// Format an applied tag list for one image
#[must_use]
pub fn tag_list(tags: &[String], quiet: bool) -> String {
    if quiet {
        tags.join("\n")
    } else if tags.is_empty() {
        "  (no tags)".to_string()
    } else {
        format!("  {}", tags.join(", "))
    }
}
