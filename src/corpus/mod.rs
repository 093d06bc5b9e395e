//! Corpus loader
//!
//! Parses the raw tag dataset into [`TagRecord`]s and delegates index
//! construction to [`TagIndex::build`]. The expected shape is the imageboard
//! autocomplete CSV: `name,category,frequency,"alias1,alias2"`, no header
//! row, with every column after `name` optional.
//!
//! Loading is all-or-nothing: it fails only when the source itself is
//! unreadable. Row-level problems (empty name, non-UTF-8 text, unparsable
//! frequency) are skipped and counted in the [`LoadReport`], never fatal.

pub mod error;

pub use error::LoadError;

use crate::index::{NormalizedKey, TagCategory, TagIndex, TagRecord};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Non-fatal diagnostics accumulated during a load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Total rows read from the source, including skipped ones
    pub rows_read: u64,
    /// Distinct records that made it into the index
    pub records: usize,
    /// Rows skipped for an empty or whitespace-only name
    pub skipped_empty_name: u64,
    /// Rows skipped because the name was not valid UTF-8
    pub skipped_invalid_utf8: u64,
    /// Rows skipped because the CSV row itself could not be parsed
    pub skipped_malformed: u64,
    /// Rows whose frequency column failed to parse (defaulted to 0)
    pub bad_frequency: u64,
    /// Rows merged into an earlier record with the same normalized name
    pub collisions: u64,
}

impl LoadReport {
    /// Total number of rows that did not produce their own record
    #[must_use]
    pub const fn skipped_total(&self) -> u64 {
        self.skipped_empty_name + self.skipped_invalid_utf8 + self.skipped_malformed
    }
}

/// A successfully built index together with its load diagnostics
pub struct LoadOutcome {
    pub index: TagIndex,
    pub report: LoadReport,
}

/// Load a tag corpus from a CSV file on disk
///
/// # Errors
///
/// Returns `LoadError` if the file is missing or unreadable. Callers that
/// hold a previously-built index keep it untouched on failure (see
/// [`crate::dictionary::Dictionary::load`]).
pub fn load_path<P: AsRef<Path>>(path: P) -> error::Result<LoadOutcome> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoadError::NotFound(path.display().to_string()));
    }
    let file = File::open(path)?;
    let outcome = load_reader(file)?;
    info!(
        corpus = %path.display(),
        records = outcome.report.records,
        skipped = outcome.report.skipped_total(),
        "loaded tag corpus"
    );
    Ok(outcome)
}

/// Load a tag corpus from any reader
///
/// # Errors
///
/// Returns `LoadError` only when the source is unreadable as a whole; see
/// module docs for the row-level skip policy.
pub fn load_reader<R: Read>(reader: R) -> error::Result<LoadOutcome> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut report = LoadReport::default();
    let mut records: Vec<TagRecord> = Vec::new();
    let mut seen: HashMap<NormalizedKey, usize> = HashMap::new();

    let mut row = csv::ByteRecord::new();
    loop {
        match csv_reader.read_byte_record(&mut row) {
            Ok(false) => break,
            Ok(true) => {}
            Err(err) => {
                if err.is_io_error() {
                    return Err(err.into());
                }
                report.rows_read += 1;
                report.skipped_malformed += 1;
                debug!(row = report.rows_read, %err, "skipping malformed row");
                continue;
            }
        }
        report.rows_read += 1;

        let Some(name_bytes) = row.get(0) else {
            report.skipped_empty_name += 1;
            continue;
        };
        let Ok(raw_name) = std::str::from_utf8(name_bytes) else {
            report.skipped_invalid_utf8 += 1;
            continue;
        };
        let name = raw_name.trim();
        if name.is_empty() {
            report.skipped_empty_name += 1;
            continue;
        }

        let category = row
            .get(1)
            .and_then(|b| std::str::from_utf8(b).ok())
            .and_then(|s| s.trim().parse::<u8>().ok())
            .and_then(TagCategory::from_code);

        let frequency = match row.get(2).and_then(|b| std::str::from_utf8(b).ok()) {
            Some(field) if !field.trim().is_empty() => match field.trim().parse::<u64>() {
                Ok(freq) => freq,
                Err(_) => {
                    report.bad_frequency += 1;
                    0
                }
            },
            _ => 0,
        };

        let aliases: Vec<String> = row
            .get(3)
            .and_then(|b| std::str::from_utf8(b).ok())
            .map(|field| {
                field
                    .split(',')
                    .map(str::trim)
                    .filter(|a| !a.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let key = NormalizedKey::new(name);
        if let Some(&winner_idx) = seen.get(&key) {
            // Normalized-name collision: first-seen record wins, the raw
            // variant and its aliases survive as aliases of the winner.
            merge_variant(&mut records[winner_idx], name, aliases);
            report.collisions += 1;
            debug!(variant = name, winner = %records[winner_idx].name, "merged colliding tag");
            continue;
        }

        seen.insert(key, records.len());
        records.push(TagRecord {
            name: name.to_string(),
            aliases,
            frequency,
            category,
        });
    }

    report.records = records.len();
    if report.skipped_total() > 0 {
        warn!(
            skipped = report.skipped_total(),
            rows = report.rows_read,
            "corpus rows skipped during load"
        );
    }

    Ok(LoadOutcome {
        index: TagIndex::build(records),
        report,
    })
}

fn merge_variant(winner: &mut TagRecord, variant_name: &str, variant_aliases: Vec<String>) {
    if winner.name != variant_name && !winner.aliases.iter().any(|a| a == variant_name) {
        winner.aliases.push(variant_name.to_string());
    }
    for alias in variant_aliases {
        if winner.name != alias && !winner.aliases.contains(&alias) {
            winner.aliases.push(alias);
        }
    }
}
