//! Command-line interface definitions and parsing
//!
//! This module defines the CLI structure for tagdex using the `clap` crate.
//!
//! # Commands
//!
//! - **suggest**: rank autocomplete candidates for a partial tag
//! - **info**: load the corpus and print its statistics
//! - **tags**: show or replace the sidecar tags of an image
//!
//! The `--corpus` flag and global `--quiet` flag are available on every
//! command; both fall back to the values in the config file.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tag dictionary index and autocomplete engine
#[derive(Parser, Debug)]
#[command(name = "tagdex", version, about, long_about = None)]
pub struct Cli {
    /// Suppress informational output (only print results)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Corpus CSV to load (overrides the configured corpus path)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub corpus: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rank autocomplete suggestions for a partial tag
    #[command(visible_alias = "s")]
    Suggest {
        /// Partial tag text, as typed
        partial: String,

        /// Maximum number of suggestions (defaults to the configured limit)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Tag to exclude from the results; repeatable
        #[arg(short = 'x', long = "exclude", value_name = "TAG")]
        excluded: Vec<String>,

        /// Exclude the tags already applied to this image's sidecar
        #[arg(short, long, value_name = "IMAGE")]
        image: Option<PathBuf>,
    },

    /// Load the corpus and print its statistics
    #[command(visible_alias = "i")]
    Info,

    /// Show or replace the tags in an image's sidecar file
    #[command(visible_alias = "t")]
    Tags {
        /// Image whose sidecar to read or write
        image: PathBuf,

        /// Replacement tag set; omit to show the current tags
        tags: Vec<String>,

        /// Remove all tags (deletes the sidecar file)
        #[arg(long, conflicts_with = "tags")]
        clear: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
