//! Tagdex CLI application entry point
//!
//! This is the main executable for the tagdex autocomplete engine. It loads a
//! tag corpus, answers suggestion queries, and reads/writes per-image sidecar
//! tag files.
//!
//! # Usage
//!
//! ```bash
//! # Rank suggestions for a partial tag
//! tagdex --corpus tags.csv suggest cat
//! tagdex suggest ca --limit 10 --exclude cat
//!
//! # Exclude the tags already applied to an image
//! tagdex suggest sky --image photos/cat.jpg
//!
//! # Corpus statistics
//! tagdex --corpus tags.csv info
//!
//! # Show or replace an image's sidecar tags
//! tagdex tags photos/cat.jpg
//! tagdex tags photos/cat.jpg cat night_sky
//! tagdex tags photos/cat.jpg --clear
//!
//! # Quiet mode (bare results, for scripting)
//! tagdex -q suggest cat
//! ```
//!
//! # Configuration
//!
//! The default corpus path and scoring knobs live in the user's config
//! directory (`~/.config/tagdex/config.toml` on Linux). The `--corpus` flag
//! overrides the configured path for one invocation.

use colored::Colorize;
use std::path::PathBuf;
use tagdex::{
    Dictionary, Engine, Query, TagdexError,
    cli::{Cli, Commands},
    config::TagdexConfig,
    output,
    store::{ImageTags, RecordStore, SidecarStore},
};
use tracing_subscriber::EnvFilter;

type Result<T> = std::result::Result<T, TagdexError>;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("{} {err}", "Error:".red().bold());
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let config = TagdexConfig::load()?;
    let quiet = cli.quiet || config.quiet;

    match cli.command {
        Commands::Suggest {
            partial,
            limit,
            excluded,
            image,
        } => {
            let dictionary = load_dictionary(cli.corpus, &config)?;

            let mut query = Query::new(&partial).with_excluded(excluded);
            if let Some(image) = image {
                query = query.with_excluded(SidecarStore.applied_tags(&image)?);
            }

            let limit = limit.unwrap_or(config.limit);
            let suggestions = dictionary.suggest(&query, limit)?;

            if suggestions.is_empty() {
                if !quiet {
                    println!("No suggestions for '{partial}'.");
                }
            } else {
                if !quiet {
                    println!("Suggestions for '{partial}':");
                }
                for suggestion in &suggestions {
                    println!("{}", output::suggestion_line(suggestion, quiet));
                }
            }
        }

        Commands::Info => {
            let path = corpus_path(cli.corpus, &config)?;
            let outcome = tagdex::corpus::load_path(&path)?;

            if !quiet {
                println!("Corpus {}:", path.display());
            }
            println!("{}", output::load_summary(&outcome.report, quiet));
        }

        Commands::Tags { image, tags, clear } => {
            if clear {
                SidecarStore.save(&image, &ImageTags::default())?;
                if !quiet {
                    println!("Cleared tags for {}", image.display());
                }
            } else if tags.is_empty() {
                let record = SidecarStore.load(&image)?;
                if !quiet {
                    println!("Tags for {}:", image.display());
                }
                println!("{}", output::tag_list(&record.tags, quiet));
            } else {
                let mut record = SidecarStore.load(&image)?;
                record.tags = tags;
                SidecarStore.save(&image, &record)?;
                if !quiet {
                    println!(
                        "Saved {} tag(s) to {}",
                        record.tags.len(),
                        SidecarStore::sidecar_path(&image).display()
                    );
                }
            }
        }
    }

    Ok(())
}

/// Resolve the corpus path from the flag or the config file
fn corpus_path(flag: Option<PathBuf>, config: &TagdexConfig) -> Result<PathBuf> {
    flag.or_else(|| config.corpus_path.clone()).ok_or_else(|| {
        TagdexError::InvalidInput(
            "No corpus configured; pass --corpus or set corpus_path in the config".to_string(),
        )
    })
}

/// Build a dictionary from the resolved corpus path
fn load_dictionary(flag: Option<PathBuf>, config: &TagdexConfig) -> Result<Dictionary> {
    let path = corpus_path(flag, config)?;
    let dictionary = Dictionary::new(Engine::new(config.suggest));
    dictionary.load(&path)?;
    Ok(dictionary)
}
