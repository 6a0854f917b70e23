//! # Moodtunes
//!
//! Pick one or more moods and an optional language, get a non-repeating
//! list of songs per mood from a CSV catalog.
//!
//! ## Usage
//!
//! ```bash
//! # Run the web front end on http://127.0.0.1:5000
//! moodtunes serve --dataset songs.csv
//!
//! # Recommendations on the command line
//! moodtunes recommend --moods happy,sad --language english
//!
//! # Inspect the catalog
//! moodtunes list
//! moodtunes moods
//! ```

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use log::{debug, info, warn};
use moodtunes::catalog::{self, Catalog};
use moodtunes::config::RuntimeConfig;
use moodtunes::{cli, completion, recommend, report, server};

fn load_catalog_strict(config: &RuntimeConfig) -> Result<Catalog> {
    Catalog::load(&config.dataset_path)
        .with_context(|| format!("Could not load dataset {}", config.dataset_path.display()))
}

/// Main entry point.
///
/// Logging is controlled via `RUST_LOG`:
/// - `RUST_LOG=debug moodtunes serve` - Enable debug logging
/// - `RUST_LOG=moodtunes::recommend=trace moodtunes recommend` - Sampling detail
#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args = cli::Args::parse();
    let config = RuntimeConfig::load(args.config.as_deref())?.apply(&args.command.overrides());
    debug!("Effective configuration: {config:?}");

    match args.command {
        cli::Command::Serve { .. } => {
            info!("Loading dataset from: {}", config.dataset_path.display());
            let catalog = catalog::load_or_absent(&config.dataset_path);
            if catalog.is_none() {
                warn!("Serving without a catalog; every result page will be empty");
            }
            server::run_server(&config, catalog).await?;
        }
        cli::Command::Recommend { moods, language, json, .. } => {
            let catalog = load_catalog_strict(&config)?;
            let selected = Some(moods.as_slice()).filter(|m| !m.is_empty());
            let picks = recommend::recommend(Some(&catalog), selected, language.as_deref(), config.per_mood);

            if json {
                println!("{}", serde_json::to_string_pretty(&picks)?);
            } else {
                print!("{}", report::format_recommendations(&picks));
            }
        }
        cli::Command::List { .. } => {
            let catalog = load_catalog_strict(&config)?;
            print!("{}", report::format_catalog(&catalog));
        }
        cli::Command::Moods { .. } => {
            let catalog = load_catalog_strict(&config)?;
            print!("{}", report::format_categories(&catalog));
        }
        cli::Command::Completion { shell } => {
            let mut cmd = cli::Args::command();
            completion::generate_completions(completion::shell_to_completion_shell(&shell), &mut cmd);
        }
    }

    Ok(())
}
