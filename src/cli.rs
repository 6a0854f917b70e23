//! # Command-Line Interface Module
//!
//! This module defines the command-line interface for Moodtunes using Clap
//! derive macros.
//!
//! ## Commands
//!
//! - `serve`: Run the web front end
//! - `recommend`: Print recommendations for some moods
//! - `list`: Print the whole catalog
//! - `moods`: Print the moods and languages present in the catalog
//! - `completion`: Generate shell completions
//!
//! ## Examples
//!
//! ```bash
//! moodtunes serve --dataset songs.csv --port 8080
//! moodtunes recommend --moods happy,calm --language hindi
//! moodtunes completion bash > ~/.local/share/bash-completion/completions/moodtunes
//! ```

use crate::config::Overrides;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

/// Main application arguments structure.
#[derive(Parser, Debug)]
#[command(name = "moodtunes")]
#[command(about = "Moodtunes: mood-based song picks from a static catalog")]
#[command(version)]
pub struct Args {
    /// JSON config file; flags and environment variables override it
    #[arg(long, global = true, env = "MOODTUNES_CONFIG")]
    pub config: Option<PathBuf>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Dataset location shared by every catalog-reading command.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct DatasetArg {
    /// Path to the CSV dataset (columns: title, artist, mood, language[, id])
    #[arg(long, env = "MOODTUNES_DATASET")]
    pub dataset: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the web front end
    ///
    /// Loads the dataset once and serves the landing, selection and results
    /// pages. A dataset that fails to load is logged and the server runs
    /// with empty results.
    Serve {
        #[command(flatten)]
        dataset: DatasetArg,

        /// Interface to bind
        #[arg(long, env = "MOODTUNES_HOST")]
        host: Option<String>,

        /// Port to listen on
        #[arg(long, short, env = "MOODTUNES_PORT")]
        port: Option<u16>,

        /// Songs per mood on the results page
        #[arg(long, env = "MOODTUNES_PER_MOOD")]
        per_mood: Option<usize>,
    },

    /// Print recommendations
    ///
    /// Picks up to `--per-mood` songs for each mood without repeating a song
    /// across moods. Without `--moods`, every mood in the catalog is used.
    Recommend {
        #[command(flatten)]
        dataset: DatasetArg,

        /// Comma-separated moods, in the order to fill them
        #[arg(long, value_delimiter = ',')]
        moods: Vec<String>,

        /// Only recommend songs in this language
        #[arg(long, short)]
        language: Option<String>,

        /// Songs per mood
        #[arg(long, env = "MOODTUNES_PER_MOOD")]
        per_mood: Option<usize>,

        /// Print JSON instead of a listing
        #[arg(long)]
        json: bool,
    },

    /// List all songs in the catalog
    List {
        #[command(flatten)]
        dataset: DatasetArg,
    },

    /// List the moods and languages present in the catalog
    Moods {
        #[command(flatten)]
        dataset: DatasetArg,
    },

    /// Generate shell completions
    ///
    /// Usage: moodtunes completion bash > ~/.local/share/bash-completion/completions/moodtunes
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}

impl Command {
    /// Settings from this command's flags that override the config file.
    pub fn overrides(&self) -> Overrides {
        match self {
            Command::Serve { dataset, host, port, per_mood } => Overrides {
                dataset_path: dataset.dataset.clone(),
                host: host.clone(),
                port: *port,
                per_mood: *per_mood,
            },
            Command::Recommend { dataset, per_mood, .. } => Overrides {
                dataset_path: dataset.dataset.clone(),
                per_mood: *per_mood,
                ..Overrides::default()
            },
            Command::List { dataset } | Command::Moods { dataset } => Overrides {
                dataset_path: dataset.dataset.clone(),
                ..Overrides::default()
            },
            Command::Completion { .. } => Overrides::default(),
        }
    }
}
