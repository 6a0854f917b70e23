//! Mood-based song recommendations from a static catalog.
//!
//! Core modules:
//! - [`catalog`] - Dataset loading and normalization
//! - [`recommend`] - Per-mood sampling without repeats
//! - [`session`] - Server-side selection storage
//! - [`server`] - Landing, selection and results pages
//!
//! ### Supporting Modules
//!
//! - [`song`] - Song records, placeholders and the capitalization rule
//! - [`config`] - Runtime configuration (defaults, JSON file, overrides)
//! - [`cli`] - Command-line interface definitions with clap integration
//! - [`completion`] - Shell completion generation
//! - [`report`] - Plain-text output for the CLI
//!
//! ## Quick Start Example
//!
//! ```no_run
//! use moodtunes::{catalog, recommend};
//!
//! // A broken or missing dataset is logged and read as "no catalog".
//! let catalog = catalog::load_or_absent("songs.csv");
//!
//! let moods = vec!["Happy".to_string(), "Calm".to_string()];
//! let picks = recommend::recommend(catalog.as_ref(), Some(&moods), Some("Hindi"), 5);
//!
//! for group in &picks {
//!     println!("{}: {} entries", group.mood, group.entries.len());
//! }
//! ```
//!
//! ## Recommendation Rules
//!
//! - Moods and languages match case-insensitively (`"happy"` finds `"Happy"`)
//! - Each mood gets up to `per_mood` songs, drawn uniformly without replacement
//! - A song picked for one mood is never picked again in the same call
//! - A mood with nothing left gets a single "No songs found ..." placeholder
//! - No moods requested means every mood in the catalog, in first-seen order
//!
//! ## Error Handling
//!
//! Dataset problems surface as [`catalog::CatalogError`]. The web server
//! logs them and keeps serving empty results; application plumbing returns
//! `anyhow::Result`.
//!
//! ## Logging
//!
//! Uses the `log` facade; the binary installs `env_logger`, so
//! `RUST_LOG=moodtunes=debug moodtunes serve` shows per-request detail and
//! `RUST_LOG=moodtunes::recommend=trace` shows sampling decisions.

pub mod catalog;
pub mod cli;
pub mod completion;
pub mod config;
pub mod recommend;
pub mod report;
pub mod server;
pub mod session;
pub mod song;
