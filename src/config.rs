//! # Configuration Module
//!
//! Runtime settings for Moodtunes. Values are layered:
//!
//! 1. Built-in defaults ([`RuntimeConfig::default`])
//! 2. An optional JSON file passed with `--config`
//! 3. Command-line flags and `MOODTUNES_*` environment variables
//!
//! ## Example config file
//!
//! ```json
//! {
//!   "dataset_path": "/srv/moodtunes/songs.csv",
//!   "host": "0.0.0.0",
//!   "port": 8080,
//!   "per_mood": 5,
//!   "session_idle_secs": 1800,
//!   "max_sessions": 10000
//! }
//! ```
//!
//! Missing keys fall back to their defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::recommend::DEFAULT_PER_MOOD;
use crate::session::{DEFAULT_MAX_SESSIONS, DEFAULT_SESSION_IDLE};

pub const DEFAULT_DATASET: &str = "songs.csv";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;

/// Configuration for runtime behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Path to the CSV song dataset
    pub dataset_path: PathBuf,
    /// Interface the web server binds to
    pub host: String,
    pub port: u16,
    /// Songs recommended per mood
    pub per_mood: usize,
    /// Seconds of inactivity before a web session is forgotten
    pub session_idle_secs: u64,
    pub max_sessions: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            per_mood: DEFAULT_PER_MOOD,
            session_idle_secs: DEFAULT_SESSION_IDLE.as_secs(),
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

/// Values given on the command line (or via environment) that win over the
/// config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub dataset_path: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub per_mood: Option<usize>,
}

impl RuntimeConfig {
    /// Read a JSON config file.
    ///
    /// # Errors
    ///
    /// Fails when the file can't be read or isn't valid JSON for this struct.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Defaults, or the file at `path` when one is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Create configuration with explicit dataset path
    pub fn with_dataset_path(dataset_path: PathBuf) -> Self {
        Self {
            dataset_path,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn apply(mut self, overrides: &Overrides) -> Self {
        if let Some(path) = &overrides.dataset_path {
            self.dataset_path = path.clone();
        }
        if let Some(host) = &overrides.host {
            self.host = host.clone();
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(per_mood) = overrides.per_mood {
            self.per_mood = per_mood;
        }
        self
    }

    pub fn session_idle(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }

    /// `host:port` for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
