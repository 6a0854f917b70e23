//! # Catalog Module
//!
//! Loads the song dataset once at startup and exposes it as an immutable
//! value. The dataset is a CSV file with a header row and the columns
//! `title`, `artist`, `mood`, `language` and, optionally, `id`.
//!
//! ## Loading
//!
//! ```no_run
//! use moodtunes::catalog::{self, Catalog};
//!
//! // Strict: the caller decides what a broken dataset means.
//! let catalog = Catalog::load("songs.csv")?;
//! println!("{} songs", catalog.len());
//!
//! // Lenient: log the failure and run without a catalog.
//! let maybe_catalog = catalog::load_or_absent("songs.csv");
//! # Ok::<(), moodtunes::catalog::CatalogError>(())
//! ```
//!
//! ## Normalization
//!
//! `mood` and `language` go through [`capitalize`], so `"happy"`,
//! `"HAPPY"` and `"Happy"` all end up as `"Happy"`. When the `id` column is
//! missing, ids are assigned 1..N in row order.

use crate::song::{capitalize, Song};
use log::{debug, error, info};
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

const REQUIRED_COLUMNS: [&str; 4] = ["title", "artist", "mood", "language"];

/// Everything that can go wrong while reading the dataset.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to open dataset {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataset is missing required column `{0}`")]
    MissingColumn(&'static str),

    #[error("row {row}: invalid id `{value}`")]
    InvalidId { row: usize, value: String },

    #[error("row {row}: duplicate id {id}")]
    DuplicateId { row: usize, id: u64 },
}

/// Column positions resolved from the header row.
struct Columns {
    title: usize,
    artist: usize,
    mood: usize,
    language: usize,
    id: Option<usize>,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, CatalogError> {
        let find = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
        let require = |name: &'static str| find(name).ok_or(CatalogError::MissingColumn(name));

        let columns = Self {
            title: require(REQUIRED_COLUMNS[0])?,
            artist: require(REQUIRED_COLUMNS[1])?,
            mood: require(REQUIRED_COLUMNS[2])?,
            language: require(REQUIRED_COLUMNS[3])?,
            id: find("id"),
        };
        Ok(columns)
    }
}

/// The ordered, read-only song catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    songs: Vec<Song>,
}

impl Catalog {
    /// Read and normalize the dataset at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_reader(file)?;
        info!("Loaded {} songs from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Parse a CSV dataset from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns = Columns::resolve(csv_reader.headers()?)?;
        if columns.id.is_none() {
            debug!("Dataset has no `id` column, assigning row numbers");
        }

        let mut songs = Vec::new();
        let mut seen_ids = HashSet::new();

        for (index, record) in csv_reader.records().enumerate() {
            let record = record?;
            let row = index + 1;
            let field = |i: usize| record.get(i).unwrap_or_default();

            let id = match columns.id {
                Some(i) => field(i).parse::<u64>().map_err(|_| CatalogError::InvalidId {
                    row,
                    value: field(i).to_string(),
                })?,
                None => row as u64,
            };
            if !seen_ids.insert(id) {
                return Err(CatalogError::DuplicateId { row, id });
            }

            songs.push(Song::new(
                id,
                field(columns.title),
                field(columns.artist),
                field(columns.mood),
                field(columns.language),
            ));
        }

        Ok(Self { songs })
    }

    /// Build a catalog from records that are already normalized.
    ///
    /// Used by tests and benchmarks; ids are taken as given.
    pub fn from_songs(songs: Vec<Song>) -> Self {
        Self { songs }
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// Distinct non-empty moods, in the order they first appear.
    pub fn moods(&self) -> Vec<String> {
        distinct(self.songs.iter().map(|song| song.mood.as_str()))
    }

    /// Distinct non-empty languages, in the order they first appear.
    pub fn languages(&self) -> Vec<String> {
        distinct(self.songs.iter().map(|song| song.language.as_str()))
    }

    /// Songs matching `mood` and, when given, `language`.
    ///
    /// Both arguments are capitalized before comparison. An empty language
    /// is treated as no filter.
    pub fn candidates<'a>(
        &'a self,
        mood: &str,
        language: Option<&str>,
    ) -> impl Iterator<Item = &'a Song> + 'a {
        let mood = capitalize(mood);
        let language = language.map(capitalize).filter(|l| !l.is_empty());

        self.songs.iter().filter(move |song| {
            song.mood == mood && language.as_ref().map_or(true, |l| &song.language == l)
        })
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| !v.is_empty() && seen.insert(*v))
        .map(str::to_string)
        .collect()
}

/// Load the dataset, logging and swallowing any failure.
///
/// The server keeps running without a catalog; every recommendation against
/// `None` is empty.
pub fn load_or_absent<P: AsRef<Path>>(path: P) -> Option<Catalog> {
    match Catalog::load(path.as_ref()) {
        Ok(catalog) => Some(catalog),
        Err(e) => {
            error!("Error loading dataset {}: {e}", path.as_ref().display());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(data: &str) -> Result<Catalog, CatalogError> {
        Catalog::from_reader(data.as_bytes())
    }

    #[test]
    fn test_assigns_sequential_ids_without_id_column() {
        let catalog = parse(
            "title,artist,mood,language\n\
             A,X,happy,english\n\
             B,Y,sad,hindi\n\
             C,Z,Calm,TELUGU\n",
        )
        .unwrap();

        let ids: Vec<u64> = catalog.songs().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(catalog.songs()[0].title, "A");
        assert_eq!(catalog.songs()[2].title, "C");
    }

    #[test]
    fn test_keeps_explicit_ids_and_column_order() {
        let catalog = parse(
            "id,language,mood,artist,title\n\
             10,English,Happy,X,A\n\
             4,Hindi,Sad,Y,B\n",
        )
        .unwrap();

        assert_eq!(catalog.songs()[0].id, 10);
        assert_eq!(catalog.songs()[0].title, "A");
        assert_eq!(catalog.songs()[1].id, 4);
        assert_eq!(catalog.songs()[1].artist, "Y");
    }

    #[test]
    fn test_normalizes_mood_and_language() {
        let catalog = parse("title,artist,mood,language\nA,X, HAPPY ,eNGLISH\n").unwrap();
        let song = &catalog.songs()[0];
        assert_eq!(song.mood, "Happy");
        assert_eq!(song.language, "English");
    }

    #[test]
    fn test_ignores_extra_columns() {
        let catalog = parse("title,artist,year,mood,language\nA,X,1999,happy,english\n").unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.songs()[0].mood, "Happy");
    }

    #[test]
    fn test_missing_required_column() {
        let err = parse("title,artist,language\nA,X,English\n").unwrap_err();
        assert!(matches!(err, CatalogError::MissingColumn("mood")));
    }

    #[test]
    fn test_invalid_and_duplicate_ids() {
        let err = parse("id,title,artist,mood,language\nabc,A,X,Happy,English\n").unwrap_err();
        assert!(matches!(err, CatalogError::InvalidId { row: 1, .. }));

        let err = parse(
            "id,title,artist,mood,language\n\
             1,A,X,Happy,English\n\
             1,B,Y,Sad,Hindi\n",
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId { row: 2, id: 1 }));
    }

    #[test]
    fn test_ragged_rows_are_malformed() {
        let err = parse("title,artist,mood,language\nA,X,Happy\n").unwrap_err();
        assert!(matches!(err, CatalogError::Csv(_)));
    }

    #[test]
    fn test_moods_first_seen_order_skips_empty() {
        let catalog = parse(
            "title,artist,mood,language\n\
             A,X,sad,English\n\
             B,X,,English\n\
             C,X,happy,Hindi\n\
             D,X,Sad,Telugu\n",
        )
        .unwrap();

        assert_eq!(catalog.moods(), vec!["Sad", "Happy"]);
        assert_eq!(catalog.languages(), vec!["English", "Hindi", "Telugu"]);
    }

    #[test]
    fn test_candidates_filter() {
        let catalog = parse(
            "title,artist,mood,language\n\
             A,X,Happy,English\n\
             B,Y,Happy,Hindi\n\
             C,Z,Sad,English\n",
        )
        .unwrap();

        let happy: Vec<&str> = catalog.candidates("happy", None).map(|s| s.title.as_str()).collect();
        assert_eq!(happy, vec!["A", "B"]);

        let happy_en: Vec<&str> = catalog
            .candidates("HAPPY", Some("english"))
            .map(|s| s.title.as_str())
            .collect();
        assert_eq!(happy_en, vec!["A"]);

        assert_eq!(catalog.candidates("Happy", Some("")).count(), 2);
        assert_eq!(catalog.candidates("Romantic", None).count(), 0);
    }

    #[test]
    fn test_load_from_file_and_missing_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "title,artist,mood,language").unwrap();
        writeln!(file, "A,X,happy,english").unwrap();

        let catalog = Catalog::load(file.path()).unwrap();
        assert_eq!(catalog.len(), 1);

        let err = Catalog::load("/definitely/not/here/songs.csv").unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
        assert!(load_or_absent("/definitely/not/here/songs.csv").is_none());
    }
}
