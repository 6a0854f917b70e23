//! # Song Records
//!
//! The row type of the catalog, the "not found" placeholder emitted by the
//! sampler, and the capitalization rule both sides use for matching.

use serde::{Deserialize, Serialize};

/// One row of the catalog.
///
/// `mood` and `language` are always stored in capitalized form (see
/// [`capitalize`]), so equality against a capitalized query is a plain
/// string comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    /// Unique for the lifetime of the catalog.
    /// Synthesized as a 1-based row number when the dataset has no `id` column.
    pub id: u64,
    pub title: String,
    pub artist: String,
    pub mood: String,
    pub language: String,
}

impl Song {
    /// Build a song, normalizing `mood` and `language`.
    pub fn new(id: u64, title: &str, artist: &str, mood: &str, language: &str) -> Self {
        Self {
            id,
            title: title.trim().to_string(),
            artist: artist.trim().to_string(),
            mood: capitalize(mood),
            language: capitalize(language),
        }
    }
}

/// Synthetic entry standing in for an empty result list.
///
/// Serializes with the same field names as [`Song`] minus `id`, so a JSON
/// consumer sees `{"title": "No songs found ...", "artist": "", ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placeholder {
    pub title: String,
    pub artist: String,
    pub language: String,
    pub mood: String,
}

impl Placeholder {
    /// Placeholder for `mood` with an optional language filter.
    ///
    /// The message names the normalized language the sampler filtered on, or
    /// `'any'` without a filter; the caller's raw spelling is not echoed.
    pub fn not_found(mood: &str, language: Option<&str>) -> Self {
        Self {
            title: format!(
                "No songs found for mood '{mood}' in language '{}'.",
                language.unwrap_or("any")
            ),
            artist: String::new(),
            language: String::new(),
            mood: String::new(),
        }
    }
}

/// An entry of a mood's result list: either a real pick or the placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Entry {
    Song(Song),
    NotFound(Placeholder),
}

impl Entry {
    pub fn title(&self) -> &str {
        match self {
            Entry::Song(song) => &song.title,
            Entry::NotFound(p) => &p.title,
        }
    }

    pub fn artist(&self) -> &str {
        match self {
            Entry::Song(song) => &song.artist,
            Entry::NotFound(p) => &p.artist,
        }
    }

    pub fn language(&self) -> &str {
        match self {
            Entry::Song(song) => &song.language,
            Entry::NotFound(p) => &p.language,
        }
    }

    pub fn mood(&self) -> &str {
        match self {
            Entry::Song(song) => &song.mood,
            Entry::NotFound(p) => &p.mood,
        }
    }

    /// Catalog id of a real pick.
    pub fn id(&self) -> Option<u64> {
        match self {
            Entry::Song(song) => Some(song.id),
            Entry::NotFound(_) => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Entry::NotFound(_))
    }
}

/// Capitalize a categorical value: first character upper-cased, the rest
/// lower-cased, surrounding whitespace dropped.
///
/// ```
/// use moodtunes::song::capitalize;
///
/// assert_eq!(capitalize("happy"), "Happy");
/// assert_eq!(capitalize("HAPPY"), "Happy");
/// assert_eq!(capitalize(" english "), "English");
/// assert_eq!(capitalize(""), "");
/// ```
#[must_use]
pub fn capitalize(value: &str) -> String {
    let mut chars = value.trim().chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
