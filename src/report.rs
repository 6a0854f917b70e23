//! Plain-text rendering for the CLI.

use crate::catalog::Catalog;
use crate::recommend::Recommendations;
use crate::song::Entry;
use std::fmt::Write;

/// One block per mood, one line per pick.
pub fn format_recommendations(recommendations: &Recommendations) -> String {
    if recommendations.is_empty() {
        return "No recommendations available.\n".to_string();
    }

    let mut out = String::new();
    for group in recommendations {
        let _ = writeln!(out, "{}:", group.mood);
        for entry in &group.entries {
            match entry {
                Entry::Song(song) => {
                    let _ = writeln!(
                        out,
                        "  [{}] {} by {} ({}, {})",
                        song.id, song.title, song.artist, song.language, song.mood
                    );
                }
                Entry::NotFound(placeholder) => {
                    let _ = writeln!(out, "  {}", placeholder.title);
                }
            }
        }
    }
    out
}

/// Every song, in catalog order.
pub fn format_catalog(catalog: &Catalog) -> String {
    let mut out = String::new();
    for song in catalog.songs() {
        let _ = writeln!(
            out,
            "{:>5}  {} - {}  [{} / {}]",
            song.id, song.artist, song.title, song.mood, song.language
        );
    }
    let _ = writeln!(out, "{} songs", catalog.len());
    out
}

/// Distinct moods and languages with their song counts.
pub fn format_categories(catalog: &Catalog) -> String {
    let mut out = String::from("Moods:\n");
    for mood in catalog.moods() {
        let count = catalog.candidates(&mood, None).count();
        let _ = writeln!(out, "  {mood} ({count})");
    }
    out.push_str("Languages:\n");
    for language in catalog.languages() {
        let count = catalog.songs().iter().filter(|s| s.language == language).count();
        let _ = writeln!(out, "  {language} ({count})");
    }
    out
}
