//! # Mood Sampler
//!
//! Picks up to `per_mood` songs for every requested mood, never handing out
//! the same song twice within one call.
//!
//! ## Algorithm
//!
//! For each mood, in the order given:
//!
//! 1. Keep catalog rows whose mood matches (and language, when one is set).
//! 2. Drop rows already picked for an earlier mood in this call.
//! 3. Nothing left: emit a single [`Placeholder`].
//! 4. Otherwise shuffle-and-slice `min(per_mood, available)` rows, uniform
//!    without replacement, and remember their ids.
//!
//! Duplicate moods in the request are processed again against the depleted
//! pool. Each occurrence keeps its own entry in the result.
//!
//! ```
//! use moodtunes::catalog::Catalog;
//! use moodtunes::recommend::recommend;
//! use moodtunes::song::Song;
//!
//! let catalog = Catalog::from_songs(vec![
//!     Song::new(1, "A", "X", "Happy", "English"),
//!     Song::new(2, "B", "Y", "Happy", "Hindi"),
//! ]);
//!
//! let picks = recommend(Some(&catalog), Some(&["happy".to_string()]), Some("english"), 5);
//! let happy = picks.get("Happy").unwrap();
//! assert_eq!(happy.len(), 1);
//! assert_eq!(happy[0].id(), Some(1));
//! ```

use crate::catalog::Catalog;
use crate::song::{capitalize, Entry, Placeholder, Song};
use log::{debug, trace};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashSet;

/// Songs per mood when the caller doesn't say.
pub const DEFAULT_PER_MOOD: usize = 5;

/// Result list for one processed mood.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodPicks {
    pub mood: String,
    pub entries: Vec<Entry>,
}

/// Ordered mapping from mood to its picks.
///
/// Iteration follows the order moods were processed. A mood requested twice
/// appears twice. Keyed access ([`Recommendations::get`] and the JSON form)
/// resolves a repeated mood to its last group, like a map overwritten in
/// processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recommendations {
    groups: Vec<MoodPicks>,
}

impl Recommendations {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of mood entries, duplicates included.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Entries of the last group for `mood`.
    pub fn get(&self, mood: &str) -> Option<&[Entry]> {
        self.groups
            .iter()
            .rev()
            .find(|group| group.mood == mood)
            .map(|group| group.entries.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &MoodPicks> {
        self.groups.iter()
    }

    /// Ids of every real pick, in result order.
    pub fn song_ids(&self) -> Vec<u64> {
        self.groups
            .iter()
            .flat_map(|group| group.entries.iter().filter_map(Entry::id))
            .collect()
    }
}

impl<'a> IntoIterator for &'a Recommendations {
    type Item = &'a MoodPicks;
    type IntoIter = std::slice::Iter<'a, MoodPicks>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Serializes as a JSON object keyed by mood, in processing order.
///
/// A duplicated mood becomes a repeated key; JSON readers keep the last one,
/// which is the group `get` returns.
impl Serialize for Recommendations {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for group in &self.groups {
            map.serialize_entry(&group.mood, &group.entries)?;
        }
        map.end()
    }
}

/// Recommend songs using the thread-local random source.
///
/// * `catalog` - `None` when the dataset failed to load; yields an empty result.
/// * `selected_moods` - moods in request order. `None` or empty means every
///   mood in the catalog.
/// * `language` - optional filter; empty is the same as `None`.
/// * `per_mood` - upper bound on picks per mood.
#[must_use]
pub fn recommend(
    catalog: Option<&Catalog>,
    selected_moods: Option<&[String]>,
    language: Option<&str>,
    per_mood: usize,
) -> Recommendations {
    recommend_with_rng(catalog, selected_moods, language, per_mood, &mut rand::thread_rng())
}

/// Same as [`recommend`], drawing from `rng`.
pub fn recommend_with_rng<R: Rng + ?Sized>(
    catalog: Option<&Catalog>,
    selected_moods: Option<&[String]>,
    language: Option<&str>,
    per_mood: usize,
    rng: &mut R,
) -> Recommendations {
    let Some(catalog) = catalog else {
        debug!("No catalog loaded, returning empty recommendations");
        return Recommendations::default();
    };

    let moods: Vec<String> = match selected_moods {
        Some(moods) if !moods.is_empty() => moods.iter().map(|m| capitalize(m)).collect(),
        _ => catalog.moods(),
    };
    let language = language.map(capitalize).filter(|l| !l.is_empty());

    let mut used_ids: HashSet<u64> = HashSet::new();
    let mut groups = Vec::with_capacity(moods.len());

    for mood in moods {
        let mut pool: Vec<&Song> = catalog
            .candidates(&mood, language.as_deref())
            .filter(|song| !used_ids.contains(&song.id))
            .collect();

        let entries = if pool.is_empty() {
            debug!("No songs left for mood '{mood}' (language: {language:?})");
            vec![Entry::NotFound(Placeholder::not_found(&mood, language.as_deref()))]
        } else {
            let available = pool.len();
            let count = per_mood.min(available);
            let (picked, _) = pool.partial_shuffle(rng, count);
            trace!("Picked {count} of {available} candidates for mood '{mood}'");
            used_ids.extend(picked.iter().map(|song| song.id));
            picked.iter().map(|&song| Entry::Song(song.clone())).collect()
        };

        groups.push(MoodPicks { mood, entries });
    }

    Recommendations { groups }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn two_song_catalog() -> Catalog {
        Catalog::from_songs(vec![
            Song::new(1, "A", "X", "Happy", "English"),
            Song::new(2, "B", "Y", "Happy", "Hindi"),
        ])
    }

    fn big_catalog() -> Catalog {
        let moods = ["Happy", "Sad", "Romantic", "Energetic", "Calm"];
        let languages = ["Telugu", "Hindi", "English"];
        let songs = (1..=120u64)
            .map(|i| {
                let mood = moods[(i as usize) % moods.len()];
                let language = languages[(i as usize) % languages.len()];
                Song::new(i, &format!("Song {i}"), &format!("Artist {}", i % 7), mood, language)
            })
            .collect();
        Catalog::from_songs(songs)
    }

    fn moods(list: &[&str]) -> Vec<String> {
        list.iter().map(|m| m.to_string()).collect()
    }

    #[test]
    fn test_absent_catalog_is_empty() {
        let picks = recommend(None, Some(&moods(&["Happy"])), Some("English"), 5);
        assert!(picks.is_empty());
    }

    #[test]
    fn test_language_filter_excludes_other_languages() {
        let catalog = two_song_catalog();
        let picks = recommend(Some(&catalog), Some(&moods(&["Happy"])), Some("English"), 5);

        assert_eq!(picks.len(), 1);
        let happy = picks.get("Happy").unwrap();
        assert_eq!(happy.len(), 1);
        assert_eq!(happy[0].id(), Some(1));
        assert_eq!(happy[0].title(), "A");
    }

    #[test]
    fn test_unknown_mood_gets_placeholder() {
        let catalog = two_song_catalog();
        let picks = recommend(Some(&catalog), Some(&moods(&["Sad"])), None, 5);

        let sad = picks.get("Sad").unwrap();
        assert_eq!(sad.len(), 1);
        assert!(sad[0].is_placeholder());
        assert!(sad[0].title().contains("'Sad'"));
        assert_eq!(sad[0].artist(), "");
        assert_eq!(sad[0].language(), "");
        assert_eq!(sad[0].mood(), "");
    }

    #[test]
    fn test_duplicate_mood_exhausts_pool() {
        let catalog = Catalog::from_songs(vec![Song::new(1, "Only", "X", "Happy", "English")]);
        let picks = recommend(Some(&catalog), Some(&moods(&["Happy", "happy"])), None, 5);

        let groups: Vec<&MoodPicks> = picks.iter().collect();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].mood, "Happy");
        assert_eq!(groups[0].entries[0].id(), Some(1));
        assert_eq!(groups[1].mood, "Happy");
        assert!(groups[1].entries[0].is_placeholder());
    }

    #[test]
    fn test_duplicate_mood_lookup_agrees_with_json() {
        let catalog = Catalog::from_songs(vec![Song::new(1, "Only", "X", "Happy", "English")]);
        let picks = recommend(Some(&catalog), Some(&moods(&["Happy", "Happy"])), None, 5);

        let happy = picks.get("Happy").unwrap();
        assert_eq!(happy.len(), 1);
        assert!(happy[0].is_placeholder());

        let json = serde_json::to_string(&picks).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(json.matches("\"Happy\":[").count(), 2);
        assert_eq!(parsed["Happy"], serde_json::to_value(happy).unwrap());
    }

    #[test]
    fn test_case_insensitive_moods() {
        let catalog = two_song_catalog();
        for query in ["happy", "HAPPY", "hApPy"] {
            let picks = recommend(Some(&catalog), Some(&moods(&[query])), None, 5);
            let happy = picks.get("Happy").unwrap();
            assert_eq!(happy.len(), 2, "query {query}");
            assert!(happy.iter().all(|e| !e.is_placeholder()));
        }
    }

    #[test]
    fn test_no_moods_means_all_catalog_moods() {
        let catalog = Catalog::from_songs(vec![
            Song::new(1, "A", "X", "Sad", "English"),
            Song::new(2, "B", "Y", "Happy", "Hindi"),
            Song::new(3, "C", "Z", "Sad", "Hindi"),
        ]);

        for selected in [None, Some(Vec::<String>::new())] {
            let picks = recommend(Some(&catalog), selected.as_deref(), None, 5);
            let order: Vec<&str> = picks.iter().map(|g| g.mood.as_str()).collect();
            assert_eq!(order, vec!["Sad", "Happy"]);
        }
    }

    #[test]
    fn test_empty_language_is_no_filter() {
        let catalog = two_song_catalog();
        let picks = recommend(Some(&catalog), Some(&moods(&["Happy"])), Some(""), 5);
        assert_eq!(picks.get("Happy").unwrap().len(), 2);
    }

    #[test]
    fn test_counts_are_min_of_k_and_available() {
        let catalog = big_catalog();
        let mut rng = StdRng::seed_from_u64(7);

        for k in [0usize, 1, 3, 5, 30] {
            let picks = recommend_with_rng(
                Some(&catalog),
                Some(&moods(&["Happy", "Sad", "Calm"])),
                Some("Hindi"),
                k,
                &mut rng,
            );
            for group in &picks {
                let available = catalog.candidates(&group.mood, Some("Hindi")).count();
                if available == 0 {
                    assert_eq!(group.entries.len(), 1);
                    assert!(group.entries[0].is_placeholder());
                } else {
                    assert_eq!(group.entries.len(), k.min(available), "mood {}", group.mood);
                }
            }
        }
    }

    #[test]
    fn test_no_repeats_and_subset_of_catalog() {
        let catalog = big_catalog();
        let catalog_ids: HashSet<u64> = catalog.songs().iter().map(|s| s.id).collect();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..50 {
            let picks = recommend_with_rng(
                Some(&catalog),
                Some(&moods(&["Happy", "Sad", "Happy", "Calm", "Sad"])),
                None,
                10,
                &mut rng,
            );
            let ids = picks.song_ids();
            let unique: HashSet<u64> = ids.iter().copied().collect();
            assert_eq!(ids.len(), unique.len(), "duplicate id in {ids:?}");
            assert!(unique.is_subset(&catalog_ids));
        }
    }

    #[test]
    fn test_picks_come_from_candidate_pool() {
        let catalog = big_catalog();
        let pool: HashSet<u64> = catalog.candidates("Energetic", Some("Telugu")).map(|s| s.id).collect();

        for _ in 0..20 {
            let picks = recommend(Some(&catalog), Some(&moods(&["energetic"])), Some("telugu"), 3);
            for entry in picks.get("Energetic").unwrap() {
                let song = match entry {
                    Entry::Song(song) => song,
                    Entry::NotFound(_) => panic!("expected a song"),
                };
                assert!(pool.contains(&song.id));
                assert_eq!(song.mood, "Energetic");
                assert_eq!(song.language, "Telugu");
            }
        }
    }

    #[test]
    fn test_sampling_eventually_covers_pool() {
        let catalog = big_catalog();
        let pool: HashSet<u64> = catalog.candidates("Calm", None).map(|s| s.id).collect();
        let mut seen = HashSet::new();
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..500 {
            let picks = recommend_with_rng(Some(&catalog), Some(&moods(&["Calm"])), None, 2, &mut rng);
            seen.extend(picks.song_ids());
        }
        assert_eq!(seen, pool);
    }

    #[test]
    fn test_catalog_is_not_mutated() {
        let catalog = big_catalog();
        let before = catalog.songs().to_vec();
        let _ = recommend(Some(&catalog), None, Some("English"), 5);
        assert_eq!(catalog.songs(), before.as_slice());
    }

    #[test]
    fn test_serializes_as_mood_keyed_object() {
        let catalog = two_song_catalog();
        let picks = recommend(Some(&catalog), Some(&moods(&["Happy", "Sad"])), Some("Hindi"), 5);
        let json = serde_json::to_value(&picks).unwrap();

        assert_eq!(json["Happy"][0]["id"], 2);
        assert_eq!(json["Sad"][0]["artist"], "");
    }
}
