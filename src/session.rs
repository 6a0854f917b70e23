//! # Session Store
//!
//! Server-side key-value storage for per-visitor state. The web layer keeps
//! one selection per session under two keys, `selected_moods` (the raw
//! comma-separated form value) and `language` (possibly empty). A new form
//! submission overwrites both.
//!
//! Sessions expire after a period of inactivity and the store holds a
//! bounded number of them, so a stream of cookie-less submissions can't grow
//! it without limit.

use log::{debug, trace};
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

pub const KEY_SELECTED_MOODS: &str = "selected_moods";
pub const KEY_LANGUAGE: &str = "language";

/// Sessions untouched for this long are dropped.
pub const DEFAULT_SESSION_IDLE: Duration = Duration::from_secs(30 * 60);
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

const SESSION_ID_LENGTH: usize = 32;

/// Narrow access to session data.
pub trait SessionStore: Send + Sync {
    fn get(&self, session_id: &str, key: &str) -> Option<String>;
    fn set(&self, session_id: &str, key: &str, value: String);
    fn contains(&self, session_id: &str) -> bool;
}

#[derive(Debug)]
struct SessionEntry {
    values: HashMap<String, String>,
    last_seen: Instant,
}

impl SessionEntry {
    fn is_idle(&self, now: Instant, idle_timeout: Duration) -> bool {
        now.saturating_duration_since(self.last_seen) > idle_timeout
    }
}

/// In-process session storage with idle expiry and a size bound.
///
/// Every access refreshes a session. Idle sessions are swept on `set`, and
/// when the store is full a new session pushes out the least recently used
/// one.
#[derive(Debug)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, SessionEntry>>,
    idle_timeout: Duration,
    max_sessions: usize,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::with_limits(DEFAULT_SESSION_IDLE, DEFAULT_MAX_SESSIONS)
    }
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that forgets sessions idle for longer than `idle_timeout` and
    /// never holds more than `max_sessions` (at least one).
    pub fn with_limits(idle_timeout: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_timeout,
            max_sessions: max_sessions.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, SessionEntry>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Live entry for `session_id`, touched. Drops it instead when idle.
    fn live_entry<'a>(
        &self,
        sessions: &'a mut HashMap<String, SessionEntry>,
        session_id: &str,
    ) -> Option<&'a mut SessionEntry> {
        let now = Instant::now();
        if sessions.get(session_id)?.is_idle(now, self.idle_timeout) {
            debug!("Session expired");
            sessions.remove(session_id);
            return None;
        }
        let entry = sessions.get_mut(session_id)?;
        entry.last_seen = now;
        Some(entry)
    }

    fn evict(&self, sessions: &mut HashMap<String, SessionEntry>, now: Instant) {
        let before = sessions.len();
        sessions.retain(|_, entry| !entry.is_idle(now, self.idle_timeout));
        if sessions.len() < before {
            debug!("Evicted {} idle sessions", before - sessions.len());
        }

        while sessions.len() >= self.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(id, _)| id.clone());
            match oldest {
                Some(id) => {
                    trace!("Session store full, dropping least recently used session");
                    sessions.remove(&id);
                }
                None => break,
            }
        }
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, session_id: &str, key: &str) -> Option<String> {
        let mut sessions = self.lock();
        self.live_entry(&mut sessions, session_id)?.values.get(key).cloned()
    }

    fn set(&self, session_id: &str, key: &str, value: String) {
        let mut sessions = self.lock();
        if let Some(entry) = self.live_entry(&mut sessions, session_id) {
            entry.values.insert(key.to_string(), value);
            return;
        }

        let now = Instant::now();
        self.evict(&mut sessions, now);
        let entry = SessionEntry {
            values: HashMap::from([(key.to_string(), value)]),
            last_seen: now,
        };
        sessions.insert(session_id.to_string(), entry);
    }

    fn contains(&self, session_id: &str) -> bool {
        let mut sessions = self.lock();
        self.live_entry(&mut sessions, session_id).is_some()
    }
}

/// Random alphanumeric token for the session cookie.
pub fn new_session_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_ID_LENGTH)
        .map(char::from)
        .collect()
}

/// The mood/language choice of one visitor, as the sampler wants it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Trimmed, non-empty mood names in submission order. Empty means all moods.
    pub moods: Vec<String>,
    pub language: Option<String>,
}

impl Selection {
    /// Interpret the raw form values.
    ///
    /// ```
    /// use moodtunes::session::Selection;
    ///
    /// let selection = Selection::parse("Happy, Sad,,", "");
    /// assert_eq!(selection.moods, vec!["Happy", "Sad"]);
    /// assert_eq!(selection.language, None);
    /// ```
    pub fn parse(raw_moods: &str, raw_language: &str) -> Self {
        let moods = raw_moods
            .split(',')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .collect();
        let language = Some(raw_language.trim())
            .filter(|l| !l.is_empty())
            .map(str::to_string);

        Self { moods, language }
    }

    /// Overwrite the stored selection of `session_id` with the raw form values.
    pub fn store(store: &dyn SessionStore, session_id: &str, raw_moods: &str, raw_language: &str) {
        store.set(session_id, KEY_SELECTED_MOODS, raw_moods.to_string());
        store.set(session_id, KEY_LANGUAGE, raw_language.to_string());
    }

    /// Read the selection of `session_id`; missing keys read as empty.
    pub fn load(store: &dyn SessionStore, session_id: &str) -> Self {
        let raw_moods = store.get(session_id, KEY_SELECTED_MOODS).unwrap_or_default();
        let raw_language = store.get(session_id, KEY_LANGUAGE).unwrap_or_default();
        Self::parse(&raw_moods, &raw_language)
    }

    /// Moods as the sampler takes them: `None` for "every mood".
    pub fn moods_filter(&self) -> Option<&[String]> {
        Some(self.moods.as_slice()).filter(|m| !m.is_empty())
    }
}
