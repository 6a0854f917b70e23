use axum::extract::FromRef;

use crate::catalog::Catalog;
use crate::session::SessionStore;
use std::sync::Arc;
use std::time::Instant;

pub type SharedCatalog = Option<Arc<Catalog>>;
pub type GuardedSessionStore = Arc<dyn SessionStore>;

#[derive(Clone)]
pub struct ServerState {
    /// `None` when the dataset failed to load.
    pub catalog: SharedCatalog,
    pub sessions: GuardedSessionStore,
    pub per_mood: usize,
    pub start_time: Instant,
}

impl ServerState {
    pub fn new(catalog: Option<Catalog>, sessions: GuardedSessionStore, per_mood: usize) -> Self {
        Self {
            catalog: catalog.map(Arc::new),
            sessions,
            per_mood,
            start_time: Instant::now(),
        }
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_deref()
    }
}

impl FromRef<ServerState> for GuardedSessionStore {
    fn from_ref(input: &ServerState) -> Self {
        input.sessions.clone()
    }
}
