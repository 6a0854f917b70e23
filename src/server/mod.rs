//! # Web Front End
//!
//! Three pages tied together by a server-side session:
//!
//! - `GET /` landing page
//! - `GET /select` mood/language form, `POST /select` stores the choice and
//!   redirects to `/results`
//! - `GET /results` runs the sampler on the stored choice
//!
//! Plus `GET /health` and `GET /api/recommendations` for scripts.

pub mod pages;
mod requests_logging;
mod state;

pub use state::{GuardedSessionStore, ServerState, SharedCatalog};

use crate::catalog::Catalog;
use crate::config::RuntimeConfig;
use crate::recommend::{recommend, Recommendations};
use crate::session::{new_session_id, InMemorySessionStore, Selection};

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    middleware,
    response::{Html, Redirect},
    routing::get,
    Form, Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use log::{debug, info};
use requests_logging::log_requests;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const COOKIE_SESSION_ID_KEY: &str = "session_id";

#[derive(Debug, Deserialize)]
struct SelectionForm {
    #[serde(default)]
    moods: String,
    #[serde(default)]
    language: String,
}

#[derive(Debug, Deserialize)]
struct RecommendationsQuery {
    #[serde(default)]
    moods: String,
    #[serde(default)]
    language: String,
    per_mood: Option<usize>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    catalog_loaded: bool,
    songs: usize,
    moods: Vec<String>,
    uptime_secs: u64,
}

async fn landing() -> Html<&'static str> {
    Html(pages::LANDING_PAGE)
}

async fn select_page() -> Html<String> {
    Html(pages::select_page())
}

async fn submit_selection(
    State(sessions): State<GuardedSessionStore>,
    jar: CookieJar,
    Form(form): Form<SelectionForm>,
) -> (CookieJar, Redirect) {
    let existing = jar
        .get(COOKIE_SESSION_ID_KEY)
        .map(|cookie| cookie.value().to_string())
        .filter(|id| sessions.contains(id));

    let (jar, session_id) = match existing {
        Some(id) => (jar, id),
        None => {
            let id = new_session_id();
            debug!("Starting new session");
            let cookie = Cookie::build((COOKIE_SESSION_ID_KEY, id.clone()))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax);
            (jar.add(cookie), id)
        }
    };

    debug!("Storing selection moods={:?} language={:?}", form.moods, form.language);
    Selection::store(sessions.as_ref(), &session_id, &form.moods, &form.language);

    (jar, Redirect::to("/results"))
}

async fn results(State(state): State<ServerState>, jar: CookieJar) -> Html<String> {
    let selection = jar
        .get(COOKIE_SESSION_ID_KEY)
        .map(|cookie| Selection::load(state.sessions.as_ref(), cookie.value()))
        .unwrap_or_default();

    let recommendations = recommend_for(&state, &selection, state.per_mood);
    Html(pages::results_page(&recommendations))
}

async fn api_recommendations(
    State(state): State<ServerState>,
    Query(query): Query<RecommendationsQuery>,
) -> Json<Recommendations> {
    let selection = Selection::parse(&query.moods, &query.language);
    let per_mood = query.per_mood.unwrap_or(state.per_mood);
    Json(recommend_for(&state, &selection, per_mood))
}

async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let catalog = state.catalog();
    Json(HealthResponse {
        catalog_loaded: catalog.is_some(),
        songs: catalog.map_or(0, Catalog::len),
        moods: catalog.map(Catalog::moods).unwrap_or_default(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

fn recommend_for(state: &ServerState, selection: &Selection, per_mood: usize) -> Recommendations {
    recommend(
        state.catalog(),
        selection.moods_filter(),
        selection.language.as_deref(),
        per_mood,
    )
}

/// Build the router around an already-constructed state.
pub fn make_app(state: ServerState) -> Router {
    Router::new()
        .route("/", get(landing))
        .route("/select", get(select_page).post(submit_selection))
        .route("/results", get(results))
        .route("/health", get(health))
        .route("/api/recommendations", get(api_recommendations))
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

/// Serve until the process is stopped.
pub async fn run_server(config: &RuntimeConfig, catalog: Option<Catalog>) -> Result<()> {
    let sessions = InMemorySessionStore::with_limits(config.session_idle(), config.max_sessions);
    let state = ServerState::new(catalog, Arc::new(sessions), config.per_mood);
    let app = make_app(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Listening on http://{address}");

    axum::serve(listener, app).await.context("Server error")
}
