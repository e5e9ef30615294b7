//! HTTP routes
//!
//! Every action is a form POST that updates the caller's session and
//! redirects back to the page, which then renders the new state.

use crate::render;
use crate::session::Session;
use crate::store::{SessionStore, session_cookie};
use axum::{
    Form, Router,
    extract::{Path, State},
    http::{HeaderMap, header},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use client::JobSearchClient;
use common::{Credentials, FilterError, SearchFilters};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub client: JobSearchClient,
    pub credentials: Arc<Credentials>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(client: JobSearchClient, credentials: Credentials) -> Self {
        Self {
            client,
            credentials: Arc::new(credentials),
            sessions: SessionStore::new(),
        }
    }

    pub fn sessions(mut self, sessions: SessionStore) -> Self {
        self.sessions = sessions;
        self
    }
}

/// Fields of the sidebar search form
#[derive(Debug, Deserialize)]
pub struct SearchForm {
    location: Option<String>,
    /// Present only when the checkbox is ticked
    remote: Option<String>,
    /// Kept as text so a bad value ends up in the error banner
    days: Option<String>,
    page_size: Option<String>,
}

impl SearchForm {
    fn filters(self) -> Result<SearchFilters, FilterError> {
        let remote_only = self.remote.is_some_and(|v| v != "false");
        let days = number("days", self.days)?;
        let page_size = number("page size", self.page_size)?;
        SearchFilters::new(self.location, remote_only, days, page_size, 0)
    }
}

fn number(field: &'static str, value: Option<String>) -> Result<u32, FilterError> {
    let value = value
        .filter(|v| !v.trim().is_empty())
        .ok_or(FilterError::Missing(field))?;
    value.trim().parse().map_err(|_| FilterError::NotANumber {
        field,
        value: value.clone(),
    })
}

/// Create the router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/search", post(search))
        .route("/page/next", post(next_page))
        .route("/page/previous", post(previous_page))
        .route("/cards/{index}/toggle", post(toggle_card))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Handler for GET /
///
/// Visitors without a session see the empty page; one is only created by
/// their first action.
async fn index(State(state): State<AppState>, headers: HeaderMap) -> Html<String> {
    let html = match state.sessions.lookup(&headers) {
        Some(session) => render::page(&*session.lock().await),
        None => render::page(&Session::default()),
    };
    Html(html)
}

/// Handler for GET /health
async fn health() -> &'static str {
    "ok"
}

/// Handler for POST /search
async fn search(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<SearchForm>,
) -> Response {
    let (session, created) = state.sessions.resolve(&headers);
    let mut session = session.lock().await;

    match form.filters() {
        Ok(filters) => {
            session
                .search(&state.client, &state.credentials, filters)
                .await
        }
        Err(err) => session.reject(err),
    }

    with_cookie(created, Redirect::to("/"))
}

/// Handler for POST /page/next
async fn next_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let (session, created) = state.sessions.resolve(&headers);
    session
        .lock()
        .await
        .next_page(&state.client, &state.credentials)
        .await;
    with_cookie(created, Redirect::to("/"))
}

/// Handler for POST /page/previous
async fn previous_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let (session, created) = state.sessions.resolve(&headers);
    session
        .lock()
        .await
        .previous_page(&state.client, &state.credentials)
        .await;
    with_cookie(created, Redirect::to("/"))
}

/// Handler for POST /cards/{index}/toggle
async fn toggle_card(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(index): Path<usize>,
) -> Response {
    let (session, created) = state.sessions.resolve(&headers);
    session.lock().await.toggle_description(index);
    with_cookie(created, Redirect::to("/"))
}

fn with_cookie(created: Option<Uuid>, response: impl IntoResponse) -> Response {
    let mut response = response.into_response();
    if let Some(id) = created {
        response
            .headers_mut()
            .insert(header::SET_COOKIE, session_cookie(id));
    }
    response
}
