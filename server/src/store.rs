//! In-memory session registry keyed by a browser cookie.

use crate::session::Session;
use axum::http::{HeaderMap, HeaderValue, header};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "jobs_session";

/// Sessions idle for longer than this are dropped.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);
/// Upper bound on live sessions; the least recently used one goes first.
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

pub type SharedSession = Arc<tokio::sync::Mutex<Session>>;

struct Entry {
    session: SharedSession,
    last_seen: Instant,
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<Uuid, Entry>>>,
    ttl: Duration,
    capacity: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_limits(DEFAULT_SESSION_TTL, DEFAULT_MAX_SESSIONS)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(ttl: Duration, capacity: usize) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            ttl,
            capacity: capacity.max(1),
        }
    }

    /// Existing, unexpired session for the request's cookie. Never creates one.
    pub fn lookup(&self, headers: &HeaderMap) -> Option<SharedSession> {
        let id = session_id(headers)?;
        let mut sessions = self.lock();
        Self::touch(&mut sessions, id, self.ttl)
    }

    /// Session for the request's cookie, created if needed.
    ///
    /// Returns the new id as well when a session had to be created, so the
    /// caller can set the cookie.
    pub fn resolve(&self, headers: &HeaderMap) -> (SharedSession, Option<Uuid>) {
        let mut sessions = self.lock();

        if let Some(session) =
            session_id(headers).and_then(|id| Self::touch(&mut sessions, id, self.ttl))
        {
            return (session, None);
        }

        let ttl = self.ttl;
        sessions.retain(|_, entry| entry.last_seen.elapsed() < ttl);
        while sessions.len() >= self.capacity {
            let Some(oldest) = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(id, _)| *id)
            else {
                break;
            };
            sessions.remove(&oldest);
            tracing::debug!("Evicted session {}", oldest);
        }

        let id = Uuid::new_v4();
        let session = SharedSession::default();
        sessions.insert(
            id,
            Entry {
                session: session.clone(),
                last_seen: Instant::now(),
            },
        );
        tracing::debug!("Created session {} ({} active)", id, sessions.len());
        (session, Some(id))
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, Entry>> {
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn touch(
        sessions: &mut HashMap<Uuid, Entry>,
        id: Uuid,
        ttl: Duration,
    ) -> Option<SharedSession> {
        let entry = sessions.get_mut(&id)?;
        if entry.last_seen.elapsed() >= ttl {
            sessions.remove(&id);
            return None;
        }
        entry.last_seen = Instant::now();
        Some(entry.session.clone())
    }
}

/// Session id carried by the request's `Cookie` header, if any.
pub fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// `Set-Cookie` value binding the browser to a session.
pub fn session_cookie(id: Uuid) -> HeaderValue {
    // A hyphenated UUID is always a valid header value.
    HeaderValue::from_str(&format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, id
    ))
    .unwrap_or_else(|_| HeaderValue::from_static(""))
}
