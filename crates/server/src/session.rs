//! Server-side session state for the selection → play flow.
//!
//! The only thing a session carries is the ability selection. Handlers get it
//! through the [`Session`] extractor; the store itself is injected as an
//! `Extension` at router construction.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderValue},
    response::{IntoResponseParts, ResponseParts},
};

use crate::db::endgames::AbilitySet;
use crate::error::AppError;

pub const SESSION_COOKIE: &str = "endgame_session";

/// Sessions idle for longer than the TTL are dropped: lazily when their
/// owner comes back, and in a sweep whenever a selection is stored.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, StoredSession>>>,
    ttl: Duration,
}

struct StoredSession {
    abilities: AbilitySet,
    last_seen: Instant,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    fn is_live(&self, session: &StoredSession, now: Instant) -> bool {
        now.duration_since(session.last_seen) < self.ttl
    }

    fn get(&self, id: &str) -> Option<AbilitySet> {
        let now = Instant::now();
        let mut sessions = self.inner.write().ok()?;
        let session = sessions.get_mut(id)?;
        if self.is_live(session, now) {
            session.last_seen = now;
            return Some(session.abilities.clone());
        }

        tracing::debug!("Session expired");
        sessions.remove(id);
        None
    }

    fn set(&self, id: &str, abilities: AbilitySet) {
        let now = Instant::now();
        if let Ok(mut sessions) = self.inner.write() {
            sessions.retain(|_, s| self.is_live(s, now));
            sessions.insert(
                id.to_string(),
                StoredSession {
                    abilities,
                    last_seen: now,
                },
            );
        }
    }

    fn remove(&self, id: &str) {
        if let Ok(mut sessions) = self.inner.write() {
            sessions.remove(id);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Per-request view of one visitor's session.
pub struct Session {
    id: String,
    is_new: bool,
    store: SessionStore,
}

impl Session {
    /// The stored selection, if a non-empty one exists.
    pub fn abilities(&self) -> Option<AbilitySet> {
        self.store.get(&self.id).filter(|a| !a.is_empty())
    }

    pub fn select(&self, abilities: AbilitySet) {
        self.store.set(&self.id, abilities);
    }

    pub fn clear(&self) {
        self.store.remove(&self.id);
    }

    /// Response part that hands the id to the browser the first time round.
    pub fn cookie(&self) -> SessionCookie {
        if !self.is_new {
            return SessionCookie(None);
        }
        let value = format!("{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax", self.id);
        SessionCookie(HeaderValue::from_str(&value).ok())
    }
}

fn new_session_id() -> String {
    format!("{:032x}", rand::random::<u128>())
}

fn is_session_id(value: &str) -> bool {
    value.len() == 32 && value.bytes().all(|b| b.is_ascii_hexdigit())
}

fn session_id_from_cookies(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && is_session_id(value))
        .map(|(_, value)| value.to_string())
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let store = parts
            .extensions
            .get::<SessionStore>()
            .ok_or(AppError::Internal("Missing session store".into()))?
            .clone();

        let (id, is_new) = match session_id_from_cookies(parts) {
            Some(id) => (id, false),
            None => (new_session_id(), true),
        };

        Ok(Session { id, is_new, store })
    }
}

pub struct SessionCookie(Option<HeaderValue>);

impl IntoResponseParts for SessionCookie {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        if let Some(value) = self.0 {
            res.headers_mut().append(header::SET_COOKIE, value);
        }
        Ok(res)
    }
}
