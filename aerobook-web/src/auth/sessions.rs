//! Server-side sessions for interactive logins
//!
//! A session pins the caller's authority to a single active role. Role
//! switches replace that authority so every later request in the
//! session observes exactly one role, never the union of assigned
//! roles. Sessions from other users are untouched by a switch.

use aerobook_application::{Role, UserRecord};
use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;
use uuid::Uuid;

/// Cookie carrying the session id
pub const SESSION_COOKIE: &str = "aerobook_session";

/// Authority record for one established session
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub subject: String,
    pub username: String,
    pub active_role: Role,
    pub created_at: DateTime<Utc>,
}

/// In-memory session store
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionRecord>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Establish a session for an authenticated user, returning its id
    pub fn create(&self, user: &UserRecord) -> String {
        let session_id = Uuid::new_v4().to_string();
        let record = SessionRecord {
            subject: user.subject().to_string(),
            username: user.username.clone(),
            active_role: user.identity.active_role(),
            created_at: Utc::now(),
        };

        let mut sessions = self.sessions.write().unwrap();
        sessions.insert(session_id.clone(), record);
        debug!("Established session for user: {}", user.username);
        session_id
    }

    pub fn get(&self, session_id: &str) -> Option<SessionRecord> {
        self.sessions.read().unwrap().get(session_id).cloned()
    }

    /// Replace the session's authority after a role switch
    pub fn set_active_role(&self, session_id: &str, role: Role) -> bool {
        let mut sessions = self.sessions.write().unwrap();
        match sessions.get_mut(session_id) {
            Some(record) => {
                record.active_role = role;
                true
            }
            None => false,
        }
    }

    pub fn remove(&self, session_id: &str) {
        self.sessions.write().unwrap().remove(session_id);
    }
}

/// Extract the session id from the Cookie header
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<String> {
    let cookie_header = headers.get(axum::http::header::COOKIE)?.to_str().ok()?;
    let prefix = format!("{}=", SESSION_COOKIE);

    for cookie in cookie_header.split(';') {
        let cookie = cookie.trim();
        if let Some(value) = cookie.strip_prefix(&prefix) {
            return Some(value.to_string());
        }
    }
    None
}

/// Set-Cookie value establishing a session
pub fn session_cookie(session_id: &str) -> String {
    format!("{}={}; Path=/; HttpOnly", SESSION_COOKIE, session_id)
}

/// Set-Cookie value clearing the session
pub fn clear_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; Max-Age=0", SESSION_COOKIE)
}
