//! Server-held sessions.
//!
//! A [`Session`] binds one browser client to at most one authenticated user
//! and owns that user's [`TaskListEngine`]. Sessions live in the [`Sessions`]
//! registry, keyed by a random token carried in a cookie.
//!
//! Each session sits behind its own mutex. Every request locks the session
//! for the whole engine call, so two mutations of the same task list never
//! run concurrently and a sync never sees a half-applied change.

use super::engine::TaskListEngine;
use super::store::TaskStore;
use super::task::UserId;
use base64::prelude::*;
use chrono::{DateTime, Duration, Utc};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

/// Explicit per-request identity threaded through every engine call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionContext {
    pub user_id: Option<UserId>,
}

impl SessionContext {
    pub fn anonymous() -> Self {
        Self { user_id: None }
    }

    pub fn authenticated(user_id: UserId) -> Self {
        Self { user_id: Some(user_id) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub id: UserId,
    pub username: String,
}

pub struct Session<S> {
    user: Option<SessionUser>,
    pub engine: TaskListEngine<S>,
    last_seen: DateTime<Utc>,
    /// Sync failure to surface on the next page render.
    pub notice: Option<String>,
}

impl<S: TaskStore> Session<S> {
    pub fn new(store: S) -> Self {
        Self {
            user: None,
            engine: TaskListEngine::new(store),
            last_seen: Utc::now(),
            notice: None,
        }
    }

    pub fn set_user(&mut self, id: UserId, username: &str) {
        self.user = Some(SessionUser {
            id,
            username: username.to_string(),
        });
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user.as_ref().map(|user| user.id)
    }

    pub fn remove_user(&mut self) -> Option<SessionUser> {
        self.user.take()
    }

    pub fn context(&self) -> SessionContext {
        SessionContext { user_id: self.user_id() }
    }

    pub fn last_seen(&self) -> DateTime<Utc> {
        self.last_seen
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.last_seen = now;
    }
}

pub type SharedSession<S> = Arc<Mutex<Session<S>>>;

/// Registry of live sessions with idle expiry.
pub struct Sessions<S> {
    store: S,
    sessions: RwLock<HashMap<String, SharedSession<S>>>,
    idle_timeout: Duration,
}

impl<S: TaskStore + Clone> Sessions<S> {
    pub fn new(store: S, idle_timeout: Duration) -> Self {
        Self {
            store,
            sessions: RwLock::new(HashMap::new()),
            idle_timeout,
        }
    }

    /// Builds a fresh anonymous session that is not registered yet.
    pub fn create(&self) -> Session<S> {
        Session::new(self.store.clone())
    }

    /// Registers a session under a new random token and returns the token.
    pub fn insert(&self, session: Session<S>) -> String {
        let token = new_token();
        self.sessions.write().insert(token.clone(), Arc::new(Mutex::new(session)));
        token
    }

    /// Looks up a live session and refreshes its idle timer.
    pub fn get(&self, token: &str) -> Option<SharedSession<S>> {
        let now = Utc::now();
        let shared = self.sessions.read().get(token).cloned()?;
        {
            let mut session = shared.lock();
            if now - session.last_seen() > self.idle_timeout {
                drop(session);
                self.remove(token);
                tracing::debug!("session expired");
                return None;
            }
            session.touch(now);
        }
        Some(shared)
    }

    pub fn remove(&self, token: &str) -> Option<SharedSession<S>> {
        self.sessions.write().remove(token)
    }

    /// Drops every session idle for longer than the timeout at `now`.
    pub fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, shared| now - shared.lock().last_seen() <= self.idle_timeout);
        before - sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn new_token() -> String {
    BASE64_URL_SAFE_NO_PAD.encode(rand::random::<[u8; 32]>())
}
