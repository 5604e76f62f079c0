//! HTTP surface of the todoapp server.
//!
//! Two faces over the same sessions and task list engines:
//!
//! - [`pages`]: server-rendered HTML forms. Every mutation answers
//!   `303 See Other` back to `/`, and a failed save is shown as a notice on
//!   the next render.
//! - [`api`]: JSON endpoints under `/api` returning `{view, sync}`.
//!
//! The session token travels in the `todoapp_session` cookie. Sessions only
//! exist for logged-in users: login and registration create a fresh one,
//! logout drops it.
//!
//! Engine, auth and store calls block on SQLite and on the per-session lock,
//! so handlers run them through [`blocking`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use todoapp::db::db::Db;
//! use todoapp::web::{start_server, AppState};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let state = Arc::new(AppState::new(Db::open_in_memory()?, chrono::Duration::minutes(30)));
//! let (addr, handle) = start_server("127.0.0.1:0", state).await?;
//! println!("listening on {addr}");
//! handle.await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod error;
pub mod pages;

use crate::db::db::Db;
use crate::db::tasks::Tasks;
use crate::db::users::Users;
use crate::libs::auth::AuthGate;
use crate::libs::engine::{SyncStatus, TaskView};
use crate::libs::messages::Message;
use crate::libs::session::{Session, SessionContext, Sessions};
use crate::libs::task::UserId;
use anyhow::Result;
use axum::http::{header, HeaderMap};
use axum::Router;
use error::ApiError;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

pub const SESSION_COOKIE: &str = "todoapp_session";

/// Shared server state.
pub struct AppState {
    pub gate: AuthGate<Users>,
    pub sessions: Sessions<Tasks>,
}

impl AppState {
    pub fn new(db: Db, idle_timeout: chrono::Duration) -> Self {
        Self {
            gate: AuthGate::new(Users::new(db.clone())),
            sessions: Sessions::new(Tasks::new(db), idle_timeout),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    pages::router().nest("/api", api::router()).with_state(state)
}

/// Binds `addr` and serves until the process ends.
pub async fn start_server(addr: &str, state: Arc<AppState>) -> Result<(SocketAddr, JoinHandle<()>)> {
    start_server_with_shutdown(addr, state, std::future::pending()).await
}

/// Binds `addr` and serves until `shutdown` resolves.
///
/// Returns the bound address (useful with port `0`) and the server task.
pub async fn start_server_with_shutdown<F>(addr: &str, state: Arc<AppState>, shutdown: F) -> Result<(SocketAddr, JoinHandle<()>)>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).with_graceful_shutdown(shutdown).await {
            tracing::error!(error = %e, "server error");
        }
    });

    Ok((bound_addr, handle))
}

/// Runs `f` on the blocking thread pool.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(f).await?)
}

/// Runs `f` against the logged-in session named by `token`, holding its lock.
///
/// Yields `None` when the token is missing, unknown or expired.
pub(crate) async fn with_session<T, F>(state: Arc<AppState>, token: Option<String>, f: F) -> Result<Option<T>, ApiError>
where
    F: FnOnce(&mut Session<Tasks>, SessionContext) -> T + Send + 'static,
    T: Send + 'static,
{
    blocking(move || {
        let shared = state.sessions.get(&token?)?;
        let mut session = shared.lock();
        session.user_id()?;
        let ctx = session.context();
        Some(f(&mut *session, ctx))
    })
    .await
}

/// Records a failed save so the next page render can mention it.
pub(crate) fn note_sync(session: &mut Session<Tasks>, sync: &SyncStatus) {
    if sync.is_failure() {
        session.notice = Some(Message::TasksSaveFailed.to_string());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Entry {
    Login,
    Register,
}

/// A freshly registered session.
pub(crate) struct Started {
    pub token: String,
    pub user_id: UserId,
    pub username: String,
    pub view: TaskView,
    pub notice: Option<String>,
}

/// Authenticates into a new session and registers it, dropping `previous`.
///
/// A new token is issued on every login so a token seen before
/// authentication never grants access afterwards.
pub(crate) fn start_session(state: &AppState, previous: Option<String>, entry: Entry, username: &str, password: &str) -> Result<Started, ApiError> {
    let mut session = state.sessions.create();

    let user_id = match entry {
        Entry::Login => state
            .gate
            .login(&mut session, username, password)?
            .ok_or(ApiError::Unauthorized(Message::LoginFailed))?,
        Entry::Register => state.gate.register(&mut session, username, password)?,
    };

    let username = session.user().map(|user| user.username.clone()).unwrap_or_default();
    let view = session.engine.view();
    let notice = session.notice.clone();

    let token = state.sessions.insert(session);
    if let Some(previous) = previous {
        state.sessions.remove(&previous);
    }

    let event = match entry {
        Entry::Login => Message::LoginSucceeded,
        Entry::Register => Message::RegisterSucceeded,
    };
    tracing::info!(user_id = user_id.0, username = %username, "{}", event);

    Ok(Started {
        token,
        user_id,
        username,
        view,
        notice,
    })
}

/// Logs the session out and forgets it.
pub(crate) fn end_session(state: &AppState, token: Option<String>) {
    let Some(token) = token else {
        return;
    };
    if let Some(shared) = state.sessions.get(&token) {
        let mut session = shared.lock();
        let user_id = session.user_id();
        state.gate.logout(&mut *session);
        if let Some(user_id) = user_id {
            tracing::info!(user_id = user_id.0, "{}", Message::LogoutSucceeded);
        }
    }
    state.sessions.remove(&token);
}

pub(crate) fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

pub(crate) fn session_cookie(token: &str) -> String {
    format!("{}={}; HttpOnly; SameSite=Lax; Path=/", SESSION_COOKIE, token)
}

pub(crate) fn expired_cookie() -> String {
    format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", SESSION_COOKIE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn finds_session_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; todoapp_session=abc-123; lang=en"));
        assert_eq!(session_token(&headers).as_deref(), Some("abc-123"));
    }

    #[test]
    fn ignores_missing_or_empty_cookie() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_token(&headers), None);

        headers.insert(header::COOKIE, HeaderValue::from_static("todoapp_session="));
        assert_eq!(session_token(&headers), None);
    }

    #[test]
    fn cookie_attributes() {
        let cookie = session_cookie("tok");
        assert!(cookie.starts_with("todoapp_session=tok;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(expired_cookie().contains("Max-Age=0"));
    }
}
