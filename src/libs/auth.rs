//! Authentication gate.
//!
//! Thin glue between the credential store and a [`Session`]: a successful
//! login or registration records the user in the session and seeds the
//! session's task list engine from the task store. Logout forgets the user
//! and empties the in-memory list.

use super::messages::Message;
use super::session::Session;
use super::store::{CredentialStore, StoreError, TaskStore};
use super::task::UserId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("username and password are required")]
    MissingCredentials,
    #[error("username '{0}' is already taken")]
    DuplicateUsername(String),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for AuthError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::DuplicateUsername(username) => AuthError::DuplicateUsername(username),
            other => AuthError::Store(other),
        }
    }
}

pub struct AuthGate<C> {
    credentials: C,
}

impl<C: CredentialStore> AuthGate<C> {
    pub fn new(credentials: C) -> Self {
        Self { credentials }
    }

    /// Returns `Ok(None)` when the username/password pair does not match.
    pub fn login<S: TaskStore>(&self, session: &mut Session<S>, username: &str, password: &str) -> Result<Option<UserId>, AuthError> {
        let username = validate(username, password)?;

        let Some(user_id) = self.credentials.verify_credentials(username, password)? else {
            tracing::info!(username, "login rejected");
            return Ok(None);
        };

        tracing::info!(user_id = %user_id, "user logged in");
        self.start(session, user_id, username);
        Ok(Some(user_id))
    }

    pub fn register<S: TaskStore>(&self, session: &mut Session<S>, username: &str, password: &str) -> Result<UserId, AuthError> {
        let username = validate(username, password)?;

        let user_id = self.credentials.create_user(username, password)?;
        tracing::info!(user_id = %user_id, "user registered");

        self.start(session, user_id, username);
        Ok(user_id)
    }

    pub fn logout<S: TaskStore>(&self, session: &mut Session<S>) {
        if let Some(user) = session.remove_user() {
            tracing::info!(user_id = %user.id, "user logged out");
        }
        let ctx = session.context();
        session.engine.load_for_session(&ctx);
    }

    fn start<S: TaskStore>(&self, session: &mut Session<S>, user_id: UserId, username: &str) {
        session.set_user(user_id, username);
        let ctx = session.context();
        let loaded = session.engine.load_for_session(&ctx);
        if loaded.sync.is_failure() {
            session.notice = Some(Message::TasksLoadFailed.to_string());
        }
    }
}

fn validate<'a>(username: &'a str, password: &str) -> Result<&'a str, AuthError> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(AuthError::MissingCredentials);
    }
    Ok(username)
}
