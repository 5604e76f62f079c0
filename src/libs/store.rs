//! Persistence seams consumed by the task list engine and the auth gate.
//!
//! The engine and the gate only see these traits. The SQLite implementations
//! live in [`crate::db::tasks`] and [`crate::db::users`]; tests substitute
//! in-memory stores that record every call.

use super::task::{TaskRecord, UserId};
use std::sync::Arc;
use thiserror::Error;

/// Failures reported by a task or credential store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("username '{0}' is already taken")]
    DuplicateUsername(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Per-user task persistence.
pub trait TaskStore {
    /// Returns the user's tasks in saved order.
    fn load_tasks(&self, user_id: UserId) -> Result<Vec<TaskRecord>, StoreError>;

    /// Replaces the user's whole task set with `tasks`.
    ///
    /// Implementations must be atomic: on failure the previously stored set
    /// stays in place.
    fn replace_all_tasks(&self, user_id: UserId, tasks: &[TaskRecord]) -> Result<(), StoreError>;
}

impl<T: TaskStore + ?Sized> TaskStore for &T {
    fn load_tasks(&self, user_id: UserId) -> Result<Vec<TaskRecord>, StoreError> {
        (**self).load_tasks(user_id)
    }

    fn replace_all_tasks(&self, user_id: UserId, tasks: &[TaskRecord]) -> Result<(), StoreError> {
        (**self).replace_all_tasks(user_id, tasks)
    }
}

impl<T: TaskStore + ?Sized> TaskStore for Arc<T> {
    fn load_tasks(&self, user_id: UserId) -> Result<Vec<TaskRecord>, StoreError> {
        (**self).load_tasks(user_id)
    }

    fn replace_all_tasks(&self, user_id: UserId, tasks: &[TaskRecord]) -> Result<(), StoreError> {
        (**self).replace_all_tasks(user_id, tasks)
    }
}

/// Username/password accounts.
pub trait CredentialStore {
    /// Returns the user id when `username` exists and `password` matches.
    fn verify_credentials(&self, username: &str, password: &str) -> Result<Option<UserId>, StoreError>;

    /// Creates an account, failing with [`StoreError::DuplicateUsername`] if the name is taken.
    fn create_user(&self, username: &str, password: &str) -> Result<UserId, StoreError>;
}

impl<T: CredentialStore + ?Sized> CredentialStore for Arc<T> {
    fn verify_credentials(&self, username: &str, password: &str) -> Result<Option<UserId>, StoreError> {
        (**self).verify_credentials(username, password)
    }

    fn create_user(&self, username: &str, password: &str) -> Result<UserId, StoreError> {
        (**self).create_user(username, password)
    }
}
