//! Database layer for the todoapp application.
//!
//! SQLite persistence for accounts and task lists, with versioned schema
//! migrations. The stores here implement the seams in [`crate::libs::store`]:
//!
//! - [`tasks::Tasks`] is the task store. Every save replaces a user's whole
//!   list inside one transaction; loads return tasks in saved order.
//! - [`users::Users`] is the credential store. Passwords are kept as salted
//!   digests, never in plain text.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use todoapp::db::{db::Db, tasks::Tasks, users::Users};
//! use todoapp::libs::store::{CredentialStore, TaskStore};
//! use todoapp::libs::task::TaskRecord;
//!
//! let db = Db::new()?;
//! let user_id = Users::new(db.clone()).create_user("ana", "secret")?;
//! let tasks = Tasks::new(db);
//! tasks.replace_all_tasks(user_id, &[TaskRecord::new("Buy milk", false)])?;
//! assert_eq!(tasks.load_tasks(user_id)?.len(), 1);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Schema
//!
//! - `users(id, username UNIQUE, password, created_at)`
//! - `tasks(id, user_id -> users.id, position, task_name, completed)`
//! - `migrations(version, name, applied_at)`

/// Shared connection handle; opening a database applies pending migrations.
pub mod db;

/// Versioned schema changes and their history.
pub mod migrations;

/// Per-user task lists.
pub mod tasks;

/// Accounts and credential checks.
pub mod users;
