//! # todoapp - personal task manager
//!
//! A browser-rendered to-do list with accounts. Each logged-in browser
//! session edits its own task list in memory; every change is written back to
//! SQLite as a full replacement of the user's list.
//!
//! ## Features
//!
//! - **Task List Engine**: add, rename, toggle, delete and clear completed tasks with an all/active/completed filter
//! - **Accounts**: registration and login with salted password digests
//! - **Persistence**: SQLite with versioned migrations; lists reload in saved order
//! - **Web**: server-rendered HTML forms plus a JSON API, served by axum
//! - **CLI**: `serve`, `init`, `dump`, `check`
//!
//! ## Usage
//!
//! ```rust,no_run
//! use todoapp::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
pub mod web;
