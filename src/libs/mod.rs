//! Core library modules for the todoapp application.
//!
//! Everything below the web layer: the task model and the task list engine,
//! sessions and authentication, persistence seams, configuration and the
//! user-facing messages.
//!
//! ## Features
//!
//! - **Task List Engine**: ordered per-session task list with derived visibility and active count
//! - **Sessions & Auth**: cookie-keyed sessions, login/registration over a credential store
//! - **Persistence Seams**: [`store::TaskStore`] and [`store::CredentialStore`] traits
//! - **Presentation**: server-side HTML rendering and console tables
//! - **Core Infrastructure**: configuration, data storage, messaging
//!
//! ## Usage
//!
//! ```rust,no_run
//! use todoapp::db::{db::Db, tasks::Tasks};
//! use todoapp::libs::session::{Session, SessionContext};
//! use todoapp::libs::task::UserId;
//!
//! let mut session = Session::new(Tasks::new(Db::new()?));
//! session.set_user(UserId(1), "ana");
//! let ctx = session.context();
//! session.engine.load_for_session(&ctx);
//! session.engine.add_task(&ctx, "Buy milk")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod auth;
pub mod config;
pub mod data_storage;
pub mod engine;
pub mod messages;
pub mod password;
pub mod render;
pub mod session;
pub mod store;
pub mod task;
pub mod view;
