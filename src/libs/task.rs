//! Task data model.
//!
//! Plain data shared by the task list engine, the SQLite task store and the
//! renderer. Nothing in here knows about persistence or presentation.
//!
//! - [`TaskId`]: session-scoped stable identifier handed out by the engine
//! - [`UserId`]: owner of a task list, the rowid of the `users` table
//! - [`Task`]: in-memory task with its derived `visible` flag
//! - [`TaskRecord`]: the persisted shape of a task (name + completion)
//! - [`Filter`]: view predicate selecting which tasks are shown

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a task inside one engine.
///
/// Ids are monotonic and never reused by the engine that issued them. They
/// are not persisted: every load hands out a fresh sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A task as held by the task list engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub completed: bool,
    /// Derived from the active filter, never persisted.
    pub visible: bool,
}

impl Task {
    pub fn new(id: TaskId, name: &str) -> Self {
        Task {
            id,
            name: name.to_string(),
            completed: false,
            visible: true,
        }
    }

    pub fn from_record(id: TaskId, record: TaskRecord) -> Self {
        Task {
            id,
            name: record.name,
            completed: record.completed,
            visible: true,
        }
    }

    pub fn record(&self) -> TaskRecord {
        TaskRecord {
            name: self.name.clone(),
            completed: self.completed,
        }
    }
}

/// The persisted form of a task: what the task store reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub name: String,
    pub completed: bool,
}

impl TaskRecord {
    pub fn new(name: &str, completed: bool) -> Self {
        TaskRecord {
            name: name.to_string(),
            completed,
        }
    }
}

/// View-level predicate over the task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    /// Whether a task with the given completion state is shown under this filter.
    pub fn matches(&self, completed: bool) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !completed,
            Filter::Completed => completed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Active => "active",
            Filter::Completed => "completed",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown filter '{0}', expected all, active or completed")]
pub struct ParseFilterError(pub String);

impl FromStr for Filter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Filter::All),
            "active" => Ok(Filter::Active),
            "completed" => Ok(Filter::Completed),
            _ => Err(ParseFilterError(s.to_string())),
        }
    }
}
