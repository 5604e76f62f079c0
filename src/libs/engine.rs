//! Task list engine: the in-memory task list of one session.
//!
//! The engine owns the ordered task list and the active [`Filter`], mediates
//! every mutation, keeps the derived view (per-task `visible` flag and the
//! active count) consistent, and pushes a full snapshot to the [`TaskStore`]
//! after each mutation.
//!
//! ## Persistence contract
//!
//! - Every mutating operation ends with exactly one `replace_all_tasks` call
//!   carrying a snapshot taken before the call.
//! - Filter changes are view-only and never touch the store.
//! - Anonymous contexts skip the store silently.
//! - Store failures are logged and reported through [`SyncStatus::Failed`];
//!   the in-memory list stays authoritative and the next successful sync
//!   reconciles the store, since every sync is a full replace.
//! - Writes only go to the user whose list was loaded into the engine, so a
//!   failed load can never wipe the stored list on the next mutation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use todoapp::db::{db::Db, tasks::Tasks};
//! use todoapp::libs::engine::TaskListEngine;
//! use todoapp::libs::session::SessionContext;
//! use todoapp::libs::task::UserId;
//!
//! let mut engine = TaskListEngine::new(Tasks::new(Db::open_in_memory()?));
//! let ctx = SessionContext::authenticated(UserId(1));
//! engine.load_for_session(&ctx);
//! let added = engine.add_task(&ctx, "Buy milk")?;
//! engine.toggle_completion(&ctx, added.id)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::session::SessionContext;
use super::store::TaskStore;
use super::task::{Filter, Task, TaskId, TaskRecord, UserId};
use serde::Serialize;
use thiserror::Error;

/// A blank task name was submitted; nothing changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("blank task name ignored")]
pub struct Ignored;

/// The addressed task does not exist in this engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown task {0}")]
pub struct UnknownTask(pub TaskId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RenameError {
    #[error(transparent)]
    UnknownTask(#[from] UnknownTask),
    #[error("task name cannot be blank")]
    BlankName,
}

/// Outcome of the persistence step of an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum SyncStatus {
    /// The store now holds the current list.
    Saved,
    /// The list was replaced with what the store holds.
    Loaded,
    /// Anonymous session; the store was not contacted.
    Skipped,
    /// View-only change; the store was not contacted.
    NotRequired,
    /// The store call failed or was refused. In-memory state is kept.
    Failed(String),
}

impl SyncStatus {
    pub fn is_failure(&self) -> bool {
        matches!(self, SyncStatus::Failed(_))
    }
}

/// One task as seen by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRow {
    pub id: TaskId,
    pub name: String,
    pub completed: bool,
    pub visible: bool,
}

/// Render input: the whole list with derived visibility, the active count
/// and the current filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskView {
    pub tasks: Vec<TaskRow>,
    pub active_count: usize,
    pub filter: Filter,
}

impl TaskView {
    pub fn visible(&self) -> impl Iterator<Item = &TaskRow> {
        self.tasks.iter().filter(|row| row.visible)
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.len() - self.active_count
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Updated {
    pub view: TaskView,
    pub sync: SyncStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskAdded {
    pub id: TaskId,
    #[serde(flatten)]
    pub updated: Updated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deleted {
    pub removed: TaskRecord,
    #[serde(flatten)]
    pub updated: Updated,
}

pub struct TaskListEngine<S> {
    store: S,
    tasks: Vec<Task>,
    filter: Filter,
    active_count: usize,
    next_id: u64,
    /// User whose stored list is currently loaded.
    owner: Option<UserId>,
}

impl<S: TaskStore> TaskListEngine<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            tasks: Vec::new(),
            filter: Filter::All,
            active_count: 0,
            next_id: 1,
            owner: None,
        }
    }

    /// Appends a task named `name` (trimmed). Blank names are ignored.
    pub fn add_task(&mut self, ctx: &SessionContext, name: &str) -> Result<TaskAdded, Ignored> {
        let name = name.trim();
        if name.is_empty() {
            tracing::debug!("ignoring blank task name");
            return Err(Ignored);
        }

        let id = self.issue_id();
        self.tasks.push(Task::new(id, name));
        tracing::debug!(task_id = %id, "task added");

        Ok(TaskAdded {
            id,
            updated: self.commit(ctx),
        })
    }

    /// Stores `new_name` trimmed and leaves `completed` alone.
    ///
    /// A blank name is refused with [`RenameError::BlankName`]: the task keeps
    /// its old name and nothing is synced.
    pub fn rename_task(&mut self, ctx: &SessionContext, id: TaskId, new_name: &str) -> Result<Updated, RenameError> {
        self.edit_task(ctx, id, Some(new_name), None)
    }

    /// Renames and/or sets the completion flag of one task with a single sync.
    ///
    /// Validation happens before any change, so a blank name leaves the
    /// completion flag untouched too.
    pub fn edit_task(
        &mut self,
        ctx: &SessionContext,
        id: TaskId,
        new_name: Option<&str>,
        completed: Option<bool>,
    ) -> Result<Updated, RenameError> {
        let index = self.position(id)?;
        let name = new_name.map(str::trim);
        if name.is_some_and(str::is_empty) {
            return Err(RenameError::BlankName);
        }

        let task = &mut self.tasks[index];
        if let Some(name) = name {
            task.name = name.to_string();
        }
        if let Some(completed) = completed {
            task.completed = completed;
        }
        Ok(self.commit(ctx))
    }

    pub fn toggle_completion(&mut self, ctx: &SessionContext, id: TaskId) -> Result<Updated, UnknownTask> {
        let index = self.position(id)?;
        let task = &mut self.tasks[index];
        task.completed = !task.completed;

        Ok(self.commit(ctx))
    }

    /// Sets the completion flag explicitly. Syncs even when the flag is unchanged.
    pub fn set_completed(&mut self, ctx: &SessionContext, id: TaskId, completed: bool) -> Result<Updated, UnknownTask> {
        let index = self.position(id)?;
        self.tasks[index].completed = completed;

        Ok(self.commit(ctx))
    }

    pub fn delete_task(&mut self, ctx: &SessionContext, id: TaskId) -> Result<Deleted, UnknownTask> {
        let index = self.position(id)?;
        let removed = self.tasks.remove(index).record();
        tracing::debug!(task_id = %id, "task deleted");

        Ok(Deleted {
            removed,
            updated: self.commit(ctx),
        })
    }

    /// Removes every completed task with a single sync for the whole batch.
    pub fn clear_completed(&mut self, ctx: &SessionContext) -> Updated {
        let before = self.tasks.len();
        self.tasks.retain(|task| !task.completed);
        tracing::debug!(removed = before - self.tasks.len(), "cleared completed tasks");

        self.commit(ctx)
    }

    pub fn set_filter(&mut self, filter: Filter) -> Updated {
        self.filter = filter;
        self.recompute();

        Updated {
            view: self.view(),
            sync: SyncStatus::NotRequired,
        }
    }

    /// Replaces the in-memory list with the stored list of the context's user.
    ///
    /// An anonymous context empties the list without contacting the store.
    pub fn load_for_session(&mut self, ctx: &SessionContext) -> Updated {
        let sync = match ctx.user_id {
            None => {
                self.replace_tasks(Vec::new());
                self.owner = None;
                SyncStatus::Skipped
            }
            Some(user_id) => match self.store.load_tasks(user_id) {
                Ok(records) => {
                    tracing::debug!(user_id = %user_id, count = records.len(), "tasks loaded");
                    self.replace_tasks(records);
                    self.owner = Some(user_id);
                    SyncStatus::Loaded
                }
                Err(e) => {
                    tracing::error!(user_id = %user_id, error = %e, "failed to load tasks");
                    self.replace_tasks(Vec::new());
                    self.owner = None;
                    SyncStatus::Failed(e.to_string())
                }
            },
        };

        Updated { view: self.view(), sync }
    }

    pub fn view(&self) -> TaskView {
        TaskView {
            tasks: self
                .tasks
                .iter()
                .map(|task| TaskRow {
                    id: task.id,
                    name: task.name.clone(),
                    completed: task.completed,
                    visible: task.visible,
                })
                .collect(),
            active_count: self.active_count,
            filter: self.filter,
        }
    }

    /// Snapshot of the list in the persisted shape.
    pub fn records(&self) -> Vec<TaskRecord> {
        self.tasks.iter().map(Task::record).collect()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn active_count(&self) -> usize {
        self.active_count
    }

    pub fn owner(&self) -> Option<UserId> {
        self.owner
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn issue_id(&mut self) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        id
    }

    fn position(&self, id: TaskId) -> Result<usize, UnknownTask> {
        self.tasks.iter().position(|task| task.id == id).ok_or_else(|| {
            tracing::warn!(task_id = %id, "operation on unknown task");
            UnknownTask(id)
        })
    }

    fn replace_tasks(&mut self, records: Vec<TaskRecord>) {
        let mut tasks = Vec::with_capacity(records.len());
        for record in records {
            let id = self.issue_id();
            tasks.push(Task::from_record(id, record));
        }
        self.tasks = tasks;
        self.recompute();
    }

    fn recompute(&mut self) {
        let filter = self.filter;
        let mut active = 0;
        for task in &mut self.tasks {
            task.visible = filter.matches(task.completed);
            if !task.completed {
                active += 1;
            }
        }
        self.active_count = active;
    }

    fn commit(&mut self, ctx: &SessionContext) -> Updated {
        self.recompute();
        let sync = self.sync(ctx);

        Updated { view: self.view(), sync }
    }

    fn sync(&self, ctx: &SessionContext) -> SyncStatus {
        let Some(user_id) = ctx.user_id else {
            return SyncStatus::Skipped;
        };

        if self.owner != Some(user_id) {
            tracing::error!(user_id = %user_id, "refusing to save a task list that was not loaded for this user");
            return SyncStatus::Failed(format!("task list is not loaded for user {}", user_id));
        }

        let snapshot = self.records();
        match self.store.replace_all_tasks(user_id, &snapshot) {
            Ok(()) => {
                tracing::debug!(user_id = %user_id, count = snapshot.len(), "tasks saved");
                SyncStatus::Saved
            }
            Err(e) => {
                tracing::error!(user_id = %user_id, error = %e, "failed to save tasks");
                SyncStatus::Failed(e.to_string())
            }
        }
    }
}
