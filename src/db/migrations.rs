//! Database schema migration management and versioning.
//!
//! Every schema change is a numbered SQL batch in [`MIGRATIONS`]. Applied
//! versions are recorded in the `migrations` table, so opening an existing
//! database only runs what is missing. All pending batches run inside one
//! transaction.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use todoapp::db::migrations::{init_with_migrations, get_db_version};
//! use rusqlite::Connection;
//!
//! let mut conn = Connection::open("todoapp.db")?;
//! init_with_migrations(&mut conn)?;
//! let version = get_db_version(&conn)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::libs::messages::Message;
use crate::{msg_debug, msg_error, msg_info, msg_success};
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

const TRACKING_TABLE: &str = "
CREATE TABLE IF NOT EXISTS migrations (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

/// Schema history, in version order. Append only.
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "create_users_and_tasks",
        // `position` keeps reloads in the order the list was saved.
        sql: "
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            );
            CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                position INTEGER NOT NULL,
                task_name TEXT NOT NULL,
                completed BOOLEAN NOT NULL DEFAULT FALSE
            );",
    },
    Migration {
        version: 2,
        name: "add_task_position_index",
        sql: "CREATE INDEX IF NOT EXISTS idx_tasks_user_position ON tasks(user_id, position);",
    },
];

/// One row of the `migrations` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMigration {
    pub version: u32,
    pub name: String,
    pub applied_at: String,
}

#[derive(Debug, Default)]
pub struct MigrationManager;

impl MigrationManager {
    pub fn new() -> Self {
        Self
    }

    /// Applies every pending migration in one transaction.
    ///
    /// A failing migration rolls back the whole batch and is returned as an error.
    pub fn run_migrations(&self, conn: &mut Connection) -> Result<()> {
        conn.execute(TRACKING_TABLE, [])?;

        let current = current_version(conn)?;
        let pending: Vec<&Migration> = MIGRATIONS.iter().filter(|m| m.version > current).collect();
        if pending.is_empty() {
            msg_debug!(Message::DatabaseUpToDate);
            return Ok(());
        }
        msg_info!(Message::MigrationsFound(pending.len()));

        let tx = conn.transaction()?;
        for migration in pending {
            msg_info!(Message::RunningMigration(migration.version, migration.name.to_string()));

            if let Err(e) = tx.execute_batch(migration.sql) {
                msg_error!(Message::MigrationFailed(migration.version, e.to_string()));
                return Err(e).with_context(|| format!("migration {} ({})", migration.version, migration.name));
            }
            tx.execute(
                "INSERT INTO migrations (version, name) VALUES (?1, ?2)",
                params![migration.version, migration.name],
            )?;
            msg_success!(Message::MigrationCompleted(migration.version));
        }
        tx.commit()?;

        msg_success!(Message::AllMigrationsCompleted);
        Ok(())
    }

    pub fn latest_version(&self) -> u32 {
        MIGRATIONS.last().map_or(0, |m| m.version)
    }

    pub fn is_migration_applied(&self, conn: &Connection, version: u32) -> Result<bool> {
        if !has_tracking_table(conn)? {
            return Ok(false);
        }
        let found = conn
            .query_row("SELECT 1 FROM migrations WHERE version = ?1", params![version], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }

    /// Applied migrations ordered by version. Empty for a fresh database.
    pub fn get_migration_history(&self, conn: &Connection) -> Result<Vec<AppliedMigration>> {
        if !has_tracking_table(conn)? {
            return Ok(Vec::new());
        }

        let mut stmt = conn.prepare("SELECT version, name, applied_at FROM migrations ORDER BY version")?;
        let history = stmt
            .query_map([], |row| {
                Ok(AppliedMigration {
                    version: row.get(0)?,
                    name: row.get(1)?,
                    applied_at: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(history)
    }
}

fn has_tracking_table(conn: &Connection) -> Result<bool> {
    Ok(conn.query_row(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type = 'table' AND name = 'migrations'",
        [],
        |row| row.get(0),
    )?)
}

/// Highest applied version, 0 for a fresh database.
fn current_version(conn: &Connection) -> Result<u32> {
    if !has_tracking_table(conn)? {
        return Ok(0);
    }
    let version: Option<u32> = conn.query_row("SELECT MAX(version) FROM migrations", [], |row| row.get(0))?;
    Ok(version.unwrap_or(0))
}

pub fn init_with_migrations(conn: &mut Connection) -> Result<()> {
    MigrationManager::new().run_migrations(conn)
}

pub fn get_db_version(conn: &Connection) -> Result<u32> {
    current_version(conn)
}

pub fn needs_migration(conn: &Connection) -> Result<bool> {
    Ok(current_version(conn)? < MigrationManager::new().latest_version())
}
