use super::migrations::init_with_migrations;
use crate::libs::data_storage::DataStorage;
use anyhow::Result;
use parking_lot::{Mutex, MutexGuard};
use rusqlite::{params, Connection};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const DB_FILE_NAME: &str = "todoapp.db";

/// Shared SQLite handle.
///
/// Cloning is cheap; all clones use the same connection, serialized by a mutex.
#[derive(Clone)]
pub struct Db {
    conn: Arc<Mutex<Connection>>,
}

impl Db {
    /// Opens the database in the platform data directory.
    pub fn new() -> Result<Db> {
        Self::open(&Self::default_path()?)
    }

    pub fn open(path: &Path) -> Result<Db> {
        let mut conn = Self::new_without_migrations(path)?;
        init_with_migrations(&mut conn)?;

        Ok(Db::from_connection(conn))
    }

    pub fn open_in_memory() -> Result<Db> {
        let mut conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        init_with_migrations(&mut conn)?;

        Ok(Db::from_connection(conn))
    }

    /// Opens a raw connection without touching the schema.
    pub fn new_without_migrations(path: &Path) -> Result<Connection> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        Ok(conn)
    }

    pub fn default_path() -> Result<PathBuf> {
        DataStorage::new().get_path(DB_FILE_NAME)
    }

    pub fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock()
    }

    /// Creates, writes, reads back and deletes a probe row inside a
    /// transaction that is always rolled back.
    pub fn check_writable(&self) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        tx.execute("CREATE TABLE IF NOT EXISTS write_check (id INTEGER PRIMARY KEY, name TEXT NOT NULL)", [])?;
        tx.execute("INSERT INTO write_check (name) VALUES (?1)", params!["probe"])?;
        let id = tx.last_insert_rowid();
        let updated = tx.execute("UPDATE write_check SET name = ?1 WHERE id = ?2", params!["probe-updated", id])?;
        let name: String = tx.query_row("SELECT name FROM write_check WHERE id = ?1", params![id], |row| row.get(0))?;
        let deleted = tx.execute("DELETE FROM write_check WHERE id = ?1", params![id])?;
        tx.rollback()?;

        if updated != 1 || deleted != 1 || name != "probe-updated" {
            anyhow::bail!("write check read back unexpected data");
        }
        Ok(())
    }

    fn from_connection(conn: Connection) -> Db {
        Db {
            conn: Arc::new(Mutex::new(conn)),
        }
    }
}
