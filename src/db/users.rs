use super::db::Db;
use crate::libs::password::{hash_password, verify_password};
use crate::libs::store::{CredentialStore, StoreError};
use crate::libs::task::UserId;
use chrono::NaiveDateTime;
use rusqlite::{params, ErrorCode, OptionalExtension};

const INSERT_USER: &str = "INSERT INTO users (username, password) VALUES (?1, ?2)";
const SELECT_PASSWORD: &str = "SELECT id, password FROM users WHERE username = ?1";
const SELECT_USERS: &str = "SELECT u.id, u.username, u.created_at, COUNT(t.id)
    FROM users u LEFT JOIN tasks t ON t.user_id = u.id
    GROUP BY u.id ORDER BY u.id";

/// Row of the `users` table, as shown by the database viewer. The password hash is never exposed.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: UserId,
    pub username: String,
    pub created_at: Option<NaiveDateTime>,
    pub task_count: i64,
}

/// SQLite-backed credential store.
#[derive(Clone)]
pub struct Users {
    db: Db,
}

impl Users {
    pub fn new(db: Db) -> Users {
        Users { db }
    }

    pub fn fetch_all(&self) -> Result<Vec<UserRow>, StoreError> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare(SELECT_USERS)?;
        let users = stmt
            .query_map([], |row| {
                Ok(UserRow {
                    id: UserId(row.get(0)?),
                    username: row.get(1)?,
                    created_at: row.get(2)?,
                    task_count: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(users)
    }

    pub fn count(&self) -> Result<i64, StoreError> {
        Ok(self.db.conn().query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?)
    }
}

impl CredentialStore for Users {
    fn verify_credentials(&self, username: &str, password: &str) -> Result<Option<UserId>, StoreError> {
        let row: Option<(i64, String)> = self
            .db
            .conn()
            .query_row(SELECT_PASSWORD, params![username], |row| Ok((row.get(0)?, row.get(1)?)))
            .optional()?;

        Ok(row.and_then(|(id, stored)| verify_password(password, &stored).then_some(UserId(id))))
    }

    fn create_user(&self, username: &str, password: &str) -> Result<UserId, StoreError> {
        let conn = self.db.conn();
        match conn.execute(INSERT_USER, params![username, hash_password(password)]) {
            Ok(_) => Ok(UserId(conn.last_insert_rowid())),
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Err(StoreError::DuplicateUsername(username.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
