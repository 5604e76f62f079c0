use super::db::Db;
use crate::libs::store::{StoreError, TaskStore};
use crate::libs::task::{TaskRecord, UserId};
use rusqlite::params;

const SELECT_USER_TASKS: &str = "SELECT task_name, completed FROM tasks WHERE user_id = ?1 ORDER BY position, id";
const DELETE_USER_TASKS: &str = "DELETE FROM tasks WHERE user_id = ?1";
const INSERT_TASK: &str = "INSERT INTO tasks (user_id, position, task_name, completed) VALUES (?1, ?2, ?3, ?4)";
const SELECT_ALL_TASKS: &str = "SELECT t.id, t.user_id, u.username, t.position, t.task_name, t.completed
    FROM tasks t LEFT JOIN users u ON u.id = t.user_id
    ORDER BY t.user_id, t.position, t.id";

/// Row of the `tasks` table, as shown by the database viewer.
#[derive(Debug, Clone)]
pub struct TaskRow {
    pub id: i64,
    pub user_id: UserId,
    pub username: Option<String>,
    pub position: i64,
    pub name: String,
    pub completed: bool,
}

/// SQLite-backed task store.
#[derive(Clone)]
pub struct Tasks {
    db: Db,
}

impl Tasks {
    pub fn new(db: Db) -> Tasks {
        Tasks { db }
    }

    pub fn fetch_all(&self) -> Result<Vec<TaskRow>, StoreError> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare(SELECT_ALL_TASKS)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(TaskRow {
                    id: row.get(0)?,
                    user_id: UserId(row.get(1)?),
                    username: row.get(2)?,
                    position: row.get(3)?,
                    name: row.get(4)?,
                    completed: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    pub fn count(&self) -> Result<i64, StoreError> {
        Ok(self.db.conn().query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))?)
    }
}

impl TaskStore for Tasks {
    fn load_tasks(&self, user_id: UserId) -> Result<Vec<TaskRecord>, StoreError> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare(SELECT_USER_TASKS)?;
        let tasks = stmt
            .query_map(params![user_id.0], |row| {
                Ok(TaskRecord {
                    name: row.get(0)?,
                    completed: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(tasks)
    }

    fn replace_all_tasks(&self, user_id: UserId, tasks: &[TaskRecord]) -> Result<(), StoreError> {
        let mut conn = self.db.conn();
        let tx = conn.transaction()?;

        tx.execute(DELETE_USER_TASKS, params![user_id.0])?;
        {
            let mut stmt = tx.prepare(INSERT_TASK)?;
            for (position, task) in tasks.iter().enumerate() {
                stmt.execute(params![user_id.0, position as i64, task.name, task.completed])?;
            }
        }

        tx.commit()?;
        Ok(())
    }
}
