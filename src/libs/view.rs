//! Console tables for the `dump` command.
//!
//! Password digests never reach these tables; [`UserRow`] does not carry them.

use crate::db::tasks::TaskRow;
use crate::db::users::UserRow;
use anyhow::Result;
use prettytable::{format, row, Table};

pub struct View {}

impl View {
    pub fn users(users: &[UserRow]) -> Result<()> {
        Self::users_table(users).printstd();
        Ok(())
    }

    pub fn tasks(tasks: &[TaskRow]) -> Result<()> {
        Self::tasks_table(tasks).printstd();
        Ok(())
    }

    pub fn users_table(users: &[UserRow]) -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);

        table.set_titles(row!["ID", "USERNAME", "CREATED", "TASKS"]);
        for user in users {
            let created = user
                .created_at
                .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string());
            table.add_row(row![user.id, user.username, created, r->user.task_count]);
        }

        table
    }

    pub fn tasks_table(tasks: &[TaskRow]) -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);

        table.set_titles(row!["ID", "USER", "#", "NAME", "DONE"]);
        for task in tasks {
            let owner = task.username.clone().unwrap_or_else(|| task.user_id.to_string());
            let done = if task.completed { "✓" } else { "" };
            table.add_row(row![task.id, owner, r->task.position, task.name, c->done]);
        }

        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::task::UserId;

    #[test]
    fn tasks_table_uses_username_when_known() {
        let tasks = vec![
            TaskRow {
                id: 1,
                user_id: UserId(7),
                username: Some("ana".to_string()),
                position: 0,
                name: "Buy milk".to_string(),
                completed: true,
            },
            TaskRow {
                id: 2,
                user_id: UserId(8),
                username: None,
                position: 0,
                name: "Walk dog".to_string(),
                completed: false,
            },
        ];

        let rendered = View::tasks_table(&tasks).to_string();
        assert!(rendered.contains("ana"));
        assert!(rendered.contains("Buy milk"));
        assert!(rendered.contains('8'));
        assert_eq!(View::tasks_table(&tasks).len(), 2);
    }

    #[test]
    fn users_table_has_no_password_column() {
        let users = vec![UserRow {
            id: UserId(1),
            username: "ana".to_string(),
            created_at: None,
            task_count: 3,
        }];

        let rendered = View::users_table(&users).to_string();
        assert!(rendered.contains("ana"));
        assert!(!rendered.to_lowercase().contains("password"));
    }
}
