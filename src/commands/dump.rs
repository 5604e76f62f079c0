//! Database viewer: prints the `users` or `tasks` table.

use super::resolve_db_path;
use crate::{
    db::{db::Db, tasks::Tasks, users::Users},
    libs::{messages::Message, view::View},
    msg_info, msg_print,
};
use anyhow::Result;
use clap::{Args, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DumpTable {
    /// Accounts with their task counts (password hashes are never shown)
    Users,
    /// Every stored task, in list order per user
    Tasks,
}

#[derive(Debug, Args)]
pub struct DumpArgs {
    /// Table to print
    #[arg(value_enum)]
    table: DumpTable,

    /// Database file (defaults to the configured one)
    #[arg(long)]
    db: Option<PathBuf>,
}

pub fn cmd(args: DumpArgs) -> Result<()> {
    let db = Db::open(&resolve_db_path(args.db)?)?;

    match args.table {
        DumpTable::Users => {
            let users = Users::new(db).fetch_all()?;
            if users.is_empty() {
                msg_info!(Message::NoUsersFound);
                return Ok(());
            }
            msg_print!(Message::UsersHeader, true);
            View::users(&users)?;
        }
        DumpTable::Tasks => {
            let tasks = Tasks::new(db).fetch_all()?;
            if tasks.is_empty() {
                msg_info!(Message::NoTasksFound);
                return Ok(());
            }
            msg_print!(Message::TasksHeader, true);
            View::tasks(&tasks)?;
        }
    }

    Ok(())
}
