//! Database smoke test.
//!
//! Opens the configured database (applying pending migrations), reports the
//! schema version and row counts, then runs a write cycle that is rolled back.

use super::resolve_db_path;
use crate::{
    db::{db::Db, migrations::get_db_version, tasks::Tasks, users::Users},
    libs::messages::Message,
    msg_bail_anyhow, msg_error_anyhow, msg_info, msg_success,
};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Database file (defaults to the configured one)
    #[arg(long)]
    db: Option<PathBuf>,
}

pub fn cmd(args: CheckArgs) -> Result<()> {
    let path = resolve_db_path(args.db)?;

    let db = Db::open(&path).map_err(|e| msg_error_anyhow!(Message::DatabaseCheckFailed(e.to_string())))?;
    msg_success!(Message::DatabaseOpened(path.display().to_string()));

    let version = get_db_version(&db.conn())?;
    msg_info!(Message::DatabaseVersion(version));

    let users = Users::new(db.clone()).count()?;
    let tasks = Tasks::new(db.clone()).count()?;
    msg_info!(Message::DatabaseCounts { users, tasks });

    if let Err(e) = db.check_writable() {
        msg_bail_anyhow!(Message::DatabaseCheckFailed(e.to_string()));
    }
    msg_success!(Message::DatabaseWriteCheckPassed);

    Ok(())
}
