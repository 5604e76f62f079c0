//! Command-line interface of the todoapp binary.
//!
//! - `serve`: run the web server
//! - `init`: interactive configuration wizard
//! - `dump`: print the users or tasks tables
//! - `check`: database connectivity smoke test
//! - `migrations`: schema status and history (debug builds only)

pub mod check;
pub mod dump;
pub mod init;
#[cfg(debug_assertions)]
pub mod migrations;
pub mod serve;

use crate::libs::config::Config;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Start the web server")]
    Serve(serve::ServeArgs),
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Print database tables", arg_required_else_help = true)]
    Dump(dump::DumpArgs),
    #[command(about = "Check that the database is reachable and writable")]
    Check(check::CheckArgs),
    #[cfg(debug_assertions)]
    #[command(about = "Inspect schema migrations")]
    Migrations(migrations::MigrationsArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Serve(args) => serve::cmd(args).await,
            Commands::Init(args) => init::cmd(args),
            Commands::Dump(args) => dump::cmd(args),
            Commands::Check(args) => check::cmd(args),
            #[cfg(debug_assertions)]
            Commands::Migrations(args) => migrations::cmd(args),
        }
    }
}

/// Database file given on the command line, else the configured one.
fn resolve_db_path(db: Option<PathBuf>) -> Result<PathBuf> {
    match db {
        Some(path) => Ok(path),
        None => Config::load()?.db_path(),
    }
}
