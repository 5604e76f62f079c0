//! Web server command.
//!
//! Resolves the configuration (flags over environment over `config.json`),
//! opens and migrates the database, then serves the HTML and JSON routes
//! until Ctrl-C. Idle sessions are purged in the background.

use crate::{
    db::db::Db,
    libs::{config::Config, messages::Message},
    msg_bail_anyhow, msg_info, msg_success,
    web::{start_server_with_shutdown, AppState},
};
use anyhow::Result;
use chrono::Utc;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

const PURGE_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Default, Args)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// SQLite database file
    #[arg(long)]
    pub db: Option<PathBuf>,
}

impl ServeArgs {
    /// Overrides `config` with the flags that were given.
    pub fn apply(self, config: &mut Config) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(db) = self.db {
            config.database.path = Some(db);
        }
    }
}

pub async fn cmd(args: ServeArgs) -> Result<()> {
    let mut config = Config::load()?;
    args.apply(&mut config);

    let idle_timeout = config.idle_timeout()?;
    let db_path = config.db_path()?;
    let db = Db::open(&db_path)?;
    tracing::info!(path = %db_path.display(), "database ready");

    let state = Arc::new(AppState::new(db, idle_timeout));
    let purge = spawn_session_purge(Arc::clone(&state), PURGE_INTERVAL);

    let (addr, handle) = match start_server_with_shutdown(&config.bind_addr(), state, shutdown_signal()).await {
        Ok(started) => started,
        Err(e) => {
            purge.abort();
            msg_bail_anyhow!(Message::ServerStartFailed(e.to_string()));
        }
    };
    msg_success!(Message::ServerListening(addr.to_string()));

    handle.await?;
    purge.abort();
    msg_info!(Message::ServerStopped);

    Ok(())
}

fn spawn_session_purge(state: Arc<AppState>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let state = Arc::clone(&state);
            match tokio::task::spawn_blocking(move || state.sessions.purge_expired_at(Utc::now())).await {
                Ok(0) => {}
                Ok(count) => tracing::info!(count, "{}", Message::SessionsPurged(count)),
                Err(e) => tracing::error!(error = %e, "session purge failed"),
            }
        }
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let mut config = Config::default();
        config.database.path = Some(PathBuf::from("/from/env.db"));

        ServeArgs {
            host: Some("127.0.0.1".to_string()),
            port: Some(9090),
            db: None,
        }
        .apply(&mut config);

        assert_eq!(config.bind_addr(), "127.0.0.1:9090");
        assert_eq!(config.database.path, Some(PathBuf::from("/from/env.db")));
    }

    #[test]
    fn no_flags_keep_config() {
        let mut config = Config::default();
        ServeArgs::default().apply(&mut config);
        assert_eq!(config, Config::default());
    }
}
